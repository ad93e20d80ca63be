//! Slide documents stored in a raw recording directory.
//!
//! Layout: `<recording>/presentation/<id>/svgs/slide<N>.svg`, with `N`
//! starting at 1.

use std::path::{Path, PathBuf};

use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_engine::slides::SlideSource;
use slidecast_model::canvas::{BaseDocument, Canvas};

/// Reads presentations from `<recording>/presentation`.
#[derive(Debug, Clone)]
pub struct DirectorySlideSource {
    recording: PathBuf,
    fallback: Canvas,
}

impl DirectorySlideSource {
    pub fn new(recording: impl Into<PathBuf>, fallback: Canvas) -> Self {
        Self {
            recording: recording.into(),
            fallback,
        }
    }

    pub fn presentation_dir(&self) -> PathBuf {
        self.recording.join("presentation")
    }

    fn svg_dir(&self, presentation: &str) -> PathBuf {
        self.presentation_dir().join(presentation).join("svgs")
    }

    /// Slide files of a presentation in slide order.
    pub fn slide_files(&self, presentation: &str) -> SlidecastResult<Vec<PathBuf>> {
        let dir = self.svg_dir(presentation);
        if !dir.is_dir() {
            return Err(SlidecastError::FileNotFound { path: dir });
        }

        let mut numbered = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if let Some(number) = slide_number(&path) {
                numbered.push((number, path));
            }
        }
        numbered.sort_by_key(|(number, _)| *number);

        if numbered
            .iter()
            .enumerate()
            .any(|(i, (number, _))| *number as usize != i + 1)
        {
            tracing::warn!(
                presentation,
                dir = %dir.display(),
                "Slide files are not numbered 1..N; using sorted order"
            );
        }
        Ok(numbered.into_iter().map(|(_, path)| path).collect())
    }

    /// Every presentation id in the recording, sorted.
    pub fn list_presentations(&self) -> SlidecastResult<Vec<String>> {
        let dir = self.presentation_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl SlideSource for DirectorySlideSource {
    fn load(&self, presentation: &str) -> SlidecastResult<Vec<BaseDocument>> {
        self.slide_files(presentation)?
            .iter()
            .map(|path| {
                let svg = std::fs::read_to_string(path).map_err(|e| {
                    SlidecastError::presentation(format!("{}: {e}", path.display()))
                })?;
                Ok(BaseDocument::new(svg, self.fallback))
            })
            .collect()
    }
}

/// `N` of a `slide<N>.svg` file name.
fn slide_number(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix("slide")?
        .strip_suffix(".svg")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "slidecast-presentation-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_slides_are_sorted_numerically() {
        let root = scratch("sorted");
        let svgs = root.join("presentation").join("deck").join("svgs");
        std::fs::create_dir_all(&svgs).unwrap();
        for n in [10, 2, 1] {
            std::fs::write(
                svgs.join(format!("slide{n}.svg")),
                format!(r#"<svg width="{n}" height="1"></svg>"#),
            )
            .unwrap();
        }
        std::fs::write(svgs.join("thumbnail.png"), b"x").unwrap();

        let source = DirectorySlideSource::new(&root, Canvas::HD);
        let slides = source.load("deck").unwrap();
        let widths: Vec<_> = slides.iter().map(|s| s.canvas().width).collect();
        assert_eq!(widths, vec![1.0, 2.0, 10.0]);
        assert_eq!(source.list_presentations().unwrap(), vec!["deck"]);

        std::fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_missing_presentation_is_an_error() {
        let root = scratch("missing");
        let source = DirectorySlideSource::new(&root, Canvas::HD);
        assert!(matches!(
            source.load("ghost").unwrap_err(),
            SlidecastError::FileNotFound { .. }
        ));
        assert!(source.list_presentations().unwrap().is_empty());
    }

    #[test]
    fn test_slide_number() {
        assert_eq!(slide_number(Path::new("a/slide12.svg")), Some(12));
        assert_eq!(slide_number(Path::new("a/slide.svg")), None);
        assert_eq!(slide_number(Path::new("a/cover.svg")), None);
    }
}
