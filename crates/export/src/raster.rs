//! External rasterizer and PDF joiner.
//!
//! Both are thin wrappers around command-line tools. A failed invocation is
//! returned to the caller, which reports it and carries on with the next
//! artifact.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Output of one rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterTarget {
    /// Vector PDF page.
    Pdf,
    /// PNG scaled to a fixed pixel height.
    Png { height: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{program} is not installed or not in PATH")]
    Unavailable { program: String },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Turns an SVG file into a raster or PDF artifact.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, input: &Path, output: &Path, target: RasterTarget)
        -> Result<(), RenderError>;

    fn is_available(&self) -> bool;

    fn name(&self) -> &str;
}

/// Concatenates PDF pages into one document.
pub trait DocumentJoiner: Send + Sync {
    fn join(&self, pages: &[PathBuf], output: &Path) -> Result<(), RenderError>;

    fn is_available(&self) -> bool;

    fn name(&self) -> &str;
}

/// `rsvg-convert` from librsvg.
#[derive(Debug, Clone)]
pub struct RsvgConvert {
    program: String,
}

impl RsvgConvert {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(input: &Path, output: &Path, target: RasterTarget) -> Vec<String> {
        let mut args = Vec::new();
        match target {
            RasterTarget::Pdf => {
                args.extend(["-f".to_string(), "pdf".to_string()]);
                args.push(input.display().to_string());
            }
            RasterTarget::Png { height } => {
                args.extend(["-f".to_string(), "png".to_string()]);
                args.push(input.display().to_string());
                args.extend(["-h".to_string(), height.to_string()]);
            }
        }
        args.extend(["-o".to_string(), output.display().to_string()]);
        args
    }
}

impl Default for RsvgConvert {
    fn default() -> Self {
        Self::new("rsvg-convert")
    }
}

impl Rasterizer for RsvgConvert {
    fn rasterize(
        &self,
        input: &Path,
        output: &Path,
        target: RasterTarget,
    ) -> Result<(), RenderError> {
        let args = Self::args(input, output, target);
        tracing::debug!(program = %self.program, ?args, "Rasterizing");
        let mut cmd = Command::new(&self.program);
        cmd.args(&args);
        run(&self.program, cmd)
    }

    fn is_available(&self) -> bool {
        command_exists(&self.program)
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// `pdfjoin` from pdfjam.
#[derive(Debug, Clone)]
pub struct PdfJoin {
    program: String,
}

impl PdfJoin {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PdfJoin {
    fn default() -> Self {
        Self::new("pdfjoin")
    }
}

impl DocumentJoiner for PdfJoin {
    fn join(&self, pages: &[PathBuf], output: &Path) -> Result<(), RenderError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-o").arg(output).args(pages);
        tracing::debug!(program = %self.program, pages = pages.len(), output = %output.display(), "Joining pages");
        run(&self.program, cmd)
    }

    fn is_available(&self) -> bool {
        command_exists(&self.program)
    }

    fn name(&self) -> &str {
        &self.program
    }
}

fn run(program: &str, mut cmd: Command) -> Result<(), RenderError> {
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenderError::Unavailable {
                    program: program.to_string(),
                }
            } else {
                RenderError::Spawn {
                    program: program.to_string(),
                    source: e,
                }
            }
        })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.lines().rev().take(4).collect::<Vec<_>>();
    Err(RenderError::Failed {
        program: program.to_string(),
        status: output.status.to_string(),
        stderr: stderr.into_iter().rev().collect::<Vec<_>>().join(" | "),
    })
}

/// Whether `binary` resolves on the current `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_args() {
        let args = RsvgConvert::args(
            Path::new("out/deck/slide1.svg"),
            Path::new("out/deck/slide1.pdf"),
            RasterTarget::Pdf,
        );
        assert_eq!(
            args,
            vec!["-f", "pdf", "out/deck/slide1.svg", "-o", "out/deck/slide1.pdf"]
        );
    }

    #[test]
    fn test_png_args_carry_height() {
        let args = RsvgConvert::args(
            Path::new("frames/3.svg"),
            Path::new("frames/3.png"),
            RasterTarget::Png { height: 720 },
        );
        assert_eq!(
            args,
            vec!["-f", "png", "frames/3.svg", "-h", "720", "-o", "frames/3.png"]
        );
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let rasterizer = RsvgConvert::new("slidecast-no-such-rasterizer");
        assert!(!rasterizer.is_available());
        let err = rasterizer
            .rasterize(Path::new("a.svg"), Path::new("a.png"), RasterTarget::Pdf)
            .unwrap_err();
        assert!(matches!(err, RenderError::Unavailable { .. }));
    }
}
