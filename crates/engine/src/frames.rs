//! Batch rendering of captured frames.
//!
//! Snapshots own everything they need, so frames render independently and
//! in any order. Output order always matches frame order.

use rayon::prelude::*;

use crate::compose::{compose, ShapeFault};
use crate::issues::ReplayIssue;
use crate::timeline::FrameSnapshot;
use slidecast_model::shape::WhiteboardId;

/// One composed frame document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub index: usize,
    pub whiteboard: WhiteboardId,
    pub svg: String,
    pub faults: Vec<ShapeFault>,
    /// `false` when the base document lacked a closing tag.
    pub closed: bool,
}

impl RenderedFrame {
    /// Problems found while composing this frame.
    pub fn issues(&self) -> Vec<ReplayIssue> {
        let mut issues: Vec<ReplayIssue> = self
            .faults
            .iter()
            .map(|fault| ReplayIssue::DataIntegrityFault {
                whiteboard: self.whiteboard.clone(),
                shape_id: fault
                    .shape_id
                    .clone()
                    .unwrap_or_else(|| "<unnamed>".to_string()),
                frame: Some(self.index),
                source: fault.error.clone(),
            })
            .collect();
        if !self.closed {
            issues.push(ReplayIssue::MalformedBaseDocument {
                whiteboard: self.whiteboard.clone(),
            });
        }
        issues
    }
}

/// Compose one snapshot.
pub fn render_frame(snapshot: &FrameSnapshot) -> RenderedFrame {
    let composition = compose(&snapshot.base, &snapshot.shapes);
    RenderedFrame {
        index: snapshot.index,
        whiteboard: snapshot.whiteboard.clone(),
        svg: composition.svg,
        faults: composition.faults,
        closed: composition.closed,
    }
}

/// Compose all snapshots, in parallel when `parallel` is set.
pub fn render_frames(snapshots: &[FrameSnapshot], parallel: bool) -> Vec<RenderedFrame> {
    let frames: Vec<RenderedFrame> = if parallel {
        snapshots.par_iter().map(render_frame).collect()
    } else {
        snapshots.iter().map(render_frame).collect()
    };
    tracing::debug!(frames = frames.len(), parallel, "Composed frames");
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidecast_model::canvas::{BaseDocument, Canvas};
    use slidecast_model::shape::ShapeRecord;
    use std::sync::Arc;

    fn snapshots(count: usize) -> Vec<FrameSnapshot> {
        let base = Arc::new(BaseDocument::new(
            r#"<svg width="200" height="100"></svg>"#,
            Canvas::HD,
        ));
        (0..count)
            .map(|index| FrameSnapshot {
                index,
                at_ms: index as u64 * 1000,
                whiteboard: WhiteboardId::new("deck", 1),
                base: Arc::clone(&base),
                shapes: (0..index)
                    .map(|i| {
                        Arc::new(
                            ShapeRecord::default()
                                .with("shapeId", format!("s{i}"))
                                .with("type", "ellipse")
                                .with("color", "0")
                                .with("thickness", "1")
                                .with("dataPoints", format!("{i},0,50,50")),
                        )
                    })
                    .collect(),
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let input = snapshots(24);
        let parallel = render_frames(&input, true);
        let sequential = render_frames(&input, false);
        assert_eq!(parallel, sequential);
        assert!(parallel.iter().enumerate().all(|(i, f)| f.index == i));
        assert_eq!(parallel[5].svg.matches("<ellipse").count(), 5);
    }

    #[test]
    fn test_faults_become_issues() {
        let mut input = snapshots(1);
        input[0]
            .shapes
            .push(Arc::new(ShapeRecord::default().with("type", "pencil")));
        let frame = render_frame(&input[0]);
        let issues = frame.issues();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            ReplayIssue::DataIntegrityFault { frame: Some(0), shape_id, .. } if shape_id == "<unnamed>"
        ));
    }
}
