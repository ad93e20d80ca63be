pub mod check;
pub mod info;
pub mod slides;
pub mod timeline;

use slidecast_common::config::AppConfig;
use slidecast_engine::issues::ReplayIssue;
use slidecast_model::canvas::Canvas;

pub(crate) fn fallback_canvas(config: &AppConfig) -> Canvas {
    Canvas::new(
        config.rendering.fallback_canvas_width,
        config.rendering.fallback_canvas_height,
    )
}

pub(crate) fn print_issues(issues: &[ReplayIssue]) {
    if issues.is_empty() {
        return;
    }
    println!();
    println!("Issues ({}):", issues.len());
    for issue in issues {
        println!("  [WARN] {issue}");
    }
}
