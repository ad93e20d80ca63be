//! Check external tools.

use slidecast_common::config::{config_file_path, AppConfig};
use slidecast_export::raster::{DocumentJoiner, PdfJoin, Rasterizer, RsvgConvert};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("slidecast System Check");
    println!("{}", "=".repeat(50));

    let path = config_file_path();
    if path.exists() {
        println!("[OK] Config: {}", path.display());
    } else {
        println!("[OK] Config: defaults ({} not found)", path.display());
    }

    let rasterizer = RsvgConvert::new(config.rendering.rasterizer.as_str());
    let rasterizer_ok = rasterizer.is_available();
    report(
        rasterizer.name(),
        rasterizer_ok,
        "needed by `slides` and `timeline`; install librsvg",
    );

    let joiner = PdfJoin::new(config.rendering.pdf_joiner.as_str());
    let joiner_ok = joiner.is_available();
    report(joiner.name(), joiner_ok, "needed by `slides`; install pdfjam");

    println!();
    if rasterizer_ok && joiner_ok {
        println!("All external tools are available. slidecast is ready.");
    } else {
        println!("Some external tools are missing. See above for fixes.");
    }

    Ok(())
}

fn report(name: &str, available: bool, hint: &str) {
    if available {
        println!("[OK] {name}");
    } else {
        println!("[MISSING] {name} ({hint})");
    }
}
