use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use raster_tools::image_pipeline::export::{ExportConfig, ExportFormat, TiffCompression};
use raster_tools::image_pipeline::tools::{self, Notice, SessionConfig, ToolOutput, ToolSession};
use raster_tools::image_pipeline::{AdjustmentSettings, PipelineError, SimulationMode};
use raster_tools::logger;

use tracing::{error, info};

fn report(error: PipelineError) -> anyhow::Error {
    if let Some(notice) = Notice::from_error(&error) {
        error!("{}", notice);
    }
    anyhow::Error::new(error)
}

fn output_path(dir: &Path, stem: &str, suffix: &str, format: ExportFormat) -> PathBuf {
    dir.join(format!("{}-{}.{}", stem, suffix, format.extension()))
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: raster_tools <image> [output-dir]");
    };
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string();

    for tool in tools::all_tools() {
        info!("[{}] {}: {}", tool.category, tool.name, tool.summary);
    }

    let mut session = ToolSession::new(SessionConfig::default());
    let image = session.load_file(&input).map_err(report)?;
    info!(
        "Loaded {} ({}x{}, {})",
        input.display(),
        image.width(),
        image.height(),
        image.mime_type()
    );

    session.request_default_palette();
    session.wait().map_err(report)?;
    if let Some(palette) = session.output().and_then(ToolOutput::as_palette) {
        for entry in &palette.entries {
            info!("{}  {:>6.2}%", entry.hex(), entry.share * 100.0);
        }
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let png = ExportConfig::default();
    for mode in SimulationMode::ALL {
        if mode == SimulationMode::Normal {
            continue;
        }
        session.request_simulation(mode);
        session.wait().map_err(report)?;
        let path = output_path(&output_dir, &stem, mode.id(), png.format);
        session.export_file(&path, &png).map_err(report)?;
        info!("{}: {}", mode.name(), path.display());
    }

    let settings = AdjustmentSettings::default()
        .with_brightness(1.1)
        .with_contrast(1.2)
        .with_blur(1.5);
    session.request_adjustment(settings).map_err(report)?;
    session.wait().map_err(report)?;

    let tiff = ExportConfig::builder()
        .format(ExportFormat::Tiff)
        .tiff_compression(TiffCompression::DeflateBalanced)
        .build();
    let path = output_path(&output_dir, &stem, "enhanced", tiff.format);
    session.export_file(&path, &tiff).map_err(report)?;
    info!("Enhanced: {}", path.display());

    Ok(())
}
