use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::image_pipeline::adjust::AdjustmentSettings;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::decode::{DecodedImage, ImageReader, LoaderConfig, SourceFormat};
use crate::image_pipeline::export::ExportConfig;
use crate::image_pipeline::raster::RasterImage;
use crate::image_pipeline::simulate::SimulationMode;
use crate::image_pipeline::tools::{SessionConfig, ToolOutput, ToolSession};

/// Decodes anything starting with `b"MOCK"`; the fifth byte is the fill value.
struct MockReader {
    width: usize,
    height: usize,
}

impl ImageReader for MockReader {
    fn read_image(&self, data: &[u8]) -> Result<DecodedImage> {
        match data {
            [b'M', b'O', b'C', b'K', fill, ..] => Ok(DecodedImage {
                raster: RasterImage::filled(self.width, self.height, [*fill, 0, 0, 255]),
                format: SourceFormat::Png,
                encoded: Arc::from(data),
            }),
            _ => Err(PipelineError::DecodeError("not a mock image".to_string())),
        }
    }
}

fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn session() -> ToolSession<crate::image_pipeline::decode::StandardImageReader> {
    ToolSession::new(SessionConfig::default())
}

fn palette_hex(session: &ToolSession<impl ImageReader>) -> Vec<String> {
    session
        .output()
        .and_then(ToolOutput::as_palette)
        .map(|palette| palette.hex_colors())
        .unwrap_or_default()
}

#[test]
fn test_solid_red_palette() {
    let mut session = session();
    session.load(&png(2, 2, [255, 0, 0, 255])).unwrap();

    assert!(session.request_palette(5).is_some());
    assert!(session.wait().unwrap());

    let palette = session.output().and_then(ToolOutput::as_palette).unwrap();
    assert_eq!(palette.hex_colors(), vec!["#FF0000"]);
    assert_eq!(palette.entries[0].count, 4);
}

#[test]
fn test_requests_without_image_are_noops() {
    let mut session = session();

    assert!(session.request_palette(5).is_none());
    assert!(session.request_default_palette().is_none());
    assert!(session.request_simulation(SimulationMode::Protanopia).is_none());
    assert!(session.request_adjustment(AdjustmentSettings::default()).unwrap().is_none());
    assert!(!session.wait().unwrap());
    assert!(!session.poll().unwrap());
    assert!(session.output().is_none());
}

#[test]
fn test_replacing_image_mid_extraction_shows_only_new_palette() {
    let mut session = session();
    session.load(&png(1500, 1500, [255, 0, 0, 255])).unwrap();
    session.request_palette(5).unwrap();

    session.load(&png(3, 3, [0, 0, 255, 255])).unwrap();
    assert!(session.output().is_none());
    session.request_palette(5).unwrap();

    assert!(session.wait().unwrap());
    assert_eq!(palette_hex(&session), vec!["#0000FF"]);
    assert!(!session.is_busy());
}

#[test]
fn test_replacing_image_drops_pending_result() {
    let mut session = session();
    session.load(&png(800, 800, [0, 255, 0, 255])).unwrap();
    session.request_palette(5).unwrap();

    session.load(&png(2, 2, [0, 0, 255, 255])).unwrap();

    assert!(!session.wait().unwrap());
    assert!(session.output().is_none());
}

#[test]
fn test_bad_upload_keeps_previous_state() {
    let mut session = session();
    session.load(&png(2, 2, [255, 0, 0, 255])).unwrap();
    session.request_simulation(SimulationMode::Achromatopsia).unwrap();
    session.wait().unwrap();

    let result = session.load(b"just some text renamed to .png");

    assert!(matches!(result, Err(PipelineError::DecodeError(_))));
    let image = session.image().unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));
    assert_eq!(image.raster.pixel(0, 0), Some([255, 0, 0, 255]));
    let rendered = session.output().and_then(ToolOutput::as_raster).unwrap();
    assert_eq!(rendered.pixel(1, 1), Some([76, 76, 76, 255]));
}

#[test]
fn test_upload_size_limit() {
    let config = SessionConfig::builder().max_upload_bytes(16).build();
    let mut session = ToolSession::new(config);

    let result = session.load(&png(4, 4, [1, 2, 3, 255]));

    assert!(matches!(
        result,
        Err(PipelineError::FileTooLarge { limit: 16, .. })
    ));
    assert!(session.image().is_none());
}

#[test]
fn test_dimension_limit_from_loader_config() {
    let config = SessionConfig::builder()
        .loader(LoaderConfig::builder().max_dimension(Some(8)).build())
        .build();
    let mut session = ToolSession::with_custom(MockReader { width: 16, height: 4 }, config);

    assert!(matches!(
        session.load(b"MOCK\x10"),
        Err(PipelineError::InvalidDimensions(16, 4))
    ));
}

#[test]
fn test_adjustment_request() {
    let mut session = ToolSession::with_custom(
        MockReader { width: 4, height: 4 },
        SessionConfig::default(),
    );
    session.load(b"MOCK\x64").unwrap();

    let settings = AdjustmentSettings::default().with_brightness(1.5);
    session.request_adjustment(settings).unwrap().unwrap();
    assert!(session.wait().unwrap());

    let rendered = session.output().and_then(ToolOutput::as_raster).unwrap();
    assert_eq!(rendered.pixel(0, 0), Some([150, 0, 0, 255]));
    assert_eq!(session.image().unwrap().raster.pixel(0, 0), Some([100, 0, 0, 255]));
}

#[test]
fn test_invalid_adjustment_is_rejected() {
    let mut session = ToolSession::with_custom(
        MockReader { width: 2, height: 2 },
        SessionConfig::default(),
    );
    session.load(b"MOCK\x01").unwrap();

    let settings = AdjustmentSettings {
        contrast: 4.0,
        ..AdjustmentSettings::default()
    };

    assert!(matches!(
        session.request_adjustment(settings),
        Err(PipelineError::InvalidSetting { name: "contrast", .. })
    ));
    assert!(!session.is_busy());
}

#[test]
fn test_later_request_wins() {
    let mut session = ToolSession::with_custom(
        MockReader { width: 64, height: 64 },
        SessionConfig::default(),
    );
    session.load(b"MOCK\xff").unwrap();

    session.request_simulation(SimulationMode::Achromatopsia).unwrap();
    session.request_palette(3).unwrap();

    assert!(session.wait().unwrap());
    assert_eq!(palette_hex(&session), vec!["#FF0000"]);
}

#[test]
fn test_default_palette_size() {
    let config = SessionConfig::builder().default_palette_size(1).build();
    let mut session = ToolSession::new(config);
    let mut image = RgbaImage::from_pixel(3, 1, image::Rgba([10, 20, 30, 255]));
    image.put_pixel(2, 0, image::Rgba([200, 100, 0, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    session.load(&bytes).unwrap();

    session.request_default_palette().unwrap();
    session.wait().unwrap();

    assert_eq!(palette_hex(&session), vec!["#0A141E"]);
}

#[test]
fn test_export_uses_rendered_output() {
    let mut session = session();
    assert!(matches!(
        session.export(&ExportConfig::default()),
        Err(PipelineError::EmptyInput)
    ));

    session.load(&png(2, 2, [255, 0, 0, 255])).unwrap();
    let source = image::load_from_memory(&session.export(&ExportConfig::default()).unwrap())
        .unwrap()
        .into_rgba8();
    assert_eq!(source.get_pixel(0, 0).0, [255, 0, 0, 255]);

    session.request_simulation(SimulationMode::Achromatopsia).unwrap();
    session.wait().unwrap();
    let rendered = image::load_from_memory(&session.export(&ExportConfig::default()).unwrap())
        .unwrap()
        .into_rgba8();
    assert_eq!(rendered.get_pixel(0, 0).0, [76, 76, 76, 255]);
}

#[test]
fn test_export_after_palette_uses_source() {
    let mut session = session();
    session.load(&png(2, 2, [0, 128, 0, 255])).unwrap();
    session.request_palette(5).unwrap();
    session.wait().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("download.png");
    session.export_file(&path, &ExportConfig::default()).unwrap();

    let decoded = image::open(&path).unwrap().into_rgba8();
    assert_eq!(decoded.get_pixel(1, 1).0, [0, 128, 0, 255]);
}

#[test]
fn test_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.png");
    std::fs::write(&path, png(3, 2, [9, 9, 9, 255])).unwrap();

    let mut session = session();
    let image = session.load_file(&path).unwrap();
    assert_eq!((image.width(), image.height()), (3, 2));

    let missing = session.load_file(dir.path().join("missing.png"));
    assert!(matches!(missing, Err(PipelineError::InputReadError(_))));
    assert!(session.image().is_some());
}

#[test]
fn test_clear() {
    let mut session = session();
    session.load(&png(2, 2, [1, 1, 1, 255])).unwrap();
    session.request_palette(2).unwrap();
    session.clear();

    assert!(!session.wait().unwrap());
    assert!(session.image().is_none());
    assert!(session.output().is_none());
    assert!(session.request_palette(2).is_none());
}
