use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage, RgbaImage};
use thiserror::Error;

use super::overlay::OverlaySurface;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export yet, the canvas has not been created")]
    NoCanvas,
    #[error("unsupported export format for {}; use .jpg, .jpeg or .png", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("failed to create export directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExportKind {
    Jpeg,
    Png,
}

fn export_kind(path: &Path) -> Option<ExportKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some(ExportKind::Jpeg),
        "png" => Some(ExportKind::Png),
        _ => None,
    }
}

/// Writes the overlay as a single image. JPEG output is flattened onto black.
pub fn export_overlay(surface: Option<&OverlaySurface>, path: &Path) -> Result<PathBuf, ExportError> {
    let surface = surface.ok_or(ExportError::NoCanvas)?;
    let kind = export_kind(path).ok_or_else(|| ExportError::UnsupportedFormat(path.to_path_buf()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let rgba = surface.to_image().ok_or(ExportError::NoCanvas)?;
    let result = match kind {
        ExportKind::Png => rgba.save_with_format(path, ImageFormat::Png),
        ExportKind::Jpeg => flatten_on_black(&rgba).save_with_format(path, ImageFormat::Jpeg),
    };
    result.map_err(|source| ExportError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "exported {}x{} canvas to {}",
        surface.width(),
        surface.height(),
        path.display()
    );
    Ok(path.to_path_buf())
}

fn flatten_on_black(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        image::Rgb([scale(r), scale(g), scale(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::overlay::{Segment, StrokeStyle};
    use crate::types::Point;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("air-sketch-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn painted_surface() -> OverlaySurface {
        let mut surface = OverlaySurface::new(24, 16);
        surface.draw_segment(
            Segment {
                from: Point::new(2.0, 8.0),
                to: Point::new(20.0, 8.0),
            },
            StrokeStyle {
                color: [254, 107, 49, 255],
                width: 4.0,
            },
        );
        surface
    }

    #[test]
    fn png_keeps_alpha() {
        let dir = scratch_dir("png");
        let path = dir.join("nested").join("art.png");
        let surface = painted_surface();

        let written = export_overlay(Some(&surface), &path).unwrap();
        let img = image::open(&written).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (24, 16));
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(10, 8).0, [254, 107, 49, 255]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn jpeg_is_flattened() {
        let dir = scratch_dir("jpg");
        let path = dir.join("art.jpeg");
        let written = export_overlay(Some(&painted_surface()), &path).unwrap();
        let img = image::open(&written).unwrap();
        assert_eq!(img.color(), image::ColorType::Rgb8);
        let corner = img.to_rgb8().get_pixel(0, 0).0;
        assert!(corner.iter().all(|c| *c < 16), "{corner:?}");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn extension_match_ignores_case() {
        assert_eq!(export_kind(Path::new("a.JPG")), Some(ExportKind::Jpeg));
        assert_eq!(export_kind(Path::new("a.Png")), Some(ExportKind::Png));
        assert_eq!(export_kind(Path::new("a.bmp")), None);
    }

    #[test]
    fn rejects_missing_canvas_and_unknown_extension() {
        let err = export_overlay(None, Path::new("art.png")).unwrap_err();
        assert!(matches!(err, ExportError::NoCanvas));

        let surface = painted_surface();
        let err = export_overlay(Some(&surface), Path::new("art.gif")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(_)));
        let err = export_overlay(Some(&surface), Path::new("art")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(_)));
    }
}
