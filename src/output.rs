//! File output: sheet documents, C sources and PNG previews

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

use crate::error::XbmError;
use crate::models::{Sheet, SheetFormat};

/// Error type for output operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OutputError {
    /// I/O error (file creation, writing)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// The sheet document could not be read or produced
    #[error("Sheet error: {0}")]
    Sheet(#[from] XbmError),
}

fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Read a sheet document from `path`.
pub fn load_sheet(path: &Path) -> Result<Sheet, OutputError> {
    let json = fs::read_to_string(path)?;
    let sheet = Sheet::from_json(&json)?;
    log::info!("loaded {} sprites from {}", sheet.len(), path.display());
    Ok(sheet)
}

/// Write `sheet` to `path` as pretty-printed JSON, creating parent directories.
pub fn save_sheet(sheet: &Sheet, path: &Path) -> Result<(), OutputError> {
    save_format(&sheet.serialize(), path)
}

/// Write an already serialized sheet to `path`.
pub fn save_format(format: &SheetFormat, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    fs::write(path, format.to_json_pretty()? + "\n")?;
    log::info!("saved {} sprites to {}", format.sprites.len(), path.display());
    Ok(())
}

/// Write C source text to `path`, ending it with a newline.
pub fn write_c_source(source: &str, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    fs::write(path, format!("{}\n", source))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This keeps every bitmap pixel a crisp square. A factor of 0 or 1
/// returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor as u32, h * factor as u32, FilterType::Nearest)
}

/// Generate the output path for a rendered sprite.
///
/// | Scenario | Output |
/// |----------|--------|
/// | Sheet `sheet.json`, sprite "hero" | `sheet_hero.<ext>` |
/// | With `-o out.png` (single sprite) | `out.png` |
/// | With `-o out.png` (multiple) | `out_hero.png` |
/// | With `-o dir/` | `dir/hero.<ext>` |
pub fn generate_output_path(
    input: &Path,
    sprite_name: &str,
    output_arg: Option<&Path>,
    is_single_sprite: bool,
    extension: &str,
) -> PathBuf {
    let (dir, stem) = match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                return output.join(format!("{}.{}", sprite_name, extension));
            }
            if is_single_sprite {
                return output.to_path_buf();
            }
            (output.parent(), output.file_stem())
        }
        None => (input.parent(), input.file_stem()),
    };
    let stem = stem.and_then(|s| s.to_str()).unwrap_or("output");
    let file = format!("{}_{}.{}", stem, sprite_name, extension);
    match dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file),
        _ => PathBuf::from(file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sprite;
    use image::Rgba;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn test_generate_output_path_default() {
        let path = generate_output_path(Path::new("sheet.json"), "hero", None, true, "png");
        assert_eq!(path, PathBuf::from("sheet_hero.png"));
        let path = generate_output_path(Path::new("art/sheet.json"), "bat", None, false, "gif");
        assert_eq!(path, PathBuf::from("art/sheet_bat.gif"));
    }

    #[test]
    fn test_generate_output_path_explicit_file() {
        let single =
            generate_output_path(Path::new("sheet.json"), "hero", Some(Path::new("out.png")), true, "png");
        assert_eq!(single, PathBuf::from("out.png"));
        let multiple = generate_output_path(
            Path::new("sheet.json"),
            "hero",
            Some(Path::new("build/out.png")),
            false,
            "png",
        );
        assert_eq!(multiple, PathBuf::from("build/out_hero.png"));
    }

    #[test]
    fn test_generate_output_path_directory() {
        let path =
            generate_output_path(Path::new("sheet.json"), "hero", Some(Path::new("previews/")), false, "png");
        assert_eq!(path, PathBuf::from("previews/hero.png"));
    }

    #[test]
    fn test_save_and_load_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/sheet.json");
        let sprite = Sprite::from_data(8, 2, &[[0x18u8, 0x3C]], "pip").unwrap();
        let sheet = Sheet::new([Rc::new(sprite)]);

        save_sheet(&sheet, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));

        let loaded = load_sheet(&path).unwrap();
        assert_eq!(loaded.serialize(), sheet.serialize());
    }

    #[test]
    fn test_load_sheet_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(load_sheet(&dir.path().join("missing.json")), Err(OutputError::Io(_))));

        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"sprites":[{"name":"x"}]}"#).unwrap();
        assert!(matches!(
            load_sheet(&path),
            Err(OutputError::Sheet(XbmError::Deserialization { index: 0, .. }))
        ));
    }

    #[test]
    fn test_write_c_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sprites.h");
        write_c_source("#define a_width 8", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "#define a_width 8\n");
    }

    #[test]
    fn test_save_png_and_scale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep/dot.png");
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 0, 255]));

        let scaled = scale_image(image.clone(), 3);
        assert_eq!(scaled.dimensions(), (6, 3));
        assert_eq!(*scaled.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(*scaled.get_pixel(3, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(scale_image(image.clone(), 0), image);

        save_png(&scaled, &path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded, scaled);
    }
}
