//! Batch JPEG resizer for the SPIFFS image staging directory
//!
//! Overwrites every .jpg in spiffs/ in place with a copy stretch-resized to
//! the 800x480 e-paper panel resolution.

use std::error::Error;
use std::fs;
use std::path::Path;

use image::imageops::FilterType;

const SPIFFS_DIR: &str = "spiffs";
const TARGET_WIDTH: u32 = 800;
const TARGET_HEIGHT: u32 = 480;

fn resize_dir(dir: &Path) -> Result<usize, Box<dyn Error>> {
    let mut count = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().ends_with(".jpg") {
            continue;
        }

        let img_path = entry.path();
        let img = image::open(&img_path)?;
        let resized = img.resize_exact(TARGET_WIDTH, TARGET_HEIGHT, FilterType::Lanczos3);
        resized.save(&img_path)?;

        println!("Resized {}", name.to_string_lossy());
        count += 1;
    }

    Ok(count)
}

fn main() -> Result<(), Box<dyn Error>> {
    println!(
        "Resizing images in {}/ to {}x{}...",
        SPIFFS_DIR, TARGET_WIDTH, TARGET_HEIGHT
    );

    let count = resize_dir(Path::new(SPIFFS_DIR))?;

    println!("Resized {} images", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use tempfile::tempdir;

    fn write_image(path: &Path, width: u32, height: u32) {
        ImageBuffer::from_pixel(width, height, Rgb([10u8, 20u8, 30u8]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn resizes_only_jpg_files() {
        let dir = tempdir().unwrap();
        let jpg = dir.path().join("a.jpg");
        let png = dir.path().join("b.png");
        let upper = dir.path().join("c.JPG");
        write_image(&jpg, 640, 360);
        write_image(&png, 100, 100);
        write_image(&upper, 100, 100);
        let png_bytes = fs::read(&png).unwrap();

        let count = resize_dir(dir.path()).unwrap();

        assert_eq!(count, 1);
        assert_eq!(image::image_dimensions(&jpg).unwrap(), (800, 480));
        assert_eq!(image::image_dimensions(&png).unwrap(), (100, 100));
        // suffix match is case-sensitive, .JPG stays untouched
        assert_eq!(image::image_dimensions(&upper).unwrap(), (100, 100));
        // non-jpg files are byte-identical
        assert_eq!(fs::read(&png).unwrap(), png_bytes);
    }

    #[test]
    fn empty_directory_is_a_no_op() {
        let dir = tempdir().unwrap();
        assert_eq!(resize_dir(dir.path()).unwrap(), 0);
    }

    #[test]
    fn missing_directory_aborts() {
        assert!(resize_dir(Path::new("/nonexistent/spiffs")).is_err());
    }
}
