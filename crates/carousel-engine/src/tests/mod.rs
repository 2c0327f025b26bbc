use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::{Compositor, CompositorConfig, FontRegistry};

mod carousel;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Asset directory under the system temp dir, removed on drop.
struct TestAssets {
    root: PathBuf,
}

impl TestAssets {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "carousel_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(root.join("carousel-templates")).unwrap();
        std::fs::create_dir_all(root.join("fonts")).unwrap();
        Self { root }
    }

    /// Write a horizontal-gradient template image under `file`.
    fn with_template(self, file: &str) -> Self {
        std::fs::write(
            self.root.join("carousel-templates").join(file),
            png_bytes(&gradient(540, 675)),
        )
        .unwrap();
        self
    }

    fn with_font(self, family: &str, bytes: &[u8]) -> Self {
        std::fs::write(self.root.join("fonts").join(format!("{family}.ttf")), bytes).unwrap();
        self
    }

    fn config(&self) -> CompositorConfig {
        CompositorConfig::new()
            .with_asset_dir(&self.root)
            .with_grain_seed(7)
    }

    fn compositor(&self) -> Compositor {
        compositor_with(self.config())
    }
}

impl Drop for TestAssets {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

fn compositor_with(config: CompositorConfig) -> Compositor {
    init_tracing();
    let fonts = Arc::new(FontRegistry::with_bundled().unwrap());
    Compositor::new(config, fonts).unwrap()
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width) as u8, (y * 255 / height) as u8, 160, 255])
    })
}

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

fn slides(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}
