use async_trait::async_trait;

use super::*;
use crate::compositor::CompositeOptions;
use crate::compositor::fonts::FontBook;
use crate::provider::{ExternalCallError, GenerationParams, TextStickerIdea};

#[derive(Clone)]
struct Scripted {
    generate: Result<String, ExternalCallError>,
    remove_bg: Result<String, ExternalCallError>,
    image: Vec<u8>,
    stall: bool,
}

#[async_trait]
impl GenerativeBackend for Scripted {
    async fn generate_from_image(
        &self,
        _source: &SourceImage,
        _request: &GenerationRequest,
    ) -> Result<String, ExternalCallError> {
        if self.stall {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.generate.clone()
    }

    async fn generate_from_text(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, ExternalCallError> {
        assert!(!request.prompt.is_empty());
        self.generate.clone()
    }

    async fn remove_background(&self, _image_ref: &str) -> Result<String, ExternalCallError> {
        self.remove_bg.clone()
    }

    async fn describe_for_title(&self, _source: &SourceImage) -> Result<String, ExternalCallError> {
        Ok("Test".into())
    }

    async fn suggest_text_stickers(
        &self,
        _subject: &str,
        _mood: &str,
        _style: &str,
        _language: &str,
    ) -> Result<Vec<TextStickerIdea>, ExternalCallError> {
        Ok(Vec::new())
    }

    async fn fetch_image(&self, image_ref: &str) -> Result<Vec<u8>, ExternalCallError> {
        if image_ref.starts_with("https://ok/") {
            Ok(self.image.clone())
        } else {
            Err(ExternalCallError::Status { code: 404 })
        }
    }
}

fn png() -> Vec<u8> {
    let mut img = image::RgbaImage::new(40, 24);
    for y in 4..20 {
        for x in 8..32 {
            img.put_pixel(x, y, image::Rgba([10, 200, 10, 255]));
        }
    }
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn item() -> WorkItem {
    WorkItem {
        id: "react_001".into(),
        visual_prompt: "make it funny".into(),
        negative_prompt: "blurry".into(),
        caption_text: String::new(),
        params: GenerationParams::default(),
        theme: "random".into(),
    }
}

fn ok_backend() -> Scripted {
    Scripted {
        generate: Ok("https://raw/1.png".into()),
        remove_bg: Ok("https://ok/1.png".into()),
        image: png(),
        stall: false,
    }
}

fn step(backend: Scripted, timeout: Duration) -> AssetStep {
    let compositor = Compositor::new(FontBook::empty(), CompositeOptions::default());
    AssetStep::new(Arc::new(backend), Arc::new(compositor), timeout)
}

fn source() -> SourceImage {
    SourceImage::new(png())
}

#[tokio::test]
async fn happy_path_returns_composited_data_uri() {
    let rec = step(ok_backend(), Duration::from_secs(5))
        .run_one(&item(), Some(&source()))
        .await;
    assert_eq!(rec.id, "react_001");
    assert!(rec.image_ref.starts_with("data:image/png;base64,"));
    assert!(!rec.is_placeholder());
}

#[tokio::test]
async fn generation_failure_yields_placeholder() {
    let backend = Scripted {
        generate: Err(ExternalCallError::NoImage),
        ..ok_backend()
    };
    let rec = step(backend, Duration::from_secs(5))
        .run_one(&item(), None)
        .await;
    assert!(rec.is_placeholder());
    assert_eq!(rec.theme, "random");
}

#[tokio::test]
async fn background_removal_failure_keeps_raw_image() {
    let backend = Scripted {
        generate: Ok("https://ok/raw.png".into()),
        remove_bg: Err(ExternalCallError::Status { code: 500 }),
        ..ok_backend()
    };
    let rec = step(backend, Duration::from_secs(5))
        .run_one(&item(), None)
        .await;
    assert!(rec.image_ref.starts_with("data:image/png"));
}

#[tokio::test]
async fn fetch_failure_keeps_uncomposited_reference() {
    let backend = Scripted {
        remove_bg: Ok("https://missing/1.png".into()),
        ..ok_backend()
    };
    let rec = step(backend, Duration::from_secs(5))
        .run_one(&item(), None)
        .await;
    assert_eq!(rec.image_ref, "https://missing/1.png");
}

#[tokio::test]
async fn compositing_failure_keeps_uncomposited_reference() {
    let backend = Scripted {
        image: b"definitely not a png".to_vec(),
        ..ok_backend()
    };
    let rec = step(backend, Duration::from_secs(5))
        .run_one(&item(), None)
        .await;
    assert_eq!(rec.image_ref, "https://ok/1.png");
}

#[tokio::test(start_paused = true)]
async fn stalled_generation_times_out_to_placeholder() {
    let backend = Scripted {
        stall: true,
        ..ok_backend()
    };
    let rec = step(backend, Duration::from_secs(2))
        .run_one(&item(), Some(&source()))
        .await;
    assert!(rec.is_placeholder());
}
