//! Boundary to the generative services: image generation, background removal, titling and
//! caption suggestion.
//!
//! Every capability returns `Result<_, ExternalCallError>`; the pipeline decides what to do on
//! failure through [`fallback`].

pub mod error;
pub mod fallback;
pub mod http;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::compositor::codec::{parse_data_uri, sniff_mime, to_data_uri};
pub use crate::provider::error::ExternalCallError;

/// Opaque knobs forwarded to the image generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub strength: f32,
    #[serde(alias = "guidance")]
    pub guidance_scale: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            strength: 0.40,
            guidance_scale: 5.0,
        }
    }
}

/// Prompt pair plus knobs for one generation request.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub params: GenerationParams,
}

/// Encoded user photo shared read-only by every worker of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    bytes: Arc<[u8]>,
    mime: &'static str,
}

impl SourceImage {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        let mime = sniff_mime(&bytes);
        Self { bytes, mime }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn data_uri(&self) -> String {
        to_data_uri(&self.bytes, self.mime)
    }
}

/// One caption/prompt pair proposed by the language model for a text subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStickerIdea {
    pub caption: String,
    pub prompt: String,
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Image-to-image transform of `source`; returns the generated image reference.
    async fn generate_from_image(
        &self,
        source: &SourceImage,
        request: &GenerationRequest,
    ) -> Result<String, ExternalCallError>;

    async fn generate_from_text(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, ExternalCallError>;

    /// Returns a reference to a copy of `image_ref` with a transparent background.
    async fn remove_background(&self, image_ref: &str) -> Result<String, ExternalCallError>;

    /// Two to four words describing the person in `source`.
    async fn describe_for_title(&self, source: &SourceImage) -> Result<String, ExternalCallError>;

    async fn suggest_text_stickers(
        &self,
        subject: &str,
        mood: &str,
        style: &str,
        language: &str,
    ) -> Result<Vec<TextStickerIdea>, ExternalCallError>;

    /// Download the bytes behind an image reference. Data URIs are decoded locally.
    async fn fetch_image(&self, image_ref: &str) -> Result<Vec<u8>, ExternalCallError> {
        parse_data_uri(image_ref)
            .map(|(_, bytes)| bytes)
            .ok_or(ExternalCallError::Unsupported("fetch_image"))
    }
}

/// Run `fut` with a hard deadline; elapsed deadlines become [`ExternalCallError::Timeout`].
pub async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, ExternalCallError>
where
    F: Future<Output = Result<T, ExternalCallError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(ExternalCallError::Timeout(limit)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/provider/mod.rs"]
mod tests;
