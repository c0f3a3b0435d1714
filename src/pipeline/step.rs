use std::sync::Arc;
use std::time::Duration;

use crate::compositor::Compositor;
use crate::compositor::codec::to_data_uri;
use crate::foundation::error::ForgeError;
use crate::pipeline::model::{StickerRecord, WorkItem};
use crate::provider::fallback::{Capability, recover, recover_call};
use crate::provider::{GenerationRequest, GenerativeBackend, SourceImage, bounded};

/// Generate -> remove background -> fetch -> composite, for one work item.
///
/// Holds only shared read-only state, so one step value serves every worker of a batch.
#[derive(Clone)]
pub struct AssetStep {
    backend: Arc<dyn GenerativeBackend>,
    compositor: Arc<Compositor>,
    call_timeout: Duration,
}

impl AssetStep {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        compositor: Arc<Compositor>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            compositor,
            call_timeout,
        }
    }

    /// Produce a sticker record for `item`. Never fails.
    ///
    /// With `source` the item is generated image-to-image, otherwise text-to-image. A failed
    /// generation yields a placeholder record; later failures degrade to the best image so far.
    #[tracing::instrument(skip_all, fields(item = %item.id))]
    pub async fn run_one(&self, item: &WorkItem, source: Option<&SourceImage>) -> StickerRecord {
        let request = GenerationRequest {
            prompt: item.visual_prompt.clone(),
            negative_prompt: item.negative_prompt.clone(),
            params: item.params,
        };

        let generated = match source {
            Some(src) => {
                bounded(
                    self.call_timeout,
                    self.backend.generate_from_image(src, &request),
                )
                .await
            }
            None => bounded(self.call_timeout, self.backend.generate_from_text(&request)).await,
        };
        let generated = match generated {
            Ok(url) if !url.trim().is_empty() => url,
            Ok(_) => {
                tracing::warn!(capability = %Capability::GenerateImage, "empty image reference; using placeholder");
                return StickerRecord::placeholder(item);
            }
            Err(err) => {
                return recover_call(Capability::GenerateImage, Err(err), || {
                    StickerRecord::placeholder(item)
                });
            }
        };

        let cleaned = recover_call(
            Capability::RemoveBackground,
            bounded(self.call_timeout, self.backend.remove_background(&generated)).await,
            || generated.clone(),
        );

        let bytes = match bounded(self.call_timeout, self.backend.fetch_image(&cleaned)).await {
            Ok(bytes) => bytes,
            Err(err) => {
                return recover_call(Capability::FetchImage, Err(err), || {
                    StickerRecord::new(item, cleaned.clone())
                });
            }
        };

        let image_ref = recover(
            Capability::Composite,
            self.composite(bytes, item.caption_text.clone()).await,
            || cleaned.clone(),
        );
        StickerRecord::new(item, image_ref)
    }

    async fn composite(&self, bytes: Vec<u8>, caption: String) -> Result<String, ForgeError> {
        let compositor = Arc::clone(&self.compositor);
        let png = tokio::task::spawn_blocking(move || compositor.composite_sticker(&bytes, &caption))
            .await
            .map_err(|e| ForgeError::compositing(format!("compositor task failed: {e}")))??;
        Ok(to_data_uri(&png, "image/png"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/step.rs"]
mod tests;
