use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::provider::GenerationParams;
use crate::provider::fallback::PLACEHOLDER_IMAGE_URL;

/// Fully specified instruction set for one sticker. Immutable once planned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique within one batch.
    pub id: String,
    pub visual_prompt: String,
    pub negative_prompt: String,
    /// Possibly empty; empty disables the caption stage.
    pub caption_text: String,
    pub params: GenerationParams,
    pub theme: String,
}

/// Output of one asset step. Failures carry [`PLACEHOLDER_IMAGE_URL`] instead of being dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerRecord {
    pub id: String,
    pub caption: String,
    /// URL or `data:` URI.
    pub image_ref: String,
    pub theme: String,
}

impl StickerRecord {
    pub fn new(item: &WorkItem, image_ref: impl Into<String>) -> Self {
        Self {
            id: item.id.clone(),
            caption: item.caption_text.clone(),
            image_ref: image_ref.into(),
            theme: item.theme.clone(),
        }
    }

    pub fn placeholder(item: &WorkItem) -> Self {
        Self::new(item, PLACEHOLDER_IMAGE_URL)
    }

    pub fn is_placeholder(&self) -> bool {
        self.image_ref == PLACEHOLDER_IMAGE_URL
    }
}

/// Titled set of stickers produced by one job. Sticker order is not meaningful.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub id: Uuid,
    pub title: String,
    pub stickers: Vec<StickerRecord>,
}

impl Pack {
    pub fn new(title: impl Into<String>, stickers: Vec<StickerRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            stickers,
        }
    }

    pub fn sticker(&self, id: &str) -> Option<&StickerRecord> {
        self.stickers.iter().find(|s| s.id == id)
    }

    pub fn placeholder_count(&self) -> usize {
        self.stickers.iter().filter(|s| s.is_placeholder()).count()
    }
}
