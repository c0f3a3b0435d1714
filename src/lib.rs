//! Stickerforge turns one photo, or one text subject, into a pack of captioned stickers.
//!
//! The crate has two halves:
//!
//! - A deterministic CPU [`Compositor`] that frames, outlines, shadows and captions an image.
//! - An async job layer: a [`PlanBuilder`] picks templates, a bounded batch runs every item
//!   through an injected [`GenerativeBackend`], and the [`Orchestrator`] reports progress and
//!   stores the finished [`Pack`].
//!
//! Every external capability has a fallback, so a sticker batch always returns one record per
//! surviving item; see [`provider::fallback`].
#![forbid(unsafe_code)]

mod foundation;

pub mod catalog;
pub mod compositor;
pub mod config;
pub mod job;
pub mod pipeline;
pub mod plan;
pub mod provider;

pub use crate::compositor::caption::{CaptionPosition, CaptionStyle};
pub use crate::compositor::fonts::FontBook;
pub use crate::compositor::raster::RasterImage;
pub use crate::compositor::{CaptionOptions, CompositeOptions, Compositor, ShadowOptions};
pub use crate::config::ForgeConfig;
pub use crate::foundation::error::{ForgeError, ForgeResult};
pub use crate::job::orchestrator::Orchestrator;
pub use crate::job::store::{
    InMemoryJobStore, InMemoryPackStore, JobId, JobSnapshot, JobStatus, JobStore, PackRecord,
    PackStore, Progress,
};
pub use crate::pipeline::batch::{BatchRunner, PanicPolicy, ProgressFn};
pub use crate::pipeline::model::{Pack, StickerRecord, WorkItem};
pub use crate::pipeline::scheduler::TaskScheduler;
pub use crate::pipeline::step::AssetStep;
pub use crate::plan::builder::PlanBuilder;
pub use crate::plan::selector::GenerationConfig;
pub use crate::provider::http::HttpBackend;
pub use crate::provider::{
    ExternalCallError, GenerationParams, GenerationRequest, GenerativeBackend, SourceImage,
    TextStickerIdea,
};
