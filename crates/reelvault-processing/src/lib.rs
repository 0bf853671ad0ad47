//! ReelVault Processing Library
//!
//! Upload ingestion: media-type validation, bounded staging to scratch files, aspect-ratio
//! probing with ffprobe, fast-start remuxing with ffmpeg, and the pipeline that ties them
//! to an [`AssetStore`](reelvault_storage::AssetStore).

pub mod error;
pub mod faststart;
pub mod pipeline;
pub mod probe;
pub mod staging;
mod tool;
pub mod validator;

pub use error::{IngestError, IngestResult};
pub use faststart::{FastStartTransform, FfmpegRemuxer};
pub use pipeline::{IngestLimits, IngestionPipeline};
pub use probe::{FfprobeProbe, MediaClassification, MediaProbe};
pub use staging::{StagedFile, StagingArea};
pub use validator::{AssetKind, ValidationError};
