//! Upload engine for the mediavault admin client.
//!
//! Owns a queue of registered file transfers, drives them through an
//! [`Uploader`] under a bounded concurrency limit, and emits a closed set of
//! lifecycle events over a channel. Transfer mechanics are behind the
//! [`Uploader`] trait so the engine is independent of the wire path
//! (batched multipart vs per-file streaming).

pub mod engine;
pub mod uploader;

pub use engine::{EngineConfig, UploadEngine, UploadEvent};
pub use uploader::Uploader;
