//! ABI Replay - Glass-box trace
//!
//! This crate records what the agent did during one user turn:
//! - Event: trace entry kinds and records
//! - Recorder: ordered, step-numbered recording
//! - Trace: immutable snapshot, JSON export and timeline rendering

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod recorder;
pub mod trace;

pub use error::{Error, Result};
pub use event::{TraceEntry, TraceKind};
pub use recorder::TraceRecorder;
pub use trace::{TimelineEntry, Trace};
