//! Progress reporting for neighborhood building.
//!
//! Builders call [`ProgressCallback::inc`] once per finished center. The
//! terminal implementation lives in the CLI; library callers and tests use
//! [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a neighborhood build.
///
/// `Send + Sync` because updates arrive from `rayon` worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Total number of centers to process.
    fn set_total(&self, total: u64);

    /// `delta` more centers are done.
    fn inc(&self, delta: u64);

    /// Replaces the status text.
    fn set_message(&self, msg: String);

    /// The build is complete.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// A shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
