//! Observer interface for pipeline progress events.

use std::fmt::Debug;

/// Fire-and-forget observer notified before and after each file.
///
/// Nothing in the pipeline depends on these calls; they exist purely for
/// diagnostics.
pub trait Observer: Send + Sync + Debug {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn error(&self, message: &str);
}

/// Observer that forwards events to the active `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
