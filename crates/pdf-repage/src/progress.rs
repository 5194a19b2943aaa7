//! Progress reporting and cooperative cancellation for long operations

use crate::types::{RepageError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One step of a long-running operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub operation: String,
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(operation: impl Into<String>, current: usize, total: usize) -> Self {
        Self {
            operation: operation.into(),
            current,
            total,
        }
    }
}

/// Shared flag checked between steps of a long operation.
///
/// Clones observe the same flag, so one clone can be handed to a worker
/// while another stays with whoever may cancel.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(RepageError::Cancelled);
        }
        Ok(())
    }
}
