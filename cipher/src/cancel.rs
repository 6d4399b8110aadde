use crate::CipherError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation handle shared between the caller and a running
/// operation. Operations observe it at block boundaries and abort with
/// [`CipherError::Cancelled`] without emitting partial output.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn checkpoint(&self) -> Result<(), CipherError> {
        if self.is_cancelled() {
            Err(CipherError::Cancelled)
        } else {
            Ok(())
        }
    }
}
