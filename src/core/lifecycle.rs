use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "still mounted" flag. Async work checks it after every suspension
/// point and drops its results once the owner has been torn down.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn handle(&self) -> TeardownHandle {
        TeardownHandle {
            alive: Arc::clone(&self.alive),
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Held by whoever owns the widget's surroundings.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    alive: Arc<AtomicBool>,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        if self.alive.swap(false, Ordering::AcqRel) {
            tracing::debug!("Widget torn down");
        }
    }

    pub fn is_torn_down(&self) -> bool {
        !self.alive.load(Ordering::Acquire)
    }
}
