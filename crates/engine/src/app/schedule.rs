use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owns the "keep drawing" decision for the event loop.
///
/// Scheduling starts with [`FrameScheduler::start`] and stops once the
/// returned ticket is cancelled or dropped. A frame already being drawn is
/// never interrupted.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    live: Arc<AtomicBool>,
}

/// Cancel handle for a running [`FrameScheduler`].
#[derive(Debug)]
pub struct FrameTicket {
    live: Arc<AtomicBool>,
}

impl FrameScheduler {
    pub fn start() -> (Self, FrameTicket) {
        let live = Arc::new(AtomicBool::new(true));
        (
            Self {
                live: Arc::clone(&live),
            },
            FrameTicket { live },
        )
    }

    /// Whether the loop should request another frame.
    pub fn should_schedule(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

impl FrameTicket {
    pub fn cancel(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

impl Drop for FrameTicket {
    fn drop(&mut self) {
        self.cancel();
    }
}
