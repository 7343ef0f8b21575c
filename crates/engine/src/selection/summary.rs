use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::warn;

static SUMMARY_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_summary_lock_poison_once(operation: &'static str) {
    if SUMMARY_LOCK_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "selection summary lock poisoned; recovered inner value");
    }
}

/// What a summary panel needs to show about the current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSummary {
    pub seat_ids: Vec<String>,
    pub count: usize,
    pub max_selectable: usize,
    pub total_price: f64,
}

/// Read-only view of the selection for observers outside the store.
///
/// Cloning shares the same underlying summary; only the store publishes.
#[derive(Clone, Debug, Default)]
pub struct SummaryHandle {
    summary: Arc<RwLock<SelectionSummary>>,
}

impl SummaryHandle {
    pub fn summary(&self) -> SelectionSummary {
        match self.summary.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                warn_summary_lock_poison_once("read");
                poisoned.into_inner().clone()
            }
        }
    }

    pub(crate) fn publish(&self, summary: SelectionSummary) {
        match self.summary.write() {
            Ok(mut guard) => *guard = summary,
            Err(poisoned) => {
                warn_summary_lock_poison_once("write");
                let mut guard = poisoned.into_inner();
                *guard = summary;
            }
        }
    }
}
