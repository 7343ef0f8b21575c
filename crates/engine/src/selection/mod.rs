mod adjacency;
mod summary;

use std::sync::Arc;

use tracing::debug;

use crate::layout::{Row, Seat, Section};
use crate::pricing::TierTable;

pub use adjacency::find_adjacent;
pub use summary::{SelectionSummary, SummaryHandle};

pub const DEFAULT_MAX_SELECTABLE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRef {
    pub id: String,
    pub label: String,
}

impl SectionRef {
    pub fn of(section: &Section) -> Self {
        Self {
            id: section.id.clone(),
            label: section.label.clone(),
        }
    }
}

/// A seat joined with where it sits and what it cost when it was picked.
///
/// `price` is frozen at selection time; later tier table changes do not
/// touch it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSeat {
    pub seat: Seat,
    pub section: SectionRef,
    pub row_index: i32,
    pub price: f64,
}

impl SelectedSeat {
    pub fn new(seat: &Seat, section: &Section, row: &Row, tiers: &TierTable) -> Self {
        Self {
            seat: seat.clone(),
            section: SectionRef::of(section),
            row_index: row.index,
            price: tiers.price_for(seat.tier),
        }
    }
}

/// The single owner of the selected seats.
///
/// Blocked operations (reselecting, selecting past capacity, selecting a seat
/// that is not available, deselecting a non-member) return `false` and leave
/// the state untouched. None of them is an error.
#[derive(Debug)]
pub struct SelectionStore {
    entries: Vec<SelectedSeat>,
    max_selectable: usize,
    tiers: Arc<TierTable>,
    summary: SummaryHandle,
}

impl SelectionStore {
    pub fn new(max_selectable: usize, tiers: Arc<TierTable>) -> Self {
        let store = Self {
            entries: Vec::new(),
            max_selectable,
            tiers,
            summary: SummaryHandle::default(),
        };
        store.publish_summary();
        store
    }

    pub fn select_seat(&mut self, seat: &Seat, section: &Section, row: &Row) -> bool {
        if self.is_selected(&seat.id) {
            debug!(seat_id = %seat.id, reason = "already_selected", "selection_blocked");
            return false;
        }
        if !self.can_select_more() {
            debug!(
                seat_id = %seat.id,
                reason = "capacity",
                max_selectable = self.max_selectable,
                "selection_blocked"
            );
            return false;
        }
        if !seat.status.is_available() {
            debug!(
                seat_id = %seat.id,
                reason = "unavailable",
                status = seat.status.as_str(),
                "selection_blocked"
            );
            return false;
        }

        self.entries
            .push(SelectedSeat::new(seat, section, row, &self.tiers));
        self.publish_summary();
        true
    }

    pub fn deselect_seat(&mut self, seat_id: &str) -> bool {
        let Some(position) = self
            .entries
            .iter()
            .position(|entry| entry.seat.id == seat_id)
        else {
            return false;
        };
        self.entries.remove(position);
        self.publish_summary();
        true
    }

    pub fn clear_selection(&mut self) {
        self.entries.clear();
        self.publish_summary();
    }

    pub fn total_price(&self) -> f64 {
        self.entries.iter().map(|entry| entry.price).sum()
    }

    pub fn is_selected(&self, seat_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.seat.id == seat_id)
    }

    pub fn can_select_more(&self) -> bool {
        self.entries.len() < self.max_selectable
    }

    pub fn entries(&self) -> &[SelectedSeat] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_selectable(&self) -> usize {
        self.max_selectable
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Swaps the lookup used for future selections. Existing entries keep
    /// their prices.
    pub fn set_tiers(&mut self, tiers: Arc<TierTable>) {
        self.tiers = tiers;
    }

    pub fn summary_handle(&self) -> SummaryHandle {
        self.summary.clone()
    }

    /// Drops entries rejected by `keep`, preserving order of the rest.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&SelectedSeat) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| keep(entry));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.publish_summary();
        }
        removed
    }

    fn publish_summary(&self) {
        self.summary.publish(SelectionSummary {
            seat_ids: self
                .entries
                .iter()
                .map(|entry| entry.seat.id.clone())
                .collect(),
            count: self.entries.len(),
            max_selectable: self.max_selectable,
            total_price: self.total_price(),
        });
    }
}
