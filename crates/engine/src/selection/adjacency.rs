use crate::layout::{Seat, Venue};

use super::{SelectedSeat, SelectionStore};

/// Finds the first run of `count` available, unselected seats whose columns
/// increase by exactly one.
///
/// Ordering contract: sections in venue order, then rows in section order,
/// then window start within the row's seats sorted by column. The first run
/// found wins. Seats in different rows are never adjacent, and a gap in
/// column numbers breaks a run even when the seats sit next to each other on
/// screen.
///
/// Returns exactly `count` entries or none at all.
pub fn find_adjacent(
    venue: Option<&Venue>,
    selection: &SelectionStore,
    count: usize,
) -> Vec<SelectedSeat> {
    let Some(venue) = venue else {
        return Vec::new();
    };
    if count == 0 {
        return Vec::new();
    }

    for section in &venue.sections {
        for row in &section.rows {
            let mut candidates = row
                .entities
                .iter()
                .filter(|seat| seat.status.is_available() && !selection.is_selected(&seat.id))
                .collect::<Vec<&Seat>>();
            if candidates.len() < count {
                continue;
            }
            candidates.sort_by_key(|seat| seat.column);

            let Some(window) = candidates
                .windows(count)
                .find(|window| is_consecutive_run(window))
            else {
                continue;
            };

            return window
                .iter()
                .map(|seat| SelectedSeat::new(seat, section, row, selection.tiers()))
                .collect();
        }
    }

    Vec::new()
}

fn is_consecutive_run(window: &[&Seat]) -> bool {
    window
        .windows(2)
        .all(|pair| pair[0].column.checked_add(1) == Some(pair[1].column))
}
