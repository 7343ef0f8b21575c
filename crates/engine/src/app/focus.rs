use crate::layout::{SpatialDataset, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Seat id keyboard focus should move to, or `None` to leave it where it is.
///
/// Left/right step to the seat one column over in the same row. Up/down step
/// to the row whose index is one lower/higher in the same section and pick
/// the seat with the same column. Columns and row indices are matched by
/// value, so gaps stop movement. Without a current focus, or with one that
/// no longer exists, the first seat in dataset order is focused.
pub fn next_focus(
    venue: &Venue,
    dataset: &SpatialDataset,
    current: Option<&str>,
    direction: FocusDirection,
) -> Option<String> {
    let Some(index) = current.and_then(|seat_id| dataset.index_of(seat_id)) else {
        return dataset.record(0).map(|record| record.id.clone());
    };
    let (section, row, seat) = dataset.resolve(venue, index)?;

    let target = match direction {
        FocusDirection::Left => seat
            .column
            .checked_sub(1)
            .and_then(|column| row.entities.iter().find(|other| other.column == column)),
        FocusDirection::Right => seat
            .column
            .checked_add(1)
            .and_then(|column| row.entities.iter().find(|other| other.column == column)),
        FocusDirection::Up | FocusDirection::Down => {
            let step = if direction == FocusDirection::Up { -1 } else { 1 };
            row.index
                .checked_add(step)
                .and_then(|target_index| {
                    section
                        .rows
                        .iter()
                        .find(|other| other.index == target_index)
                })
                .and_then(|target_row| {
                    target_row
                        .entities
                        .iter()
                        .find(|other| other.column == seat.column)
                })
        }
    };

    target.map(|seat| seat.id.clone())
}
