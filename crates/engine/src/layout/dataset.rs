use std::collections::HashMap;

use crate::app::Vec2;

use super::types::{Row, Seat, SeatStatus, Section, Venue};

/// One flattened seat, positioned in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatRecord {
    pub id: String,
    pub world: Vec2,
    pub status: SeatStatus,
    pub tier: u32,
    pub column: u32,
    pub section_index: usize,
    pub row_index: usize,
    pub seat_index: usize,
}

/// Flat, precomputed view over a [`Venue`], rebuilt once per loaded layout.
///
/// Record order is section order, then row order, then seat order. The hit
/// tester and the direct render path both rely on that order.
#[derive(Debug, Clone, Default)]
pub struct SpatialDataset {
    records: Vec<SeatRecord>,
    index_by_id: HashMap<String, usize>,
}

impl SpatialDataset {
    pub fn build(venue: &Venue) -> Self {
        let seat_count = venue.seat_count();
        let mut records = Vec::with_capacity(seat_count);
        let mut index_by_id = HashMap::with_capacity(seat_count);

        for (section_index, section) in venue.sections.iter().enumerate() {
            let origin = section.origin_offset;
            for (row_index, row) in section.rows.iter().enumerate() {
                for (seat_index, seat) in row.entities.iter().enumerate() {
                    index_by_id.insert(seat.id.clone(), records.len());
                    records.push(SeatRecord {
                        id: seat.id.clone(),
                        world: Vec2 {
                            x: seat.x + origin.x,
                            y: seat.y + origin.y,
                        },
                        status: seat.status,
                        tier: seat.tier,
                        column: seat.column,
                        section_index,
                        row_index,
                        seat_index,
                    });
                }
            }
        }

        Self {
            records,
            index_by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SeatRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&SeatRecord> {
        self.records.get(index)
    }

    pub fn index_of(&self, seat_id: &str) -> Option<usize> {
        self.index_by_id.get(seat_id).copied()
    }

    pub fn contains(&self, seat_id: &str) -> bool {
        self.index_by_id.contains_key(seat_id)
    }

    /// Joins a record back to the venue structures it was flattened from.
    pub fn resolve<'v>(
        &self,
        venue: &'v Venue,
        index: usize,
    ) -> Option<(&'v Section, &'v Row, &'v Seat)> {
        let record = self.records.get(index)?;
        let section = venue.sections.get(record.section_index)?;
        let row = section.rows.get(record.row_index)?;
        let seat = row.entities.get(record.seat_index)?;
        Some((section, row, seat))
    }
}
