use super::types::{CanvasExtent, OriginOffset, Row, Seat, SeatStatus, Section, Venue};

const SEAT_PITCH_X: f32 = 25.0;
const ROW_PITCH_Y: f32 = 20.0;
const ROW_STAGGER_X: f32 = 12.5;
const STATUS_CYCLE: [SeatStatus; 4] = [
    SeatStatus::Available,
    SeatStatus::Reserved,
    SeatStatus::Sold,
    SeatStatus::Held,
];
const TIER_CYCLE: [u32; 3] = [1, 2, 3];

#[derive(Debug, Clone, Copy)]
struct SectionPlan {
    id: &'static str,
    label: &'static str,
    origin_x: f32,
    origin_y: f32,
    rows: u32,
    seats_per_row: u32,
}

const STADIUM_SECTIONS: [SectionPlan; 8] = [
    SectionPlan {
        id: "LOWER_A",
        label: "Lower Bowl A",
        origin_x: 100.0,
        origin_y: 200.0,
        rows: 40,
        seats_per_row: 50,
    },
    SectionPlan {
        id: "LOWER_B",
        label: "Lower Bowl B",
        origin_x: 100.0,
        origin_y: 800.0,
        rows: 40,
        seats_per_row: 50,
    },
    SectionPlan {
        id: "UPPER_A",
        label: "Upper Bowl A",
        origin_x: 100.0,
        origin_y: 100.0,
        rows: 30,
        seats_per_row: 60,
    },
    SectionPlan {
        id: "UPPER_B",
        label: "Upper Bowl B",
        origin_x: 100.0,
        origin_y: 900.0,
        rows: 30,
        seats_per_row: 60,
    },
    SectionPlan {
        id: "CLUB_A",
        label: "Club Level A",
        origin_x: 200.0,
        origin_y: 300.0,
        rows: 20,
        seats_per_row: 40,
    },
    SectionPlan {
        id: "CLUB_B",
        label: "Club Level B",
        origin_x: 200.0,
        origin_y: 700.0,
        rows: 20,
        seats_per_row: 40,
    },
    SectionPlan {
        id: "PREMIUM_A",
        label: "Premium Section A",
        origin_x: 300.0,
        origin_y: 400.0,
        rows: 15,
        seats_per_row: 30,
    },
    SectionPlan {
        id: "PREMIUM_B",
        label: "Premium Section B",
        origin_x: 300.0,
        origin_y: 600.0,
        rows: 15,
        seats_per_row: 30,
    },
];

/// Builds the large multi-section stadium used for load testing.
///
/// Deterministic: the same `seed` always yields the same statuses and tiers,
/// so tests and snapshots stay reproducible.
pub fn generate_stadium_venue(seed: u64) -> Venue {
    let sections = STADIUM_SECTIONS
        .iter()
        .enumerate()
        .map(|(section_index, plan)| generate_section(plan, section_index as u64, seed))
        .collect::<Vec<_>>();

    Venue {
        id: "stadium-megadome".to_string(),
        label: "MegaDome Stadium".to_string(),
        canvas_extent: CanvasExtent {
            width: 2000,
            height: 1500,
        },
        sections,
    }
}

fn generate_section(plan: &SectionPlan, section_index: u64, seed: u64) -> Section {
    let rows = (1..=plan.rows)
        .map(|row_index| {
            let stagger = if row_index % 2 == 1 { ROW_STAGGER_X } else { 0.0 };
            let entities = (1..=plan.seats_per_row)
                .map(|column| {
                    let mix = mix_bits(seed, section_index, row_index as u64, column as u64);
                    Seat {
                        id: format!("{}-{}-{:02}", plan.id, row_index, column),
                        column,
                        x: column as f32 * SEAT_PITCH_X + stagger,
                        y: row_index as f32 * ROW_PITCH_Y,
                        tier: TIER_CYCLE[(mix % TIER_CYCLE.len() as u64) as usize],
                        status: STATUS_CYCLE[((mix >> 8) % STATUS_CYCLE.len() as u64) as usize],
                    }
                })
                .collect();
            Row {
                index: row_index as i32,
                entities,
            }
        })
        .collect();

    Section {
        id: plan.id.to_string(),
        label: plan.label.to_string(),
        origin_offset: OriginOffset {
            x: plan.origin_x,
            y: plan.origin_y,
            scale: 1.0,
        },
        rows,
    }
}

fn mix_bits(seed: u64, section: u64, row: u64, column: u64) -> u64 {
    // splitmix64 finaliser over the packed coordinates
    let mut z = seed
        ^ section.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ row.wrapping_mul(0xBF58_476D_1CE4_E5B9)
        ^ column.wrapping_mul(0x94D0_49BB_1331_11EB);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::validate_venue;

    #[test]
    fn stadium_has_expected_seat_count_and_valid_ids() {
        let venue = generate_stadium_venue(7);
        assert_eq!(venue.sections.len(), 8);
        assert_eq!(venue.seat_count(), 10_100);
        validate_venue(&venue).expect("generated venue validates");
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        assert_eq!(generate_stadium_venue(3), generate_stadium_venue(3));
        assert_ne!(generate_stadium_venue(3), generate_stadium_venue(4));
    }

    #[test]
    fn odd_rows_are_staggered() {
        let venue = generate_stadium_venue(1);
        let rows = &venue.sections[0].rows;
        assert_eq!(rows[0].entities[0].x, SEAT_PITCH_X + ROW_STAGGER_X);
        assert_eq!(rows[1].entities[0].x, SEAT_PITCH_X);
        assert_eq!(rows[0].entities[1].id, "LOWER_A-1-02");
    }

    #[test]
    fn every_status_appears() {
        let venue = generate_stadium_venue(11);
        for status in STATUS_CYCLE {
            assert!(venue
                .sections
                .iter()
                .flat_map(|section| section.rows.iter())
                .flat_map(|row| row.entities.iter())
                .any(|seat| seat.status == status));
        }
    }
}
