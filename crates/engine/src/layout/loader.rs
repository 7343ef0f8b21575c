use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::atomic_io::write_text_atomic;

use super::types::Venue;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate seat id {seat_id} (first in section {first_section}, again in section {second_section})")]
    DuplicateSeatId {
        seat_id: String,
        first_section: String,
        second_section: String,
    },
    #[error("seat {seat_id} in section {section_id} has column 0; columns start at 1")]
    InvalidColumn { seat_id: String, section_id: String },
    #[error("seat {seat_id} in section {section_id} has tier 0; tiers start at 1")]
    InvalidTier { seat_id: String, section_id: String },
    #[error("seat {seat_id} in section {section_id} has a non-finite position")]
    NonFinitePosition { seat_id: String, section_id: String },
    #[error("section {section_id} has a non-finite origin offset")]
    NonFiniteOrigin { section_id: String },
    #[error("failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write layout file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn parse_venue_json(raw: &str) -> Result<Venue, LayoutError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let venue = match serde_path_to_error::deserialize::<_, Venue>(&mut deserializer) {
        Ok(venue) => venue,
        Err(error) => {
            let path = error.path().to_string();
            let json_path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            return Err(LayoutError::Parse {
                json_path,
                source: error.into_inner(),
            });
        }
    };
    validate_venue(&venue)?;
    Ok(venue)
}

pub fn load_venue_from_path(path: &Path) -> Result<Venue, LayoutError> {
    let raw = fs::read_to_string(path).map_err(|source| LayoutError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let venue = parse_venue_json(&raw)?;
    info!(
        path = %path.display(),
        venue_id = %venue.id,
        section_count = venue.sections.len(),
        seat_count = venue.seat_count(),
        "layout_file_read"
    );
    Ok(venue)
}

pub fn write_venue_json(path: &Path, venue: &Venue) -> Result<(), LayoutError> {
    let text = serde_json::to_string_pretty(venue).map_err(LayoutError::Serialize)?;
    write_text_atomic(path, &text).map_err(|source| LayoutError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks the invariants the rest of the engine relies on.
///
/// Seat ids must be unique across the whole venue, columns and tiers start at
/// 1, and positions must be finite. Nothing else about the geometry is checked.
pub fn validate_venue(venue: &Venue) -> Result<(), LayoutError> {
    let mut first_section_by_seat: HashMap<&str, &str> = HashMap::with_capacity(venue.seat_count());

    for section in &venue.sections {
        if !section.origin_offset.x.is_finite() || !section.origin_offset.y.is_finite() {
            return Err(LayoutError::NonFiniteOrigin {
                section_id: section.id.clone(),
            });
        }
        for row in &section.rows {
            for seat in &row.entities {
                if seat.column == 0 {
                    return Err(LayoutError::InvalidColumn {
                        seat_id: seat.id.clone(),
                        section_id: section.id.clone(),
                    });
                }
                if seat.tier == 0 {
                    return Err(LayoutError::InvalidTier {
                        seat_id: seat.id.clone(),
                        section_id: section.id.clone(),
                    });
                }
                if !seat.x.is_finite() || !seat.y.is_finite() {
                    return Err(LayoutError::NonFinitePosition {
                        seat_id: seat.id.clone(),
                        section_id: section.id.clone(),
                    });
                }
                if let Some(first_section) =
                    first_section_by_seat.insert(seat.id.as_str(), section.id.as_str())
                {
                    return Err(LayoutError::DuplicateSeatId {
                        seat_id: seat.id.clone(),
                        first_section: first_section.to_string(),
                        second_section: section.id.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SeatStatus;
    use tempfile::TempDir;

    const DOCUMENTED_SHAPE: &str = r#"{
        "id": "hall-1",
        "label": "Hall One",
        "canvasExtent": { "width": 800, "height": 600 },
        "sections": [
            {
                "id": "A",
                "label": "Stalls",
                "originOffset": { "x": 10, "y": 20, "scale": 1 },
                "rows": [
                    { "index": 1, "entities": [
                        { "id": "A-1-1", "column": 1, "x": 0, "y": 0, "tier": 1, "status": "available" },
                        { "id": "A-1-2", "column": 2, "x": 20, "y": 0, "tier": 2, "status": "sold" }
                    ] }
                ]
            }
        ]
    }"#;

    const ALIASED_SHAPE: &str = r#"{
        "venueId": "arena",
        "name": "Arena",
        "map": { "width": 1024, "height": 768 },
        "sections": [
            {
                "id": "LOWER",
                "label": "Lower Bowl",
                "transform": { "x": 100, "y": 200 },
                "rows": [
                    { "index": 0, "seats": [
                        { "id": "L1", "col": 1, "x": 5.5, "y": 3, "priceTier": 3, "status": "held" }
                    ] }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_documented_field_names() {
        let venue = parse_venue_json(DOCUMENTED_SHAPE).expect("venue");
        assert_eq!(venue.id, "hall-1");
        assert_eq!(venue.canvas_extent.width, 800);
        assert_eq!(venue.sections[0].origin_offset.x, 10.0);
        let seats = &venue.sections[0].rows[0].entities;
        assert_eq!(seats.len(), 2);
        assert_eq!(seats[1].status, SeatStatus::Sold);
        assert_eq!(seats[1].tier, 2);
    }

    #[test]
    fn accepts_alternate_field_aliases() {
        let venue = parse_venue_json(ALIASED_SHAPE).expect("venue");
        assert_eq!(venue.id, "arena");
        assert_eq!(venue.label, "Arena");
        assert_eq!(venue.canvas_extent.height, 768);
        let section = &venue.sections[0];
        assert_eq!(section.origin_offset.y, 200.0);
        assert_eq!(section.origin_offset.scale, 1.0);
        let seat = &section.rows[0].entities[0];
        assert_eq!(seat.column, 1);
        assert_eq!(seat.tier, 3);
        assert_eq!(seat.status, SeatStatus::Held);
    }

    #[test]
    fn parse_error_reports_json_path() {
        let raw = DOCUMENTED_SHAPE.replace("\"sold\"", "\"lost\"");
        let error = parse_venue_json(&raw).expect_err("bad status");
        match error {
            LayoutError::Parse { json_path, .. } => {
                assert!(json_path.contains("sections[0]"), "path was {json_path}");
                assert!(json_path.contains("status"), "path was {json_path}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let error = parse_venue_json("{ not json").expect_err("malformed");
        assert!(matches!(error, LayoutError::Parse { .. }));
    }

    #[test]
    fn duplicate_ids_across_sections_are_rejected() {
        let raw = r#"{
            "id": "v", "label": "v", "canvasExtent": { "width": 10, "height": 10 },
            "sections": [
                { "id": "A", "label": "A", "originOffset": { "x": 0, "y": 0 }, "rows": [
                    { "index": 0, "entities": [ { "id": "S1", "column": 1, "x": 0, "y": 0, "tier": 1, "status": "available" } ] } ] },
                { "id": "B", "label": "B", "originOffset": { "x": 0, "y": 0 }, "rows": [
                    { "index": 0, "entities": [ { "id": "S1", "column": 1, "x": 0, "y": 0, "tier": 1, "status": "available" } ] } ] }
            ]
        }"#;
        let error = parse_venue_json(raw).expect_err("duplicate");
        match error {
            LayoutError::DuplicateSeatId {
                seat_id,
                first_section,
                second_section,
            } => {
                assert_eq!(seat_id, "S1");
                assert_eq!(first_section, "A");
                assert_eq!(second_section, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_column_and_zero_tier_are_rejected() {
        let zero_column = DOCUMENTED_SHAPE.replace("\"column\": 1", "\"column\": 0");
        assert!(matches!(
            parse_venue_json(&zero_column),
            Err(LayoutError::InvalidColumn { .. })
        ));

        let zero_tier = DOCUMENTED_SHAPE.replace("\"tier\": 1", "\"tier\": 0");
        assert!(matches!(
            parse_venue_json(&zero_tier),
            Err(LayoutError::InvalidTier { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().expect("tempdir");
        let error = load_venue_from_path(&dir.path().join("absent.json")).expect_err("missing");
        assert!(matches!(error, LayoutError::ReadFile { .. }));
    }

    #[test]
    fn written_layout_loads_back_identically() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("venue.json");
        let venue = parse_venue_json(ALIASED_SHAPE).expect("venue");

        write_venue_json(&path, &venue).expect("write");
        let loaded = load_venue_from_path(&path).expect("load");
        assert_eq!(loaded, venue);
        assert!(!dir.path().join("nested").join("venue.json.tmp").exists());
    }

    #[test]
    fn bundled_layout_parses_and_validates() {
        let venue = parse_venue_json(include_str!("../../../../assets/venue.json")).expect("venue");
        assert_eq!(venue.id, "playhouse");
        assert_eq!(venue.sections.len(), 4);
        assert_eq!(venue.seat_count(), 280);
    }
}
