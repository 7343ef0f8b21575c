use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Reserved,
    Sold,
    Held,
}

impl SeatStatus {
    pub fn is_available(self) -> bool {
        self == SeatStatus::Available
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Reserved => "reserved",
            SeatStatus::Sold => "sold",
            SeatStatus::Held => "held",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    #[serde(alias = "col")]
    pub column: u32,
    pub x: f32,
    pub y: f32,
    #[serde(alias = "priceTier")]
    pub tier: u32,
    pub status: SeatStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub index: i32,
    #[serde(alias = "seats")]
    pub entities: Vec<Seat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginOffset {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_origin_scale")]
    pub scale: f32,
}

impl Default for OriginOffset {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: default_origin_scale(),
        }
    }
}

fn default_origin_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub label: String,
    #[serde(alias = "transform", default)]
    pub origin_offset: OriginOffset,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn seat_count(&self) -> usize {
        self.rows.iter().map(|row| row.entities.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasExtent {
    pub width: u32,
    pub height: u32,
}

/// A complete venue snapshot as loaded from a layout document.
///
/// Replaced wholesale on reload; never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(alias = "venueId")]
    pub id: String,
    #[serde(alias = "name")]
    pub label: String,
    #[serde(alias = "map")]
    pub canvas_extent: CanvasExtent,
    pub sections: Vec<Section>,
}

impl Venue {
    pub fn seat_count(&self) -> usize {
        self.sections.iter().map(Section::seat_count).sum()
    }

    /// Resolves a seat id to its `(section, row, seat)` triple.
    ///
    /// Linear in seat count; callers on a hot path go through
    /// [`super::SpatialDataset::index_of`] instead.
    pub fn find_seat(&self, seat_id: &str) -> Option<(&Section, &Row, &Seat)> {
        self.sections.iter().find_map(|section| {
            section.rows.iter().find_map(|row| {
                row.entities
                    .iter()
                    .find(|seat| seat.id == seat_id)
                    .map(|seat| (section, row, seat))
            })
        })
    }
}
