mod dataset;
mod loader;
mod synthetic;
mod types;

pub use dataset::{SeatRecord, SpatialDataset};
pub use loader::{
    load_venue_from_path, parse_venue_json, validate_venue, write_venue_json, LayoutError,
};
pub use synthetic::generate_stadium_venue;
pub use types::{CanvasExtent, OriginOffset, Row, Seat, SeatStatus, Section, Venue};
