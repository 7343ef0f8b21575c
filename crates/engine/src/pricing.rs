use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, PartialEq)]
pub struct PriceTier {
    pub tier: u32,
    pub price: f64,
    pub label: String,
    pub color: Rgba,
}

#[derive(Debug, Error)]
pub enum TierTableError {
    #[error("failed to read tier table {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tier table json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("tier {tier} has invalid color {value:?}; expected #rrggbb")]
    InvalidColor { tier: u32, value: String },
    #[error("tier {tier} has invalid price {price}")]
    InvalidPrice { tier: u32, price: f64 },
    #[error("tier key 0 is not allowed; tiers start at 1")]
    ZeroTier,
}

#[derive(Debug, Deserialize)]
struct PriceTierDoc {
    price: f64,
    label: String,
    color: String,
}

/// Read-only tier → price/label/color lookup.
///
/// The table is opaque to the engine: it neither interprets labels nor
/// enforces any ordering between tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: HashMap<u32, PriceTier>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self::from_tiers([
            PriceTier {
                tier: 1,
                price: 150.0,
                label: "Premium".to_string(),
                color: [0x10, 0xb9, 0x81, 0xff],
            },
            PriceTier {
                tier: 2,
                price: 100.0,
                label: "Standard".to_string(),
                color: [0x3b, 0x82, 0xf6, 0xff],
            },
            PriceTier {
                tier: 3,
                price: 75.0,
                label: "Economy".to_string(),
                color: [0x8b, 0x5c, 0xf6, 0xff],
            },
        ])
    }
}

impl TierTable {
    pub fn from_tiers(tiers: impl IntoIterator<Item = PriceTier>) -> Self {
        Self {
            tiers: tiers.into_iter().map(|tier| (tier.tier, tier)).collect(),
        }
    }

    pub fn parse_json(raw: &str) -> Result<Self, TierTableError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let docs: BTreeMap<u32, PriceTierDoc> =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let path = error.path().to_string();
                TierTableError::Parse {
                    json_path: if path.is_empty() || path == "." {
                        "<root>".to_string()
                    } else {
                        path
                    },
                    source: error.into_inner(),
                }
            })?;

        let mut tiers = Vec::with_capacity(docs.len());
        for (tier, doc) in docs {
            if tier == 0 {
                return Err(TierTableError::ZeroTier);
            }
            if !doc.price.is_finite() || doc.price < 0.0 {
                return Err(TierTableError::InvalidPrice {
                    tier,
                    price: doc.price,
                });
            }
            let color = parse_hex_color(&doc.color).ok_or_else(|| TierTableError::InvalidColor {
                tier,
                value: doc.color.clone(),
            })?;
            tiers.push(PriceTier {
                tier,
                price: doc.price,
                label: doc.label,
                color,
            });
        }
        Ok(Self::from_tiers(tiers))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, TierTableError> {
        let raw = fs::read_to_string(path).map_err(|source| TierTableError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_json(&raw)
    }

    pub fn get(&self, tier: u32) -> Option<&PriceTier> {
        self.tiers.get(&tier)
    }

    /// Price for `tier`, or 0 when the table has no entry for it.
    pub fn price_for(&self, tier: u32) -> f64 {
        self.tiers.get(&tier).map(|entry| entry.price).unwrap_or(0.0)
    }

    pub fn color_for(&self, tier: u32) -> Option<Rgba> {
        self.tiers.get(&tier).map(|entry| entry.color)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Parses `#rrggbb` or `#rrggbbaa` into RGBA bytes.
pub fn parse_hex_color(value: &str) -> Option<Rgba> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let channel = |start: usize| u8::from_str_radix(&hex[start..start + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}
