//! Human- and machine-readable view of one way

use std::fmt;

use serde::Serialize;

use super::error::Result;
use super::layout::WayRecord;
use super::store::WayStore;
use super::types::{Property, Transport};

/// Decoded way with its name and limits in physical units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaySummary {
    pub index: u32,
    pub name: String,
    /// Highway class name, `None` for an unknown class code
    pub highway: Option<&'static str>,
    pub type_code: u8,
    pub oneway: bool,
    pub roundabout: bool,
    pub allow: Vec<&'static str>,
    pub properties: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kph: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_tonnes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_metres: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_metres: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_metres: Option<f64>,
}

impl WaySummary {
    pub fn from_record(index: u32, name: String, way: &WayRecord) -> Self {
        Self {
            index,
            name,
            highway: way.highway().map(|h| h.name()),
            type_code: way.way_type(),
            oneway: way.is_oneway(),
            roundabout: way.is_roundabout(),
            allow: Transport::all()
                .iter()
                .filter(|t| way.allows(**t))
                .map(|t| t.name())
                .collect(),
            properties: Property::all()
                .iter()
                .filter(|p| way.has_property(**p))
                .map(|p| p.name())
                .collect(),
            speed_kph: (way.speed() != 0).then(|| way.speed_kph()),
            weight_tonnes: (way.weight() != 0).then(|| way.weight_tonnes()),
            height_metres: (way.height() != 0).then(|| way.height_metres()),
            width_metres: (way.width() != 0).then(|| way.width_metres()),
            length_metres: (way.length() != 0).then(|| way.length_metres()),
        }
    }

    /// Summary of the way at `index` in `store`
    pub fn load(store: &WayStore, index: u32) -> Result<Self> {
        let way = store.way_at(index)?.to_record();
        let name = store.name_at(way.name_offset())?.into_owned();
        Ok(Self::from_record(index, name, &way))
    }
}

impl fmt::Display for WaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Way {}", self.index)?;
        if !self.name.is_empty() {
            writeln!(f, "  name={}", self.name)?;
        }
        write!(
            f,
            "  type={:02x} ({}",
            self.type_code,
            self.highway.unwrap_or("UNKNOWN")
        )?;
        if self.oneway {
            write!(f, ",One-Way")?;
        }
        if self.roundabout {
            write!(f, ",Roundabout")?;
        }
        writeln!(f, ")")?;
        writeln!(f, "  allow=({})", self.allow.join(", "))?;
        if !self.properties.is_empty() {
            writeln!(f, "  props=({})", self.properties.join(", "))?;
        }
        if let Some(speed) = self.speed_kph {
            writeln!(f, "  speed={} km/hr", speed)?;
        }
        if let Some(weight) = self.weight_tonnes {
            writeln!(f, "  weight={:.1} tonnes", weight)?;
        }
        if let Some(height) = self.height_metres {
            writeln!(f, "  height={:.1} m", height)?;
        }
        if let Some(width) = self.width_metres {
            writeln!(f, "  width={:.1} m", width)?;
        }
        if let Some(length) = self.length_metres {
            writeln!(f, "  length={:.1} m", length)?;
        }
        Ok(())
    }
}
