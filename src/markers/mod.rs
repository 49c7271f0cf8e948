pub mod store;

use crate::data::feed::PointRecord;
use crate::location::Location;
use crate::map::Viewport;
use glam::DVec2;

pub use store::MarkerStore;

/// Drawn size of a city triangle in Braille pixels
pub const CITY_SIZE: i32 = 2;

/// Largest drawn quake radius in Braille pixels
pub const MAX_QUAKE_SIZE: i32 = 12;

/// Extra pixels around a marker that still count as a hit
/// (a terminal cell is 2x4 pixels, so the pointer is coarse)
pub const HIT_SLOP: f64 = 2.0;

/// Depth bands used for quake colour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthClass {
    Shallow,
    Intermediate,
    Deep,
}

impl DepthClass {
    pub const SHALLOW_MAX_KM: f64 = 70.0;
    pub const INTERMEDIATE_MAX_KM: f64 = 300.0;

    pub fn from_depth(depth_km: Option<f64>) -> Self {
        match depth_km.unwrap_or(0.0) {
            d if d < Self::SHALLOW_MAX_KM => DepthClass::Shallow,
            d if d < Self::INTERMEDIATE_MAX_KM => DepthClass::Intermediate,
            _ => DepthClass::Deep,
        }
    }
}

/// Distance in km within which a quake of this magnitude is a threat.
/// Shared by click filtering and the drawn threat ring.
pub fn threat_radius_km(magnitude: f64) -> f64 {
    20.0 * 1.8f64.powf(2.0 * magnitude - 5.0)
}

/// Format a population for display; missing values degrade to N/A
pub fn population_text(population: Option<f64>) -> String {
    match population {
        None => "Pop: N/A".to_string(),
        Some(p) if p >= 1_000_000.0 => format!("Pop: {:.2} Million", p / 1_000_000.0),
        Some(p) if p >= 1_000.0 => format!("Pop: {:.1} K", p / 1_000.0),
        Some(p) => format!("Pop: {} people", p as i64),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CityInfo {
    pub name: String,
    pub country: Option<String>,
    pub population: Option<f64>,
}

/// Variant-specific marker data
#[derive(Clone, Debug, PartialEq)]
pub enum MarkerKind {
    City(CityInfo),
    LandQuake(PointRecord),
    OceanQuake(PointRecord),
}

/// A drawable, selectable entity bound to a location.
/// `hidden` and `selected` are the only fields that change after startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub location: Location,
    pub kind: MarkerKind,
    pub hidden: bool,
    pub selected: bool,
}

impl Marker {
    pub fn city(location: Location, info: CityInfo) -> Self {
        Self::with_kind(location, MarkerKind::City(info))
    }

    /// Wrap a classified feed record as a land or ocean quake
    pub fn quake(record: PointRecord, is_land: bool) -> Self {
        let location = record.location;
        let kind = if is_land {
            MarkerKind::LandQuake(record)
        } else {
            MarkerKind::OceanQuake(record)
        };
        Self::with_kind(location, kind)
    }

    fn with_kind(location: Location, kind: MarkerKind) -> Self {
        Self {
            location,
            kind,
            hidden: false,
            selected: false,
        }
    }

    /// Feed record behind a quake marker
    pub fn quake_record(&self) -> Option<&PointRecord> {
        match &self.kind {
            MarkerKind::LandQuake(r) | MarkerKind::OceanQuake(r) => Some(r),
            MarkerKind::City(_) => None,
        }
    }

    /// Magnitude of a quake marker (0 when the feed had none)
    pub fn magnitude(&self) -> Option<f64> {
        self.quake_record().map(|r| r.magnitude.unwrap_or(0.0))
    }

    /// Threat radius in km; only quakes have one
    pub fn threat_radius_km(&self) -> Option<f64> {
        self.magnitude().map(threat_radius_km)
    }

    pub fn depth_class(&self) -> Option<DepthClass> {
        self.quake_record().map(|r| DepthClass::from_depth(r.depth_km))
    }

    pub fn is_past_hour(&self) -> bool {
        self.quake_record()
            .and_then(|r| r.age.as_deref())
            .is_some_and(|age| age.eq_ignore_ascii_case("past hour"))
    }

    pub fn distance_km(&self, other: &Location) -> f64 {
        self.location.distance_km(other)
    }

    /// Drawn radius in Braille pixels
    pub fn size_px(&self) -> i32 {
        match self.magnitude() {
            Some(m) => (m.round() as i32).clamp(2, MAX_QUAKE_SIZE),
            None => CITY_SIZE,
        }
    }

    /// Whether the pixel position falls on this marker in the given view
    pub fn is_inside(&self, viewport: &Viewport, px: i32, py: i32) -> bool {
        let (mx, my) = viewport.project(self.location.lon, self.location.lat);
        let d = DVec2::new(mx as f64, my as f64).distance(DVec2::new(px as f64, py as f64));
        d <= self.size_px() as f64 + HIT_SLOP
    }

    /// Tooltip lines shown while the marker is selected
    pub fn title_lines(&self) -> Vec<String> {
        match &self.kind {
            MarkerKind::City(info) => {
                let name = match &info.country {
                    Some(country) => format!("{} {}", info.name, country),
                    None => info.name.clone(),
                };
                vec![name, population_text(info.population)]
            }
            MarkerKind::LandQuake(r) | MarkerKind::OceanQuake(r) => {
                let mut lines = vec![r.title.clone().unwrap_or_else(|| "Earthquake".to_string())];
                if let Some(region) = &r.region {
                    lines.push(region.clone());
                }
                lines
            }
        }
    }
}
