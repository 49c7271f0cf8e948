use crate::data::feed::PointRecord;
use crate::location::Location;
use geo::Contains;
use geo_types::{Point, Polygon};

/// Geometry of a named region
#[derive(Clone, Debug)]
pub enum BoundaryShape {
    Simple(Polygon<f64>),
    /// Disjoint landmasses (islands, exclaves) under one name
    Composite(Vec<Polygon<f64>>),
}

/// A named country/region boundary, loaded once at startup
#[derive(Clone, Debug)]
pub struct Boundary {
    pub name: String,
    pub shape: BoundaryShape,
}

impl Boundary {
    pub fn new(name: impl Into<String>, shape: BoundaryShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Whether any polygon of this boundary contains the location
    pub fn contains(&self, location: &Location) -> bool {
        let point = Point::new(location.lon, location.lat);
        match &self.shape {
            BoundaryShape::Simple(polygon) => polygon.contains(&point),
            BoundaryShape::Composite(polygons) => polygons.iter().any(|p| p.contains(&point)),
        }
    }

    /// Polygons making up this boundary
    pub fn polygons(&self) -> &[Polygon<f64>] {
        match &self.shape {
            BoundaryShape::Simple(polygon) => std::slice::from_ref(polygon),
            BoundaryShape::Composite(polygons) => polygons,
        }
    }
}

/// Outcome of testing a point against the boundary set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub is_land: bool,
    pub region: Option<String>,
}

impl Classification {
    pub fn ocean() -> Self {
        Self {
            is_land: false,
            region: None,
        }
    }
}

/// First boundary (in iteration order) containing the location wins.
/// Overlapping boundaries are not detected.
pub fn classify(location: &Location, boundaries: &[Boundary]) -> Classification {
    boundaries
        .iter()
        .find(|b| b.contains(location))
        .map(|b| Classification {
            is_land: true,
            region: Some(b.name.clone()),
        })
        .unwrap_or_else(Classification::ocean)
}

/// Classify a feed record and tag its region on a land hit
pub fn classify_record(record: &mut PointRecord, boundaries: &[Boundary]) -> bool {
    let classification = classify(&record.location, boundaries);
    if classification.region.is_some() {
        record.region = classification.region;
    }
    classification.is_land
}

/// Land quakes per region (first-seen order) plus ocean quakes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuakeTally {
    pub by_region: Vec<(String, usize)>,
    pub ocean: usize,
}

impl QuakeTally {
    pub fn record(&mut self, region: Option<&str>) {
        match region {
            Some(name) => match self.by_region.iter_mut().find(|(n, _)| n == name) {
                Some((_, count)) => *count += 1,
                None => self.by_region.push((name.to_string(), 1)),
            },
            None => self.ocean += 1,
        }
    }

    pub fn land(&self) -> usize {
        self.by_region.iter().map(|(_, c)| c).sum()
    }

    /// Emit the tally to the log
    pub fn log(&self) {
        for (name, count) in &self.by_region {
            log::info!("{}: {}", name, count);
        }
        log::info!("OCEAN QUAKES: {}", self.ocean);
    }
}
