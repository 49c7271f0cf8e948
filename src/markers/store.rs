use super::{CityInfo, Marker};
use crate::classify::{classify_record, Boundary, QuakeTally};
use crate::data::feed::PointRecord;
use crate::location::Location;

/// Which of the two interactive collections a marker lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Quakes,
    Cities,
}

/// Position of a marker inside the store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerId {
    pub collection: Collection,
    pub index: usize,
}

impl MarkerId {
    pub fn quake(index: usize) -> Self {
        Self {
            collection: Collection::Quakes,
            index,
        }
    }

    pub fn city(index: usize) -> Self {
        Self {
            collection: Collection::Cities,
            index,
        }
    }
}

/// Country boundaries plus the city and quake markers.
///
/// Populated once at startup. `quakes` only holds quake markers and
/// `cities` only city markers.
pub struct MarkerStore {
    pub countries: Vec<Boundary>,
    pub cities: Vec<Marker>,
    pub quakes: Vec<Marker>,
    pub tally: QuakeTally,
}

impl MarkerStore {
    /// Classify every feed record against the countries and build all markers
    pub fn build(
        countries: Vec<Boundary>,
        cities: Vec<(Location, CityInfo)>,
        records: Vec<PointRecord>,
    ) -> Self {
        let mut tally = QuakeTally::default();
        let quakes = records
            .into_iter()
            .map(|mut record| {
                let is_land = classify_record(&mut record, &countries);
                tally.record(record.region.as_deref());
                Marker::quake(record, is_land)
            })
            .collect();

        let cities = cities
            .into_iter()
            .map(|(location, info)| Marker::city(location, info))
            .collect();

        Self {
            countries,
            cities,
            quakes,
            tally,
        }
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        match id.collection {
            Collection::Quakes => self.quakes.get(id.index),
            Collection::Cities => self.cities.get(id.index),
        }
    }

    pub fn get_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        match id.collection {
            Collection::Quakes => self.quakes.get_mut(id.index),
            Collection::Cities => self.cities.get_mut(id.index),
        }
    }

    /// Quakes first, then cities (the render and hit-test order)
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.quakes.iter().chain(self.cities.iter())
    }

    pub fn markers_mut(&mut self) -> impl Iterator<Item = &mut Marker> {
        self.quakes.iter_mut().chain(self.cities.iter_mut())
    }

    pub fn selected(&self) -> Option<&Marker> {
        self.markers().find(|m| m.selected)
    }

    pub fn unhide_all(&mut self) {
        for marker in self.markers_mut() {
            marker.hidden = false;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.quakes.is_empty()
    }
}
