/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another location in kilometers
    #[inline(always)]
    pub fn distance_km(&self, other: &Location) -> f64 {
        haversine_km(self.lon, self.lat, other.lon, other.lat)
    }

    /// Location reached by travelling `km` due north (clamped at the pole)
    pub fn north_by(&self, km: f64) -> Location {
        let dlat = (km / EARTH_RADIUS_KM).to_degrees();
        Location::new((self.lat + dlat).min(89.999), self.lon)
    }
}

/// Haversine distance in kilometers
#[inline(always)]
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}
