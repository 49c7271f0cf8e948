pub mod feed;

use crate::classify::{Boundary, BoundaryShape};
use crate::config::Config;
use crate::location::Location;
use crate::markers::CityInfo;
use anyhow::{Context, Result};
use feed::PointRecord;
use geo_types::{LineString, Polygon};
use geojson::{Feature, GeoJson, JsonObject, JsonValue, Value};
use std::fs;
use std::path::Path;

/// Everything the map needs at startup
#[derive(Debug)]
pub struct Datasets {
    pub countries: Vec<Boundary>,
    pub cities: Vec<(Location, CityInfo)>,
    pub quakes: Vec<PointRecord>,
}

/// Load all three data sources; any failure aborts startup
pub fn load_all(config: &Config) -> Result<Datasets> {
    let countries = load_boundaries(&config.countries_path)?;
    log::info!("{} country boundaries", countries.len());

    let cities = load_cities(&config.cities_path)?;
    log::info!("{} cities", cities.len());

    let quakes = load_feed(&config.feed_path)?;
    log::info!("{} earthquakes", quakes.len());

    Ok(Datasets {
        countries,
        cities,
        quakes,
    })
}

/// Read and parse a GeoJSON file
fn read_geojson(path: &Path) -> Result<GeoJson> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_geojson(&mut bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Parse GeoJSON bytes in place with simd-json
pub fn parse_geojson(bytes: &mut [u8]) -> Result<GeoJson> {
    Ok(simd_json::serde::from_slice(bytes)?)
}

/// Load country boundaries from GeoJSON polygon/multipolygon features
pub fn load_boundaries(path: &Path) -> Result<Vec<Boundary>> {
    let geojson = read_geojson(path)?;
    Ok(boundaries_from_geojson(&geojson))
}

/// Load city point features
pub fn load_cities(path: &Path) -> Result<Vec<(Location, CityInfo)>> {
    let geojson = read_geojson(path)?;
    Ok(cities_from_geojson(&geojson))
}

/// Load and parse the earthquake feed (single local read, no retry)
pub fn load_feed(path: &Path) -> Result<Vec<PointRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    feed::parse_feed(&content).with_context(|| format!("parsing feed {}", path.display()))
}

fn features(geojson: &GeoJson) -> Vec<&Feature> {
    match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.iter().collect(),
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => Vec::new(),
    }
}

/// Named boundaries in document order; non-polygon features are skipped
pub fn boundaries_from_geojson(geojson: &GeoJson) -> Vec<Boundary> {
    let mut boundaries = Vec::new();

    for feature in features(geojson) {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let shape = match &geometry.value {
            Value::Polygon(rings) => BoundaryShape::Simple(polygon_from_rings(rings)),
            Value::MultiPolygon(polygons) => {
                let parts = polygons.iter().map(Vec::as_slice).map(polygon_from_rings);
                BoundaryShape::Composite(parts.collect())
            }
            _ => continue,
        };
        let name = string_property(feature.properties.as_ref(), "name")
            .unwrap_or_else(|| "Unknown".to_string());
        boundaries.push(Boundary::new(name, shape));
    }

    boundaries
}

/// First ring is the exterior, the rest are holes
fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| {
        LineString::from(
            ring.iter()
                .filter(|c| c.len() >= 2)
                .map(|c| (c[0], c[1]))
                .collect::<Vec<(f64, f64)>>(),
        )
    });
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

/// Cities from point features; population may be absent or non-numeric
pub fn cities_from_geojson(geojson: &GeoJson) -> Vec<(Location, CityInfo)> {
    let mut cities = Vec::new();

    for feature in features(geojson) {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let Value::Point(coords) = &geometry.value else {
            continue;
        };
        if coords.len() < 2 {
            continue;
        }

        let props = feature.properties.as_ref();
        let name = string_property(props, "name").unwrap_or_else(|| "Unknown".to_string());
        let country =
            string_property(props, "country").or_else(|| string_property(props, "cou_name_en"));
        let population = props.and_then(|p| p.get("population")).and_then(number_value);

        cities.push((
            Location::new(coords[1], coords[0]),
            CityInfo {
                name,
                country,
                population,
            },
        ));
    }

    cities
}

fn string_property(props: Option<&JsonObject>, key: &str) -> Option<String> {
    props
        .and_then(|p| p.get(key))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Numbers pass through; numeric strings are parsed; anything else is unavailable
fn number_value(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTRIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Boxland"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},
            {"type": "Feature", "properties": {"name": "Twin Isles"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[20,20],[22,20],[22,22],[20,22],[20,20]]],
                [[[30,30],[32,30],[32,32],[30,32],[30,30]]]
             ]}},
            {"type": "Feature", "properties": {"name": "Roadway"},
             "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[50,50],[51,50],[51,51],[50,50]]]}}
        ]
    }"#;

    const CITIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Tokyo", "country": "Japan", "population": 13515271},
             "geometry": {"type": "Point", "coordinates": [139.69, 35.69]}},
            {"type": "Feature", "properties": {"name": "Lima", "cou_name_en": "Peru", "population": "8.5e6"},
             "geometry": {"type": "Point", "coordinates": [-77.04, -12.05]}},
            {"type": "Feature", "properties": {"name": "Nowhere", "population": "lots"},
             "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            {"type": "Feature", "properties": {"name": "Shapeless"}, "geometry": null}
        ]
    }"#;

    fn parse(s: &str) -> GeoJson {
        let mut bytes = s.as_bytes().to_vec();
        parse_geojson(&mut bytes).unwrap()
    }

    #[test]
    fn test_boundaries() {
        let boundaries = boundaries_from_geojson(&parse(COUNTRIES));
        let names: Vec<&str> = boundaries.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Boxland", "Twin Isles", "Unknown"]);
        assert!(matches!(boundaries[0].shape, BoundaryShape::Simple(_)));
        assert_eq!(boundaries[1].polygons().len(), 2);
        assert!(boundaries[1].contains(&Location::new(31.0, 31.0)));
        assert!(boundaries[0].contains(&Location::new(5.0, 5.0)));
    }

    #[test]
    fn test_cities() {
        let cities = cities_from_geojson(&parse(CITIES));
        assert_eq!(cities.len(), 3);

        let (tokyo_loc, tokyo) = &cities[0];
        assert!((tokyo_loc.lat - 35.69).abs() < 1e-9);
        assert!((tokyo_loc.lon - 139.69).abs() < 1e-9);
        assert_eq!(tokyo.country.as_deref(), Some("Japan"));
        assert_eq!(tokyo.population, Some(13515271.0));

        assert_eq!(cities[1].1.country.as_deref(), Some("Peru"));
        assert_eq!(cities[1].1.population, Some(8_500_000.0));

        assert_eq!(cities[2].1.country, None);
        assert_eq!(cities[2].1.population, None);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load_boundaries(Path::new("definitely/not/here.geo.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("reading"));
    }

    /// Valid data files in a per-test temp directory
    fn data_dir(name: &str) -> Config {
        let dir = std::env::temp_dir()
            .join(format!("quake-map-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:georss="http://www.georss.org/georss">
<entry><title>M 4.4 - x</title><georss:point>5 5</georss:point></entry></feed>"#;
        fs::write(dir.join("countries.geo.json"), COUNTRIES).unwrap();
        fs::write(dir.join("cities.json"), CITIES).unwrap();
        fs::write(dir.join("feed.atom"), feed).unwrap();
        Config {
            countries_path: dir.join("countries.geo.json"),
            cities_path: dir.join("cities.json"),
            feed_path: dir.join("feed.atom"),
            log_file: dir.join("quake-map.log"),
        }
    }

    #[test]
    fn test_load_all_with_every_source() {
        let data = load_all(&data_dir("ok")).unwrap();
        assert_eq!(data.countries.len(), 3);
        assert_eq!(data.cities.len(), 3);
        assert_eq!(data.quakes.len(), 1);
    }

    #[test]
    fn test_load_all_fails_on_any_missing_source() {
        let missing = Path::new("definitely/not/here").to_path_buf();

        let config = Config {
            countries_path: missing.clone(),
            ..data_dir("countries")
        };
        assert!(load_all(&config).is_err());

        let config = Config {
            cities_path: missing.clone(),
            ..data_dir("cities")
        };
        let err = load_all(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("definitely/not/here"));

        let config = Config {
            feed_path: missing,
            ..data_dir("feed")
        };
        let err = load_all(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("definitely/not/here"));
    }
}
