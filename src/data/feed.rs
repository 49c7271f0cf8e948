use crate::location::Location;
use roxmltree::{Document, Node};
use thiserror::Error;

/// Errors that abort parsing of an entire feed document.
///
/// Malformed coordinates are not in here: an entry without a usable
/// `georss:point` is dropped and the rest of the feed survives.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("no magnitude at title offset 2..5 in {title:?}")]
    Magnitude { title: String },
    #[error("elevation {value:?} is not a number")]
    Elevation { value: String },
}

/// One georeferenced entry of the earthquake feed
#[derive(Clone, Debug, PartialEq)]
pub struct PointRecord {
    pub location: Location,
    pub title: Option<String>,
    pub magnitude: Option<f64>,
    /// Depth in km, one decimal place
    pub depth_km: Option<f64>,
    pub age: Option<String>,
    /// Containing region, set by the classifier
    pub region: Option<String>,
}

impl PointRecord {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            title: None,
            magnitude: None,
            depth_km: None,
            age: None,
            region: None,
        }
    }
}

/// Parse a GeoRSS/Atom earthquake feed into point records, in document order
pub fn parse_feed(xml: &str) -> Result<Vec<PointRecord>, FeedError> {
    let doc = Document::parse(xml)?;
    let mut records = Vec::new();

    for entry in doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "entry")
    {
        let Some(location) = location_from_point(entry) else {
            log::debug!("dropping feed entry without usable georss:point");
            continue;
        };
        let mut record = PointRecord::new(location);

        if let Some(title) = child_text(entry, "title") {
            record.magnitude = Some(magnitude_from_title(title)?);
            record.title = Some(title.to_string());
        }

        if let Some(elev) = child_text(entry, "elev") {
            let raw: f64 = elev.trim().parse().map_err(|_| FeedError::Elevation {
                value: elev.to_string(),
            })?;
            record.depth_km = Some(depth_from_elevation(raw));
        }

        for category in entry
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "category")
        {
            if category.attribute("label") == Some("Age") {
                if let Some(term) = category.attribute("term") {
                    record.age = Some(term.to_string());
                }
            }
        }

        records.push(record);
    }

    Ok(records)
}

/// Magnitude lives at characters 2..=4 of the title ("M 5.2 - ...").
/// Anything else at that offset is a feed format change and is an error.
pub fn magnitude_from_title(title: &str) -> Result<f64, FeedError> {
    let error = || FeedError::Magnitude {
        title: title.to_string(),
    };
    let slice: String = title.chars().skip(2).take(3).collect();
    // Plain decimal only; `f64::from_str` would also take "inf", "NaN" or "1e9"
    let plain = slice.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if slice.chars().count() != 3 || !plain {
        return Err(error());
    }
    slice
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite())
        .ok_or_else(error)
}

/// Elevation in meters to depth in km, truncated to one decimal place
pub fn depth_from_elevation(raw: f64) -> f64 {
    ((raw / 100.0).trunc() / 10.0).abs()
}

/// Parse "lat lon" from the entry's georss:point child
fn location_from_point(entry: Node) -> Option<Location> {
    let text = child_text(entry, "point")?;
    let mut tokens = text.split_whitespace();
    let lat: f64 = tokens.next()?.parse().ok()?;
    let lon: f64 = tokens.next()?.parse().ok()?;
    (lat.is_finite() && lon.is_finite()).then_some(Location::new(lat, lon))
}

/// Text content of the first element child with the given local name
fn child_text<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(entries: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:georss="http://www.georss.org/georss">
<title>USGS Magnitude 2.5+ Earthquakes, Past Week</title>
{}
</feed>"#,
            entries
        )
    }

    #[test]
    fn test_full_entry() {
        let xml = feed(
            r#"<entry>
<title>M 5.2 - 10km SSW of Somewhere</title>
<georss:point>38.1 -122.5</georss:point>
<georss:elev>-12345</georss:elev>
<category label="Age" term="Past Hour"/>
<category label="Magnitude" term="Magnitude 5"/>
</entry>"#,
        );
        let records = parse_feed(&xml).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.location, Location::new(38.1, -122.5));
        assert_eq!(r.title.as_deref(), Some("M 5.2 - 10km SSW of Somewhere"));
        assert_eq!(r.magnitude, Some(5.2));
        assert!((r.depth_km.unwrap() - 12.3).abs() < 1e-9);
        assert_eq!(r.age.as_deref(), Some("Past Hour"));
        assert_eq!(r.region, None);
    }

    #[test]
    fn test_entries_without_point_are_dropped() {
        let xml = feed(
            r#"<entry><title>M 3.0 - no point</title></entry>
<entry><title>M 4.1 - bad point</title><georss:point>north east</georss:point></entry>
<entry><title>M 4.2 - half point</title><georss:point>12.0</georss:point></entry>
<entry><title>M 4.5 - good</title><georss:point>1.5 2.5</georss:point></entry>"#,
        );
        let records = parse_feed(&xml).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].magnitude, Some(4.5));
    }

    #[test]
    fn test_feed_title_is_not_an_entry() {
        let records = parse_feed(&feed("")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_missing_optional_fields() {
        let xml = feed(r#"<entry><georss:point>0 0</georss:point></entry>"#);
        let records = parse_feed(&xml).unwrap();
        assert_eq!(records[0].magnitude, None);
        assert_eq!(records[0].depth_km, None);
        assert_eq!(records[0].age, None);
    }

    #[test]
    fn test_bad_magnitude_fails_loudly() {
        let xml = feed(
            r#"<entry><title>Magnitude five</title><georss:point>0 0</georss:point></entry>"#,
        );
        assert!(matches!(parse_feed(&xml), Err(FeedError::Magnitude { .. })));
    }

    #[test]
    fn test_non_numeric_magnitude_fails_loudly() {
        for title in ["M inf - x", "M NaN - x", "M 1e9 - x", "M ... - x"] {
            let xml = feed(&format!(
                "<entry><title>{}</title><georss:point>0 0</georss:point></entry>",
                title
            ));
            assert!(
                matches!(parse_feed(&xml), Err(FeedError::Magnitude { .. })),
                "{}",
                title
            );
        }
    }

    #[test]
    fn test_non_finite_point_is_dropped() {
        let xml = feed(
            r#"<entry><title>M 4.0 - a</title><georss:point>NaN NaN</georss:point></entry>
<entry><title>M 4.1 - b</title><georss:point>inf 0</georss:point></entry>
<entry><title>M 4.2 - c</title><georss:point>0 -infinity</georss:point></entry>
<entry><title>M 4.3 - d</title><georss:point>10 20</georss:point></entry>"#,
        );
        let records = parse_feed(&xml).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, Location::new(10.0, 20.0));
    }

    #[test]
    fn test_bad_elevation_fails_loudly() {
        let xml = feed(
            r#"<entry><title>M 2.7 - x</title><georss:point>0 0</georss:point><georss:elev>deep</georss:elev></entry>"#,
        );
        assert!(matches!(parse_feed(&xml), Err(FeedError::Elevation { .. })));
    }

    #[test]
    fn test_not_xml() {
        assert!(matches!(parse_feed("<feed><entry>"), Err(FeedError::Xml(_))));
    }

    #[test]
    fn test_magnitude_offset() {
        assert_eq!(magnitude_from_title("M 6.1 - Tonga").unwrap(), 6.1);
        assert_eq!(magnitude_from_title("M 2.5").unwrap(), 2.5);
        assert!(magnitude_from_title("M 2").is_err());
        assert!(magnitude_from_title("").is_err());
        assert!(magnitude_from_title("M inf").is_err());
        assert!(magnitude_from_title("M NaN").is_err());
        assert_eq!(magnitude_from_title("M -0.3 - x").unwrap(), -0.0);
    }

    #[test]
    fn test_depth_truncation() {
        assert!((depth_from_elevation(12345.0) - 12.3).abs() < 1e-9);
        assert!((depth_from_elevation(-12345.0) - 12.3).abs() < 1e-9);
        assert!((depth_from_elevation(-10000.0) - 10.0).abs() < 1e-9);
        assert_eq!(depth_from_elevation(99.0), 0.0);
        assert!((depth_from_elevation(-612990.0) - 612.9).abs() < 1e-9);
    }
}
