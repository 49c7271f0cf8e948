use std::path::PathBuf;

/// Data sources and log destination.
/// Every field can be overridden from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// GeoRSS/Atom earthquake feed (`QUAKE_MAP_FEED`)
    pub feed_path: PathBuf,
    /// City point features (`QUAKE_MAP_CITIES`)
    pub cities_path: PathBuf,
    /// Country polygon features (`QUAKE_MAP_COUNTRIES`)
    pub countries_path: PathBuf,
    /// Log file; stderr belongs to the terminal UI (`QUAKE_MAP_LOG`)
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_path: PathBuf::from("data/2.5_week.atom"),
            cities_path: PathBuf::from("data/city-data.json"),
            countries_path: PathBuf::from("data/countries.geo.json"),
            log_file: PathBuf::from("quake-map.log"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults, overriding any key the lookup returns a non-empty value for
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let fields = [
            ("QUAKE_MAP_FEED", &mut config.feed_path),
            ("QUAKE_MAP_CITIES", &mut config.cities_path),
            ("QUAKE_MAP_COUNTRIES", &mut config.countries_path),
            ("QUAKE_MAP_LOG", &mut config.log_file),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = PathBuf::from(value);
            }
        }
        config
    }
}
