//! Location Catalog
//!
//! Monthly irradiation profiles for the selectable sites. The built-in table
//! holds approximate typical values (kWh/m² per month), not measured data.
//! A TOML file can replace it at startup.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::yield_calc::LocationProfile;

// ===================== BUILT-IN DATASET =====================

/// Location selected when none is given
pub const DEFAULT_LOCATION: &str = "Kolkata, India";

/// (name, latitude, monthly GHI Jan..Dec)
static BUILTIN_LOCATIONS: [(&str, f64, [f64; 12]); 5] = [
    (
        "Kolkata, India",
        22.6,
        [120.0, 115.0, 140.0, 160.0, 170.0, 155.0, 150.0, 150.0, 145.0, 130.0, 110.0, 105.0],
    ),
    (
        "Delhi, India",
        28.6,
        [130.0, 135.0, 160.0, 180.0, 200.0, 190.0, 185.0, 180.0, 160.0, 140.0, 120.0, 115.0],
    ),
    (
        "Hamburg, Germany",
        53.5,
        [25.0, 45.0, 80.0, 115.0, 150.0, 165.0, 160.0, 135.0, 95.0, 60.0, 30.0, 18.0],
    ),
    (
        "Munich, Germany",
        48.1,
        [40.0, 60.0, 100.0, 135.0, 165.0, 175.0, 175.0, 150.0, 110.0, 70.0, 40.0, 30.0],
    ),
    (
        "Berlin, Germany",
        52.5,
        [30.0, 50.0, 90.0, 125.0, 155.0, 170.0, 165.0, 140.0, 100.0, 65.0, 35.0, 22.0],
    ),
];

static BUILTIN_CATALOG: OnceLock<LocationCatalog> = OnceLock::new();

// ===================== FILE FORMAT =====================

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    location: Vec<LocationEntry>,
}

#[derive(Debug, Deserialize)]
struct LocationEntry {
    name: String,
    lat: f64,
    monthly_ghi: Vec<f64>,
}

// ===================== CATALOG =====================

/// Read-only set of named irradiation profiles
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCatalog {
    profiles: Vec<LocationProfile>,
}

impl LocationCatalog {
    /// The built-in dataset, constructed on first use.
    pub fn builtin() -> &'static LocationCatalog {
        BUILTIN_CATALOG.get_or_init(|| LocationCatalog {
            profiles: BUILTIN_LOCATIONS
                .iter()
                .map(|(name, latitude, monthly)| LocationProfile {
                    name: (*name).to_string(),
                    latitude: *latitude,
                    monthly_irradiation: *monthly,
                })
                .collect(),
        })
    }

    /// Parse a catalog from TOML `[[location]]` tables.
    ///
    /// ```toml
    /// [[location]]
    /// name = "Oslo, Norway"
    /// lat = 59.9
    /// monthly_ghi = [12, 30, 70, 115, 160, 170, 165, 125, 75, 35, 14, 7]
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(s)?;
        if file.location.is_empty() {
            return Err(Error::InvalidCatalog {
                message: "no [[location]] entries found".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut profiles = Vec::with_capacity(file.location.len());
        for entry in file.location {
            if !seen.insert(entry.name.clone()) {
                return Err(Error::InvalidCatalog {
                    message: format!("duplicate location '{}'", entry.name),
                });
            }
            profiles.push(LocationProfile::new(entry.name, entry.lat, &entry.monthly_ghi)?);
        }

        Ok(Self { profiles })
    }

    /// Load a catalog file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), locations = catalog.profiles.len(), "loaded location catalog");
        Ok(catalog)
    }

    /// Resolve a location by exact name, then case-insensitively by full name
    /// or by the city part before the comma.
    pub fn get(&self, name: &str) -> Result<&LocationProfile> {
        let wanted = name.trim();

        if let Some(p) = self.profiles.iter().find(|p| p.name == wanted) {
            return Ok(p);
        }

        let lowered = wanted.to_lowercase();
        let found = self
            .profiles
            .iter()
            .find(|p| p.name.to_lowercase() == lowered)
            .or_else(|| self.profiles.iter().find(|p| city(&p.name).to_lowercase() == lowered));

        match found {
            Some(p) => {
                debug!(requested = name, resolved = %p.name, "resolved location");
                Ok(p)
            }
            None => Err(Error::UnknownLocation {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            }),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationProfile> {
        self.profiles.iter()
    }
}

fn city(name: &str) -> &str {
    name.split(',').next().unwrap_or(name).trim()
}

// ===================== TESTS =====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yield_calc::derive_irradiation;
    use std::io::Write;

    const OSLO_TOML: &str = r#"
[[location]]
name = "Oslo, Norway"
lat = 59.9
monthly_ghi = [12, 30, 70, 115, 160, 170, 165, 125, 75, 35, 14, 7]

[[location]]
name = "Madrid, Spain"
lat = 40.4
monthly_ghi = [80.5, 100.0, 150.0, 180.0, 215.0, 235.0, 250.0, 220.0, 165.0, 120.0, 85.0, 70.0]
"#;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = LocationCatalog::builtin();
        assert_eq!(catalog.names().count(), 5);
        assert_eq!(catalog.names().next(), Some(DEFAULT_LOCATION));

        let (annual, _) = derive_irradiation(catalog.get("Hamburg, Germany").unwrap());
        assert!((annual - 1078.0).abs() < 1e-9, "Hamburg annual GHI {}", annual);

        let (annual, _) = derive_irradiation(catalog.get("Delhi, India").unwrap());
        assert!((annual - 1895.0).abs() < 1e-9, "Delhi annual GHI {}", annual);
    }

    #[test]
    fn test_builtin_profiles_are_valid() {
        for p in LocationCatalog::builtin().iter() {
            let rebuilt = LocationProfile::new(p.name.clone(), p.latitude, &p.monthly_irradiation);
            assert_eq!(rebuilt.unwrap(), *p);
        }
    }

    #[test]
    fn test_lookup_variants() {
        let catalog = LocationCatalog::builtin();
        assert_eq!(catalog.get("Munich, Germany").unwrap().latitude, 48.1);
        assert_eq!(catalog.get("munich, germany").unwrap().latitude, 48.1);
        assert_eq!(catalog.get("berlin").unwrap().name, "Berlin, Germany");
        assert_eq!(catalog.get("  Kolkata ").unwrap().name, "Kolkata, India");
    }

    #[test]
    fn test_unknown_location_lists_names() {
        let err = LocationCatalog::builtin().get("Atlantis").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Atlantis"));
        assert!(msg.contains("Berlin, Germany"), "message should list names: {}", msg);
    }

    #[test]
    fn test_from_toml_str() {
        let catalog = LocationCatalog::from_toml_str(OSLO_TOML).unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, ["Oslo, Norway", "Madrid, Spain"]);

        let oslo = catalog.get("oslo").unwrap();
        assert_eq!(oslo.monthly_irradiation[0], 12.0);
        assert_eq!(catalog.get("Madrid, Spain").unwrap().monthly_irradiation[0], 80.5);
    }

    #[test]
    fn test_from_toml_rejects_bad_catalogs() {
        assert!(matches!(
            LocationCatalog::from_toml_str(""),
            Err(Error::InvalidCatalog { .. })
        ));

        let short = r#"
[[location]]
name = "Short"
lat = 10.0
monthly_ghi = [1, 2, 3]
"#;
        assert!(matches!(
            LocationCatalog::from_toml_str(short),
            Err(Error::InvalidProfile { .. })
        ));

        let duplicate = format!("{}{}", OSLO_TOML, OSLO_TOML);
        assert!(matches!(
            LocationCatalog::from_toml_str(&duplicate),
            Err(Error::InvalidCatalog { .. })
        ));

        assert!(matches!(LocationCatalog::from_toml_str("location = 3"), Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(OSLO_TOML.as_bytes()).unwrap();

        let catalog = LocationCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.iter().count(), 2);

        let missing = LocationCatalog::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
