use std::collections::BTreeMap;

use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Airports the planner knows how to draw without a remote lookup.
const BUILTIN_CITIES: &[(&str, &str, f64, f64)] = &[
    ("FRA", "Frankfurt", 50.03, 8.57),
    ("LHR", "London", 51.47, -0.45),
    ("TYO", "Tokyo", 35.67, 139.65),
    ("JFK", "New York", 40.64, -73.77),
    ("BER", "Berlin", 52.36, 13.50),
    ("CDG", "Paris", 49.00, 2.55),
    ("DXB", "Dubai", 25.25, 55.36),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    #[serde(flatten)]
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// IATA/city code to coordinate lookup.
///
/// Codes are stored upper-case; lookups trim and upper-case their input.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityDirectory {
    entries: BTreeMap<String, CityEntry>,
}

impl CityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut dir = Self::new();
        for (code, name, lat, lon) in BUILTIN_CITIES {
            dir.insert(code, GeoPoint::new(*lat, *lon), Some(*name));
        }
        dir
    }

    /// Parse a `{ "CODE": { "lat": .., "lon": .., "name": .. } }` table.
    ///
    /// Coordinates are range-checked here since this is where outside data
    /// enters; projection downstream does not validate.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let parsed: BTreeMap<String, CityEntry> =
            serde_json::from_str(raw).map_err(|e| CatalogError::Corrupt(e.to_string()))?;

        let mut dir = Self::new();
        for (code, entry) in parsed {
            let location = GeoPoint::validated(entry.location.lat_deg, entry.location.lon_deg)
                .map_err(|e| CatalogError::Corrupt(format!("{code}: {e}")))?;
            dir.insert(&code, location, entry.name.as_deref());
        }
        Ok(dir)
    }

    pub fn extend(&mut self, other: CityDirectory) {
        self.entries.extend(other.entries);
    }

    pub fn insert(&mut self, code: &str, location: GeoPoint, name: Option<&str>) {
        self.entries.insert(
            normalize_code(code),
            CityEntry {
                location,
                name: name.map(str::to_string),
            },
        );
    }

    pub fn get(&self, code: &str) -> Option<GeoPoint> {
        self.entries.get(&normalize_code(code)).map(|e| e.location)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(&normalize_code(code))
    }

    /// Resolve free text to a code: three-letter input is taken as a code,
    /// anything else is matched case-insensitively against city names.
    pub fn resolve(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.len() == 3 {
            return Some(normalize_code(query));
        }
        let needle = query.to_lowercase();
        self.entries.iter().find_map(|(code, entry)| {
            entry
                .name
                .as_deref()
                .filter(|name| name.to_lowercase() == needle)
                .map(|_| code.clone())
        })
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::CityDirectory;
    use crate::CatalogError;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_table_has_the_demo_airports() {
        let dir = CityDirectory::builtin();
        assert_eq!(dir.len(), 7);
        assert_eq!(dir.get("FRA"), Some(GeoPoint::new(50.03, 8.57)));
        assert_eq!(dir.get(" jfk "), Some(GeoPoint::new(40.64, -73.77)));
        assert_eq!(dir.get("XXX"), None);
    }

    #[test]
    fn resolves_codes_and_city_names() {
        let dir = CityDirectory::builtin();
        assert_eq!(dir.resolve("dxb").as_deref(), Some("DXB"));
        assert_eq!(dir.resolve("Frankfurt").as_deref(), Some("FRA"));
        assert_eq!(dir.resolve("new york").as_deref(), Some("JFK"));
        assert_eq!(dir.resolve("Atlantis"), None);
    }

    #[test]
    fn loads_and_extends_from_json() {
        let raw = r#"{ "syd": { "lat": -33.95, "lon": 151.18, "name": "Sydney" } }"#;
        let extra = CityDirectory::from_json(raw).unwrap();
        let mut dir = CityDirectory::builtin();
        dir.extend(extra);
        assert_eq!(dir.get("SYD"), Some(GeoPoint::new(-33.95, 151.18)));
        assert_eq!(dir.resolve("sydney").as_deref(), Some("SYD"));
        assert_eq!(dir.len(), 8);
    }

    #[test]
    fn rejects_out_of_range_json_coordinates() {
        let raw = r#"{ "BAD": { "lat": 123.0, "lon": 0.0 } }"#;
        let err = CityDirectory::from_json(raw).unwrap_err();
        assert!(matches!(err, CatalogError::Corrupt(msg) if msg.starts_with("BAD")));
    }

    #[test]
    fn json_round_trip_keeps_names() {
        let dir = CityDirectory::builtin();
        let json = serde_json::to_string(&dir).unwrap();
        assert!(json.contains(r#""FRA":{"lat":50.03,"lon":8.57,"name":"Frankfurt"}"#));
        assert_eq!(CityDirectory::from_json(&json).unwrap(), dir);
    }
}
