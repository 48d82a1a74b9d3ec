//! Catalog of maritime chokepoints
//!
//! Each chokepoint is both a map focus point and the key the vessel
//! statistics service is queried with.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::SeeseaError;

/// Mapbox style the chokepoints are shown on
pub const MAP_STYLE: &str = "mapbox/satellite-streets-v12";

const STATIC_MAP_BASE: &str = "https://api.mapbox.com/styles/v1";
const STATIC_MAP_SIZE: &str = "600x400";

/// A named strait or canal tracked by SeeSea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chokepoint {
    /// Suez Canal
    #[default]
    SuezCanal,
    /// Panama Canal
    PanamaCanal,
    /// Strait of Malacca
    StraitOfMalacca,
    /// Strait of Hormuz
    StraitOfHormuz,
    /// Bab-el-Mandeb
    BabElMandeb,
    /// Bosporus Strait
    BosporusStrait,
}

impl Chokepoint {
    /// Every chokepoint, in display order
    pub fn all() -> &'static [Chokepoint] {
        &[
            Chokepoint::SuezCanal,
            Chokepoint::PanamaCanal,
            Chokepoint::StraitOfMalacca,
            Chokepoint::StraitOfHormuz,
            Chokepoint::BabElMandeb,
            Chokepoint::BosporusStrait,
        ]
    }

    /// Identifier used in API paths
    pub fn id(&self) -> &'static str {
        match self {
            Chokepoint::SuezCanal => "suez-canal",
            Chokepoint::PanamaCanal => "panama-canal",
            Chokepoint::StraitOfMalacca => "strait-of-malacca",
            Chokepoint::StraitOfHormuz => "strait-of-hormuz",
            Chokepoint::BabElMandeb => "bab-el-mandeb",
            Chokepoint::BosporusStrait => "bosporus-strait",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Chokepoint::SuezCanal => "Suez Canal",
            Chokepoint::PanamaCanal => "Panama Canal",
            Chokepoint::StraitOfMalacca => "Strait of Malacca",
            Chokepoint::StraitOfHormuz => "Strait of Hormuz",
            Chokepoint::BabElMandeb => "Bab-el-Mandeb",
            Chokepoint::BosporusStrait => "Bosporus Strait",
        }
    }

    /// Map focus as `(longitude, latitude)`
    pub fn coordinates(&self) -> (f64, f64) {
        match self {
            Chokepoint::SuezCanal => (32.35, 30.0),
            Chokepoint::PanamaCanal => (-79.91, 9.08),
            Chokepoint::StraitOfMalacca => (100.35, 2.5),
            Chokepoint::StraitOfHormuz => (56.25, 26.5),
            Chokepoint::BabElMandeb => (43.3, 12.6),
            Chokepoint::BosporusStrait => (29.05, 41.12),
        }
    }

    /// Map zoom level that frames the chokepoint
    pub fn zoom(&self) -> u8 {
        match self {
            Chokepoint::SuezCanal => 8,
            Chokepoint::PanamaCanal => 9,
            Chokepoint::StraitOfMalacca => 7,
            Chokepoint::StraitOfHormuz => 8,
            Chokepoint::BabElMandeb => 8,
            Chokepoint::BosporusStrait => 10,
        }
    }

    /// Satellite snapshot of the chokepoint from the Mapbox static images API
    ///
    /// Returns `None` when no access token is configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use seesea::vessels::Chokepoint;
    ///
    /// assert!(Chokepoint::SuezCanal.static_map_url("").is_none());
    /// let url = Chokepoint::SuezCanal.static_map_url("pk.abc").unwrap();
    /// assert!(url.contains("/static/32.35,30,8/"));
    /// assert!(url.ends_with("access_token=pk.abc"));
    /// ```
    pub fn static_map_url(&self, access_token: &str) -> Option<String> {
        let token = access_token.trim();
        if token.is_empty() {
            return None;
        }

        let (longitude, latitude) = self.coordinates();
        let mut url = url::Url::parse(&format!(
            "{}/{}/static/{},{},{}/{}",
            STATIC_MAP_BASE,
            MAP_STYLE,
            longitude,
            latitude,
            self.zoom(),
            STATIC_MAP_SIZE
        ))
        .ok()?;
        url.query_pairs_mut().append_pair("access_token", token);
        Some(url.into())
    }
}

impl fmt::Display for Chokepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chokepoint {
    type Err = SeeseaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Chokepoint::all()
            .iter()
            .copied()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| SeeseaError::UnknownChokepoint(s.to_string()))
    }
}

impl Serialize for Chokepoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let (longitude, latitude) = self.coordinates();
        let mut state = serializer.serialize_struct("Chokepoint", 5)?;
        state.serialize_field("id", self.id())?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("longitude", &longitude)?;
        state.serialize_field("latitude", &latitude)?;
        state.serialize_field("zoom", &self.zoom())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_entries() {
        assert_eq!(Chokepoint::all().len(), 6);
    }

    #[test]
    fn test_default_is_suez() {
        assert_eq!(Chokepoint::default(), Chokepoint::SuezCanal);
        assert_eq!(Chokepoint::default().coordinates(), (32.35, 30.0));
    }

    #[test]
    fn test_id_round_trips_through_from_str() {
        for chokepoint in Chokepoint::all() {
            assert_eq!(chokepoint.id().parse::<Chokepoint>().unwrap(), *chokepoint);
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            " Strait-Of-Hormuz ".parse::<Chokepoint>().unwrap(),
            Chokepoint::StraitOfHormuz
        );
    }

    #[test]
    fn test_unknown_chokepoint() {
        let err = "english-channel".parse::<Chokepoint>().unwrap_err();
        assert!(matches!(err, SeeseaError::UnknownChokepoint(ref id) if id == "english-channel"));
    }

    #[test]
    fn test_static_map_url_needs_token() {
        assert_eq!(Chokepoint::PanamaCanal.static_map_url("  "), None);

        let url = Chokepoint::PanamaCanal.static_map_url("pk.test").unwrap();
        assert_eq!(
            url,
            "https://api.mapbox.com/styles/v1/mapbox/satellite-streets-v12/static/-79.91,9.08,9/600x400?access_token=pk.test"
        );
    }

    #[test]
    fn test_serialize_includes_geometry() {
        let json = serde_json::to_value(Chokepoint::BosporusStrait).unwrap();
        assert_eq!(json["id"], "bosporus-strait");
        assert_eq!(json["zoom"], 10);
        assert_eq!(json["latitude"], 41.12);
    }
}
