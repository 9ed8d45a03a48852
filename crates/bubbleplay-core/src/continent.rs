//! Continent categories and the continent filter used by the selector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The continent a country belongs to.
///
/// The four known continents have fixed legend rows and palette slots.
/// Anything else is kept verbatim as [`Continent::Other`] and gets a color
/// on first sight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Continent {
    Europe,
    Asia,
    Americas,
    Africa,
    Other(String),
}

impl Continent {
    /// Known continents in legend and palette order.
    pub const KNOWN: [Continent; 4] = [
        Continent::Europe,
        Continent::Asia,
        Continent::Americas,
        Continent::Africa,
    ];

    /// Parse a continent name. Matching is case-insensitive; unknown names
    /// are preserved as [`Continent::Other`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "europe" => Continent::Europe,
            "asia" => Continent::Asia,
            "americas" => Continent::Americas,
            "africa" => Continent::Africa,
            _ => Continent::Other(name.trim().to_string()),
        }
    }

    /// The lowercase data name of this continent.
    pub fn as_str(&self) -> &str {
        match self {
            Continent::Europe => "europe",
            Continent::Asia => "asia",
            Continent::Americas => "americas",
            Continent::Africa => "africa",
            Continent::Other(name) => name,
        }
    }

    /// Whether this is one of the four legend continents.
    pub fn is_known(&self) -> bool {
        !matches!(self, Continent::Other(_))
    }

    /// Display name with the first letter capitalized ("europe" -> "Europe").
    pub fn capitalized(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Continent {
    fn from(name: &str) -> Self {
        Continent::parse(name)
    }
}

impl From<String> for Continent {
    fn from(name: String) -> Self {
        Continent::parse(&name)
    }
}

impl From<Continent> for String {
    fn from(continent: Continent) -> Self {
        continent.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// ContinentFilter
// ---------------------------------------------------------------------------

/// Selector value restricting which countries are rendered.
///
/// `"all"` passes every record; any other value passes only records whose
/// continent equals it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContinentFilter {
    #[default]
    All,
    Only(Continent),
}

impl ContinentFilter {
    /// Parse a selector value. `"all"` (any case) selects everything.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("all") {
            ContinentFilter::All
        } else {
            ContinentFilter::Only(Continent::parse(value))
        }
    }

    /// Whether a record on `continent` passes this filter.
    pub fn matches(&self, continent: &Continent) -> bool {
        match self {
            ContinentFilter::All => true,
            ContinentFilter::Only(only) => only == continent,
        }
    }

    /// The selector value this filter was parsed from.
    pub fn as_str(&self) -> &str {
        match self {
            ContinentFilter::All => "all",
            ContinentFilter::Only(continent) => continent.as_str(),
        }
    }
}

impl fmt::Display for ContinentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ContinentFilter {
    fn from(value: &str) -> Self {
        ContinentFilter::parse(value)
    }
}

impl From<String> for ContinentFilter {
    fn from(value: String) -> Self {
        ContinentFilter::parse(&value)
    }
}

impl From<ContinentFilter> for String {
    fn from(filter: ContinentFilter) -> Self {
        filter.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_continents_case_insensitive() {
        assert_eq!(Continent::parse("europe"), Continent::Europe);
        assert_eq!(Continent::parse("Asia"), Continent::Asia);
        assert_eq!(Continent::parse(" AMERICAS "), Continent::Americas);
        assert_eq!(Continent::parse("africa"), Continent::Africa);
    }

    #[test]
    fn unknown_continent_is_preserved() {
        let c = Continent::parse("oceania");
        assert_eq!(c, Continent::Other("oceania".to_string()));
        assert_eq!(c.as_str(), "oceania");
        assert!(!c.is_known());
    }

    #[test]
    fn capitalized_labels() {
        assert_eq!(Continent::Europe.capitalized(), "Europe");
        assert_eq!(Continent::Americas.capitalized(), "Americas");
        assert_eq!(Continent::Other(String::new()).capitalized(), "");
    }

    #[test]
    fn filter_all_matches_everything() {
        let filter = ContinentFilter::parse("all");
        assert_eq!(filter, ContinentFilter::All);
        assert!(filter.matches(&Continent::Europe));
        assert!(filter.matches(&Continent::Other("oceania".into())));
    }

    #[test]
    fn filter_only_matches_one_continent() {
        let filter = ContinentFilter::parse("asia");
        assert!(filter.matches(&Continent::Asia));
        assert!(!filter.matches(&Continent::Europe));
        assert_eq!(filter.to_string(), "asia");
    }

    #[test]
    fn serde_uses_plain_strings() {
        let json = serde_json::to_string(&Continent::Africa).unwrap();
        assert_eq!(json, "\"africa\"");
        let filter: ContinentFilter = serde_json::from_str("\"europe\"").unwrap();
        assert_eq!(filter, ContinentFilter::Only(Continent::Europe));
    }
}
