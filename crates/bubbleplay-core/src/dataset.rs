//! Year-by-year country records, loaded once from JSON and immutable after.
//!
//! The input document is an array of year objects:
//!
//! ```json
//! [{ "year": 1800, "countries": [
//!     { "country": "Norway", "continent": "europe",
//!       "income": 1520, "life_exp": 32.0, "population": 868570 }
//! ]}]
//! ```
//!
//! Records without a usable `income` or `life_exp` are dropped during load
//! and never reach the update engine. A zero value counts as missing.

use std::collections::HashSet;
use std::io::Read;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::continent::{Continent, ContinentFilter};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("dataset contains no yearly snapshots")]
    Empty,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One country's figures for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRecord {
    /// Unique within a snapshot; the reconciliation key across snapshots.
    pub country: String,
    pub continent: Continent,
    /// GDP per capita in dollars.
    pub income: f64,
    /// Life expectancy in years.
    pub life_exp: f64,
    pub population: u64,
}

/// All country records for a single year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSnapshot {
    pub year: i32,
    pub countries: Vec<CountryRecord>,
}

impl YearSnapshot {
    /// Records passing `filter`, in dataset order.
    pub fn filtered<'a>(
        &'a self,
        filter: &'a ContinentFilter,
    ) -> impl Iterator<Item = &'a CountryRecord> + 'a {
        self.countries
            .iter()
            .filter(move |c| filter.matches(&c.continent))
    }

    /// Look up a record by country name.
    pub fn country(&self, name: &str) -> Option<&CountryRecord> {
        self.countries.iter().find(|c| c.country == name)
    }
}

// ---------------------------------------------------------------------------
// Raw JSON shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    year: i32,
    #[serde(default)]
    countries: Vec<RawCountry>,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    continent: Option<String>,
    #[serde(default)]
    income: Option<f64>,
    #[serde(default)]
    life_exp: Option<f64>,
    #[serde(default)]
    population: Option<f64>,
}

/// A value is usable when present, finite, and non-zero.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

impl RawCountry {
    fn into_record(self) -> Option<CountryRecord> {
        let country = self.country.filter(|name| !name.is_empty())?;
        let income = present(self.income)?;
        let life_exp = present(self.life_exp)?;
        let population = self
            .population
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| p.round() as u64)
            .unwrap_or(0);
        Some(CountryRecord {
            country,
            continent: Continent::parse(self.continent.as_deref().unwrap_or("")),
            income,
            life_exp,
            population,
        })
    }
}

impl RawSnapshot {
    /// Convert to a snapshot, returning it with the number of dropped records.
    fn into_snapshot(self) -> (YearSnapshot, usize) {
        let total = self.countries.len();
        let mut seen = HashSet::with_capacity(total);
        let mut countries = Vec::with_capacity(total);
        for raw in self.countries {
            let Some(record) = raw.into_record() else {
                continue;
            };
            if !seen.insert(record.country.clone()) {
                warn!(
                    year = self.year,
                    country = %record.country,
                    "duplicate country in snapshot, keeping first occurrence"
                );
                continue;
            }
            countries.push(record);
        }
        let dropped = total - countries.len();
        if dropped > 0 {
            warn!(year = self.year, dropped, "dropped incomplete records");
        }
        (
            YearSnapshot {
                year: self.year,
                countries,
            },
            dropped,
        )
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The ordered sequence of yearly snapshots. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    snapshots: Vec<YearSnapshot>,
}

impl Dataset {
    /// Build a dataset from already-filtered snapshots.
    pub fn new(snapshots: Vec<YearSnapshot>) -> Result<Self, DatasetError> {
        if snapshots.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { snapshots })
    }

    /// Parse a JSON document, applying the presence filter.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let raw: Vec<RawSnapshot> = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Parse JSON bytes, applying the presence filter.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DatasetError> {
        let raw: Vec<RawSnapshot> = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    /// Parse JSON from a reader, applying the presence filter.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let raw: Vec<RawSnapshot> = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: Vec<RawSnapshot>) -> Result<Self, DatasetError> {
        let mut dropped_total = 0;
        let snapshots: Vec<YearSnapshot> = raw
            .into_iter()
            .map(|r| {
                let (snapshot, dropped) = r.into_snapshot();
                dropped_total += dropped;
                snapshot
            })
            .collect();
        let dataset = Self::new(snapshots)?;
        info!(
            snapshots = dataset.len(),
            first_year = dataset.snapshots[0].year,
            dropped = dropped_total,
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Number of yearly snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; a dataset holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&YearSnapshot> {
        self.snapshots.get(index)
    }

    pub fn snapshots(&self) -> &[YearSnapshot] {
        &self.snapshots
    }

    /// Index of the snapshot for `year`, if any.
    pub fn position_of_year(&self, year: i32) -> Option<usize> {
        self.snapshots.iter().position(|s| s.year == year)
    }

    /// Years covered, in dataset order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.snapshots.iter().map(|s| s.year)
    }
}

impl Index<usize> for Dataset {
    type Output = YearSnapshot;

    fn index(&self, index: usize) -> &YearSnapshot {
        &self.snapshots[index]
    }
}
