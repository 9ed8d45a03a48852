//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::continent::Continent;
use crate::dataset::{CountryRecord, Dataset, YearSnapshot};

// ===========================================================================
// Record constructors
// ===========================================================================

pub fn country(
    name: &str,
    continent: Continent,
    income: f64,
    life_exp: f64,
    population: u64,
) -> CountryRecord {
    CountryRecord {
        country: name.to_string(),
        continent,
        income,
        life_exp,
        population,
    }
}

pub fn snapshot(year: i32, countries: Vec<CountryRecord>) -> YearSnapshot {
    YearSnapshot { year, countries }
}

/// Build a dataset, panicking if `snapshots` is empty.
pub fn dataset(snapshots: Vec<YearSnapshot>) -> Dataset {
    Dataset::new(snapshots).expect("test dataset must not be empty")
}

// ===========================================================================
// Fixtures
// ===========================================================================

/// Years 1800-1802, each with Norway (europe) and China (asia).
pub fn three_year_dataset() -> Dataset {
    dataset(vec![
        snapshot(
            1800,
            vec![
                country("Norway", Continent::Europe, 1520.0, 32.0, 868_570),
                country("China", Continent::Asia, 985.0, 32.0, 321_675_013),
            ],
        ),
        snapshot(
            1801,
            vec![
                country("Norway", Continent::Europe, 1560.0, 33.0, 870_000),
                country("China", Continent::Asia, 990.0, 32.5, 324_000_000),
            ],
        ),
        snapshot(
            1802,
            vec![
                country("Norway", Continent::Europe, 1600.0, 34.0, 872_000),
                country("China", Continent::Asia, 995.0, 33.0, 326_000_000),
            ],
        ),
    ])
}

/// `years` consecutive snapshots from 1800, each with `countries` synthetic
/// countries spread across the four known continents.
pub fn synthetic_dataset(years: usize, countries: usize) -> Dataset {
    let snapshots = (0..years)
        .map(|y| {
            let records = (0..countries)
                .map(|c| {
                    let growth = 1.0 + y as f64 * 0.01;
                    country(
                        &format!("country-{c}"),
                        Continent::KNOWN[c % Continent::KNOWN.len()].clone(),
                        (200.0 + c as f64 * 700.0) * growth,
                        (25.0 + (c % 50) as f64).min(89.0) + y as f64 * 0.1,
                        10_000 + c as u64 * 5_000_000,
                    )
                })
                .collect();
            snapshot(1800 + y as i32, records)
        })
        .collect();
    dataset(snapshots)
}

/// Serialize snapshots to the dataset JSON format.
pub fn to_json(snapshots: &[YearSnapshot]) -> String {
    serde_json::to_string(snapshots).expect("snapshots serialize")
}
