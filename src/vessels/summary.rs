//! Daily vessel counts, date ranges and their aggregation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SeeseaError;

/// Date format used in query strings and records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Vessel traffic through a chokepoint on one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVesselCount {
    /// Day of the observation (`YYYY-MM-DD`)
    pub date: String,
    /// Total vessels that passed
    #[serde(default)]
    pub vessel_count: u64,
    /// Container ships
    #[serde(default)]
    pub container: u64,
    /// Dry bulk carriers
    #[serde(default)]
    pub dry_bulk: u64,
    /// General cargo ships
    #[serde(default)]
    pub general_cargo: u64,
    /// Roll-on/roll-off ships
    #[serde(default)]
    pub roro: u64,
    /// Tankers
    #[serde(default)]
    pub tanker: u64,
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start` after `end`
    ///
    /// # Errors
    ///
    /// Returns [`SeeseaError::InvalidDateRange`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SeeseaError> {
        if start > end {
            return Err(SeeseaError::InvalidDateRange(format!(
                "start date {} is after end date {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from `YYYY-MM-DD` strings
    ///
    /// # Examples
    ///
    /// ```
    /// use seesea::vessels::DateRange;
    ///
    /// let range = DateRange::parse("2026-01-01", "2026-01-31").unwrap();
    /// assert_eq!(range.days(), 31);
    /// assert!(DateRange::parse("2026-02-01", "2026-01-01").is_err());
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<Self, SeeseaError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// First day
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// `start_date`/`end_date` query parameters
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start.format(DATE_FORMAT).to_string()),
            ("end_date", self.end.format(DATE_FORMAT).to_string()),
        ]
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2026, 2, 7).unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ~ {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, SeeseaError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| SeeseaError::InvalidDateRange(format!("'{}': {}", value, e)))
}

/// Per-type totals over a range of days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VesselTypeTotals {
    /// Container ships
    pub container: u64,
    /// Dry bulk carriers
    pub dry_bulk: u64,
    /// General cargo ships
    pub general_cargo: u64,
    /// Roll-on/roll-off ships
    pub roro: u64,
    /// Tankers
    pub tanker: u64,
}

impl VesselTypeTotals {
    /// `(label, total)` pairs in display order
    pub fn labelled(&self) -> [(&'static str, u64); 5] {
        [
            ("Container", self.container),
            ("Dry bulk", self.dry_bulk),
            ("General cargo", self.general_cargo),
            ("Ro-Ro", self.roro),
            ("Tanker", self.tanker),
        ]
    }
}

/// Aggregate of the daily records returned for a range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselSummary {
    /// Number of days with data
    pub days: usize,
    /// Sum of `vessel_count`
    pub total_vessels: u64,
    /// `total_vessels / days`, rounded to one decimal
    pub average_daily: f64,
    /// Sums per vessel type
    pub by_type: VesselTypeTotals,
}

impl VesselSummary {
    /// Aggregate daily records; `None` when there are none
    ///
    /// # Examples
    ///
    /// ```
    /// use seesea::vessels::{DailyVesselCount, VesselSummary};
    ///
    /// let days = vec![
    ///     DailyVesselCount { vessel_count: 50, tanker: 10, ..Default::default() },
    ///     DailyVesselCount { vessel_count: 55, tanker: 12, ..Default::default() },
    /// ];
    /// let summary = VesselSummary::from_daily(&days).unwrap();
    /// assert_eq!(summary.total_vessels, 105);
    /// assert_eq!(summary.average_daily, 52.5);
    /// assert_eq!(summary.by_type.tanker, 22);
    /// ```
    pub fn from_daily(records: &[DailyVesselCount]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        // Totals saturate at u64::MAX.
        let mut total_vessels: u64 = 0;
        let mut by_type = VesselTypeTotals::default();
        for record in records {
            total_vessels = total_vessels.saturating_add(record.vessel_count);
            by_type.container = by_type.container.saturating_add(record.container);
            by_type.dry_bulk = by_type.dry_bulk.saturating_add(record.dry_bulk);
            by_type.general_cargo = by_type.general_cargo.saturating_add(record.general_cargo);
            by_type.roro = by_type.roro.saturating_add(record.roro);
            by_type.tanker = by_type.tanker.saturating_add(record.tanker);
        }

        let average = total_vessels as f64 / records.len() as f64;
        Some(Self {
            days: records.len(),
            total_vessels,
            average_daily: (average * 10.0).round() / 10.0,
            by_type,
        })
    }
}
