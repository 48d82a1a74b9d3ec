//! Vessel statistics command handler

use std::time::Duration;

use prettytable::{row, Table};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, SeeseaError};
use crate::vessels::summary::DATE_FORMAT;
use crate::vessels::{Chokepoint, DateRange, VesselClient, VesselSummary};

/// Arguments of the `vessels` command
#[derive(Debug, Clone, Default)]
pub struct VesselArgs {
    /// Chokepoint id; falls back to the configured default
    pub chokepoint: Option<String>,
    /// First day (`YYYY-MM-DD`)
    pub start: Option<String>,
    /// Last day (`YYYY-MM-DD`)
    pub end: Option<String>,
    /// Emit JSON instead of a table
    pub json: bool,
}

/// JSON shape printed with `--json`
#[derive(Debug, Serialize)]
struct VesselReport<'a> {
    chokepoint: Chokepoint,
    start_date: String,
    end_date: String,
    summary: Option<&'a VesselSummary>,
}

/// Resolve the chokepoint and range a `vessels` invocation refers to
///
/// # Errors
///
/// Returns [`SeeseaError::UnknownChokepoint`] or
/// [`SeeseaError::InvalidDateRange`] for bad input.
pub fn resolve_query(config: &Config, args: &VesselArgs) -> Result<(Chokepoint, DateRange)> {
    let chokepoint: Chokepoint = args
        .chokepoint
        .as_deref()
        .unwrap_or(config.map.default_chokepoint.as_str())
        .parse()?;

    let defaults = DateRange::default();
    let start = match &args.start {
        Some(start) => start.clone(),
        None => defaults.start().format(DATE_FORMAT).to_string(),
    };
    let end = match &args.end {
        Some(end) => end.clone(),
        None => defaults.end().format(DATE_FORMAT).to_string(),
    };

    Ok((chokepoint, DateRange::parse(&start, &end)?))
}

/// Fetch and print vessel statistics
///
/// # Errors
///
/// Returns an error for invalid input or a failing vessel API.
pub async fn run_vessels(config: &Config, args: VesselArgs) -> Result<()> {
    let (chokepoint, range) = resolve_query(config, &args)?;
    let client = VesselClient::new(
        &config.api.vessel_url,
        Duration::from_secs(config.api.connect_timeout_seconds),
    )?;

    let records = client.fetch_daily(chokepoint, &range).await?;
    let summary = VesselSummary::from_daily(&records);

    if args.json {
        println!("{}", render_json(chokepoint, &range, summary.as_ref())?);
    } else {
        print_summary_table(chokepoint, &range, summary.as_ref());
    }
    Ok(())
}

fn render_json(
    chokepoint: Chokepoint,
    range: &DateRange,
    summary: Option<&VesselSummary>,
) -> Result<String> {
    let [(_, start_date), (_, end_date)] = range.query_pairs();
    let report = VesselReport {
        chokepoint,
        start_date,
        end_date,
        summary,
    };
    serde_json::to_string_pretty(&report).map_err(|e| SeeseaError::Serialization(e).into())
}

fn print_summary_table(chokepoint: Chokepoint, range: &DateRange, summary: Option<&VesselSummary>) {
    println!("\n{} ({})", chokepoint.name(), range);

    let Some(summary) = summary else {
        println!("No data for this date range\n");
        return;
    };

    let mut table = Table::new();
    table.add_row(row!["Metric", "Value"]);
    table.add_row(row!["Days with data", summary.days]);
    table.add_row(row!["Total vessels", summary.total_vessels]);
    table.add_row(row!["Average per day", format!("{:.1}", summary.average_daily)]);
    for (label, total) in summary.by_type.labelled() {
        table.add_row(row![label, total]);
    }

    println!();
    table.printstd();
    println!();
}
