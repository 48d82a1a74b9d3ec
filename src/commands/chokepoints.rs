//! Chokepoint listing command handler

use prettytable::{row, Table};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, SeeseaError};
use crate::vessels::Chokepoint;

/// One catalog entry as printed by `seesea chokepoints --json`
#[derive(Debug, Serialize)]
struct ChokepointEntry {
    #[serde(flatten)]
    chokepoint: Chokepoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_url: Option<String>,
}

fn catalog_entries(access_token: &str) -> Vec<ChokepointEntry> {
    Chokepoint::all()
        .iter()
        .map(|chokepoint| ChokepointEntry {
            chokepoint: *chokepoint,
            map_url: chokepoint.static_map_url(access_token),
        })
        .collect()
}

fn render_json(access_token: &str) -> Result<String> {
    serde_json::to_string_pretty(&catalog_entries(access_token))
        .map_err(|e| SeeseaError::Serialization(e).into())
}

/// Print the chokepoint catalog
///
/// With a map access token configured, every entry also carries a link to
/// a satellite snapshot.
///
/// # Errors
///
/// Returns [`SeeseaError::Serialization`] if JSON output fails.
pub fn list_chokepoints(config: &Config, json: bool) -> Result<()> {
    let access_token = config.map.access_token.as_str();

    if json {
        println!("{}", render_json(access_token)?);
        return Ok(());
    }

    let entries = catalog_entries(access_token);
    let with_maps = entries.iter().any(|e| e.map_url.is_some());

    let mut table = Table::new();
    if with_maps {
        table.add_row(row!["Id", "Name", "Longitude", "Latitude", "Zoom", "Map"]);
    } else {
        table.add_row(row!["Id", "Name", "Longitude", "Latitude", "Zoom"]);
    }
    for entry in &entries {
        let chokepoint = entry.chokepoint;
        let (longitude, latitude) = chokepoint.coordinates();
        match &entry.map_url {
            Some(url) => table.add_row(row![
                chokepoint.id(),
                chokepoint.name(),
                longitude,
                latitude,
                chokepoint.zoom(),
                url
            ]),
            None => table.add_row(row![
                chokepoint.id(),
                chokepoint.name(),
                longitude,
                latitude,
                chokepoint.zoom()
            ]),
        };
    }

    println!("\nKnown chokepoints:\n");
    table.printstd();
    println!();
    Ok(())
}
