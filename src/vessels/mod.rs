//! Vessel traffic statistics
//!
//! Daily counts per chokepoint come from the vessel statistics service and
//! are summarised client-side into totals and a daily average.

pub mod chokepoint;
pub mod client;
pub mod summary;

pub use chokepoint::Chokepoint;
pub use client::VesselClient;
pub use summary::{DailyVesselCount, DateRange, VesselSummary, VesselTypeTotals};
