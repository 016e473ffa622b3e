pub mod chart;
pub mod display;
pub mod parse;
pub mod summary;
pub mod types;

use chart::build_chart;
use parse::parse_csv;
use summary::derive_trip_summary;

pub use parse::parse_or_zero;
pub use types::{
    ChartSeries, ChartSpec, DEFAULT_STAT_FIELDS, Endpoint, FieldStats, FormattedStats, LatLng,
    Row, StatBlock, StatField, TelemetryError, TelemetryField, TripDuration, TripSummary,
};

/// Derived views of one loaded telemetry file.
#[derive(Debug, Clone)]
pub struct ProcessedTelemetry {
    pub rows: Vec<Row>,
    pub summary: TripSummary,
    pub chart: ChartSpec,
    pub track: Vec<LatLng>,
}

/// Decode a telemetry CSV and derive everything the session page shows.
///
/// The stages run from scratch on every call:
/// 1. [`parse::parse_csv`] reads the rows in file order.
/// 2. [`summary::derive_trip_summary`] computes distance, duration and
///    per-field statistics.
/// 3. [`chart::build_chart`] normalizes each tracked field for the time chart.
/// 4. The GPS track is collected in row order for the map.
pub fn process_csv_bytes(bytes: &[u8]) -> Result<ProcessedTelemetry, TelemetryError> {
    let rows = parse_csv(bytes)?;
    process_rows(rows)
}

pub fn process_rows(rows: Vec<Row>) -> Result<ProcessedTelemetry, TelemetryError> {
    let summary =
        derive_trip_summary(&rows, &DEFAULT_STAT_FIELDS).ok_or(TelemetryError::EmptySession)?;
    let chart = build_chart(&rows, &TelemetryField::ALL);
    let track = rows.iter().map(Row::coordinates).collect();

    Ok(ProcessedTelemetry {
        rows,
        summary,
        chart,
        track,
    })
}
