use crate::processing::display::to_fixed_1;
use crate::processing::parse::parse_or_zero;
use crate::processing::types::{
    Endpoint, FieldStats, FormattedStats, Row, StatBlock, StatField, TripDuration, TripSummary,
};
use chrono::NaiveDateTime;

const DATE_LAYOUTS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y", "%m/%d/%Y"];
const TIME_LAYOUTS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Derive the summary panel from the full, chronologically ordered session.
///
/// Returns `None` for an empty session since there is no first or last row.
pub fn derive_trip_summary(rows: &[Row], fields: &[StatField]) -> Option<TripSummary> {
    let (first, last) = (rows.first()?, rows.last()?);

    let start_time = parse_timestamp(&first.time_label());
    let end_time = parse_timestamp(&last.time_label());
    let duration = match (start_time, end_time) {
        (Some(start), Some(end)) => Some(split_duration((end - start).num_seconds())),
        _ => None,
    };

    let start_odometer = first.number("totaldistance");
    let end_odometer = last.number("totaldistance");

    let stats = fields
        .iter()
        .map(|stat_field| {
            let stats = field_stats(rows, stat_field.field.column(), stat_field.factor);
            StatBlock {
                field: stat_field.field,
                label: stat_field.label.to_string(),
                show_min: stat_field.show_min,
                formatted: format_stats(&stats, stat_field.suffix),
                stats,
            }
        })
        .collect();

    Some(TripSummary {
        distance_km: trip_distance_km(start_odometer, end_odometer),
        duration,
        start: Endpoint {
            date: start_time.map(format_endpoint_date),
            mileage_km: start_odometer / 1000.0,
        },
        finish: Endpoint {
            date: end_time.map(format_endpoint_date),
            mileage_km: end_odometer / 1000.0,
        },
        stats,
    })
}

/// Odometer delta in km. A decreasing odometer yields a negative distance.
pub fn trip_distance_km(start_meters: f64, end_meters: f64) -> f64 {
    (end_meters - start_meters) / 1000.0
}

/// Split signed elapsed seconds into hours/minutes/seconds without a day component.
pub fn split_duration(total_seconds: i64) -> TripDuration {
    TripDuration {
        hours: total_seconds / 3600,
        minutes: (total_seconds % 3600) / 60,
        seconds: total_seconds % 60,
    }
}

/// Parse a `"{date} {time}"` label using the layouts seen in rider exports.
pub fn parse_timestamp(label: &str) -> Option<NaiveDateTime> {
    let label = label.trim();
    DATE_LAYOUTS.iter().find_map(|date| {
        TIME_LAYOUTS.iter().find_map(|time| {
            NaiveDateTime::parse_from_str(label, &format!("{date} {time}")).ok()
        })
    })
}

fn format_endpoint_date(timestamp: NaiveDateTime) -> String {
    timestamp.format("%-d %B %Y %H:%M").to_string()
}

/// Aggregate one column with parse-or-zero semantics and an optional scale factor.
///
/// Unparsable cells are counted as `0`, so they pull the average and median down.
pub fn field_stats(rows: &[Row], column: &str, factor: f64) -> FieldStats {
    let mut values: Vec<f64> = rows
        .iter()
        .map(|row| parse_or_zero(row.get(column)) * factor)
        .filter(|value| !value.is_nan())
        .collect();
    values.sort_by(f64::total_cmp);

    let average = values.iter().sum::<f64>() / values.len() as f64;

    FieldStats {
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        average,
        median: median(&values),
    }
}

/// Median of an ascending slice: middle element for odd counts, mean of the
/// two central elements for even counts. `NaN` when empty.
pub fn median(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    if len == 0 {
        return f64::NAN;
    }
    if len % 2 == 1 {
        sorted[len / 2]
    } else {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2.0
    }
}

fn format_stats(stats: &FieldStats, suffix: &str) -> FormattedStats {
    FormattedStats {
        max: format!("{}{suffix}", to_fixed_1(stats.max)),
        min: format!("{}{suffix}", to_fixed_1(stats.min)),
        average: format!("{}{suffix}", to_fixed_1(stats.average)),
        median: format!("{}{suffix}", to_fixed_1(stats.median)),
    }
}
