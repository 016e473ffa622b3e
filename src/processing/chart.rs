use crate::processing::display::to_fixed_1;
use crate::processing::types::{ChartSeries, ChartSpec, Row, TelemetryField};

/// Build one normalized series per tracked field against the literal time labels.
pub fn build_chart(rows: &[Row], fields: &[TelemetryField]) -> ChartSpec {
    let x = rows.iter().map(Row::time_label).collect();

    let series = fields
        .iter()
        .map(|&field| {
            let raw: Vec<f64> = rows.iter().map(|row| row.field(field)).collect();
            let text = raw
                .iter()
                .map(|value| format!("{} {}", to_fixed_1(*value), field.unit()))
                .collect();
            ChartSeries {
                field,
                name: field.series_name().to_string(),
                y: normalize(&raw),
                raw,
                text,
            }
        })
        .collect();

    ChartSpec { x, series }
}

/// Rescale to `[0, 1]` using the series' own min and max.
///
/// A constant series has a zero range and every output is `NaN`.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values.iter().map(|value| (value - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_extremes_to_unit_interval() {
        assert_eq!(normalize(&[10.0, 15.0, 20.0]), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn constant_series_normalizes_to_nan() {
        let normalized = normalize(&[100.0, 100.0, 100.0]);
        assert_eq!(normalized.len(), 3);
        assert!(normalized.iter().all(|value| value.is_nan()));
    }

    #[test]
    fn fields_are_normalized_independently() {
        let rows: Vec<Row> = vec![
            [("date", "2024-05-01"), ("time", "10:00:00"), ("speed", "10"), ("power", "0")]
                .into_iter()
                .collect(),
            [("date", "2024-05-01"), ("time", "10:00:01"), ("speed", "30"), ("power", "500")]
                .into_iter()
                .collect(),
            [("date", "2024-05-01"), ("time", "10:00:02"), ("speed", "20"), ("power", "1000")]
                .into_iter()
                .collect(),
        ];

        let chart = build_chart(&rows, &[TelemetryField::Speed, TelemetryField::Power]);

        assert_eq!(
            chart.x,
            vec![
                "2024-05-01 10:00:00",
                "2024-05-01 10:00:01",
                "2024-05-01 10:00:02"
            ]
        );
        assert_eq!(chart.series[0].y, vec![0.0, 1.0, 0.5]);
        assert_eq!(chart.series[1].y, vec![0.0, 0.5, 1.0]);
        assert_eq!(chart.series[0].text[1], "30.0 km/h");
        assert_eq!(chart.series[1].name, "Power (W)");
    }

    #[test]
    fn hover_text_carries_unit() {
        let rows: Vec<Row> = vec![
            [("speed", "36"), ("gps_speed", "35.25")].into_iter().collect(),
            [("speed", "12"), ("gps_speed", "11")].into_iter().collect(),
        ];

        let chart = build_chart(&rows, &[TelemetryField::Speed, TelemetryField::GpsSpeed]);

        assert_eq!(chart.series[0].text, vec!["36.0 km/h", "12.0 km/h"]);
        assert_eq!(chart.series[1].text, vec!["35.3 km/h", "11.0 km/h"]);
    }
}
