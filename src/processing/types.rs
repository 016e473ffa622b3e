use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// One telemetry sample: column name to the raw string found in the CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, String>,
}

impl Row {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Raw value for `column`, or the empty string when the column is missing.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn number(&self, column: &str) -> f64 {
        crate::processing::parse::parse_or_zero(self.get(column))
    }

    pub fn field(&self, field: TelemetryField) -> f64 {
        self.number(field.column())
    }

    /// Literal `"{date} {time}"` label used for the chart axis and timestamps.
    pub fn time_label(&self) -> String {
        format!("{} {}", self.get("date"), self.get("time"))
    }

    pub fn coordinates(&self) -> LatLng {
        LatLng {
            lat: self.number("latitude"),
            lon: self.number("longitude"),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Numeric telemetry columns tracked by the summary and the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryField {
    Speed,
    GpsSpeed,
    Power,
    Current,
    Voltage,
    BatteryLevel,
    SystemTemp,
}

impl TelemetryField {
    pub const ALL: [TelemetryField; 7] = [
        TelemetryField::Speed,
        TelemetryField::GpsSpeed,
        TelemetryField::Power,
        TelemetryField::Current,
        TelemetryField::Voltage,
        TelemetryField::BatteryLevel,
        TelemetryField::SystemTemp,
    ];

    pub fn column(self) -> &'static str {
        match self {
            TelemetryField::Speed => "speed",
            TelemetryField::GpsSpeed => "gps_speed",
            TelemetryField::Power => "power",
            TelemetryField::Current => "current",
            TelemetryField::Voltage => "voltage",
            TelemetryField::BatteryLevel => "battery_level",
            TelemetryField::SystemTemp => "system_temp",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            TelemetryField::Speed | TelemetryField::GpsSpeed => "km/h",
            TelemetryField::Power => "W",
            TelemetryField::Current => "A",
            TelemetryField::Voltage => "V",
            TelemetryField::BatteryLevel => "%",
            TelemetryField::SystemTemp => "°C",
        }
    }

    /// Legend name used for the chart series.
    pub fn series_name(self) -> &'static str {
        match self {
            TelemetryField::Speed => "Speed (km/h)",
            TelemetryField::GpsSpeed => "GPS Speed (km/h)",
            TelemetryField::Power => "Power (W)",
            TelemetryField::Current => "Current (A)",
            TelemetryField::Voltage => "Voltage (V)",
            TelemetryField::BatteryLevel => "Battery (%)",
            TelemetryField::SystemTemp => "Temperature (°C)",
        }
    }
}

/// Describes how one field is aggregated and displayed in the summary panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StatField {
    pub field: TelemetryField,
    pub label: &'static str,
    pub suffix: &'static str,
    /// Multiplier applied to every value before aggregation.
    pub factor: f64,
    pub show_min: bool,
}

impl StatField {
    pub const fn new(
        field: TelemetryField,
        label: &'static str,
        suffix: &'static str,
        show_min: bool,
    ) -> Self {
        Self {
            field,
            label,
            suffix,
            factor: 1.0,
            show_min,
        }
    }
}

/// Fields shown in the summary panel, in display order.
pub const DEFAULT_STAT_FIELDS: [StatField; 7] = [
    StatField::new(TelemetryField::Speed, "SPEED", " km/h", false),
    StatField::new(TelemetryField::GpsSpeed, "GPS SPEED", " km/h", false),
    StatField::new(TelemetryField::Power, "POWER", " W", false),
    StatField::new(TelemetryField::Current, "CURRENT", " A", false),
    StatField::new(TelemetryField::Voltage, "VOLTAGE", " V", true),
    StatField::new(TelemetryField::BatteryLevel, "BATTERY", " %", true),
    StatField::new(TelemetryField::SystemTemp, "TEMPERATURE", " °C", true),
];

/// Raw aggregates for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStats {
    pub max: f64,
    pub min: f64,
    pub average: f64,
    pub median: f64,
}

/// Display-ready aggregates, one decimal place plus the unit suffix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedStats {
    pub max: String,
    pub min: String,
    pub average: String,
    pub median: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBlock {
    pub field: TelemetryField,
    pub label: String,
    pub show_min: bool,
    pub stats: FieldStats,
    pub formatted: FormattedStats,
}

/// Elapsed time between the first and last sample, without day rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripDuration {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl fmt::Display for TripDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hour {} minutes {} seconds",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// START / FINISH block of the summary panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    /// `D MMMM YYYY HH:mm`, absent when the timestamp could not be parsed.
    pub date: Option<String>,
    pub mileage_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub distance_km: f64,
    pub duration: Option<TripDuration>,
    pub start: Endpoint,
    pub finish: Endpoint,
    pub stats: Vec<StatBlock>,
}

/// One normalized line of the time chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub field: TelemetryField,
    pub name: String,
    /// Values rescaled to `[0, 1]`; `NaN` (serialized as `null`) for constant fields.
    pub y: Vec<f64>,
    pub raw: Vec<f64>,
    pub text: Vec<String>,
}

/// Everything the charting surface needs to draw one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub x: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug)]
pub enum TelemetryError {
    Csv(String),
    EmptySession,
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Csv(msg) => write!(f, "Failed to read telemetry CSV: {msg}"),
            TelemetryError::EmptySession => write!(f, "Telemetry CSV contains no data rows"),
        }
    }
}

impl std::error::Error for TelemetryError {}

impl From<csv::Error> for TelemetryError {
    fn from(err: csv::Error) -> Self {
        TelemetryError::Csv(err.to_string())
    }
}
