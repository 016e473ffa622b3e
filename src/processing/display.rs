/// Format with one decimal place, rounding exact halves away from zero.
///
/// `{:.1}` breaks exact ties towards even digits (`0.25` -> `0.2`); the panel
/// shows `0.3` for such values. Non-finite values print as `NaN`, `Infinity`
/// and `-Infinity`.
pub fn to_fixed_1(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    let quarters = magnitude * 4.0;
    let is_exact_tie = quarters.fract() == 0.0 && quarters % 2.0 == 1.0;

    let formatted = if is_exact_tie {
        format!("{:.1}", (magnitude * 10.0).ceil() / 10.0)
    } else {
        format!("{:.1}", magnitude)
    };

    if value < 0.0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Placeholder shown for values that could not be derived.
pub const MISSING: &str = "—";

pub fn format_km(value: f64) -> String {
    format!("{} km", to_fixed_1(value))
}
