use crate::processing::types::{Row, TelemetryError};
use csv::{ReaderBuilder, Trim};

/// Parse CSV bytes into rows keyed by the header names, in file order.
///
/// Short or long records are accepted as-is; missing columns read back as
/// empty strings and therefore as zero once parsed numerically. Cells that are
/// not valid UTF-8 are decoded lossily instead of failing the upload.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Row>, TelemetryError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|header| String::from_utf8_lossy(header).into_owned())
        .collect();
    let mut rows = Vec::new();

    for record in reader.byte_records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| (header.as_str(), String::from_utf8_lossy(cell)))
                .collect::<Row>(),
        );
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "parsed telemetry CSV");
    Ok(rows)
}

/// Parse the leading decimal number of `raw`, falling back to zero.
///
/// Mirrors a lenient "number prefix" rule: `"12.5 km"` is `12.5`, `"abc"`,
/// `""` and `"NaN"` are `0`.
pub fn parse_or_zero(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match trimmed[..end].parse::<f64>() {
        Ok(value) if !value.is_nan() => value,
        _ => 0.0,
    }
}
