//! Lenient number and length parsing
//!
//! Attribute values that do not parse become 0 instead of failing the read.

/// Recognized unit suffixes
const UNITS: [&str; 8] = ["px", "pt", "em", "ex", "pc", "cm", "mm", "in"];

/// Parse a plain number, 0 if it is not one
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            log::trace!("'{}' is not a number, using 0", text);
            0.0
        }
    }
}

/// True for values like `50%`
pub fn is_percentage(text: &str) -> bool {
    text.trim().ends_with('%')
}

/// Parse a length into pixels.
///
/// Physical units go through `pixels_per_inch`. `px`, `em` and `ex` are taken
/// as pixels unchanged. A percentage is returned as a fraction (`50%` is 0.5)
/// and the caller scales it.
pub fn parse_length(text: &str, pixels_per_inch: f64) -> f64 {
    let trimmed = text.trim();
    if let Some(value) = trimmed.strip_suffix('%') {
        return parse_number(value) * 0.01;
    }
    for unit in UNITS {
        if let Some(value) = trimmed.strip_suffix(unit) {
            let n = parse_number(value);
            return match unit {
                "in" => n * pixels_per_inch,
                "cm" => n * pixels_per_inch / 2.54,
                "mm" => n * pixels_per_inch / 25.4,
                "pt" => n * pixels_per_inch / 72.0,
                "pc" => n * pixels_per_inch / 6.0,
                _ => n,
            };
        }
    }
    parse_number(trimmed)
}

/// First entry of a whitespace or comma separated list, such as a text `x`
pub fn first_of_list(text: &str) -> &str {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .find(|s| !s.is_empty())
        .unwrap_or("")
}
