//! Display formatting shared by the aggregator.

/// Layout of `RecentAlert::date`.
pub const ALERT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Round to a whole number (half away from zero) and group thousands with `,`.
///
/// Non-finite amounts render as `0`.
pub fn group_thousands(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }

    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
