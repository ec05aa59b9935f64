//! Number formatting for prices and quantities.

/// Format a number with thousands separators and a fixed number of
/// decimal places, e.g. `12345.5` -> `"12,345.50"`.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let negative = value < 0.0;
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted, None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Money with two decimals.
pub fn format_money(value: f64) -> String {
    format_amount(value, 2)
}

/// Whole quantity.
pub fn format_int(value: i64) -> String {
    format_amount(value as f64, 0)
}
