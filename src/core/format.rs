// Display formatting for the result panel. Non-finite values come out of
// the engine as zero-denominator sentinels and render as a dash.

const PLACEHOLDER: &str = "—";

pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let fraction = cents % 100;
    let grouped = group_thousands(whole);
    if negative {
        format!("-${grouped}.{fraction:02}")
    } else {
        format!("${grouped}.{fraction:02}")
    }
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{value:.1}%")
}

pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let negative = value < 0.0;
    let grouped = group_thousands(value.abs().round() as u128);
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_thousands(mut value: u128) -> String {
    let mut groups = Vec::new();
    loop {
        let chunk = value % 1_000;
        value /= 1_000;
        if value == 0 {
            groups.push(chunk.to_string());
            break;
        }
        groups.push(format!("{chunk:03}"));
    }
    groups.reverse();
    groups.join(",")
}
