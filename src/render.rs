// Text formatting for the rendering shells
//
// Currency and percentage formatting belongs on the rendering side of
// the boundary; the pipeline tables only carry numbers. Shared here by
// the TUI and the plain-text report.

/// "$1,234,568" - rounded to whole dollars with thousands separators.
pub fn dollars(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let mut digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::new();
    while digits.len() > 3 {
        let tail = digits.split_off(digits.len() - 3);
        grouped = if grouped.is_empty() {
            tail
        } else {
            format!("{tail},{grouped}")
        };
    }
    grouped = if grouped.is_empty() {
        digits
    } else {
        format!("{digits},{grouped}")
    };

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// "$1,234,567.89" - to the cent, for summary scalars.
pub fn dollars_cents(amount: f64) -> String {
    let total_cents = (amount.abs() * 100.0).round() as u64;
    let whole = dollars((total_cents / 100) as f64);
    let cents = total_cents % 100;
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{whole}.{cents:02}")
}

/// Missing dollar amounts render as a placeholder.
pub fn dollars_opt(amount: Option<f64>) -> String {
    match amount {
        Some(v) => dollars(v),
        None => "—".to_string(),
    }
}

/// "12.34%" or the missing placeholder.
pub fn percent_opt(share: Option<f64>) -> String {
    match share {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "—".to_string(),
    }
}
