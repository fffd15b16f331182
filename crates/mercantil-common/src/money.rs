//! Amounts travel as JSON numbers; they are rounded to cents wherever they
//! are computed or shown.

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// `format_money(1234.5, "$")` → `"$1234.50"`.
pub fn format_money(amount: f64, symbol: &str) -> String {
    let rounded = round_cents(amount);
    if rounded < 0.0 {
        format!("-{}{:.2}", symbol, -rounded)
    } else {
        format!("{}{:.2}", symbol, rounded)
    }
}
