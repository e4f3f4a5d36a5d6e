use rust_decimal::Decimal;

/// Formats a price for printed documents: symbol, a space, two decimals.
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        format!("{:.2}", amount)
    } else {
        format!("{} {:.2}", symbol, amount)
    }
}
