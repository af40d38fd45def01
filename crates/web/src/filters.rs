//! Custom Askama template filters.

use std::fmt::Display;

/// Format a price for display (e.g. "$9.99").
///
/// Usage in templates: `{{ product.price|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(value))
}

fn format_money(value: impl Display) -> String {
    format!("${value:.2}")
}
