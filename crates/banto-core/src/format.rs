//! Display formatting helpers
//!
//! The analysis engine does not format numbers itself; callers inject pure
//! `f64 -> String` functions so the rendering locale stays a presentation
//! concern. The defaults here match the product's yen formatting.

/// Formatting functions injected into the analyst
#[derive(Clone, Copy)]
pub struct Formatters {
    pub currency: fn(f64) -> String,
    pub percent: fn(f64) -> String,
}

impl Default for Formatters {
    fn default() -> Self {
        Self {
            currency: format_yen,
            percent: format_percent,
        }
    }
}

impl std::fmt::Debug for Formatters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatters").finish_non_exhaustive()
    }
}

/// Format an amount as yen with thousands separators, e.g. `¥1,234,567`.
/// Amounts are rounded to whole yen.
pub fn format_yen(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = amount.abs().round() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-¥{}", grouped)
    } else {
        format!("¥{}", grouped)
    }
}

/// Format a ratio already expressed in percent with one decimal, e.g. `12.3%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
