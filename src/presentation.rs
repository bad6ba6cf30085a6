//! Fixed display formatting shared by the terminal output and the
//! financial context sent to the analysis service.

use crate::config::Language;
use crate::schema::{DerivedLineItem, LiquiditySnapshot};
use serde::Serialize;

/// Rounds to an integer and groups thousands with commas: `1234567.6` →
/// `1,234,568`.
pub fn format_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && digits.chars().any(|c| c != '0') {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

struct RatioWords {
    times: &'static str,
    unbounded: &'static str,
    not_applicable: &'static str,
}

fn ratio_words(language: Language) -> RatioWords {
    match language {
        Language::English => RatioWords {
            times: "times",
            unbounded: "unbounded",
            not_applicable: "not applicable",
        },
        Language::Vietnamese => RatioWords {
            times: "lần",
            unbounded: "Vô hạn",
            not_applicable: "N/A",
        },
    }
}

/// Bare ratio value as used in the financial context: `4.00`, `unbounded`
/// or `not applicable`.
pub fn format_ratio_value(ratio: f64, resolvable: bool, language: Language) -> String {
    let words = ratio_words(language);
    if !resolvable || ratio.is_nan() {
        words.not_applicable.to_string()
    } else if ratio.is_infinite() {
        words.unbounded.to_string()
    } else {
        format!("{:.2}", ratio)
    }
}

/// Ratio for a metric display: `4.00 times`.
pub fn format_ratio(ratio: f64, resolvable: bool, language: Language) -> String {
    let value = format_ratio_value(ratio, resolvable, language);
    if resolvable && ratio.is_finite() {
        format!("{} {}", value, ratio_words(language).times)
    } else {
        value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub name: String,
    pub prior_value: String,
    pub current_value: String,
    pub growth: String,
    pub prior_weight: String,
    pub current_weight: String,
}

impl From<&DerivedLineItem> for DisplayRow {
    fn from(derived: &DerivedLineItem) -> Self {
        Self {
            name: derived.item.name.clone(),
            prior_value: format_thousands(derived.item.prior_value),
            current_value: format_thousands(derived.item.current_value),
            growth: format_percent(derived.growth_pct),
            prior_weight: format_percent(derived.prior_weight_pct),
            current_weight: format_percent(derived.current_weight_pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiquidityDisplay {
    pub prior: String,
    pub current: String,
    pub delta: Option<String>,
}

impl LiquidityDisplay {
    pub fn new(snapshot: &LiquiditySnapshot, language: Language) -> Self {
        Self {
            prior: format_ratio(snapshot.prior_ratio, snapshot.resolvable, language),
            current: format_ratio(snapshot.current_ratio, snapshot.resolvable, language),
            delta: snapshot.delta().map(|d| format!("{:+.2}", d)),
        }
    }
}

fn column_titles(language: Language) -> [&'static str; 6] {
    match language {
        Language::English => [
            "Item",
            "Prior period",
            "Current period",
            "Growth (%)",
            "Prior weight (%)",
            "Current weight (%)",
        ],
        Language::Vietnamese => [
            "Chỉ tiêu",
            "Năm trước",
            "Năm sau",
            "Tốc độ tăng trưởng (%)",
            "Tỷ trọng Năm trước (%)",
            "Tỷ trọng Năm sau (%)",
        ],
    }
}

fn table_header(language: Language) -> String {
    let titles = column_titles(language);
    format!(
        "| {} |\n|{}\n",
        titles.join(" | "),
        "---|".repeat(titles.len())
    )
}

/// Plain pipe table of the derived rows, in statement order, with values
/// rounded for display.
pub fn render_table(items: &[DerivedLineItem], language: Language) -> String {
    let mut out = table_header(language);
    for derived in items {
        let row = DisplayRow::from(derived);
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.name,
            row.prior_value,
            row.current_value,
            row.growth,
            row.prior_weight,
            row.current_weight
        ));
    }
    out
}

/// Same table for the analysis service: raw values keep full precision.
pub fn render_context_table(items: &[DerivedLineItem], language: Language) -> String {
    let mut out = table_header(language);
    for derived in items {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            derived.item.name,
            derived.item.prior_value,
            derived.item.current_value,
            format_percent(derived.growth_pct),
            format_percent(derived.prior_weight_pct),
            format_percent(derived.current_weight_pct)
        ));
    }
    out
}
