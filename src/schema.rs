use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A raw spreadsheet cell as handed over by the tabular parser.
///
/// Only the normalizer looks at cells; everything downstream works with
/// finite `f64` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Uploaded table before validation: header names plus rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.rows.push(row);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineItem {
    #[schemars(description = "Row label exactly as it appears in the statement")]
    pub name: String,
    #[schemars(description = "Value for the prior period")]
    pub prior_value: f64,
    #[schemars(description = "Value for the current period")]
    pub current_value: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, prior_value: f64, current_value: f64) -> Self {
        Self {
            name: name.into(),
            prior_value,
            current_value,
        }
    }
}

/// Normalized two-period statement. Row order is the order of the upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Statement {
    pub items: Vec<LineItem>,
}

impl Statement {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders the statement back into the three-column raw layout.
    pub fn to_raw_table(&self) -> RawTable {
        RawTable {
            columns: vec![
                "Item".to_string(),
                "Prior period".to_string(),
                "Current period".to_string(),
            ],
            rows: self
                .items
                .iter()
                .map(|item| {
                    vec![
                        Cell::Text(item.name.clone()),
                        Cell::Number(item.prior_value),
                        Cell::Number(item.current_value),
                    ]
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DerivedLineItem {
    #[serde(flatten)]
    pub item: LineItem,
    pub growth_pct: f64,
    pub prior_weight_pct: f64,
    pub current_weight_pct: f64,
}

/// The resolved "total assets" row used as the composition denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnchorTotals {
    pub row_index: usize,
    pub prior: f64,
    pub current: f64,
}

/// Current ratio for both periods. `f64::INFINITY` means the period had zero
/// current liabilities; `NaN` marks a ratio that could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquiditySnapshot {
    #[serde(with = "ratio_serde")]
    pub prior_ratio: f64,
    #[serde(with = "ratio_serde")]
    pub current_ratio: f64,
    pub resolvable: bool,
    /// Labels of the rows that could not be found.
    #[serde(default)]
    pub missing_rows: Vec<String>,
}

impl LiquiditySnapshot {
    pub fn resolved(prior_ratio: f64, current_ratio: f64) -> Self {
        Self {
            prior_ratio,
            current_ratio,
            resolvable: true,
            missing_rows: Vec::new(),
        }
    }

    pub fn unresolved(missing_rows: Vec<String>) -> Self {
        Self {
            prior_ratio: f64::NAN,
            current_ratio: f64::NAN,
            resolvable: false,
            missing_rows,
        }
    }

    /// Change from prior to current ratio, only when both sides are bounded.
    pub fn delta(&self) -> Option<f64> {
        if !self.resolvable || !self.prior_ratio.is_finite() || !self.current_ratio.is_finite() {
            return None;
        }
        Some(self.current_ratio - self.prior_ratio)
    }
}

/// JSON has no infinity or NaN, so unbounded and missing ratios are written
/// as the strings `"unbounded"` and `"not_applicable"`.
mod ratio_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const UNBOUNDED: &str = "unbounded";
    const NOT_APPLICABLE: &str = "not_applicable";

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Ratio {
        Value(f64),
        Label(String),
    }

    pub fn serialize<S: Serializer>(ratio: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = if ratio.is_nan() {
            Ratio::Label(NOT_APPLICABLE.to_string())
        } else if ratio.is_infinite() {
            Ratio::Label(UNBOUNDED.to_string())
        } else {
            Ratio::Value(*ratio)
        };
        repr.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Ratio::deserialize(deserializer)? {
            Ratio::Value(value) => Ok(value),
            Ratio::Label(label) if label == UNBOUNDED => Ok(f64::INFINITY),
            Ratio::Label(label) if label == NOT_APPLICABLE => Ok(f64::NAN),
            Ratio::Label(label) => Err(serde::de::Error::custom(format!(
                "unknown ratio label '{}'",
                label
            ))),
        }
    }
}

/// Everything derived from one successfully processed statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementAnalysis {
    pub statement: Arc<Statement>,
    pub items: Vec<DerivedLineItem>,
    pub anchor: AnchorTotals,
    pub liquidity: LiquiditySnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Set once financial context has been prepended to `content`.
    #[serde(default)]
    pub enriched: bool,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            enriched: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            enriched: false,
        }
    }
}

/// Append-only transcript owned by a single chat session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![ConversationTurn::assistant(greeting)],
        }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The committed turns followed by a turn that is about to be sent.
    pub fn with_pending(&self, pending: &ConversationTurn) -> Vec<ConversationTurn> {
        let mut turns = Vec::with_capacity(self.turns.len() + 1);
        turns.extend_from_slice(&self.turns);
        turns.push(pending.clone());
        turns
    }
}
