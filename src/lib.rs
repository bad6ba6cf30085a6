//! # Statement Insight
//!
//! Derives analytical metrics from a two-period financial statement and feeds
//! them, as conversational context, to an AI financial assistant.
//!
//! ## Core Concepts
//!
//! - **Statement**: rows of `(item, prior value, current value)` in upload order
//! - **Growth**: period-over-period change of every row, in percent
//! - **Composition weight**: each row as a share of the "total assets" anchor row
//! - **Current ratio**: current assets over current liabilities, per period
//! - **Context injection**: the derived table is prepended to each outgoing chat turn
//!
//! ## Example
//!
//! ```rust,ignore
//! use statement_insight::*;
//!
//! let table = RawTable::new(vec!["Item".into(), "Prior".into(), "Current".into()])
//!     .with_row(vec![Cell::text("TOTAL ASSETS"), 100.0.into(), 150.0.into()])
//!     .with_row(vec![Cell::text("CASH"), 20.0.into(), 40.0.into()]);
//!
//! let mut session = ChatSession::new(AssistantConfig::from_env());
//! session.upload(&table)?;
//!
//! let client = llm::GeminiClient::from_config(session.config())?;
//! let reply = session.send(&client, "How did our cash position change?")?;
//! ```

pub mod composition;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod ingestion;
pub mod liquidity;
pub mod normalizer;
pub mod presentation;
pub mod prompts;
pub mod schema;
pub mod session;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use composition::{derive_line_items, growth_pct, resolve_anchor, weight_pct};
pub use config::{AssistantConfig, CredentialSource, Language, RowLabels};
pub use context::{ContextAssembler, FinancialContext};
pub use dispatch::AnalysisDispatcher;
pub use error::{Result, StatementError};
pub use ingestion::{read_csv_file, read_csv_table};
pub use liquidity::extract_liquidity;
pub use normalizer::{normalize, NormalizationCache};
pub use schema::*;
pub use session::ChatSession;
pub use utils::*;

use log::{debug, info};
use std::sync::Arc;

/// Runs growth, composition and liquidity over a normalized statement.
///
/// Liquidity never fails; a missing anchor row fails the whole analysis with
/// [`StatementError::AnchorNotFound`].
pub fn analyze_statement(
    statement: Arc<Statement>,
    labels: &RowLabels,
) -> Result<StatementAnalysis> {
    info!("Analysing statement with {} rows", statement.len());

    let liquidity = extract_liquidity(&statement, labels);
    let (items, anchor) = derive_line_items(&statement, &labels.total_assets)?;

    debug!(
        "Derived {} rows, liquidity resolvable: {}",
        items.len(),
        liquidity.resolvable
    );

    Ok(StatementAnalysis {
        statement,
        items,
        anchor,
        liquidity,
    })
}

/// Normalizes a raw table and analyses it in one step.
pub fn process_table(table: &RawTable, labels: &RowLabels) -> Result<StatementAnalysis> {
    let statement = normalize(table)?;
    analyze_statement(Arc::new(statement), labels)
}
