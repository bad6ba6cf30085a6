use crate::config::Language;
use crate::presentation::{format_ratio_value, render_context_table};
use crate::prompts::{context_headings, overall_analysis_prompt};
use crate::schema::{ConversationTurn, Role, StatementAnalysis};
use log::debug;

/// Textual summary of the latest analysis, rebuilt for every outgoing turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialContext {
    text: String,
}

impl FinancialContext {
    pub fn render(analysis: &StatementAnalysis, language: Language) -> Self {
        let headings = context_headings(language);
        let liquidity = &analysis.liquidity;

        let mut text = String::new();
        text.push_str(headings.header);
        text.push('\n');
        text.push_str(headings.table_intro);
        text.push('\n');
        text.push_str(&render_context_table(&analysis.items, language));
        text.push_str(&format!(
            "{}: {}\n",
            headings.prior_ratio,
            format_ratio_value(liquidity.prior_ratio, liquidity.resolvable, language)
        ));
        text.push_str(&format!(
            "{}: {}\n\n",
            headings.current_ratio,
            format_ratio_value(liquidity.current_ratio, liquidity.resolvable, language)
        ));
        text.push_str(headings.closing);
        text.push('\n');

        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of context blocks contained in `content`.
    pub fn occurrences_in(&self, content: &str) -> usize {
        content.matches(self.text.as_str()).count()
    }
}

/// Indicator block for the one-shot analysis: the derived table plus both
/// current ratios.
pub fn overall_prompt(analysis: &StatementAnalysis, language: Language) -> String {
    let headings = context_headings(language);
    let liquidity = &analysis.liquidity;
    let indicators = format!(
        "{}\n{}: {}\n{}: {}\n",
        render_context_table(&analysis.items, language),
        headings.prior_ratio,
        format_ratio_value(liquidity.prior_ratio, liquidity.resolvable, language),
        headings.current_ratio,
        format_ratio_value(liquidity.current_ratio, liquidity.resolvable, language),
    );
    overall_analysis_prompt(language, &indicators)
}

/// Merges financial context into outgoing user turns.
pub struct ContextAssembler;

impl ContextAssembler {
    /// Prepends `context` to a user turn that has not been enriched yet.
    /// Returns whether the turn was changed.
    pub fn enrich(turn: &mut ConversationTurn, context: &FinancialContext) -> bool {
        if turn.role != Role::User || turn.enriched {
            return false;
        }
        turn.content = format!("{}{}", context.as_str(), turn.content);
        turn.enriched = true;
        true
    }

    /// Builds the user turn that is about to be dispatched. Without a context
    /// the text goes out unchanged.
    pub fn prepare_turn(text: &str, context: Option<&FinancialContext>) -> ConversationTurn {
        let mut turn = ConversationTurn::user(text);
        if let Some(context) = context {
            ContextAssembler::enrich(&mut turn, context);
            debug!(
                "Injected {} bytes of financial context into outgoing turn",
                context.as_str().len()
            );
        }
        turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AnchorTotals, DerivedLineItem, LineItem, LiquiditySnapshot, Statement};
    use std::sync::Arc;

    fn analysis(liquidity: LiquiditySnapshot) -> StatementAnalysis {
        let items = vec![
            LineItem::new("TOTAL ASSETS", 100.0, 150.0),
            LineItem::new("CASH", 20.0, 40.0),
        ];
        StatementAnalysis {
            statement: Arc::new(Statement::new(items.clone())),
            items: items
                .into_iter()
                .map(|item| DerivedLineItem {
                    item,
                    growth_pct: 0.0,
                    prior_weight_pct: 0.0,
                    current_weight_pct: 0.0,
                })
                .collect(),
            anchor: AnchorTotals {
                row_index: 0,
                prior: 100.0,
                current: 150.0,
            },
            liquidity,
        }
    }

    #[test]
    fn test_context_contains_table_and_ratios() {
        let ctx = FinancialContext::render(
            &analysis(LiquiditySnapshot::resolved(f64::INFINITY, 4.0)),
            Language::English,
        );
        let text = ctx.as_str();

        assert!(text.starts_with("ANALYSED DATA CONTEXT:"));
        let total = text.find("| TOTAL ASSETS |").unwrap();
        let cash = text.find("| CASH |").unwrap();
        assert!(total < cash);
        assert!(text.contains("Current ratio (prior period): unbounded"));
        assert!(text.contains("Current ratio (current period): 4.00"));
    }

    #[test]
    fn test_unresolved_liquidity_renders_not_applicable() {
        let ctx = FinancialContext::render(
            &analysis(LiquiditySnapshot::unresolved(Vec::new())),
            Language::English,
        );
        assert!(ctx
            .as_str()
            .contains("Current ratio (prior period): not applicable"));
    }

    #[test]
    fn test_enrich_only_once() {
        let ctx = FinancialContext::render(
            &analysis(LiquiditySnapshot::unresolved(Vec::new())),
            Language::English,
        );
        let mut turn = ContextAssembler::prepare_turn("What about cash?", Some(&ctx));

        assert!(turn.enriched);
        assert!(turn.content.ends_with("What about cash?"));
        assert!(!ContextAssembler::enrich(&mut turn, &ctx));
        assert_eq!(ctx.occurrences_in(&turn.content), 1);
    }

    #[test]
    fn test_assistant_turns_never_enriched() {
        let ctx = FinancialContext::render(
            &analysis(LiquiditySnapshot::unresolved(Vec::new())),
            Language::English,
        );
        let mut turn = ConversationTurn::assistant("Hi");
        assert!(!ContextAssembler::enrich(&mut turn, &ctx));
        assert_eq!(turn.content, "Hi");
    }

    #[test]
    fn test_no_context_sends_text_unchanged() {
        let turn = ContextAssembler::prepare_turn("Define EBITDA", None);
        assert_eq!(turn.content, "Define EBITDA");
        assert!(!turn.enriched);
    }

    #[test]
    fn test_overall_prompt_includes_indicators() {
        let prompt = overall_prompt(
            &analysis(LiquiditySnapshot::resolved(1.5, 2.0)),
            Language::Vietnamese,
        );
        assert!(prompt.starts_with("Bạn là một chuyên gia phân tích tài chính"));
        assert!(prompt.contains("| CASH |"));
        assert!(prompt.contains("Chỉ số Thanh toán Hiện hành Năm sau: 2.00"));
    }
}
