use crate::analyze_statement;
use crate::config::{AssistantConfig, Language};
use crate::context::{overall_prompt, ContextAssembler, FinancialContext};
use crate::dispatch::AnalysisDispatcher;
use crate::error::{Result, StatementError};
use crate::liquidity::extract_liquidity;
use crate::normalizer::NormalizationCache;
use crate::prompts::{greeting, system_instruction};
use crate::schema::{
    ConversationHistory, ConversationTurn, LiquiditySnapshot, RawTable, StatementAnalysis,
};
use log::{info, warn};
use std::sync::Arc;

/// Interactive analysis session: the uploaded statement, its derived metrics
/// and the running conversation.
pub struct ChatSession {
    config: AssistantConfig,
    history: ConversationHistory,
    cache: NormalizationCache,
    analysis: Option<StatementAnalysis>,
    liquidity: Option<LiquiditySnapshot>,
}

impl ChatSession {
    pub fn new(config: AssistantConfig) -> Self {
        let history = ConversationHistory::with_greeting(greeting(config.language));
        Self {
            config,
            history,
            cache: NormalizationCache::new(),
            analysis: None,
            liquidity: None,
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn analysis(&self) -> Option<&StatementAnalysis> {
        self.analysis.as_ref()
    }

    /// Current ratio of the latest normalized upload, available even when the
    /// composition step failed.
    pub fn liquidity(&self) -> Option<&LiquiditySnapshot> {
        self.liquidity.as_ref()
    }

    pub fn normalizations(&self) -> usize {
        self.cache.normalizations()
    }

    /// Processes a newly uploaded table.
    ///
    /// A layout error leaves the session as it was. A missing anchor row drops
    /// the previous analysis, so later turns go out without context, while the
    /// new statement's liquidity snapshot is kept.
    pub fn upload(&mut self, table: &RawTable) -> Result<&StatementAnalysis> {
        let statement = self.cache.get_or_normalize(table)?;

        let unchanged = self
            .analysis
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(&current.statement, &statement));
        if unchanged {
            info!("Statement unchanged, reusing existing analysis");
            return self.analysis.as_ref().ok_or_else(|| {
                StatementError::Unknown("cached analysis disappeared".to_string())
            });
        }

        self.liquidity = Some(extract_liquidity(&statement, &self.config.labels));

        match analyze_statement(statement, &self.config.labels) {
            Ok(analysis) => Ok(&*self.analysis.insert(analysis)),
            Err(err) => {
                warn!("Statement could not be analysed: {}", err);
                self.analysis = None;
                Err(err)
            }
        }
    }

    pub fn financial_context(&self) -> Option<FinancialContext> {
        self.analysis
            .as_ref()
            .map(|analysis| FinancialContext::render(analysis, self.config.language))
    }

    /// One-shot overall assessment of the processed statement. The exchange is
    /// not recorded in the conversation history.
    pub fn request_overall_analysis<D: AnalysisDispatcher>(
        &self,
        dispatcher: &D,
    ) -> Result<String> {
        let analysis = self.analysis.as_ref().ok_or(StatementError::NoStatement)?;
        let prompt = overall_prompt(analysis, self.config.language);

        info!("Requesting overall statement analysis");
        dispatcher.generate(&prompt)
    }

    /// Sends one user message and returns the assistant reply.
    ///
    /// The outgoing turn carries the latest financial context when a statement
    /// has been processed. History is only extended after a successful reply;
    /// on failure it is left exactly as before.
    pub fn send<D: AnalysisDispatcher>(&mut self, dispatcher: &D, text: &str) -> Result<&str> {
        let context = self.financial_context();
        let pending = ContextAssembler::prepare_turn(text, context.as_ref());
        let turns = self.history.with_pending(&pending);

        info!(
            "Dispatching chat turn {} ({} turns total)",
            self.history.len() + 1,
            turns.len()
        );
        let reply = match dispatcher.converse(system_instruction(self.config.language), &turns) {
            Ok(reply) => reply,
            Err(err) => {
                warn!("Chat dispatch failed, history unchanged: {}", err);
                return Err(err);
            }
        };

        self.history.push(pending);
        self.history.push(ConversationTurn::assistant(reply));
        Ok(self
            .history
            .last()
            .map(|turn| turn.content.as_str())
            .unwrap_or_default())
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(AssistantConfig::default())
    }
}
