use crate::error::Result;
use crate::schema::ConversationTurn;

/// Boundary to the text-generation service.
///
/// Implementations classify failures as [`crate::StatementError::CredentialMissing`],
/// [`crate::StatementError::UpstreamAnalysis`] or [`crate::StatementError::Unknown`].
pub trait AnalysisDispatcher {
    /// Single prompt in, text out.
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Sends the complete ordered turn sequence with `system_instruction` on
    /// its own channel and returns the next assistant turn.
    fn converse(&self, system_instruction: &str, turns: &[ConversationTurn]) -> Result<String>;
}
