use serde::{Deserialize, Serialize};

/// One logical chat message reconstructed from the line-oriented export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Export-local calendar date, `M/D/YY`.
    pub date: String,
    /// Clock time with AM/PM marker, stored uppercased.
    pub time: String,
    /// Sender display label; absent for system lines. A message without a
    /// sender can never become a deposit.
    pub sender: Option<String>,
    /// Message body with continuation lines folded in.
    pub text: String,
}
