use crate::error::ComposeError;
use crate::model::Position;
use serde::{Deserialize, Serialize};

/// Executor that implies a terminal transition when a button has no explicit `next`.
pub const PASSWORD_ONBOARD_EXECUTOR: &str = "PasswordOnboardExecutor";
/// Executor inferred for forms collecting a one-time password.
pub const EMAIL_OTP_EXECUTOR: &str = "EmailOTPExecutor";

/// Tunables of the composition pipeline.
///
/// Every field has a default, so a config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposerConfig {
    /// Id of the synthetic Start node.
    pub start_step_id: String,
    /// Id of the canonical End node.
    pub end_step_id: String,
    /// Legacy literal used in `next` to mean "the end of the flow". Matched ignoring case.
    pub terminal_marker: String,
    /// Appended to an actor id to derive its outgoing handle name.
    pub next_handle_suffix: String,
    pub edge_type: String,
    pub start_position: Position,
    /// Offset of the End node from the last step.
    pub end_offset: Position,
    /// Executors whose presence on a button without `next` implies a transition to End.
    pub terminal_executors: Vec<String>,
    pub password_executor: String,
    pub otp_executor: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            start_step_id: "start".to_string(),
            end_step_id: "END".to_string(),
            terminal_marker: "END".to_string(),
            next_handle_suffix: "_NEXT".to_string(),
            edge_type: crate::model::DEFAULT_EDGE_TYPE.to_string(),
            start_position: Position { x: -300.0, y: 330.0 },
            end_offset: Position { x: 600.0, y: 200.0 },
            terminal_executors: vec![PASSWORD_ONBOARD_EXECUTOR.to_string()],
            password_executor: PASSWORD_ONBOARD_EXECUTOR.to_string(),
            otp_executor: EMAIL_OTP_EXECUTOR.to_string(),
        }
    }
}

impl ComposerConfig {
    pub fn from_json(json: &str) -> Result<Self, ComposeError> {
        serde_json::from_str(json).map_err(|e| ComposeError::JsonParse(e.to_string()))
    }

    /// The outgoing handle name of a step or component.
    pub fn handle_for(&self, actor_id: &str) -> String {
        format!("{}{}", actor_id, self.next_handle_suffix)
    }

    /// Inverse of [`handle_for`](Self::handle_for).
    pub fn actor_for_handle<'h>(&self, handle: &'h str) -> Option<&'h str> {
        handle
            .strip_suffix(self.next_handle_suffix.as_str())
            .filter(|actor| !actor.is_empty())
    }

    pub fn is_terminal_marker(&self, next: &str) -> bool {
        next.eq_ignore_ascii_case(&self.terminal_marker)
    }

    pub fn is_terminal_executor(&self, name: &str) -> bool {
        self.terminal_executors.iter().any(|e| e == name)
    }

    /// Where the End node goes when `last` is the final intermediate step.
    pub fn end_position_after(&self, last: Position) -> Position {
        Position {
            x: last.x + self.end_offset.x,
            y: last.y + self.end_offset.y,
        }
    }
}
