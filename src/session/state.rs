// src/session/state.rs
use std::fmt;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No record in storage; waiting for a password.
    Setup,
    /// Record created and persisted; the recovery phrase has not been confirmed yet.
    AwaitingRecoveryKeyAck,
    /// Record loaded; waiting for a password or recovery phrase.
    Locked,
    Unlocked,
    /// Reset requested from a login screen; nothing deleted until confirmed.
    ResettingConfirm,
    /// Stored record predates dual-credential wrapping. Reset is the only way out.
    LegacyRequiresReset,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Setup => "setup",
            SessionState::AwaitingRecoveryKeyAck => "awaiting recovery key acknowledgement",
            SessionState::Locked => "locked",
            SessionState::Unlocked => "unlocked",
            SessionState::ResettingConfirm => "confirming reset",
            SessionState::LegacyRequiresReset => "legacy record requires reset",
        }
    }

    /// States a reset may be requested from.
    pub fn can_request_reset(self) -> bool {
        matches!(
            self,
            SessionState::Setup | SessionState::Locked | SessionState::LegacyRequiresReset
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
