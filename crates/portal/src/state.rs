use crate::wave::Wave;
use alloy_primitives::Address;

/// Whether the message form is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComposeState {
    #[default]
    Idle,
    Composing,
}

/// Everything the page renders from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub connected_account: Option<Address>,
    pub compose: ComposeState,
    pub draft_message: String,
    /// Waves in chain order, followed by waves observed live.
    pub waves: Vec<Wave>,
}

impl SessionState {
    pub fn is_connected(&self) -> bool {
        self.connected_account.is_some()
    }

    pub fn is_composing(&self) -> bool {
        self.compose == ComposeState::Composing
    }

    pub(crate) fn start_composing(&mut self) {
        self.compose = ComposeState::Composing;
    }

    /// Leaves the form and discards the draft.
    pub(crate) fn reset_compose(&mut self) {
        self.compose = ComposeState::Idle;
        self.draft_message.clear();
    }
}
