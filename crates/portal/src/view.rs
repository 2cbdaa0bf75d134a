//! What the page shows for a given session state.

use crate::{state::SessionState, wave::Wave};

pub const HEADER: &str = "👋 Hey there!";
pub const BIO: &str = "Beep boop, I am Satoru. Bop, boop...";
pub const WAVE_BUTTON: &str = "Wave at Me";
pub const CONNECT_BUTTON: &str = "Connect Wallet";
pub const SEND_BUTTON: &str = "Send";
pub const CANCEL_BUTTON: &str = "Cancel";
pub const DRAFT_PLACEHOLDER: &str = "Write a message!";

/// The rendered page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<'a> {
    pub header: &'static str,
    pub bio: &'static str,
    /// "Wave at Me", shown while the form is closed.
    pub wave_button: bool,
    pub compose_form: Option<ComposeForm<'a>>,
    /// "Connect Wallet", shown while disconnected.
    pub connect_button: bool,
    /// One card per wave, in arrival order.
    pub cards: Vec<WaveCard>,
    pub alert: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeForm<'a> {
    pub draft: &'a str,
    pub placeholder: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveCard {
    pub address: String,
    pub time: String,
    pub message: String,
}

impl From<&Wave> for WaveCard {
    fn from(wave: &Wave) -> Self {
        Self {
            address: wave.address.to_string(),
            time: wave.formatted_time(),
            message: wave.message.clone(),
        }
    }
}

impl<'a> Page<'a> {
    pub fn new(state: &'a SessionState, alert: Option<&'static str>) -> Self {
        let compose_form = state
            .is_composing()
            .then(|| ComposeForm { draft: &state.draft_message, placeholder: DRAFT_PLACEHOLDER });
        Self {
            header: HEADER,
            bio: BIO,
            wave_button: !state.is_composing(),
            compose_form,
            connect_button: !state.is_connected(),
            cards: state.waves.iter().map(WaveCard::from).collect(),
            alert,
        }
    }
}
