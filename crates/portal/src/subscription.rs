//! Scoped `NewWave` listener handles.

use crate::{error::ContractError, wave::NewWaveEvent};
use futures::stream::{BoxStream, StreamExt};
use std::fmt;

/// A registered `NewWave` listener.
///
/// The listener stays registered for as long as the handle is alive. Dropping the handle, or
/// calling [`unsubscribe`](Self::unsubscribe), unregisters it; for RPC-backed contracts this stops
/// the underlying filter poller.
#[must_use = "dropping a subscription unregisters the listener"]
pub struct Subscription {
    events: BoxStream<'static, Result<NewWaveEvent, ContractError>>,
}

impl Subscription {
    /// Wraps a stream of decoded `NewWave` events.
    pub fn new(events: BoxStream<'static, Result<NewWaveEvent, ContractError>>) -> Self {
        Self { events }
    }

    /// Waits for the next event. Returns `None` once the contract stops delivering events.
    pub async fn next(&mut self) -> Option<Result<NewWaveEvent, ContractError>> {
        self.events.next().await
    }

    /// Unregisters the listener.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        trace!("unregistered NewWave listener");
    }
}
