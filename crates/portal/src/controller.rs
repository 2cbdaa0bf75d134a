//! The page's view-model controller.
//!
//! [`Controller`] owns the [`SessionState`] and mediates between user input, the wallet provider
//! and the portal contract. Each asynchronous operation is fault-isolated: failures are logged
//! and leave the state as it was, so one failing operation never prevents the others from
//! working.
//!
//! Operations can be awaited directly, e.g. [`Controller::connect_wallet`], or split into a
//! detached task ([`Controller::task`]) whose [`Update`] is applied later with
//! [`Controller::apply`]. The split form lets an event loop keep handling input while a wallet
//! prompt or a transaction is pending.

use crate::{
    contract::WAVE_GAS_LIMIT,
    error::{ContractError, WalletError},
    state::SessionState,
    subscription::Subscription,
    view::Page,
    wallet::WalletProvider,
    wave::{self, Wave},
};
use alloy_primitives::Address;
use futures::future::{self, BoxFuture, FutureExt};
use std::{fmt, sync::Arc};

/// The only error text ever shown to the user.
pub const INSTALL_WALLET_ALERT: &str = "Get MetaMask!";

/// An asynchronous controller operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    DetectExistingConnection,
    ConnectWallet,
    SubmitWave,
    LoadAllWaves,
    SubscribeToNewWaves,
}

/// The state change an operation resolved to.
#[derive(Debug)]
#[must_use = "updates do nothing unless applied to the controller"]
pub enum Update {
    /// The operation failed or had nothing to change.
    None,
    Account(Address),
    WaveSent,
    Waves(Vec<Wave>),
    Subscribed { epoch: u64, subscription: Subscription },
    Alert(&'static str),
}

pub struct Controller {
    wallet: Option<Arc<dyn WalletProvider>>,
    state: SessionState,
    subscription: Option<Subscription>,
    /// Incremented whenever the contract handle is rebuilt or the page unmounts, so that
    /// listeners registered for an older handle are discarded.
    epoch: u64,
    alert: Option<&'static str>,
}

impl Controller {
    /// Creates a controller with empty session state.
    pub fn new(wallet: Option<Arc<dyn WalletProvider>>) -> Self {
        Self { wallet, state: SessionState::default(), subscription: None, epoch: 0, alert: None }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// The pending blocking alert, if any.
    pub fn alert(&self) -> Option<&'static str> {
        self.alert
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// The page as it should currently be rendered.
    pub fn page(&self) -> Page<'_> {
        Page::new(&self.state, self.alert)
    }

    pub fn set_draft_message(&mut self, text: impl Into<String>) {
        self.state.draft_message = text.into();
    }

    pub fn start_composing(&mut self) {
        self.state.start_composing();
    }

    pub fn cancel_composing(&mut self) {
        self.state.reset_compose();
    }

    /// Returns the operation as a detached task.
    ///
    /// The task captures what it needs up front: `SubmitWave` sends the draft as it is now.
    pub fn task(&self, action: Action) -> BoxFuture<'static, Update> {
        let wallet = self.wallet.clone();
        match action {
            Action::DetectExistingConnection => detect_existing_connection(wallet).boxed(),
            Action::ConnectWallet => connect_wallet(wallet).boxed(),
            Action::SubmitWave => {
                submit_wave(wallet, self.state.draft_message.clone(), WAVE_GAS_LIMIT).boxed()
            }
            Action::LoadAllWaves => load_all_waves(wallet).boxed(),
            Action::SubscribeToNewWaves => subscribe_to_new_waves(wallet, self.epoch).boxed(),
        }
    }

    /// Applies the result of a task.
    pub fn apply(&mut self, update: Update) {
        match update {
            Update::None => {}
            Update::Account(account) => self.state.connected_account = Some(account),
            Update::WaveSent => self.state.reset_compose(),
            Update::Waves(waves) => self.state.waves = waves,
            Update::Subscribed { epoch, subscription } => {
                if epoch == self.epoch {
                    // Replacing a previous listener unregisters it.
                    self.subscription = Some(subscription);
                } else {
                    debug!(epoch, current = self.epoch, "discarding stale NewWave listener");
                    subscription.unsubscribe();
                }
            }
            Update::Alert(alert) => self.alert = Some(alert),
        }
    }

    /// Runs an operation to completion and applies its result.
    pub async fn run(&mut self, action: Action) {
        let update = self.task(action).await;
        self.apply(update);
    }

    /// Restores an account the wallet already authorized, without prompting.
    pub async fn detect_existing_connection(&mut self) {
        self.run(Action::DetectExistingConnection).await
    }

    /// Prompts the wallet for account access.
    pub async fn connect_wallet(&mut self) {
        self.run(Action::ConnectWallet).await
    }

    /// Sends the draft message as a wave.
    pub async fn submit_wave(&mut self) {
        self.run(Action::SubmitWave).await
    }

    /// Replaces the wave list with the contract's full history.
    pub async fn load_all_waves(&mut self) {
        self.run(Action::LoadAllWaves).await
    }

    /// Registers the `NewWave` listener, replacing any previous one.
    pub async fn subscribe_to_new_waves(&mut self) {
        self.run(Action::SubscribeToNewWaves).await
    }

    /// Waits for the next `NewWave` event and appends it to the wave list.
    ///
    /// Returns `true` if a wave was appended. Never resolves while no listener is registered.
    pub async fn next_new_wave(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return future::pending().await;
        };
        match subscription.next().await {
            Some(Ok(event)) => {
                info!(
                    from = %event.from,
                    timestamp = %event.timestamp,
                    message = %event.message,
                    "NewWave"
                );
                self.state.waves.push(event.into());
                true
            }
            Some(Err(err)) => {
                warn!(%err, "skipping undecodable NewWave event");
                false
            }
            None => {
                debug!("NewWave listener closed");
                self.subscription = None;
                false
            }
        }
    }

    /// Runs the on-load operations in order.
    pub async fn mount(&mut self) {
        self.detect_existing_connection().await;
        self.load_all_waves().await;
        self.subscribe_to_new_waves().await;
    }

    /// Tears the page down, unregistering the `NewWave` listener.
    ///
    /// In-flight operations are not aborted. A listener that registers after this point is
    /// discarded when applied.
    pub fn unmount(&mut self) {
        self.epoch += 1;
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Rebuilds the bound contract handle: drops the current listener, reloads the history and
    /// registers a fresh listener.
    pub async fn rebind(&mut self) {
        for task in self.rebind_tasks() {
            let update = task.await;
            self.apply(update);
        }
    }

    /// Drops the current listener and returns the reload and re-listen tasks of [`rebind`].
    ///
    /// Listeners from tasks started before this call are discarded when applied.
    ///
    /// [`rebind`]: Self::rebind
    pub fn rebind_tasks(&mut self) -> [BoxFuture<'static, Update>; 2] {
        self.unmount();
        [self.task(Action::LoadAllWaves), self.task(Action::SubscribeToNewWaves)]
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("has_wallet", &self.wallet.is_some())
            .field("state", &self.state)
            .field("subscription", &self.subscription)
            .field("epoch", &self.epoch)
            .field("alert", &self.alert)
            .finish()
    }
}

async fn detect_existing_connection(wallet: Option<Arc<dyn WalletProvider>>) -> Update {
    let Some(wallet) = wallet else {
        info!("make sure you have a wallet provider");
        return Update::None;
    };
    match wallet.accounts().await {
        Ok(accounts) => match accounts.first() {
            Some(&account) => {
                info!(%account, "found an authorized account");
                Update::Account(account)
            }
            None => {
                info!("no authorized account found");
                Update::None
            }
        },
        Err(err) => {
            warn!(%err, "failed to query authorized accounts");
            Update::None
        }
    }
}

async fn connect_wallet(wallet: Option<Arc<dyn WalletProvider>>) -> Update {
    let Some(wallet) = wallet else {
        warn!(err = %WalletError::ProviderMissing, "cannot connect");
        return Update::Alert(INSTALL_WALLET_ALERT);
    };
    match wallet.request_accounts().await.and_then(|accounts| {
        accounts.first().copied().ok_or(WalletError::NoAccounts)
    }) {
        Ok(account) => {
            info!(%account, "connected");
            Update::Account(account)
        }
        Err(err) if err.is_user_rejection() => {
            info!("wallet connection rejected by the user");
            Update::None
        }
        Err(err) => {
            warn!(%err, "failed to connect wallet");
            Update::None
        }
    }
}

async fn submit_wave(
    wallet: Option<Arc<dyn WalletProvider>>,
    message: String,
    gas_limit: u64,
) -> Update {
    let Some(wallet) = wallet else {
        warn!("wallet provider does not exist");
        return Update::None;
    };
    match send_wave(wallet.as_ref(), &message, gas_limit).await {
        Ok(()) => Update::WaveSent,
        Err(err) => {
            error!(%err, "failed to send wave");
            Update::None
        }
    }
}

async fn send_wave(
    wallet: &dyn WalletProvider,
    message: &str,
    gas_limit: u64,
) -> Result<(), ContractError> {
    let portal = wallet.signer_contract().await?;

    let count = portal.total_waves().await?;
    info!(%count, "retrieved total wave count");

    let tx_hash = portal.wave(message, gas_limit).await?;
    debug!(%tx_hash, "wave included");

    let count = portal.total_waves().await?;
    info!(%count, "retrieved total wave count");
    Ok(())
}

async fn load_all_waves(wallet: Option<Arc<dyn WalletProvider>>) -> Update {
    let Some(wallet) = wallet else {
        debug!("wallet provider does not exist");
        return Update::None;
    };
    match wallet.contract().all_waves().await {
        Ok(records) => {
            debug!(count = records.len(), "loaded waves");
            Update::Waves(wave::from_records(records))
        }
        Err(err) => {
            debug!(%err, "failed to load waves");
            Update::None
        }
    }
}

async fn subscribe_to_new_waves(wallet: Option<Arc<dyn WalletProvider>>, epoch: u64) -> Update {
    let Some(wallet) = wallet else {
        debug!("wallet provider does not exist");
        return Update::None;
    };
    match wallet.contract().subscribe_new_waves().await {
        Ok(subscription) => Update::Subscribed { epoch, subscription },
        Err(err) => {
            warn!(%err, "failed to register NewWave listener");
            Update::None
        }
    }
}
