use alloy_primitives::{Address, TxHash, U256};
use alloy_transport::TransportErrorKind;
use async_trait::async_trait;
use futures::{
    StreamExt,
    channel::mpsc::{self, UnboundedSender},
};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use waveportal::{
    ContractError, NewWaveEvent, RawWave, Subscription, WalletError, WalletProvider,
    WavePortalContract,
};

type Listener = UnboundedSender<Result<NewWaveEvent, ContractError>>;

/// How the next `wave` transactions resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SendOutcome {
    /// Included successfully.
    #[default]
    Mined,
    /// Included, but the receipt reports a revert.
    Reverted,
    /// The user declined to sign.
    Rejected,
    /// The endpoint could not be reached.
    NetworkFailure,
}

/// An in-memory portal contract.
#[derive(Debug, Default)]
pub struct MockPortal {
    waves: Mutex<Vec<RawWave>>,
    sent: Mutex<Vec<(String, u64)>>,
    listeners: Mutex<Vec<Listener>>,
    send_outcome: Mutex<SendOutcome>,
    fail_reads: AtomicBool,
    fail_subscribe: AtomicBool,
    total_reads: AtomicUsize,
}

impl MockPortal {
    pub fn new() -> Arc<Self> {
        Arc::default()
    }

    /// Creates a portal whose history holds `waves`.
    pub fn with_waves(waves: impl IntoIterator<Item = RawWave>) -> Arc<Self> {
        let portal = Self::default();
        portal.waves.lock().extend(waves);
        Arc::new(portal)
    }

    pub fn set_waves(&self, waves: impl IntoIterator<Item = RawWave>) {
        *self.waves.lock() = waves.into_iter().collect();
    }

    pub fn set_send_outcome(&self, outcome: SendOutcome) {
        *self.send_outcome.lock() = outcome;
    }

    /// Makes every read call fail with a transport error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    /// Messages and gas limits of every `wave` that was mined.
    pub fn sent(&self) -> Vec<(String, u64)> {
        self.sent.lock().clone()
    }

    /// Number of `getTotalWaves()` calls so far.
    pub fn total_reads(&self) -> usize {
        self.total_reads.load(Ordering::SeqCst)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|listener| !listener.is_closed());
        listeners.len()
    }

    /// Emits `NewWave` to every registered listener and returns how many received it.
    pub fn emit(&self, from: Address, timestamp: u64, message: &str) -> usize {
        let event =
            NewWaveEvent { from, timestamp: U256::from(timestamp), message: message.into() };
        self.deliver(|| Ok(event.clone()))
    }

    /// Emits a log that cannot be decoded.
    pub fn emit_undecodable(&self) -> usize {
        self.deliver(|| {
            Err(alloy_sol_types::Error::Other("invalid NewWave log data".into()).into())
        })
    }

    /// Ends every listener's stream, as if the node dropped the filter.
    pub fn close_listeners(&self) {
        for listener in self.listeners.lock().drain(..) {
            listener.close_channel();
        }
    }

    fn deliver(&self, event: impl Fn() -> Result<NewWaveEvent, ContractError>) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|listener| listener.unbounded_send(event()).is_ok());
        listeners.len()
    }

    fn check_reads(&self) -> Result<(), ContractError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TransportErrorKind::custom_str("connection refused").into());
        }
        Ok(())
    }
}

#[async_trait]
impl WavePortalContract for MockPortal {
    async fn total_waves(&self) -> Result<U256, ContractError> {
        self.check_reads()?;
        self.total_reads.fetch_add(1, Ordering::SeqCst);
        let total = self.waves.lock().len() + self.sent.lock().len();
        Ok(U256::from(total))
    }

    async fn all_waves(&self) -> Result<Vec<RawWave>, ContractError> {
        self.check_reads()?;
        Ok(self.waves.lock().clone())
    }

    async fn wave(&self, message: &str, gas_limit: u64) -> Result<TxHash, ContractError> {
        let outcome = *self.send_outcome.lock();
        match outcome {
            SendOutcome::Mined => {
                self.sent.lock().push((message.to_string(), gas_limit));
                Ok(TxHash::with_last_byte(self.sent.lock().len() as u8))
            }
            SendOutcome::Reverted => Err(ContractError::Reverted(TxHash::with_last_byte(0xff))),
            SendOutcome::Rejected => Err(WalletError::UserRejected.into()),
            SendOutcome::NetworkFailure => {
                Err(TransportErrorKind::custom_str("connection refused").into())
            }
        }
    }

    async fn subscribe_new_waves(&self) -> Result<Subscription, ContractError> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(TransportErrorKind::custom_str("filter not supported").into());
        }
        let (tx, rx) = mpsc::unbounded();
        self.listeners.lock().push(tx);
        trace!("mock NewWave listener registered");
        Ok(Subscription::new(rx.boxed()))
    }
}

/// An in-memory wallet provider wrapping a [`MockPortal`].
#[derive(Debug)]
pub struct MockWallet {
    portal: Arc<MockPortal>,
    /// Accounts the user already authorized.
    authorized: Mutex<Vec<Address>>,
    /// Accounts granted when the user accepts a connection prompt.
    grant: Mutex<Vec<Address>>,
    reject_requests: AtomicBool,
    fail_queries: AtomicBool,
    account_queries: AtomicUsize,
    account_requests: AtomicUsize,
}

impl MockWallet {
    pub fn new(portal: Arc<MockPortal>) -> Self {
        Self {
            portal,
            authorized: Mutex::default(),
            grant: Mutex::default(),
            reject_requests: AtomicBool::new(false),
            fail_queries: AtomicBool::new(false),
            account_queries: AtomicUsize::new(0),
            account_requests: AtomicUsize::new(0),
        }
    }

    /// Marks `accounts` as already authorized.
    pub fn with_authorized(self, accounts: impl IntoIterator<Item = Address>) -> Self {
        *self.authorized.lock() = accounts.into_iter().collect();
        self
    }

    /// Grants `accounts` when the user accepts a connection prompt.
    pub fn with_grant(self, accounts: impl IntoIterator<Item = Address>) -> Self {
        *self.grant.lock() = accounts.into_iter().collect();
        self
    }

    pub fn into_provider(self) -> Arc<dyn WalletProvider> {
        Arc::new(self)
    }

    pub fn portal(&self) -> &Arc<MockPortal> {
        &self.portal
    }

    /// Makes the user decline every connection prompt.
    pub fn reject_requests(&self, reject: bool) {
        self.reject_requests.store(reject, Ordering::SeqCst);
    }

    /// Makes every account query fail with a transport error.
    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn account_queries(&self) -> usize {
        self.account_queries.load(Ordering::SeqCst)
    }

    pub fn account_requests(&self) -> usize {
        self.account_requests.load(Ordering::SeqCst)
    }

    fn check_queries(&self) -> Result<(), WalletError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(TransportErrorKind::custom_str("connection refused").into());
        }
        Ok(())
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.account_queries.fetch_add(1, Ordering::SeqCst);
        self.check_queries()?;
        Ok(self.authorized.lock().clone())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        self.check_queries()?;
        if self.reject_requests.load(Ordering::SeqCst) {
            return Err(WalletError::UserRejected);
        }
        let granted = self.grant.lock().clone();
        *self.authorized.lock() = granted.clone();
        Ok(granted)
    }

    fn contract(&self) -> Arc<dyn WavePortalContract> {
        self.portal.clone()
    }

    async fn signer_contract(&self) -> Result<Arc<dyn WavePortalContract>, ContractError> {
        let signer = self.accounts().await?.first().copied().ok_or(ContractError::NoSigner)?;
        trace!(%signer, "mock signer bound");
        Ok(self.portal.clone())
    }
}
