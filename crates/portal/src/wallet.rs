//! Wallet provider seam and its JSON-RPC implementation.
//!
//! A wallet provider follows the [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) request
//! model: `eth_accounts` is a silent query, `eth_requestAccounts` may prompt the user, and
//! transactions are signed and broadcast by the wallet itself via `eth_sendTransaction`.

use crate::{
    contract::{RpcWavePortal, WavePortalContract},
    error::{ContractError, WalletError},
};
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Poll interval for local dev endpoints.
pub const LOCAL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Poll interval for remote endpoints.
pub const REMOTE_POLL_INTERVAL: Duration = Duration::from_secs(7);

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the user already authorized, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Asks the user to authorize accounts.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// A read-capable handle to the portal.
    fn contract(&self) -> Arc<dyn WavePortalContract>;

    /// A transaction-capable handle to the portal, bound to the wallet's signer.
    async fn signer_contract(&self) -> Result<Arc<dyn WavePortalContract>, ContractError>;
}

/// A wallet reached over JSON-RPC.
#[derive(Clone, Debug)]
pub struct RpcWallet {
    provider: DynProvider,
}

impl RpcWallet {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    /// Connects to the wallet endpoint at `url`.
    ///
    /// `localhost:<port>` is accepted as shorthand for `http://localhost:<port>`. Filter polling
    /// uses `poll_interval` if given, otherwise a short interval for local endpoints and a longer
    /// one for remote endpoints.
    pub fn connect(url: &str, poll_interval: Option<Duration>) -> Result<Self, url::ParseError> {
        let url = parse_endpoint(url)?;
        let poll_interval = poll_interval.unwrap_or_else(|| {
            if is_local(&url) { LOCAL_POLL_INTERVAL } else { REMOTE_POLL_INTERVAL }
        });

        let provider = ProviderBuilder::new().connect_http(url);
        provider.client().set_poll_interval(poll_interval);
        Ok(Self::new(provider.erased()))
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.provider.get_accounts().await?)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.provider.raw_request("eth_requestAccounts".into(), ()).await?)
    }

    fn contract(&self) -> Arc<dyn WavePortalContract> {
        Arc::new(RpcWavePortal::new(self.provider.clone()))
    }

    async fn signer_contract(&self) -> Result<Arc<dyn WavePortalContract>, ContractError> {
        let signer = self.accounts().await?.first().copied().ok_or(ContractError::NoSigner)?;
        debug!(%signer, "bound portal to wallet signer");
        Ok(Arc::new(RpcWavePortal::new(self.provider.clone()).with_signer(signer)))
    }
}

/// Detects the wallet provider for this session.
///
/// Returns `None` when no endpoint is configured or it cannot be parsed; the page then behaves
/// as if no wallet were installed.
pub fn detect(
    url: Option<&str>,
    poll_interval: Option<Duration>,
) -> Option<Arc<dyn WalletProvider>> {
    let Some(url) = url else {
        info!("no wallet endpoint configured");
        return None;
    };
    match RpcWallet::connect(url, poll_interval) {
        Ok(wallet) => {
            info!(%url, "found wallet provider");
            Some(Arc::new(wallet))
        }
        Err(err) => {
            warn!(%url, %err, "invalid wallet endpoint");
            None
        }
    }
}

fn parse_endpoint(url: &str) -> Result<Url, url::ParseError> {
    let url = url.trim();
    if url.starts_with("localhost:") || url.starts_with("127.0.0.1:") {
        return Url::parse(&format!("http://{url}"));
    }
    Url::parse(url)
}

fn is_local(url: &Url) -> bool {
    matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"))
}
