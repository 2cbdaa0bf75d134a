//! The Wave Portal contract.
//!
//! Bindings are generated at compile time from the bundled `abi/WavePortal.json` descriptor.
//! The controller only talks to the [`WavePortalContract`] trait; [`RpcWavePortal`] implements it
//! on top of an alloy provider.

use crate::{
    error::ContractError,
    subscription::Subscription,
    wave::{NewWaveEvent, RawWave},
};
use alloy_contract::SolCallBuilder;
use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, TxHash, U256, address};
use alloy_provider::{DynProvider, Provider};
use alloy_sol_types::sol;
use async_trait::async_trait;
use futures::StreamExt;
use std::fmt;

/// Address of the deployed Wave Portal.
pub const WAVE_PORTAL_ADDRESS: Address = address!("0x1Ac65C9a079f0D19fC6D4F515D664194bbC23abD");

/// Gas limit ceiling attached to every `wave` transaction.
pub const WAVE_GAS_LIMIT: u64 = 300_000;

sol!(
    #[sol(rpc)]
    WavePortal,
    "abi/WavePortal.json"
);

/// The operations the page needs from the deployed contract.
#[async_trait]
pub trait WavePortalContract: Send + Sync {
    /// `getTotalWaves()`
    async fn total_waves(&self) -> Result<U256, ContractError>;

    /// `getAllWaves()`, in chain order.
    async fn all_waves(&self) -> Result<Vec<RawWave>, ContractError>;

    /// Sends `wave(message)` with the given gas limit and waits until the transaction is
    /// included. Fails if the receipt reports a revert.
    async fn wave(&self, message: &str, gas_limit: u64) -> Result<TxHash, ContractError>;

    /// Registers a `NewWave` listener.
    async fn subscribe_new_waves(&self) -> Result<Subscription, ContractError>;
}

/// [`WavePortalContract`] backed by JSON-RPC calls through the wallet's provider.
///
/// Without a signer the handle is read-only and [`wave`](WavePortalContract::wave) fails with
/// [`ContractError::NoSigner`]. With a signer, transactions are sent via `eth_sendTransaction`
/// from that account, leaving signing and broadcasting to the wallet.
#[derive(Clone)]
pub struct RpcWavePortal {
    contract: WavePortal::WavePortalInstance<DynProvider>,
    signer: Option<Address>,
}

impl RpcWavePortal {
    /// Binds the portal deployed at [`WAVE_PORTAL_ADDRESS`].
    pub fn new(provider: DynProvider) -> Self {
        Self::at(WAVE_PORTAL_ADDRESS, provider)
    }

    /// Binds a portal deployed at `address`.
    pub fn at(address: Address, provider: DynProvider) -> Self {
        Self { contract: WavePortal::new(address, provider), signer: None }
    }

    /// Sends transactions from `signer`.
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn address(&self) -> &Address {
        self.contract.address()
    }

    /// The `wave(message)` transaction, sent from `signer` with at most `gas_limit` gas.
    fn wave_call(
        &self,
        signer: Address,
        message: &str,
        gas_limit: u64,
    ) -> SolCallBuilder<&DynProvider, WavePortal::waveCall> {
        self.contract.wave(message.to_string()).from(signer).gas(gas_limit)
    }
}

impl fmt::Debug for RpcWavePortal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcWavePortal")
            .field("address", self.address())
            .field("signer", &self.signer)
            .finish()
    }
}

#[async_trait]
impl WavePortalContract for RpcWavePortal {
    async fn total_waves(&self) -> Result<U256, ContractError> {
        Ok(self.contract.getTotalWaves().call().await?)
    }

    async fn all_waves(&self) -> Result<Vec<RawWave>, ContractError> {
        let waves = self.contract.getAllWaves().call().await?;
        Ok(waves
            .into_iter()
            .map(|wave| RawWave {
                waver: wave.waver,
                timestamp: wave.timestamp,
                message: wave.message,
            })
            .collect())
    }

    async fn wave(&self, message: &str, gas_limit: u64) -> Result<TxHash, ContractError> {
        let signer = self.signer.ok_or(ContractError::NoSigner)?;
        let pending = self.wave_call(signer, message, gas_limit).send().await?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, "mining");

        // Dev nodes mine on submission; otherwise wait for inclusion.
        let receipt = match self.contract.provider().get_transaction_receipt(tx_hash).await? {
            Some(receipt) => receipt,
            None => pending.get_receipt().await?,
        };
        if !receipt.status() {
            return Err(ContractError::Reverted(tx_hash));
        }
        info!(%tx_hash, block = ?receipt.block_number(), "mined");
        Ok(tx_hash)
    }

    async fn subscribe_new_waves(&self) -> Result<Subscription, ContractError> {
        let poller = self.contract.NewWave_filter().watch().await?;
        debug!(address = %self.address(), "registered NewWave listener");
        let events = poller.into_stream().map(|item| {
            item.map(|(event, _log)| NewWaveEvent {
                from: event.from,
                timestamp: event.timestamp,
                message: event.message,
            })
            .map_err(ContractError::from)
        });
        Ok(Subscription::new(events.boxed()))
    }
}
