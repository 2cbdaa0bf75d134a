//! Error types for wallet and contract interactions.

use alloy_primitives::TxHash;
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;

/// EIP-1193 error code returned when the user declines a wallet prompt.
pub const USER_REJECTED_REQUEST: i64 = 4001;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("no wallet provider detected")]
    ProviderMissing,
    #[error("user rejected the request")]
    UserRejected,
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error(transparent)]
    Transport(TransportError),
}

impl WalletError {
    /// Returns `true` if the user declined the wallet prompt.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::UserRejected)
    }
}

impl From<TransportError> for WalletError {
    fn from(err: TransportError) -> Self {
        if err.as_error_resp().is_some_and(|resp| resp.code == USER_REJECTED_REQUEST) {
            Self::UserRejected
        } else {
            Self::Transport(err)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("sending a transaction requires a signer")]
    NoSigner,
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Call(#[from] alloy_contract::Error),
    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] alloy_sol_types::Error),
}
