//! # waveportal
//!
//! View-model and chain bindings for the Wave Portal page: connect a wallet, send a short
//! message ("wave") to the portal contract, and follow every wave ever recorded.
//!
//! All persistent state lives in the contract. This crate holds the session state
//! ([`SessionState`]), the [`Controller`] that keeps it in sync with the chain, and the two seams
//! it talks through: [`WalletProvider`] and [`WavePortalContract`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod contract;
pub mod controller;
pub mod error;
pub mod state;
pub mod subscription;
pub mod view;
pub mod wallet;
pub mod wave;

pub use contract::{RpcWavePortal, WAVE_GAS_LIMIT, WAVE_PORTAL_ADDRESS, WavePortalContract};
pub use controller::{Action, Controller, INSTALL_WALLET_ALERT, Update};
pub use error::{ContractError, WalletError};
pub use state::{ComposeState, SessionState};
pub use subscription::Subscription;
pub use view::Page;
pub use wallet::{RpcWallet, WalletProvider};
pub use wave::{NewWaveEvent, RawWave, Wave};
