//! Test helpers for the Wave Portal: in-memory wallet and contract doubles.

#![warn(unused_crate_dependencies, unreachable_pub)]

#[macro_use]
extern crate tracing;

mod mock;
pub use mock::{MockPortal, MockWallet, SendOutcome};

/// Initializes tracing for tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
