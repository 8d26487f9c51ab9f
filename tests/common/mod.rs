//! Common test utilities, fixtures, and mocks shared by the integration
//! tests.

pub mod fixtures;
pub mod mocks;

use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Initialize tracing once for the whole test binary.
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}
