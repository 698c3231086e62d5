//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use proptest::test_runner::Config as ProptestConfig;
use wifi_qr::encoder::function_mask::FunctionMask;
use wifi_qr::encoder::placement::data_positions;
use wifi_qr::{BitMatrix, Version};

static INIT_LOGGING: Once = Once::new();

/// Install a debug-level subscriber that writes through the test harness.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Proptest config with a fixed case count.
pub fn test_proptest_config(cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

/// Flip the data modules at the given placement indices.
pub fn flip_data_modules(symbol: &BitMatrix, indices: &[usize]) -> BitMatrix {
    let version = Version::from_size(symbol.width()).expect("valid symbol size");
    let positions = data_positions(&FunctionMask::new(version));
    let mut damaged = symbol.clone();
    for &i in indices {
        let (x, y) = positions[i];
        damaged.toggle(x, y);
    }
    damaged
}
