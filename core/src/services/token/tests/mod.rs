//! Tests for the token lifecycle services

mod codec_tests;

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use crate::repositories::{InMemoryRevocationSet, InMemoryTokenStore};
use crate::services::token::{
    CodecConfig, ManualClock, RotationManager, RotationManagerConfig, TokenCodec,
};

pub(super) const TEST_KEY: &[u8] = b"test-signing-key-with-at-least-32-bytes!";

pub(super) type TestManager = RotationManager<InMemoryTokenStore, InMemoryRevocationSet>;

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub(super) fn test_codec() -> TokenCodec {
    TokenCodec::new(CodecConfig::new(TEST_KEY))
}

/// Manager over in-memory stores driven by a manual clock
pub(super) struct Fixture {
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryTokenStore>,
    pub revocations: Arc<InMemoryRevocationSet>,
    pub manager: Arc<TestManager>,
}

pub(super) fn fixture() -> Fixture {
    fixture_with(RotationManagerConfig::default())
}

pub(super) fn fixture_with(config: RotationManagerConfig) -> Fixture {
    let clock = Arc::new(ManualClock::new(base_time()));
    let store = Arc::new(InMemoryTokenStore::new());
    let revocations = Arc::new(InMemoryRevocationSet::new());
    let manager = Arc::new(RotationManager::new(
        store.clone(),
        revocations.clone(),
        test_codec(),
        clock.clone(),
        config,
    ));
    Fixture {
        clock,
        store,
        revocations,
        manager,
    }
}
