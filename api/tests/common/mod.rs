//! Shared setup for the HTTP tests

#![allow(dead_code)]

use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use tr_api::AppState;
use tr_core::{
    CodecConfig, InMemoryRevocationSet, InMemoryTokenStore, ManualClock, RotationManager,
    RotationManagerConfig, TokenCodec,
};

pub type TestManager = RotationManager<InMemoryTokenStore, InMemoryRevocationSet>;
pub type TestState = AppState<InMemoryTokenStore, InMemoryRevocationSet>;

pub const TEST_KEY: &[u8] = b"api-test-signing-key-of-at-least-32-bytes";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

pub struct TestContext {
    pub clock: Arc<ManualClock>,
    pub manager: Arc<TestManager>,
    pub state: web::Data<TestState>,
}

pub fn test_context() -> TestContext {
    let clock = Arc::new(ManualClock::new(start_time()));
    let manager = Arc::new(RotationManager::new(
        Arc::new(InMemoryTokenStore::new()),
        Arc::new(InMemoryRevocationSet::new()),
        TokenCodec::new(CodecConfig::new(TEST_KEY)),
        clock.clone(),
        RotationManagerConfig::default(),
    ));
    let state = web::Data::new(AppState::new(manager.clone()));
    TestContext {
        clock,
        manager,
        state,
    }
}
