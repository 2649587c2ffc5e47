//! Process-wide shared store.
//!
//! Prefer passing a [`ConfigStore`] to the code that needs it. The shared
//! instance is for callers that cannot thread one through; it is created
//! once, lives until process exit, and every access goes through its mutex.

use super::store::ConfigStore;
use std::sync::{Mutex, OnceLock, PoisonError};

static INSTANCE: OnceLock<Mutex<ConfigStore>> = OnceLock::new();

/// The shared store, created empty on first access.
pub fn instance() -> &'static Mutex<ConfigStore> {
    INSTANCE.get_or_init(|| Mutex::new(ConfigStore::new()))
}

/// Initialize the shared store with `store`.
///
/// Fails, handing `store` back, if the instance was already initialized
/// (explicitly or by an earlier [`instance`] call).
pub fn install(store: ConfigStore) -> Result<(), ConfigStore> {
    INSTANCE
        .set(Mutex::new(store))
        .map_err(|rejected| rejected.into_inner().unwrap_or_else(PoisonError::into_inner))
}
