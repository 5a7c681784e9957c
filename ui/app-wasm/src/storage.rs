//! `localStorage` adapters.
//!
//! The session record lives behind the [`SessionStorage`] trait so the
//! domain crate stays browser-free; the theme preference keeps the key the
//! pages have always used.

use anyhow::{Result, anyhow};
use sv_session::{SESSION_KEY, SessionStorage, UserSession};

const THEME_KEY: &str = "theme";

fn local_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .ok_or_else(|| anyhow!("no window object"))?
        .local_storage()
        .map_err(|err| anyhow!("localStorage unavailable: {err:?}"))?
        .ok_or_else(|| anyhow!("localStorage disabled"))
}

/// Session persistence over `window.localStorage`.
pub struct BrowserStorage;

impl SessionStorage for BrowserStorage {
    fn load_raw(&self) -> Result<Option<String>> {
        local_storage()?
            .get_item(SESSION_KEY)
            .map_err(|err| anyhow!("failed to read session record: {err:?}"))
    }

    fn store_raw(&self, raw: &str) -> Result<()> {
        local_storage()?
            .set_item(SESSION_KEY, raw)
            .map_err(|err| anyhow!("failed to write session record: {err:?}"))
    }

    fn clear(&self) -> Result<()> {
        local_storage()?
            .remove_item(SESSION_KEY)
            .map_err(|err| anyhow!("failed to remove session record: {err:?}"))
    }
}

/// Validated read of the persisted session, for components that live
/// independently of the store instance. Invalid records read as absent;
/// cleanup stays the store's job.
pub fn read_session() -> Option<UserSession> {
    let raw = local_storage().ok()?.get_item(SESSION_KEY).ok()??;
    UserSession::from_json(&raw).ok()
}

// ── Theme preference ──

pub fn theme() -> String {
    local_storage()
        .ok()
        .and_then(|s| s.get_item(THEME_KEY).ok().flatten())
        .unwrap_or_else(|| "light".to_string())
}

pub fn set_theme(value: &str) {
    if let Ok(storage) = local_storage() {
        let _ = storage.set_item(THEME_KEY, value);
    }
}
