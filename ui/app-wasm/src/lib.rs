//! SafeVoice browser client.
//!
//! Pure Rust + WASM implementation of the client-side logic: session and
//! token state, wallet connection, reaction handling, and the self-rendering
//! navbar/footer components. Modularised for extensibility: each concern
//! lives in its own module.

pub mod bridge;
pub mod connect;
pub mod dom;
pub mod fmt;
pub mod footer;
pub mod icons;
pub mod navbar;
pub mod provider;
pub mod reactions;
pub mod storage;
pub mod toast;

use std::rc::Rc;

use sv_session::SessionStore;
use wasm_bindgen::prelude::*;

use crate::storage::BrowserStorage;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init();
    Ok(())
}

/// Main initialisation sequence.
fn init() {
    // Presentational components first; they only need storage and the
    // bridged window events, never the store instance itself.
    navbar::mount();
    footer::mount();

    // Composition root: one store, observed by the DOM bridge and the
    // toast surface before the initial load announces restored state.
    let store = Rc::new(SessionStore::new(BrowserStorage));
    bridge::install(&store);
    store.on_notice(|notice| toast::show(notice)).forget();
    store.load();

    connect::bind_entry_buttons(&store);
    reactions::attach(store);

    icons::refresh();
}
