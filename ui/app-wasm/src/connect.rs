//! Entry-page wiring.
//!
//! Binds the connect / anonymous-entry buttons when the current page has
//! them. The presence of those buttons is what marks the entry context:
//! only there does a successful connection (or anonymous entry) navigate on
//! to the feed.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_console::warn;
use gloo_timers::callback::Timeout;
use sv_connector::{ConnectError, Connector};
use sv_session::{Notice, SessionStore};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::dom;
use crate::provider::InjectedProvider;
use crate::storage::BrowserStorage;

const CONNECT_BTN_ID: &str = "connectWalletBtn";
const ANONYMOUS_BTN_ID: &str = "enterAnonymousBtn";
const FEED_URL: &str = "./feed.html";
/// Long enough to read the success toast before navigation.
const REDIRECT_DELAY_MS: u32 = 1_800;

pub type AppConnector = Connector<InjectedProvider, BrowserStorage>;

pub fn bind_entry_buttons(store: &Rc<SessionStore<BrowserStorage>>) {
    if let Some(button) = dom::by_id(CONNECT_BTN_ID) {
        // One connector for the page, created on first use so a late-loading
        // wallet extension is still picked up.
        let slot: Rc<RefCell<Option<Rc<AppConnector>>>> = Rc::new(RefCell::new(None));
        let store = store.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let store = store.clone();
            let slot = slot.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let connector = {
                    let mut slot = slot.borrow_mut();
                    if slot.is_none() {
                        match InjectedProvider::detect() {
                            Some(provider) => {
                                *slot = Some(Connector::new(provider, store.clone()));
                            }
                            None => {
                                store.notify(Notice::error(
                                    "No wallet extension found. Install one to connect.",
                                ));
                                return;
                            }
                        }
                    }
                    slot.as_ref().cloned()
                };
                if let Some(connector) = connector {
                    connect_flow(&connector, &store, true).await;
                }
            });
        }) as Box<dyn FnMut(_)>);
        button
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }

    if let Some(button) = dom::by_id(ANONYMOUS_BTN_ID) {
        let store = store.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            store.enter_anonymous();
            schedule_redirect();
        }) as Box<dyn FnMut(_)>);
        button
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

/// Run one connection attempt and translate the outcome for the user.
/// Success copy comes from the store; failures map onto toast severities
/// here (cancellation is a warning, not a fault).
pub async fn connect_flow(
    connector: &Rc<AppConnector>,
    store: &SessionStore<BrowserStorage>,
    entry_context: bool,
) {
    match connector.connect().await {
        Ok(_) => {
            if entry_context {
                schedule_redirect();
            }
        }
        Err(ConnectError::Busy) => {
            store.notify(Notice::info("A connection attempt is already in progress."));
        }
        Err(ConnectError::Rejected) => {
            store.notify(Notice::warning("Wallet connection was cancelled."));
        }
        Err(ConnectError::Unavailable) => {
            store.notify(Notice::error("No wallet available in this browser."));
        }
        Err(ConnectError::Provider(detail)) => {
            warn!("wallet connection failed", detail);
            store.notify(Notice::error(
                "Wallet connection failed. Please try again.",
            ));
        }
    }
}

fn schedule_redirect() {
    Timeout::new(REDIRECT_DELAY_MS, || {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(FEED_URL);
        }
    })
    .forget();
}
