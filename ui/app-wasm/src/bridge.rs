//! DOM event bridge.
//!
//! Mirrors store emissions onto `window` as the custom events the pages
//! (and any third-party script) have always listened for. Components that
//! must work whether or not the composition root has initialised subscribe
//! here instead of holding a store reference.

use gloo_console::warn;
use sv_session::{SessionStore, UserSession};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit};

use crate::storage::BrowserStorage;

pub const USER_EVENT: &str = "safeVoiceUserUpdate";
pub const TOKEN_EVENT: &str = "safeVoiceTokenUpdate";

/// Forward every store emission to the DOM for the lifetime of the page.
pub fn install(store: &SessionStore<BrowserStorage>) {
    store
        .on_user_change(|session| {
            let user = session
                .as_ref()
                .map(session_value)
                .unwrap_or(serde_json::Value::Null);
            dispatch(USER_EVENT, &serde_json::json!({ "currentUser": user }));
        })
        .forget();

    store
        .on_balance_change(|balance| {
            dispatch(TOKEN_EVENT, &serde_json::json!({ "newBalance": balance }));
        })
        .forget();
}

/// Attach a page-lifetime listener for one of the bridged window events.
pub fn listen(name: &'static str, handler: impl Fn() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let cb = Closure::wrap(Box::new(move |_: web_sys::Event| handler()) as Box<dyn FnMut(_)>);
    if window
        .add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())
        .is_err()
    {
        warn!("failed to attach window listener", name);
    }
    cb.forget();
}

/// The session in its persisted JSON shape, which is also the event-detail
/// shape the pages expect.
fn session_value(session: &UserSession) -> serde_json::Value {
    serde_json::from_str(&session.to_json()).unwrap_or(serde_json::Value::Null)
}

fn dispatch(name: &str, detail: &serde_json::Value) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let init = CustomEventInit::new();
    init.set_detail(&serde_wasm_bindgen::to_value(detail).unwrap_or(JsValue::NULL));
    match CustomEvent::new_with_event_init_dict(name, &init) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(err) => warn!("failed to build custom event", err),
    }
}
