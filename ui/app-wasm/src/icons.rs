//! Icon-rendering interop.
//!
//! The pages ship the feather-icons script; after any subtree replacement
//! that may contain `data-feather` placeholders the library has to be asked
//! to sweep the document again. A missing library is not an error.

use std::cell::Cell;

use gloo_console::debug;
use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

thread_local! {
    static MISSING_LOGGED: Cell<bool> = const { Cell::new(false) };
}

pub fn refresh() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let feather = match Reflect::get(&window, &JsValue::from_str("feather")) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => {
            if !MISSING_LOGGED.with(|logged| logged.replace(true)) {
                debug!("feather icon library not present, skipping icon sweeps");
            }
            return;
        }
    };
    let Ok(replace) = Reflect::get(&feather, &JsValue::from_str("replace")) else {
        return;
    };
    let Ok(replace) = replace.dyn_into::<Function>() else {
        return;
    };
    if let Err(err) = replace.call0(&feather) {
        debug!("feather.replace failed", err);
    }
}
