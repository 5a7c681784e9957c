//! Injected wallet provider adapter.
//!
//! Wraps whatever wallet extension put a provider object on
//! `window.ethereum` behind the [`WalletProvider`] contract: an
//! EIP-1193-style `request` call, `on(event, handler)` subscriptions, and
//! optional `disconnect`/`close` teardown. Everything is reached through
//! `Reflect` so the page works with any conforming extension.

use std::rc::Rc;

use async_trait::async_trait;
use gloo_console::{debug, warn};
use js_sys::{Array, Function, Object, Promise, Reflect};
use sv_connector::{ProviderError, ProviderEvent, WalletProvider};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// EIP-1193 "user rejected the request" error code.
const USER_REJECTED_CODE: f64 = 4001.0;

pub struct InjectedProvider {
    inner: Object,
}

impl InjectedProvider {
    /// Locate the provider a wallet extension injected, if any.
    pub fn detect() -> Option<InjectedProvider> {
        let window = web_sys::window()?;
        let value = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(InjectedProvider {
            inner: value.unchecked_into(),
        })
    }

    fn request(&self, method: &str) -> Result<Promise, JsValue> {
        let request: Function =
            Reflect::get(&self.inner, &JsValue::from_str("request"))?.dyn_into()?;
        let args = Object::new();
        Reflect::set(
            &args,
            &JsValue::from_str("method"),
            &JsValue::from_str(method),
        )?;
        request.call1(&self.inner, &args)?.dyn_into()
    }

    fn attach(
        &self,
        name: &str,
        handler: Rc<dyn Fn(ProviderEvent)>,
        translate: impl Fn(JsValue) -> ProviderEvent + 'static,
    ) {
        let on = match Reflect::get(&self.inner, &JsValue::from_str("on")) {
            Ok(value) => match value.dyn_into::<Function>() {
                Ok(function) => function,
                Err(_) => {
                    warn!("injected provider exposes no event interface");
                    return;
                }
            },
            Err(_) => return,
        };

        let cb = Closure::wrap(Box::new(move |value: JsValue| {
            handler(translate(value));
        }) as Box<dyn FnMut(JsValue)>);
        if let Err(err) = on.call2(
            &self.inner,
            &JsValue::from_str(name),
            cb.as_ref().unchecked_ref(),
        ) {
            warn!("failed to subscribe provider event", name, err);
        }
        cb.forget();
    }
}

fn string_list(value: &JsValue) -> Vec<String> {
    Array::from(value)
        .iter()
        .filter_map(|entry| entry.as_string())
        .collect()
}

fn map_rpc_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64());
    if code == Some(USER_REJECTED_CODE) {
        return ProviderError::Rejected;
    }
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    ProviderError::Other(message)
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let promise = self
            .request("eth_requestAccounts")
            .map_err(|err| ProviderError::Other(format!("provider request failed: {err:?}")))?;
        let accounts = JsFuture::from(promise).await.map_err(map_rpc_error)?;
        Ok(string_list(&accounts))
    }

    fn on_event(&self, handler: Rc<dyn Fn(ProviderEvent)>) {
        self.attach("accountsChanged", handler.clone(), |value| {
            ProviderEvent::AccountsChanged(string_list(&value))
        });
        self.attach("chainChanged", handler.clone(), |value| {
            ProviderEvent::ChainChanged(value.as_string().unwrap_or_default())
        });
        self.attach("disconnect", handler, |_| ProviderEvent::Disconnected);
    }

    fn teardown(&self) {
        // Protocol-bridge providers expose disconnect/close; the plain
        // injected provider has nothing to tear down. Failures are logged
        // and swallowed: teardown must never look like a connection error.
        for method in ["disconnect", "close"] {
            let Ok(value) = Reflect::get(&self.inner, &JsValue::from_str(method)) else {
                continue;
            };
            let Ok(function) = value.dyn_into::<Function>() else {
                continue;
            };
            match function.call0(&self.inner) {
                Ok(result) => {
                    if let Ok(promise) = result.dyn_into::<Promise>() {
                        wasm_bindgen_futures::spawn_local(async move {
                            if let Err(err) = JsFuture::from(promise).await {
                                debug!("provider teardown rejected", err);
                            }
                        });
                    }
                    return;
                }
                Err(err) => debug!("provider teardown failed", method, err),
            }
        }
    }
}
