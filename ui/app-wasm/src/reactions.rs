//! Reaction controls.
//!
//! One delegated click listener at the document keeps dynamically inserted
//! posts working without per-button wiring. The backend round trip is
//! simulated; the visible count is updated optimistically.

use std::rc::Rc;

use gloo_console::{debug, warn};
use gloo_timers::future::TimeoutFuture;
use sv_session::{Notice, RewardAction, SessionStore};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom;
use crate::storage::BrowserStorage;

const REACTION_SELECTOR: &str = ".reaction-btn";
const PROCESSING_CLASS: &str = "processing";

/// Attach the global click delegation. Call once at startup.
pub fn attach(store: Rc<SessionStore<BrowserStorage>>) {
    let cb = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
        if let Some(button) = dom::closest_from_event(&event, REACTION_SELECTOR) {
            let store = store.clone();
            wasm_bindgen_futures::spawn_local(async move {
                handle_reaction(&store, button).await;
            });
        }
    }) as Box<dyn FnMut(_)>);
    dom::document()
        .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        .unwrap();
    cb.forget();
}

async fn handle_reaction(store: &SessionStore<BrowserStorage>, button: Element) {
    let ids = (
        dom::data_attr(&button, "post-id"),
        dom::data_attr(&button, "reaction"),
    );
    let (Some(post_id), Some(reaction)) = ids else {
        warn!("reaction control is missing its post id or reaction kind");
        return;
    };

    // Double-click guard for the duration of the round trip.
    if dom::has_class(&button, PROCESSING_CLASS) {
        return;
    }
    dom::add_class(&button, PROCESSING_CLASS);

    match simulate_reaction_call().await {
        Ok(()) => {
            bump_count(&button);
            if store.current().is_some() {
                store.award_tokens(
                    RewardAction::ReactionGiven.amount(),
                    RewardAction::ReactionGiven.slug(),
                );
            }
            debug!(format!("reaction {reaction} recorded for post {post_id}"));
        }
        Err(detail) => {
            warn!("reaction failed", detail);
            store.notify(Notice::error("Failed to add reaction. Please try again."));
        }
    }

    dom::remove_class(&button, PROCESSING_CLASS);
}

/// Stand-in for the backend call: 100–400 ms, with the small failure rate
/// the historical simulation used so the error path stays exercised.
async fn simulate_reaction_call() -> Result<(), &'static str> {
    let delay_ms = 100.0 + js_sys::Math::random() * 300.0;
    TimeoutFuture::new(delay_ms as u32).await;
    if js_sys::Math::random() < 0.05 {
        return Err("simulated backend rejection");
    }
    Ok(())
}

fn bump_count(button: &Element) {
    let Some(count) = button.query_selector(".reaction-count").ok().flatten() else {
        return;
    };
    let current: u64 = count
        .text_content()
        .unwrap_or_default()
        .trim()
        .parse()
        .unwrap_or(0);
    count.set_text_content(Some(&(current + 1).to_string()));
}
