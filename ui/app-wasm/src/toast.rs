//! Toast notification surface.
//!
//! Toasts stack in arrival order inside a fixed container created on
//! demand, slide in, and self-dismiss. Styling is inline so the surface
//! works on any page without stylesheet support.

use gloo_timers::callback::Timeout;
use sv_session::{Notice, Severity};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::dom;

const CONTAINER_ID: &str = "svToastStack";
const TOAST_LIFETIME_MS: u32 = 3_500;
const TOAST_ENTER_MS: u32 = 20;
const TOAST_EXIT_MS: u32 = 300;

/// Display one toast. Safe to call from any component at any time.
pub fn show(notice: &Notice) {
    let Some(container) = container() else {
        return;
    };

    let toast = dom::create_element("div");
    toast.set_class_name(&format!("sv-toast sv-toast--{}", class_suffix(notice.severity)));
    toast.set_text_content(Some(&notice.message));

    let style = toast.unchecked_ref::<HtmlElement>().style();
    let _ = style.set_property("background", background(notice.severity));
    let _ = style.set_property("color", "#fff");
    let _ = style.set_property("padding", "0.75rem 1rem");
    let _ = style.set_property("border-radius", "0.5rem");
    let _ = style.set_property("box-shadow", "0 4px 6px -1px rgba(0, 0, 0, 0.2)");
    let _ = style.set_property("max-width", "22rem");
    let _ = style.set_property("opacity", "0");
    let _ = style.set_property("transform", "translateX(1rem)");
    let _ = style.set_property("transition", "opacity 0.3s ease, transform 0.3s ease");

    if container.append_child(&toast).is_err() {
        return;
    }

    // Slide in once the element has a layout box.
    {
        let toast = toast.clone();
        Timeout::new(TOAST_ENTER_MS, move || {
            let style = toast.unchecked_ref::<HtmlElement>().style();
            let _ = style.set_property("opacity", "1");
            let _ = style.set_property("transform", "translateX(0)");
        })
        .forget();
    }

    // Slide out and remove after the display window.
    Timeout::new(TOAST_LIFETIME_MS, move || {
        let style = toast.unchecked_ref::<HtmlElement>().style();
        let _ = style.set_property("opacity", "0");
        let _ = style.set_property("transform", "translateX(1rem)");
        Timeout::new(TOAST_EXIT_MS, move || toast.remove()).forget();
    })
    .forget();
}

/// The stack container, created next to `<body>`'s other children on first
/// use. The column flow gives each active toast its own slot, so
/// simultaneous toasts never overlap.
fn container() -> Option<Element> {
    if let Some(existing) = dom::by_id(CONTAINER_ID) {
        return Some(existing);
    }
    let container = dom::create_element("div");
    container.set_id(CONTAINER_ID);

    let style = container.unchecked_ref::<HtmlElement>().style();
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("top", "5rem");
    let _ = style.set_property("right", "1rem");
    let _ = style.set_property("display", "flex");
    let _ = style.set_property("flex-direction", "column");
    let _ = style.set_property("gap", "0.5rem");
    let _ = style.set_property("z-index", "2100");
    let _ = style.set_property("pointer-events", "none");

    dom::document().body()?.append_child(&container).ok()?;
    Some(container)
}

fn class_suffix(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Success => "success",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

fn background(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "#3b82f6",
        Severity::Success => "#22c55e",
        Severity::Warning => "#f59e0b",
        Severity::Error => "#ef4444",
    }
}
