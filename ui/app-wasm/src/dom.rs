//! DOM helpers.
//!
//! The thin subset of document plumbing the rest of the crate shares.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

pub fn window() -> Window {
    web_sys::window().unwrap()
}

pub fn document() -> Document {
    window().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

pub fn create_element(tag: &str) -> Element {
    document().create_element(tag).unwrap()
}

/// Read a `data-*` attribute, treating an empty value as absent.
pub fn data_attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{name}"))
        .filter(|v| !v.is_empty())
}

/// Nearest ancestor (or self) of an event's target matching `selector`.
/// `None` when the event did not land inside one.
pub fn closest_from_event(event: &web_sys::Event, selector: &str) -> Option<Element> {
    let target = event.target()?;
    let el: Element = target.dyn_into().ok()?;
    el.closest(selector).ok()?
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}
