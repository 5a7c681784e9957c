//! Site navbar component.
//!
//! Renders into the `custom-navbar` host element and keeps itself in sync
//! through the bridged window events plus its own storage reads, so it
//! works whether it comes alive before or after the composition root.

use std::cell::Cell;
use std::rc::Rc;

use sv_session::{Identity, UserSession, short_address};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::{bridge, dom, fmt, icons, storage};

const HOST_SELECTOR: &str = "custom-navbar";

pub fn mount() {
    let Some(host) = dom::query(HOST_SELECTOR) else {
        return;
    };

    apply_saved_theme();

    let navbar = Rc::new(Navbar {
        host,
        menu_open: Cell::new(false),
    });
    navbar.render();
    navbar.clone().bind();

    {
        let navbar = navbar.clone();
        bridge::listen(bridge::USER_EVENT, move || navbar.render());
    }
    {
        let navbar = navbar.clone();
        bridge::listen(bridge::TOKEN_EVENT, move || navbar.render());
    }
}

/// Put the persisted theme preference on the document root before first
/// paint of the component.
fn apply_saved_theme() {
    if storage::theme() == "dark" {
        if let Some(root) = dom::document().document_element() {
            dom::add_class(&root, "dark");
        }
    }
}

struct Navbar {
    host: Element,
    menu_open: Cell<bool>,
}

impl Navbar {
    /// Always re-render from the latest persisted state; events may arrive
    /// re-entrantly and carry no ordering guarantee.
    fn render(&self) {
        let session = storage::read_session();
        let balance = session.as_ref().map(|s| s.token_balance).unwrap_or(0);
        let identity_html = session
            .as_ref()
            .map(|s| {
                format!(
                    r#"<span class="identity-label">{}</span>"#,
                    identity_label(s)
                )
            })
            .unwrap_or_default();

        let theme_icon = if storage::theme() == "dark" { "sun" } else { "moon" };
        let (menu_icon, links_class) = if self.menu_open.get() {
            ("x", "nav-links mobile-open")
        } else {
            ("menu", "nav-links")
        };

        self.host.set_inner_html(&format!(
            r#"
            <nav>
                <div class="nav-content">
                    <a href="./index.html" class="logo">
                        Safe<span class="logo-accent">Voice</span>
                    </a>

                    <ul class="{links_class}">
                        <li><a href="./feed.html"><i data-feather="home"></i> Feed</a></li>
                        <li><a href="./create.html"><i data-feather="edit-3"></i> Create</a></li>
                        <li><a href="./memorials.html"><i data-feather="heart"></i> Memorials</a></li>
                        <li><a href="./resources.html"><i data-feather="life-buoy"></i> Resources</a></li>
                        <li><a href="./profile.html"><i data-feather="user"></i> Profile</a></li>
                    </ul>

                    <div class="nav-actions">
                        {identity_html}
                        <div class="token-display">
                            <i data-feather="award"></i>
                            <span class="token-balance">{balance}</span>
                        </div>

                        <button class="theme-toggle" id="themeToggle">
                            <i data-feather="{theme_icon}"></i>
                        </button>

                        <button class="mobile-menu-btn" id="mobileMenuBtn">
                            <i data-feather="{menu_icon}"></i>
                        </button>
                    </div>
                </div>
            </nav>
            "#,
            balance = fmt::format_count(balance),
        ));

        icons::refresh();
    }

    fn bind(self: Rc<Self>) {
        let navbar = self.clone();
        let cb = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
            if dom::closest_from_event(&event, "#themeToggle").is_some() {
                navbar.toggle_theme();
            } else if dom::closest_from_event(&event, "#mobileMenuBtn").is_some() {
                navbar.menu_open.set(!navbar.menu_open.get());
                navbar.render();
            }
        }) as Box<dyn FnMut(_)>);
        let _ = self
            .host
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }

    fn toggle_theme(&self) {
        let Some(root) = dom::document().document_element() else {
            return;
        };
        if dom::has_class(&root, "dark") {
            dom::remove_class(&root, "dark");
            storage::set_theme("light");
        } else {
            dom::add_class(&root, "dark");
            storage::set_theme("dark");
        }
        self.render();
    }
}

/// Escaped display form of the current identity. Wallet addresses shorten;
/// anonymous names are user-visible text and escape like any other.
fn identity_label(session: &UserSession) -> String {
    match &session.identity {
        Identity::Anonymous(name) => fmt::escape_html(name),
        Identity::Wallet(address) => fmt::escape_html(&short_address(address)),
    }
}
