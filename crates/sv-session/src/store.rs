//! The session store: single source of truth for identity and token state.
//!
//! All reads and writes go through [`SessionStore`]; persistence sits behind
//! [`SessionStorage`] so the browser layer can plug in `localStorage` while
//! tests use [`MemoryStorage`]. Writers always store the complete record,
//! never individual fields, so a half-written record can't survive a reload.

use std::cell::RefCell;

use anyhow::Result;
use tracing::{debug, warn};

use crate::bus::{EventBus, Subscription};
use crate::ident;
use crate::notice::Notice;
use crate::rewards::RewardAction;
use crate::session::{Identity, UserSession, short_address};

/// Single-slot persistence for the session record.
pub trait SessionStorage {
    fn load_raw(&self) -> Result<Option<String>>;
    fn store_raw(&self, raw: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory slot, used by tests and anywhere real storage is unavailable.
#[derive(Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn seeded(raw: &str) -> Self {
        MemoryStorage {
            slot: RefCell::new(Some(raw.to_string())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load_raw(&self) -> Result<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn store_raw(&self, raw: &str) -> Result<()> {
        *self.slot.borrow_mut() = Some(raw.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

pub struct SessionStore<S: SessionStorage> {
    storage: S,
    current: RefCell<Option<UserSession>>,
    user_events: EventBus<Option<UserSession>>,
    token_events: EventBus<u64>,
    notices: EventBus<Notice>,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        SessionStore {
            storage,
            current: RefCell::new(None),
            user_events: EventBus::new(),
            token_events: EventBus::new(),
            notices: EventBus::new(),
        }
    }

    // ── Subscriptions ──

    pub fn on_user_change(
        &self,
        handler: impl Fn(&Option<UserSession>) + 'static,
    ) -> Subscription<Option<UserSession>> {
        self.user_events.subscribe(handler)
    }

    pub fn on_balance_change(&self, handler: impl Fn(&u64) + 'static) -> Subscription<u64> {
        self.token_events.subscribe(handler)
    }

    pub fn on_notice(&self, handler: impl Fn(&Notice) + 'static) -> Subscription<Notice> {
        self.notices.subscribe(handler)
    }

    /// Raise a toast-style notification on behalf of any component.
    pub fn notify(&self, notice: Notice) {
        self.notices.emit(&notice);
    }

    // ── Reads ──

    pub fn current(&self) -> Option<UserSession> {
        self.current.borrow().clone()
    }

    pub fn balance(&self) -> u64 {
        self.current
            .borrow()
            .as_ref()
            .map(|s| s.token_balance)
            .unwrap_or(0)
    }

    // ── Mutations ──

    /// Restore the persisted session. Corruption is recovered locally: the
    /// record is dropped, the key removed, and the empty state announced.
    /// Never returns an error to the caller.
    pub fn load(&self) {
        let restored = match self.storage.load_raw() {
            Ok(Some(raw)) => match UserSession::from_json(&raw) {
                Ok(session) => Some(session),
                Err(err) => {
                    warn!("discarding corrupt session record: {err:#}");
                    if let Err(err) = self.storage.clear() {
                        warn!("failed to remove corrupt session record: {err:#}");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("session storage unavailable: {err:#}");
                None
            }
        };

        let balance = restored.as_ref().map(|s| s.token_balance).unwrap_or(0);
        *self.current.borrow_mut() = restored.clone();
        self.user_events.emit(&restored);
        self.token_events.emit(&balance);
    }

    /// Start (or resume) an anonymous session. Idempotent: with any session
    /// already active, including a connected wallet, this returns it
    /// untouched.
    pub fn enter_anonymous(&self) -> UserSession {
        if let Some(existing) = self.current() {
            return existing;
        }

        let session = UserSession {
            identity: Identity::Anonymous(ident::generate_anonymous_id()),
            token_balance: RewardAction::AnonymousEntry.amount(),
        };
        self.install(session.clone());
        self.notices.emit(&Notice::info(
            "Entering anonymous mode. Your privacy is protected!",
        ));
        session
    }

    /// Adopt a wallet identity. Any prior balance is carried forward and the
    /// connection bonus added on top.
    pub fn connect(&self, address: &str) -> UserSession {
        let prior = self.balance();
        let bonus = RewardAction::WalletConnected.amount();
        let session = UserSession {
            identity: Identity::Wallet(address.to_string()),
            token_balance: prior + bonus,
        };
        self.install(session.clone());
        self.notices.emit(&Notice::success(format!(
            "Wallet {} connected! +{bonus} tokens",
            short_address(address)
        )));
        session
    }

    /// In-place address change while connected. No bonus, no balance change;
    /// only the user-state event is re-emitted.
    pub fn switch_wallet(&self, address: &str) {
        let updated = match self.current() {
            Some(UserSession {
                identity: Identity::Wallet(current),
                token_balance,
            }) if current != address => Some(UserSession {
                identity: Identity::Wallet(address.to_string()),
                token_balance,
            }),
            _ => None,
        };

        if let Some(session) = updated {
            self.persist(&session);
            *self.current.borrow_mut() = Some(session.clone());
            self.user_events.emit(&Some(session));
        }
    }

    /// Clear the session and remove the persisted record.
    pub fn disconnect(&self) {
        if let Err(err) = self.storage.clear() {
            warn!("failed to clear session record: {err:#}");
        }
        *self.current.borrow_mut() = None;
        self.user_events.emit(&None);
        self.token_events.emit(&0);
    }

    /// Add tokens to the active session. No-op without a session or for a
    /// zero amount; on success emits the balance event (only) and a success
    /// notice naming the reason.
    pub fn award_tokens(&self, amount: u64, reason: &str) -> Option<u64> {
        if amount == 0 {
            return None;
        }
        let mut session = self.current()?;
        session.token_balance += amount;
        let balance = session.token_balance;

        self.persist(&session);
        *self.current.borrow_mut() = Some(session);
        self.token_events.emit(&balance);
        self.notices
            .emit(&Notice::success(format!("+{amount} tokens ({reason})")));
        debug!(amount, reason, balance, "tokens awarded");
        Some(balance)
    }

    // ── Internal ──

    fn install(&self, session: UserSession) {
        let balance = session.token_balance;
        self.persist(&session);
        *self.current.borrow_mut() = Some(session.clone());
        self.user_events.emit(&Some(session));
        self.token_events.emit(&balance);
    }

    fn persist(&self, session: &UserSession) {
        if let Err(err) = self.storage.store_raw(&session.to_json()) {
            warn!("failed to persist session record: {err:#}");
        }
    }
}
