//! Wallet connector: bridges one wallet-provider capability to the session
//! store, normalising connect/disconnect/account-change/chain-change into
//! session mutations.
//!
//! The provider behind [`WalletProvider`] is a black box (injected browser
//! provider, a protocol bridge, a selection modal); this crate only cares
//! about the observable contract.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use sv_session::{SessionStorage, SessionStore};

/// Upstream events a provider can deliver after a connection is live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(String),
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("connection request rejected by the user")]
    Rejected,
    #[error("no wallet capability available in this page")]
    Unavailable,
    #[error("{0}")]
    Other(String),
}

/// The capability surface this crate needs from any wallet SDK.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Ask the wallet for its accounts, prompting the user if needed.
    /// Resolution is unbounded; only the user or the SDK can end it.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// Register the listener for account/chain/disconnect events.
    fn on_event(&self, handler: Rc<dyn Fn(ProviderEvent)>);

    /// Fire-and-forget SDK cleanup (close sessions, clear caches).
    /// Implementations log their own failures; nothing is surfaced here.
    fn teardown(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorState {
    Idle,
    Connecting,
    Connected,
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("a connection attempt is already in progress")]
    Busy,
    #[error("connection request rejected")]
    Rejected,
    #[error("no wallet available")]
    Unavailable,
    #[error("wallet provider error: {0}")]
    Provider(String),
}

pub struct Connector<P: WalletProvider, S: SessionStorage> {
    provider: P,
    store: Rc<SessionStore<S>>,
    state: Cell<ConnectorState>,
    events_attached: Cell<bool>,
    weak_self: Weak<Connector<P, S>>,
}

impl<P: WalletProvider, S: SessionStorage> Connector<P, S> {
    pub fn new(provider: P, store: Rc<SessionStore<S>>) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Connector {
            provider,
            store,
            state: Cell::new(ConnectorState::Idle),
            events_attached: Cell::new(false),
            weak_self: weak_self.clone(),
        })
    }

    pub fn state(&self) -> ConnectorState {
        self.state.get()
    }

    /// Drive `Idle → Connecting → Connected`.
    ///
    /// A second call while one is in flight fails fast with
    /// [`ConnectError::Busy`] and leaves the in-flight attempt untouched; it
    /// is never queued. Any failure releases the guard and leaves whatever
    /// session existed before the attempt intact.
    pub async fn connect(&self) -> Result<String, ConnectError> {
        if self.state.get() == ConnectorState::Connecting {
            return Err(ConnectError::Busy);
        }
        self.state.set(ConnectorState::Connecting);

        let accounts = match self.provider.request_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                self.state.set(ConnectorState::Idle);
                return Err(match err {
                    ProviderError::Rejected => ConnectError::Rejected,
                    ProviderError::Unavailable => ConnectError::Unavailable,
                    ProviderError::Other(detail) => {
                        warn!("wallet connection failed: {detail}");
                        ConnectError::Provider(detail)
                    }
                });
            }
        };

        // Providers express "the user backed out" as an empty account list.
        let Some(address) = accounts.first().cloned() else {
            self.state.set(ConnectorState::Idle);
            return Err(ConnectError::Rejected);
        };

        self.store.connect(&address);
        self.state.set(ConnectorState::Connected);
        self.attach_upstream();
        debug!(%address, "wallet connected");
        Ok(address)
    }

    /// Normalise an upstream provider event. Events are only meaningful
    /// while connected; anything delivered in other states is dropped.
    pub fn handle_event(&self, event: ProviderEvent) {
        if self.state.get() != ConnectorState::Connected {
            return;
        }
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                None => {
                    debug!("provider delivered an empty account set");
                    self.disconnect();
                }
                Some(address) => self.store.switch_wallet(address),
            },
            ProviderEvent::ChainChanged(chain) => {
                // Exactly one chain is supported; a network change tears the
                // session down instead of trying to reconcile.
                debug!(%chain, "chain changed, forcing disconnect");
                self.disconnect();
            }
            ProviderEvent::Disconnected => self.disconnect(),
        }
    }

    /// `Connected → Idle`: clear the session, then let the provider clean
    /// up after itself.
    pub fn disconnect(&self) {
        self.store.disconnect();
        self.state.set(ConnectorState::Idle);
        self.provider.teardown();
    }

    fn attach_upstream(&self) {
        if self.events_attached.replace(true) {
            return;
        }
        // Weak: the provider holds this closure for the page lifetime and
        // must not keep the connector alive in turn.
        let connector = self.weak_self.clone();
        self.provider.on_event(Rc::new(move |event| {
            if let Some(connector) = connector.upgrade() {
                connector.handle_event(event);
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use sv_session::{Identity, MemoryStorage};

    #[derive(Default)]
    struct MockInner {
        response: RefCell<Option<Result<Vec<String>, ProviderError>>>,
        gate_open: Cell<bool>,
        handler: RefCell<Option<Rc<dyn Fn(ProviderEvent)>>>,
        teardowns: Cell<usize>,
    }

    #[derive(Clone, Default)]
    struct MockProvider(Rc<MockInner>);

    impl MockProvider {
        fn scripted(response: Result<Vec<String>, ProviderError>) -> Self {
            let mock = MockProvider::default();
            mock.0.gate_open.set(true);
            *mock.0.response.borrow_mut() = Some(response);
            mock
        }

        fn gated(response: Result<Vec<String>, ProviderError>) -> Self {
            let mock = MockProvider::scripted(response);
            mock.0.gate_open.set(false);
            mock
        }

        fn open_gate(&self) {
            self.0.gate_open.set(true);
        }

        fn fire(&self, event: ProviderEvent) {
            let handler = self.0.handler.borrow().clone();
            handler.expect("no upstream handler attached")(event);
        }
    }

    struct Gate(Rc<MockInner>);

    impl Future for Gate {
        type Output = ();

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0.gate_open.get() {
                Poll::Ready(())
            } else {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for MockProvider {
        async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
            Gate(self.0.clone()).await;
            self.0
                .response
                .borrow_mut()
                .take()
                .expect("request_accounts called with no scripted response")
        }

        fn on_event(&self, handler: Rc<dyn Fn(ProviderEvent)>) {
            *self.0.handler.borrow_mut() = Some(handler);
        }

        fn teardown(&self) {
            self.0.teardowns.set(self.0.teardowns.get() + 1);
        }
    }

    fn fresh_store() -> Rc<SessionStore<MemoryStorage>> {
        Rc::new(SessionStore::new(MemoryStorage::default()))
    }

    #[tokio::test]
    async fn connect_takes_the_first_account_and_subscribes() {
        let mock = MockProvider::scripted(Ok(vec!["0xaaa".into(), "0xbbb".into()]));
        let store = fresh_store();
        let connector = Connector::new(mock.clone(), store.clone());

        let address = connector.connect().await.unwrap();
        assert_eq!(address, "0xaaa");
        assert_eq!(connector.state(), ConnectorState::Connected);
        assert_eq!(store.balance(), 100);
        assert!(mock.0.handler.borrow().is_some());
    }

    #[tokio::test]
    async fn second_connect_while_pending_is_rejected_immediately() {
        let mock = MockProvider::gated(Ok(vec!["0xaaa".into()]));
        let store = fresh_store();
        let connector = Connector::new(mock.clone(), store.clone());

        let first = connector.connect();
        tokio::pin!(first);

        // Drive the first attempt into its provider await.
        std::future::poll_fn(|cx| {
            assert!(first.as_mut().poll(cx).is_pending());
            Poll::Ready(())
        })
        .await;
        assert_eq!(connector.state(), ConnectorState::Connecting);

        // The overlapping attempt fails fast without touching the first.
        let second = connector.connect().await;
        assert!(matches!(second, Err(ConnectError::Busy)));
        assert_eq!(connector.state(), ConnectorState::Connecting);

        mock.open_gate();
        let address = first.await.unwrap();
        assert_eq!(address, "0xaaa");
        assert_eq!(store.balance(), 100);
    }

    #[tokio::test]
    async fn rejection_keeps_the_prior_session_intact() {
        let mock = MockProvider::scripted(Err(ProviderError::Rejected));
        let store = fresh_store();
        store.enter_anonymous();
        let connector = Connector::new(mock, store.clone());

        let result = connector.connect().await;
        assert!(matches!(result, Err(ConnectError::Rejected)));
        assert_eq!(connector.state(), ConnectorState::Idle);

        let session = store.current().unwrap();
        assert!(session.identity.is_anonymous());
        assert_eq!(session.token_balance, 50);
    }

    #[tokio::test]
    async fn empty_account_list_counts_as_rejection() {
        let mock = MockProvider::scripted(Ok(Vec::new()));
        let store = fresh_store();
        let connector = Connector::new(mock, store.clone());

        assert!(matches!(connector.connect().await, Err(ConnectError::Rejected)));
        assert_eq!(connector.state(), ConnectorState::Idle);
        assert_eq!(store.current(), None);
    }

    #[tokio::test]
    async fn provider_failure_releases_the_guard() {
        let mock = MockProvider::scripted(Err(ProviderError::Other("rpc unreachable".into())));
        let store = fresh_store();
        let connector = Connector::new(mock.clone(), store);

        let result = connector.connect().await;
        assert!(matches!(result, Err(ConnectError::Provider(ref d)) if d == "rpc unreachable"));
        assert_eq!(connector.state(), ConnectorState::Idle);

        // The guard is free again: a retry can proceed.
        *mock.0.response.borrow_mut() = Some(Ok(vec!["0xccc".into()]));
        assert_eq!(connector.connect().await.unwrap(), "0xccc");
    }

    #[tokio::test]
    async fn account_switch_updates_address_without_bonus() {
        let mock = MockProvider::scripted(Ok(vec!["0xaaa".into()]));
        let store = fresh_store();
        let connector = Connector::new(mock.clone(), store.clone());
        connector.connect().await.unwrap();

        mock.fire(ProviderEvent::AccountsChanged(vec!["0xddd".into()]));

        let session = store.current().unwrap();
        assert_eq!(session.identity, Identity::Wallet("0xddd".into()));
        assert_eq!(session.token_balance, 100);
        assert_eq!(connector.state(), ConnectorState::Connected);
    }

    #[tokio::test]
    async fn empty_account_event_disconnects() {
        let mock = MockProvider::scripted(Ok(vec!["0xaaa".into()]));
        let store = fresh_store();
        let connector = Connector::new(mock.clone(), store.clone());
        connector.connect().await.unwrap();

        mock.fire(ProviderEvent::AccountsChanged(Vec::new()));

        assert_eq!(store.current(), None);
        assert_eq!(connector.state(), ConnectorState::Idle);
        assert_eq!(mock.0.teardowns.get(), 1);
    }

    #[tokio::test]
    async fn chain_change_forces_a_full_disconnect() {
        let mock = MockProvider::scripted(Ok(vec!["0xaaa".into()]));
        let store = fresh_store();
        let connector = Connector::new(mock.clone(), store.clone());
        connector.connect().await.unwrap();

        mock.fire(ProviderEvent::ChainChanged("0x5".into()));

        assert_eq!(store.current(), None);
        assert_eq!(connector.state(), ConnectorState::Idle);
        assert_eq!(mock.0.teardowns.get(), 1);
    }

    #[tokio::test]
    async fn upstream_disconnect_clears_the_session() {
        let mock = MockProvider::scripted(Ok(vec!["0xaaa".into()]));
        let store = fresh_store();
        let connector = Connector::new(mock.clone(), store.clone());
        connector.connect().await.unwrap();

        mock.fire(ProviderEvent::Disconnected);
        assert_eq!(store.current(), None);
        assert_eq!(connector.state(), ConnectorState::Idle);
    }

    #[tokio::test]
    async fn events_outside_a_connection_are_dropped() {
        let mock = MockProvider::scripted(Ok(vec!["0xaaa".into()]));
        let store = fresh_store();
        let connector = Connector::new(mock.clone(), store.clone());
        connector.connect().await.unwrap();
        connector.disconnect();
        assert_eq!(mock.0.teardowns.get(), 1);

        // Late events after teardown must not resurrect or re-clear state.
        mock.fire(ProviderEvent::ChainChanged("0x1".into()));
        mock.fire(ProviderEvent::AccountsChanged(vec!["0xeee".into()]));
        assert_eq!(store.current(), None);
        assert_eq!(connector.state(), ConnectorState::Idle);
        assert_eq!(mock.0.teardowns.get(), 1);
    }
}
