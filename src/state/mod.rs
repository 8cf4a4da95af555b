use crate::api::{ApiClient, LoginResponse};
use crate::config::EnvConfig;
use crate::storage::{BrowserSession, Session, SessionStore};
use leptos::prelude::*;
use std::sync::Arc;

pub(crate) mod notify;
pub(crate) mod task_list;

pub(crate) use notify::{Toast, ToastKind, ToastQueue};

/// Persists the session returned by a successful login and returns it.
pub(crate) fn establish_session(store: &dyn SessionStore, resp: &LoginResponse) -> Session {
    let session = Session {
        token: resp.access_token.clone(),
        name: resp.name.clone(),
    };
    store.save(&session);
    session
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Present while signed in. Mirrors the session store.
    pub session: RwSignal<Option<Session>>,
    pub session_store: StoredValue<Arc<dyn SessionStore>>,

    pub toasts: RwSignal<ToastQueue>,
}

impl AppState {
    pub fn new(config: &EnvConfig) -> Self {
        Self::with_store(config, Arc::new(BrowserSession))
    }

    pub fn with_store(config: &EnvConfig, store: Arc<dyn SessionStore>) -> Self {
        let session = store.load();
        let api_client = ApiClient::new(config.api_url.clone())
            .with_token(session.as_ref().map(|s| s.token.clone()));

        Self {
            api_client: RwSignal::new(api_client),
            session: RwSignal::new(session),
            session_store: StoredValue::new(store),
            toasts: RwSignal::new(ToastQueue::default()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_some())
    }

    pub fn user_name(&self) -> Option<String> {
        self.session.with(|s| s.as_ref().map(|s| s.name.clone()))
    }

    pub fn sign_in(&self, resp: &LoginResponse) {
        let session = self
            .session_store
            .with_value(|store| establish_session(store.as_ref(), resp));
        tracing::info!(user = %session.name, "signed in");

        self.api_client
            .update(|c| c.set_token(session.token.clone()));
        self.session.set(Some(session));
    }

    pub fn sign_out(&self) {
        self.session_store.with_value(|store| store.clear());
        self.api_client.update(|c| c.clear_token());
        self.session.set(None);
        tracing::info!("signed out");
    }

    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        notify::show(self.toasts, kind, message.into());
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        self.notify(ToastKind::Success, message);
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        self.notify(ToastKind::Error, message);
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
