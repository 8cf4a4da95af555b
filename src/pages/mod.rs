use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

mod auth;
mod layout;
mod task_forms;
mod tasks;

pub use auth::{LoginPage, SignupPage};
pub use layout::{Navbar, RequireAuth};
pub use tasks::TaskListPage;

/// Signs out and returns to `/login`. Used when the server rejects the
/// stored token.
pub(crate) fn use_expire_session() -> Callback<()> {
    let app_state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    Callback::new(move |_| {
        tracing::info!("session rejected by server");
        app_state.sign_out();
        navigate.with_value(|nav| nav("/login", Default::default()));
    })
}
