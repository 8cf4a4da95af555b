use crate::components::ui::Toaster;
use crate::config::EnvConfig;
use crate::models::TaskScope;
use crate::pages::{LoginPage, Navbar, RequireAuth, SignupPage, TaskListPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
pub(crate) fn App(config: EnvConfig) -> impl IntoView {
    let app_state = AppState::new(&config);
    provide_context(AppContext(app_state));

    // Router hooks (`use_navigate`) need the <Router> context, so the navbar
    // lives inside it.
    view! {
        <Router>
            <Navbar />
            <main class="mx-auto w-full max-w-6xl">
                <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                    <Route path=path!("login") view=LoginPage />
                    <Route path=path!("signup") view=SignupPage />
                    <Route path=path!("tasks") view=move || view! {
                        <RequireAuth>
                            <TaskListPage scope=TaskScope::All />
                        </RequireAuth>
                    } />
                    <Route path=path!("tasks/new") view=move || view! {
                        <RequireAuth>
                            <TaskListPage scope=TaskScope::All open_create=true />
                        </RequireAuth>
                    } />
                    <Route path=path!("mytasks") view=move || view! {
                        <RequireAuth>
                            <TaskListPage scope=TaskScope::Mine />
                        </RequireAuth>
                    } />
                    <Route path=path!("") view=|| view! { <Redirect path="/tasks" /> } />
                </Routes>
            </main>
            <Toaster toasts=app_state.toasts />
        </Router>
    }
}
