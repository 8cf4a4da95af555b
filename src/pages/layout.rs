use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;

const NAV_LINK_CLASS: &str =
    "rounded-md px-3 py-1.5 text-sm text-muted-foreground hover:bg-accent hover:text-foreground";

#[component]
pub fn Navbar() -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let on_logout = move |_| {
        app_state.sign_out();
        navigate.with_value(|nav| nav("/login", Default::default()));
    };

    view! {
        <header data-name="Navbar" class="sticky top-0 z-40 border-b bg-background/95 backdrop-blur">
            <div class="mx-auto flex h-14 max-w-6xl items-center justify-between gap-4 px-4">
                <a href="/" class="text-base font-semibold text-foreground">"TaskFlow"</a>

                <Show
                    when=move || app_state.is_authenticated()
                    fallback=|| view! {
                        <span class="text-sm text-muted-foreground">
                            "Manage your tasks efficiently with TaskFlow!"
                        </span>
                    }
                >
                    <span class="hidden text-sm text-muted-foreground sm:inline">
                        {move || format!("Welcome, {}", app_state.user_name().unwrap_or_default())}
                    </span>
                    <nav class="flex items-center gap-1">
                        <a href="/tasks" class=NAV_LINK_CLASS>"Tasks"</a>
                        <a href="/tasks/new" class=NAV_LINK_CLASS>"New Task"</a>
                        <a href="/mytasks" class=NAV_LINK_CLASS>"My Tasks"</a>
                        <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_logout>
                            "Logout"
                        </Button>
                    </nav>
                </Show>
            </div>
        </header>
    }
}

/// Renders `children` only with a session; otherwise sends the user to
/// `/login`.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=move || app_state.is_authenticated() fallback=|| view! { <Redirect path="/login" /> }>
            {move || children.with_value(|c| c())}
        </Show>
    }
}
