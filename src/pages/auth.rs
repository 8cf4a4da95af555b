use crate::api::{ApiError, ApiErrorKind};
use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardHeader, CardTitle, Input, Label,
    Spinner,
};
use crate::state::AppContext;
use crate::validation::{check_password, is_strong_password};
use icons::{Eye, EyeOff};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

fn login_failure_message(err: &ApiError) -> &'static str {
    match err.kind {
        ApiErrorKind::Unauthorized | ApiErrorKind::Http => {
            "Login failed. Please check your credentials and try again."
        }
        ApiErrorKind::Network | ApiErrorKind::Parse => "An error occurred. Please try again later.",
    }
}

/// Client errors carry a reason worth showing ("User already exists").
fn signup_failure_message(err: &ApiError) -> String {
    match (err.kind, err.status) {
        (ApiErrorKind::Http, Some(status)) if (400..500).contains(&status) => err.message.clone(),
        _ => "Signup failed".to_string(),
    }
}

/// Password input with a show/hide toggle.
#[component]
fn PasswordField(#[prop(into)] id: String, bind_value: RwSignal<String>) -> impl IntoView {
    let visible = RwSignal::new(false);
    let input_type = Signal::derive(move || if visible.get() { "text" } else { "password" });

    view! {
        <div class="relative">
            <Input
                id=id
                r#type=input_type
                placeholder="••••••••"
                bind_value=bind_value
                required=true
                class="pr-10"
            />
            <button
                type="button"
                class="absolute top-1/2 right-2 -translate-y-1/2 p-1 text-muted-foreground hover:text-foreground"
                aria-label=move || if visible.get() { "Hide password" } else { "Show password" }
                on:click=move |_| visible.update(|v| *v = !*v)
            >
                {move || {
                    if visible.get() {
                        view! { <EyeOff class="size-4" /> }.into_any()
                    } else {
                        view! { <Eye class="size-4" /> }.into_any()
                    }
                }}
            </button>
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let api_client = app_state.api_client.get_untracked();

        loading.set(true);

        spawn_local(async move {
            match api_client.login(&email_val, &password_val).await {
                Ok(response) => {
                    app_state.sign_in(&response);
                    app_state.notify_success("Login successful!");
                    navigate.with_value(|nav| nav("/tasks", Default::default()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "login failed");
                    app_state.notify_error(login_failure_message(&e));
                }
            }
            let _ = loading.try_set(false);
        });
    };

    view! {
        <div class="mx-auto flex min-h-[calc(100vh-3.5rem)] w-full max-w-sm flex-col justify-center px-4 py-10">
            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"Login"</CardTitle>
                    <CardDescription class="text-xs">"Use your email and password to continue."</CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="email" class="text-xs">"Email"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="you@example.com"
                                bind_value=email
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="password" class="text-xs">"Password"</Label>
                            <PasswordField id="password" bind_value=password />
                        </div>

                        <Button
                            class="w-full"
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get()
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Signing in..." } else { "Login" }}
                            </span>
                        </Button>

                        <div class="pt-1 text-center text-xs text-muted-foreground">
                            "Don't have an account? "
                            <a class="text-primary underline underline-offset-4" href="/signup">"Sign up"</a>
                        </div>
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let name: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let password_ok = move || password.with(|p| is_strong_password(p));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let password_val = password.get_untracked();
        if !is_strong_password(&password_val) {
            app_state.notify_error("Password does not meet the criteria.");
            return;
        }
        let email_val = email.get_untracked();
        let name_val = name.get_untracked();
        let api_client = app_state.api_client.get_untracked();

        loading.set(true);

        spawn_local(async move {
            match api_client.signup(&email_val, &password_val, &name_val).await {
                Ok(_) => {
                    tracing::info!("account created");
                    app_state.notify_success("Signup successful. Please login.");
                    navigate.with_value(|nav| nav("/login", Default::default()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "signup failed");
                    app_state.notify_error(signup_failure_message(&e));
                }
            }
            let _ = loading.try_set(false);
        });
    };

    view! {
        <div class="mx-auto flex min-h-[calc(100vh-3.5rem)] w-full max-w-sm flex-col justify-center px-4 py-10">
            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"Signup"</CardTitle>
                    <CardDescription class="text-xs">"Create an account to start tracking tasks."</CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="email" class="text-xs">"Email"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="you@example.com"
                                bind_value=email
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="name" class="text-xs">"Name"</Label>
                            <Input id="name" bind_value=name required=true class="h-8 text-sm" />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="password" class="text-xs">"Password"</Label>
                            <PasswordField id="password" bind_value=password />
                            <ul data-name="PasswordChecklist" class="mt-1 space-y-0.5 text-xs">
                                {move || {
                                    password
                                        .with(|p| check_password(p))
                                        .into_iter()
                                        .map(|(rule, met)| {
                                            let class = if met { "text-success" } else { "text-destructive" };
                                            view! {
                                                <li class=class>
                                                    {rule.description()}
                                                    {met.then_some(" ✓")}
                                                </li>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </ul>
                        </div>

                        <Button
                            class="w-full"
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get() || !password_ok()
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Creating..." } else { "Signup" }}
                            </span>
                        </Button>

                        <div class="pt-1 text-center text-xs text-muted-foreground">
                            "Already have an account? "
                            <a class="text-primary underline underline-offset-4" href="/login">"Log in"</a>
                        </div>
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(kind: ApiErrorKind, status: Option<u16>, message: &str) -> ApiError {
        ApiError {
            kind,
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_login_failure_messages() {
        assert_eq!(
            login_failure_message(&err(ApiErrorKind::Unauthorized, Some(401), "Invalid")),
            "Login failed. Please check your credentials and try again."
        );
        assert_eq!(
            login_failure_message(&err(ApiErrorKind::Network, None, "refused")),
            "An error occurred. Please try again later."
        );
    }

    #[test]
    fn test_signup_failure_shows_server_reason_for_client_errors() {
        assert_eq!(
            signup_failure_message(&err(ApiErrorKind::Http, Some(409), "User already exists")),
            "User already exists"
        );
        assert_eq!(
            signup_failure_message(&err(ApiErrorKind::Http, Some(500), "Internal Server Error")),
            "Signup failed"
        );
        assert_eq!(
            signup_failure_message(&err(ApiErrorKind::Network, None, "refused")),
            "Signup failed"
        );
    }
}
