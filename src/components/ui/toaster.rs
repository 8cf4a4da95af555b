use crate::state::{Toast, ToastKind, ToastQueue};
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Bottom-right stack of transient notices.
#[component]
pub fn Toaster(toasts: RwSignal<ToastQueue>) -> impl IntoView {
    view! {
        <div data-name="Toaster" class="pointer-events-none fixed right-4 bottom-4 z-[100] flex w-80 flex-col gap-2">
            <For
                each=move || toasts.with(|q| q.items().to_vec())
                key=|toast: &Toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    let class = tw_merge!(
                        "pointer-events-auto flex items-start justify-between gap-3 rounded-md border px-4 py-3 text-sm shadow-md",
                        match toast.kind {
                            ToastKind::Success => "border-success/40 bg-background text-foreground",
                            ToastKind::Error => "border-destructive/40 bg-background text-destructive",
                        }
                    );
                    view! {
                        <div class=class role="status">
                            <span>{toast.message}</span>
                            <button
                                type="button"
                                class="text-muted-foreground hover:text-foreground"
                                aria-label="Dismiss"
                                on:click=move |_| toasts.update(|q| q.dismiss(id))
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
