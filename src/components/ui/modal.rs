use icons::X;
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_ui::clx;
use tw_merge::*;

mod components {
    use super::*;
    clx! {ModalBody, div, "flex flex-col gap-3"}
    clx! {ModalFooter, footer, "flex flex-col-reverse gap-2 pt-2 sm:flex-row sm:justify-end"}
}

pub use components::*;

/// Controlled modal. Rendered only while `open` is true; the backdrop, the
/// close button and Escape all set it back to false.
#[component]
pub fn Modal(
    open: RwSignal<bool>,
    #[prop(into, optional)] title: String,
    #[prop(into, optional)] class: String,
    children: ChildrenFn,
) -> impl IntoView {
    let key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && open.get_untracked() {
            ev.prevent_default();
            open.set(false);
        }
    });
    on_cleanup(move || key_handle.remove());

    let merged_class = tw_merge!(
        "relative w-full max-w-md max-h-[85vh] overflow-y-auto rounded-xl border bg-background p-6 shadow-lg",
        class
    );
    let title = StoredValue::new(title);
    let children = StoredValue::new(children);

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                data-name="ModalBackdrop"
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/40 px-4"
                on:click=move |_| open.set(false)
            >
                <div
                    data-name="ModalContent"
                    role="dialog"
                    aria-modal="true"
                    class=merged_class.clone()
                    on:click=|ev| ev.stop_propagation()
                >
                    <button
                        type="button"
                        class="absolute top-4 right-4 rounded-sm p-1 opacity-70 hover:opacity-100 focus:ring-2 focus:ring-ring focus:outline-none"
                        aria-label="Close"
                        on:click=move |_| open.set(false)
                    >
                        <X class="size-4" />
                    </button>
                    <Show when=move || title.with_value(|t| !t.is_empty()) fallback=|| ().into_view()>
                        <h3 class="mb-4 text-lg leading-none font-semibold">{title.get_value()}</h3>
                    </Show>
                    {children.with_value(|c| c())}
                </div>
            </div>
        </Show>
    }
}
