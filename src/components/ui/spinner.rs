use icons::{Loader, LoaderCircle};
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Inline spinner for buttons.
#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <Loader class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Large centered spinner shown in place of content while it loads.
#[component]
pub fn PageSpinner() -> impl IntoView {
    view! {
        <div class="flex min-h-[40vh] items-center justify-center">
            <LoaderCircle class="size-16 animate-spin text-primary" attr:role="status" attr:aria-label="Loading" />
        </div>
    }
}
