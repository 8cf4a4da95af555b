use crate::state::task_list::PaginationView;
use icons::{ChevronLeft, ChevronRight};
use leptos::prelude::*;
use tw_merge::tw_merge;

const ITEM_CLASS: &str = "inline-flex h-8 min-w-8 items-center justify-center rounded-md border px-2 text-sm transition-colors hover:bg-accent hover:cursor-pointer disabled:pointer-events-none disabled:opacity-50";

/// Previous, numbered pages, Next. Hidden while `view` is `None`.
#[component]
pub fn Pagination(
    #[prop(into)] view: Signal<Option<PaginationView>>,
    on_select: Callback<u32>,
) -> impl IntoView {
    let active = move || view.with(|v| v.as_ref().map(|v| v.active).unwrap_or(1));

    view! {
        <Show when=move || view.with(Option::is_some) fallback=|| ().into_view()>
            <nav data-name="Pagination" aria-label="pagination" class="mt-4 flex items-center justify-center gap-1">
                <button
                    type="button"
                    class=ITEM_CLASS
                    aria-label="Previous"
                    disabled=move || view.with(|v| v.as_ref().map_or(true, |v| v.prev_disabled))
                    on:click=move |_| on_select.run(active().saturating_sub(1))
                >
                    <ChevronLeft class="size-4" />
                </button>
                <For
                    each=move || view.with(|v| v.as_ref().map(|v| v.pages.clone()).unwrap_or_default())
                    key=|page| *page
                    children=move |page| {
                        let class = move || {
                            if active() == page {
                                tw_merge!(ITEM_CLASS, "bg-primary text-primary-foreground hover:bg-primary/90")
                            } else {
                                ITEM_CLASS.to_string()
                            }
                        };
                        view! {
                            <button
                                type="button"
                                class=class
                                aria-current=move || (active() == page).then_some("page")
                                on:click=move |_| on_select.run(page)
                            >
                                {page}
                            </button>
                        }
                    }
                />
                <button
                    type="button"
                    class=ITEM_CLASS
                    aria-label="Next"
                    disabled=move || view.with(|v| v.as_ref().map_or(true, |v| v.next_disabled))
                    on:click=move |_| on_select.run(active() + 1)
                >
                    <ChevronRight class="size-4" />
                </button>
            </nav>
        </Show>
    }
}
