use crate::api::{ApiResult, MessageResponse, UpdateTaskRequest};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, NativeSelect, PageSpinner, Pagination, Table, TableBody,
    TableCell, TableHead, TableHeader, TableRow, TableWrapper,
};
use crate::models::{Task, TaskId, TaskScope, TaskStatus};
use crate::pages::task_forms::{AddNoteModal, CreateTaskModal, EditTaskModal, NoteViewModal};
use crate::pages::use_expire_session;
use crate::state::task_list::{
    FetchOutcome, FilterChoice, FilterColumn, MutationKind, TaskListController,
    NOTE_PREVIEW_CHARS,
};
use crate::state::{AppContext, AppState};
use crate::util::{display_time, now_utc, truncate_chars};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use std::future::Future;
use strum::IntoEnumIterator;

/// Select value meaning "no filter on this column".
const ALL_FILTER: &str = "__all__";

/// Shared by the table and its modals to run requests against the list.
#[derive(Clone, Copy)]
pub(crate) struct TaskListHandle {
    pub controller: RwSignal<TaskListController>,
    pub app_state: AppState,
    pub expire_session: Callback<()>,
}

impl TaskListHandle {
    /// Loads the current page. Responses to superseded fetches are dropped.
    pub fn fetch(self) {
        let Some(ticket) = self.controller.try_update(|c| c.begin_fetch()) else {
            return;
        };
        let api_client = self.app_state.api_client.get_untracked();

        spawn_local(async move {
            let result = api_client
                .list_tasks(ticket.scope, ticket.page, ticket.per_page)
                .await;

            let Some(outcome) = self.controller.try_update(|c| c.apply_fetch(ticket, result)) else {
                return;
            };
            match outcome {
                FetchOutcome::Applied | FetchOutcome::Stale => {}
                FetchOutcome::Failed(e) if e.is_unauthorized() => self.expire_session.run(()),
                FetchOutcome::Failed(e) => {
                    tracing::warn!(error = %e, "task fetch failed");
                    self.app_state.notify_error("Failed to fetch tasks.");
                }
            }
        });
    }

    pub fn go_to_page(self, page: u32) {
        if self.controller.try_update(|c| c.set_page(page)).is_some() {
            self.fetch();
        }
    }

    /// Runs one mutation, reports it, then re-fetches when asked to.
    pub fn mutate<F>(self, kind: MutationKind, request: F)
    where
        F: Future<Output = ApiResult<MessageResponse>> + 'static,
    {
        if self.controller.try_update(|c| c.begin_mutation()).is_none() {
            return;
        }

        spawn_local(async move {
            let result = request.await;
            let Some(follow) = self.controller.try_update(|c| c.finish_mutation(kind, result))
            else {
                return;
            };
            if follow.unauthorized {
                self.expire_session.run(());
                return;
            }
            self.app_state.notify(follow.notice.kind, follow.notice.message);
            if follow.refetch {
                self.fetch();
            }
        });
    }

    fn delete(self, id: TaskId) {
        let api_client = self.app_state.api_client.get_untracked();
        self.mutate(MutationKind::Delete, async move {
            api_client.delete_task(id).await
        });
    }

    fn close(self, id: TaskId) {
        let api_client = self.app_state.api_client.get_untracked();
        let fields = UpdateTaskRequest::status(TaskStatus::Closed);
        self.mutate(MutationKind::StatusUpdate, async move {
            api_client.update_task(id, &fields).await
        });
    }

    fn duplicate(self, task: &Task) {
        let prepared = self
            .controller
            .with_untracked(|c| c.prepare_duplicate(task, now_utc()));
        let request = match prepared {
            Ok(request) => request,
            Err(rejected) => {
                self.app_state.notify_error(rejected.to_string());
                return;
            }
        };
        let api_client = self.app_state.api_client.get_untracked();
        self.mutate(MutationKind::Duplicate, async move {
            api_client.duplicate_task(&request).await
        });
    }
}

/// Open/close state of the per-row modals.
#[derive(Clone, Copy)]
struct RowModals {
    edit_open: RwSignal<bool>,
    edit_target: RwSignal<Option<Task>>,
    note_open: RwSignal<bool>,
    note_target: RwSignal<Option<TaskId>>,
    view_open: RwSignal<bool>,
    view_text: RwSignal<String>,
}

impl RowModals {
    fn new() -> Self {
        Self {
            edit_open: RwSignal::new(false),
            edit_target: RwSignal::new(None),
            note_open: RwSignal::new(false),
            note_target: RwSignal::new(None),
            view_open: RwSignal::new(false),
            view_text: RwSignal::new(String::new()),
        }
    }

    fn edit(&self, task: Task) {
        self.edit_target.set(Some(task));
        self.edit_open.set(true);
    }

    fn add_note(&self, id: TaskId) {
        self.note_target.set(Some(id));
        self.note_open.set(true);
    }

    fn view_note(&self, text: String) {
        self.view_text.set(text);
        self.view_open.set(true);
    }
}

#[component]
pub fn TaskListPage(scope: TaskScope, #[prop(optional)] open_create: bool) -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let handle = TaskListHandle {
        controller: RwSignal::new(TaskListController::new(scope)),
        app_state,
        expire_session: use_expire_session(),
    };
    provide_context(handle);
    let controller = handle.controller;

    let modals = RowModals::new();
    let create_open = RwSignal::new(open_create);

    // Load the first page once mounted.
    Effect::new(move |_| handle.fetch());

    // `/tasks/new` hosts the creation modal; closing it returns to `/tasks`.
    Effect::new(move |was_open: Option<bool>| {
        let is_open = create_open.get();
        if open_create && was_open == Some(true) && !is_open {
            navigate.with_value(|nav| nav("/tasks", Default::default()));
        }
        is_open
    });

    let pagination = Signal::derive(move || controller.with(|c| c.pagination()));
    let on_page = Callback::new(move |page: u32| handle.go_to_page(page));

    view! {
        <div class="mx-auto w-full max-w-6xl px-4 py-6">
            {move || {
                if controller.with(|c| c.is_loading()) {
                    return view! { <PageSpinner /> }.into_any();
                }
                if controller.with(|c| c.tasks().is_empty()) {
                    return view! {
                        <div class="flex min-h-[40vh] items-center justify-center">
                            <h3 class="text-xl font-medium">{scope.empty_message()}</h3>
                        </div>
                    }
                    .into_any();
                }
                let rows = controller.with(|c| c.visible_tasks());
                let no_matches = rows.is_empty();
                view! {
                    <TableWrapper>
                        <Table>
                            <TableHeader>
                                <TableRow>
                                    {FilterColumn::iter()
                                        .map(|column| view! { <FilterHeader column=column controller=controller /> })
                                        .collect_view()}
                                    <TableHead>"Options"</TableHead>
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {rows
                                    .into_iter()
                                    .map(|task| view! { <TaskRow task=task handle=handle modals=modals /> })
                                    .collect_view()}
                                <Show when=move || no_matches fallback=|| ().into_view()>
                                    <TableRow>
                                        <TableCell attr:colspan="7" class="py-6 text-center text-muted-foreground">
                                            "No tasks match the selected filters."
                                        </TableCell>
                                    </TableRow>
                                </Show>
                            </TableBody>
                        </Table>
                    </TableWrapper>
                }
                .into_any()
            }}

            <Pagination view=pagination on_select=on_page />

            <CreateTaskModal open=create_open />
            <EditTaskModal open=modals.edit_open target=modals.edit_target />
            <AddNoteModal open=modals.note_open target=modals.note_target />
            <NoteViewModal open=modals.view_open text=modals.view_text />
        </div>
    }
}

#[component]
fn FilterHeader(column: FilterColumn, controller: RwSignal<TaskListController>) -> impl IntoView {
    let selected = RwSignal::new(
        controller
            .with_untracked(|c| c.active_filter(column).map(str::to_string))
            .unwrap_or_else(|| ALL_FILTER.to_string()),
    );

    let options = Signal::derive(move || {
        let mut options = vec![(ALL_FILTER.to_string(), "All".to_string())];
        options.extend(controller.with(|c| c.filter_options(column)).into_iter().map(|value| {
            let label = if value.is_empty() {
                "(empty)".to_string()
            } else {
                value.clone()
            };
            (value, label)
        }));
        options
    });

    let on_change = Callback::new(move |value: String| {
        let choice = if value == ALL_FILTER {
            FilterChoice::All
        } else {
            FilterChoice::Value(value)
        };
        controller.update(|c| c.select_filter(column, choice));
    });

    view! {
        <TableHead>
            <div class="flex flex-col gap-1 py-1">
                <span>{column.to_string()}</span>
                <NativeSelect
                    class="h-7 text-xs font-normal"
                    options=options
                    bind_value=selected
                    on_change=on_change
                />
            </div>
        </TableHead>
    }
}

#[component]
fn TaskRow(task: Task, handle: TaskListHandle, modals: RowModals) -> impl IntoView {
    let id = task.id;
    let menu_open = RwSignal::new(false);
    let task = StoredValue::new(task);
    let text = move |column: FilterColumn| task.with_value(|t| column.cell_text(t));

    let note_cell = task.with_value(|t| match t.note.as_deref().filter(|_| t.has_note()) {
        Some(note) => {
            let full = note.to_string();
            let (preview, cut) = truncate_chars(note, NOTE_PREVIEW_CHARS);
            if cut {
                view! {
                    <span>
                        {preview}"... "
                        <Button
                            variant=ButtonVariant::Link
                            size=ButtonSize::Sm
                            on:click=move |_| modals.view_note(full.clone())
                        >
                            "more"
                        </Button>
                    </span>
                }
                .into_any()
            } else {
                view! { <span>{preview}</span> }.into_any()
            }
        }
        None => view! {
            <Button variant=ButtonVariant::Link size=ButtonSize::Sm on:click=move |_| modals.add_note(id)>
                "ADD NOTE"
            </Button>
        }
        .into_any(),
    });

    let is_open = task.with_value(|t| t.status == TaskStatus::Open);
    let emoji = task.with_value(|t| t.task_type.emoji());
    let status_hint = task.with_value(|t| format!("Status: {}", t.status));

    let on_duplicate = move |_| {
        menu_open.set(false);
        task.with_value(|t| handle.duplicate(t));
    };
    let on_edit = move |_| {
        menu_open.set(false);
        modals.edit(task.get_value());
    };
    let on_close_task = move |_| {
        menu_open.set(false);
        handle.close(id);
    };
    let on_delete = move |_| {
        menu_open.set(false);
        handle.delete(id);
    };

    view! {
        <TableRow attr:title=status_hint>
            <TableCell>{text(FilterColumn::EntityName)}</TableCell>
            <TableCell>{emoji}" "{text(FilterColumn::TaskType)}</TableCell>
            <TableCell class="whitespace-nowrap">
                {task.with_value(|t| display_time(&t.time_of_task))}
            </TableCell>
            <TableCell>{text(FilterColumn::ContactPerson)}</TableCell>
            <TableCell>{note_cell}</TableCell>
            <TableCell>{text(FilterColumn::Status)}</TableCell>
            <TableCell>
                <div class="relative">
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| menu_open.update(|v| *v = !*v)
                    >
                        "Options"
                    </Button>
                    <Show when=move || menu_open.get() fallback=|| ().into_view()>
                        <div
                            data-name="RowMenu"
                            class="absolute right-0 z-30 mt-1 flex w-52 flex-col rounded-md border bg-background p-1 text-sm shadow-md"
                        >
                            <button type="button" class=MENU_ITEM_CLASS on:click=on_duplicate>
                                "Duplicate Task"
                            </button>
                            <button type="button" class=MENU_ITEM_CLASS on:click=on_edit>
                                "Edit Task"
                            </button>
                            <Show when=move || is_open fallback=|| ().into_view()>
                                <button type="button" class=MENU_ITEM_CLASS on:click=on_close_task>
                                    "Change Status to Closed"
                                </button>
                            </Show>
                            <button
                                type="button"
                                class=DANGER_ITEM_CLASS
                                on:click=on_delete
                            >
                                "Delete Task"
                            </button>
                        </div>
                    </Show>
                </div>
            </TableCell>
        </TableRow>
    }
}

const MENU_ITEM_CLASS: &str = "rounded-sm px-2 py-1.5 text-left hover:bg-accent hover:cursor-pointer";
const DANGER_ITEM_CLASS: &str =
    "rounded-sm px-2 py-1.5 text-left text-destructive hover:bg-accent hover:cursor-pointer";
