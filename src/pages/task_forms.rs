use crate::api::UpdateTaskRequest;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Input, Label, Modal, ModalBody, ModalFooter, NativeSelect,
    Spinner, Textarea,
};
use crate::models::{ContactPerson, Task, TaskId, TaskStatus, TaskType, UserId};
use crate::pages::tasks::TaskListHandle;
use crate::pages::use_expire_session;
use crate::state::task_list::MutationKind;
use crate::state::{AppContext, AppState};
use crate::util::now_local_minute;
use crate::validation::{contacts_except, resolve_contact_id, ScheduleWindow, TaskDraft};
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::IntoEnumIterator;

/// One signal per form input.
#[derive(Clone, Copy)]
struct DraftFields {
    entity_name: RwSignal<String>,
    task_type: RwSignal<String>,
    time_of_task: RwSignal<String>,
    contact_person: RwSignal<String>,
    contact_person_id: RwSignal<Option<UserId>>,
    note: RwSignal<String>,
    status: RwSignal<String>,
}

impl DraftFields {
    fn new() -> Self {
        Self {
            entity_name: RwSignal::new(String::new()),
            task_type: RwSignal::new(String::new()),
            time_of_task: RwSignal::new(String::new()),
            contact_person: RwSignal::new(String::new()),
            contact_person_id: RwSignal::new(None),
            note: RwSignal::new(String::new()),
            status: RwSignal::new(String::new()),
        }
    }

    fn load(&self, draft: TaskDraft) {
        self.entity_name.set(draft.entity_name);
        self.task_type.set(draft.task_type);
        self.time_of_task.set(draft.time_of_task);
        self.contact_person.set(draft.contact_person);
        self.contact_person_id.set(draft.contact_person_id);
        self.note.set(draft.note);
        self.status.set(draft.status);
    }

    fn draft(&self) -> TaskDraft {
        TaskDraft {
            entity_name: self.entity_name.get(),
            task_type: self.task_type.get(),
            time_of_task: self.time_of_task.get(),
            contact_person: self.contact_person.get(),
            contact_person_id: self.contact_person_id.get(),
            note: self.note.get(),
            status: self.status.get(),
        }
    }

    fn draft_untracked(&self) -> TaskDraft {
        untrack(|| self.draft())
    }
}

/// Fetches the contact list into `contacts`, leaving out `exclude`.
fn load_contacts(
    app_state: AppState,
    contacts: RwSignal<Vec<ContactPerson>>,
    expire_session: Callback<()>,
    exclude: Option<String>,
) {
    let api_client = app_state.api_client.get_untracked();
    spawn_local(async move {
        let result = api_client.list_contact_persons().await;
        if contacts.try_with_untracked(|_| ()).is_none() {
            return;
        }
        match result {
            Ok(list) => contacts.set(contacts_except(list, exclude.as_deref())),
            Err(e) if e.is_unauthorized() => expire_session.run(()),
            Err(e) => {
                tracing::warn!(error = %e, "contact persons unavailable");
                app_state.notify_error("Failed to load contact persons.");
            }
        }
    });
}

#[component]
fn TaskFields(
    fields: DraftFields,
    contacts: RwSignal<Vec<ContactPerson>>,
    #[prop(optional)] window: Option<Memo<ScheduleWindow>>,
    #[prop(optional)] with_status: bool,
) -> impl IntoView {
    let (min, max) = window
        .map(|w| w.with_untracked(|w| (w.min_attr(), w.max_attr())))
        .unwrap_or_default();

    let type_options = Signal::derive(|| {
        std::iter::once((String::new(), "Select Task Type".to_string()))
            .chain(TaskType::iter().map(|t| (t.to_string(), format!("{} {}", t.emoji(), t))))
            .collect::<Vec<_>>()
    });

    let contact_options = Signal::derive(move || {
        let mut options = vec![(String::new(), "Select Contact Person".to_string())];
        contacts.with(|list| {
            for person in list {
                if !options.iter().any(|(v, _)| *v == person.name) {
                    options.push((person.name.clone(), person.name.clone()));
                }
            }
        });
        // Keep the saved contact selectable even when it is not offered.
        let current = fields.contact_person.get();
        if !current.is_empty() && !options.iter().any(|(v, _)| *v == current) {
            options.push((current.clone(), current));
        }
        options
    });

    let status_options = Signal::derive(|| {
        TaskStatus::iter()
            .map(|s| (s.to_string(), s.to_string()))
            .collect::<Vec<_>>()
    });

    let on_contact = Callback::new(move |name: String| {
        let id = contacts.with_untracked(|list| resolve_contact_id(list, &name));
        fields.contact_person_id.set(id);
    });

    view! {
        <ModalBody>
            <div class="flex flex-col gap-1.5">
                <Label html_for="entity_name" class="text-xs">"Entity Name"</Label>
                <Input id="entity_name" bind_value=fields.entity_name required=true class="h-8 text-sm" />
            </div>
            <div class="flex flex-col gap-1.5">
                <Label html_for="task_type" class="text-xs">"Task Type"</Label>
                <NativeSelect id="task_type" options=type_options bind_value=fields.task_type class="h-8 text-sm" />
            </div>
            <div class="flex flex-col gap-1.5">
                <Label html_for="time_of_task" class="text-xs">"Date and Time of Task"</Label>
                <Input
                    id="time_of_task"
                    r#type="datetime-local"
                    min=min
                    max=max
                    bind_value=fields.time_of_task
                    required=true
                    class="h-8 text-sm"
                />
            </div>
            <div class="flex flex-col gap-1.5">
                <Label html_for="contact_person" class="text-xs">"Contact Person"</Label>
                <NativeSelect
                    id="contact_person"
                    options=contact_options
                    bind_value=fields.contact_person
                    on_change=on_contact
                    class="h-8 text-sm"
                />
            </div>
            <div class="flex flex-col gap-1.5">
                <Label html_for="note" class="text-xs">"Note"</Label>
                <Textarea id="note" bind_value=fields.note class="text-sm" />
            </div>
            <Show when=move || with_status fallback=|| ().into_view()>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="status" class="text-xs">"Status"</Label>
                    <NativeSelect id="status" options=status_options bind_value=fields.status class="h-8 text-sm" />
                </div>
            </Show>
        </ModalBody>
    }
}

#[component]
pub fn CreateTaskModal(open: RwSignal<bool>) -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;
    let expire_session = use_expire_session();

    let fields = DraftFields::new();
    let contacts: RwSignal<Vec<ContactPerson>> = RwSignal::new(Vec::new());
    let saving = RwSignal::new(false);

    // Fresh bounds every time the modal opens.
    let window = Memo::new(move |_| {
        open.track();
        ScheduleWindow::from_now(now_local_minute())
    });

    Effect::new(move |_| {
        if open.get() {
            fields.load(TaskDraft::blank());
            load_contacts(app_state, contacts, expire_session, None);
        }
    });

    let can_submit = move || !saving.get() && fields.draft().can_create(&window.get());

    let on_submit = move |_| {
        let request = match fields
            .draft_untracked()
            .to_create_request(&window.get_untracked())
        {
            Ok(request) => request,
            Err(e) => {
                app_state.notify_error(e.to_string());
                return;
            }
        };
        let api_client = app_state.api_client.get_untracked();
        saving.set(true);

        spawn_local(async move {
            let result = api_client.create_task(&request).await;
            if saving.try_set(false).is_none() {
                return;
            }
            match result {
                Ok(_) => {
                    app_state.notify_success("Task created successfully!");
                    open.set(false);
                }
                Err(e) if e.is_unauthorized() => expire_session.run(()),
                Err(e) => {
                    tracing::warn!(error = %e, "task creation failed");
                    app_state.notify_error("Failed to create task.");
                }
            }
        });
    };

    view! {
        <Modal open=open title="Create New Task">
            <TaskFields fields=fields contacts=contacts window=window />
            <ModalFooter>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    attr:disabled=move || saving.get()
                    on:click=move |_| open.set(false)
                >
                    "Cancel"
                </Button>
                <Button size=ButtonSize::Sm attr:disabled=move || !can_submit() on:click=on_submit>
                    <span class="inline-flex items-center gap-2">
                        <Show when=move || saving.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        "Add Task"
                    </span>
                </Button>
            </ModalFooter>
        </Modal>
    }
}

#[component]
pub fn EditTaskModal(open: RwSignal<bool>, target: RwSignal<Option<Task>>) -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;
    let handle = expect_context::<TaskListHandle>();

    let fields = DraftFields::new();
    let contacts: RwSignal<Vec<ContactPerson>> = RwSignal::new(Vec::new());

    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        if let Some(task) = target.get_untracked() {
            fields.load(TaskDraft::from_task(&task));
        }
        let me = app_state
            .session
            .with_untracked(|s| s.as_ref().map(|s| s.name.clone()));
        load_contacts(app_state, contacts, handle.expire_session, me);
    });

    let can_save = move || {
        let draft = fields.draft();
        draft.has_required() && !draft.status.is_empty()
    };

    let on_save = move |_| {
        let Some(id) = target.with_untracked(|t| t.as_ref().map(|t| t.id)) else {
            return;
        };
        let fields = match fields.draft_untracked().to_update_request() {
            Ok(fields) => fields,
            Err(e) => {
                app_state.notify_error(e.to_string());
                return;
            }
        };
        let api_client = app_state.api_client.get_untracked();
        open.set(false);
        handle.mutate(MutationKind::Edit, async move {
            api_client.update_task(id, &fields).await
        });
    };

    view! {
        <Modal open=open title="Edit Task">
            <TaskFields fields=fields contacts=contacts with_status=true />
            <ModalFooter>
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| open.set(false)>
                    "Cancel"
                </Button>
                <Button size=ButtonSize::Sm attr:disabled=move || !can_save() on:click=on_save>
                    "Save"
                </Button>
            </ModalFooter>
        </Modal>
    }
}

#[component]
pub fn AddNoteModal(open: RwSignal<bool>, target: RwSignal<Option<TaskId>>) -> impl IntoView {
    let app_state = expect_context::<AppContext>().0;
    let handle = expect_context::<TaskListHandle>();
    let note = RwSignal::new(String::new());

    Effect::new(move |_| {
        if open.get() {
            note.set(String::new());
        }
    });

    let on_save = move |_| {
        let Some(id) = target.get_untracked() else {
            return;
        };
        let fields = UpdateTaskRequest::note(note.get_untracked());
        let api_client = app_state.api_client.get_untracked();
        open.set(false);
        handle.mutate(MutationKind::Note, async move {
            api_client.update_task(id, &fields).await
        });
    };

    view! {
        <Modal open=open title="Add Note">
            <ModalBody>
                <Textarea bind_value=note placeholder="Enter your note here" rows=4 class="text-sm" />
            </ModalBody>
            <ModalFooter>
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| open.set(false)>
                    "Cancel"
                </Button>
                <Button size=ButtonSize::Sm on:click=on_save>"Save"</Button>
            </ModalFooter>
        </Modal>
    }
}

/// Read-only view of a note too long for its table cell.
#[component]
pub fn NoteViewModal(open: RwSignal<bool>, text: RwSignal<String>) -> impl IntoView {
    view! {
        <Modal open=open title="Note">
            <p class="text-sm whitespace-pre-wrap break-words">{move || text.get()}</p>
        </Modal>
    }
}
