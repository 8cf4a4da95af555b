//! Fetch, filter, paginate and mutate cycle behind the task table.
//!
//! The controller is plain data. Pages keep it in a signal, call `begin_*`
//! before a request and hand the response back to `apply_fetch` /
//! `finish_mutation`, which decide what the table shows next.

use crate::api::{ApiError, ApiResult, DuplicateTaskRequest, MessageResponse};
use crate::models::{Task, TaskPage, TaskScope};
use crate::state::ToastKind;
use crate::util::display_time;
use crate::validation::{duplicate_request, DuplicateRejected};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use strum::{Display, EnumIter};

pub(crate) const TASKS_PER_PAGE: u32 = 6;

/// Notes longer than this are cut in the table with a "more" link.
pub(crate) const NOTE_PREVIEW_CHARS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub(crate) enum FilterColumn {
    #[strum(serialize = "Entity Name")]
    EntityName,
    #[strum(serialize = "Task Type")]
    TaskType,
    #[strum(serialize = "Time of Task")]
    TimeOfTask,
    #[strum(serialize = "Contact Person")]
    ContactPerson,
    Note,
    Status,
}

impl FilterColumn {
    /// Text shown in this column's cell. Filters compare against it.
    pub fn cell_text(&self, task: &Task) -> String {
        match self {
            FilterColumn::EntityName => task.entity_name.clone(),
            FilterColumn::TaskType => task.task_type.to_string(),
            FilterColumn::TimeOfTask => display_time(&task.time_of_task),
            FilterColumn::ContactPerson => task.contact_person.clone(),
            FilterColumn::Note if task.has_note() => task.note.clone().unwrap_or_default(),
            FilterColumn::Note => String::new(),
            FilterColumn::Status => task.status.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FilterChoice {
    All,
    Value(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FetchTicket {
    pub generation: u64,
    pub scope: TaskScope,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug)]
pub(crate) enum FetchOutcome {
    Applied,
    Failed(ApiError),
    /// A newer fetch was started; the response was dropped.
    Stale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MutationKind {
    Delete,
    StatusUpdate,
    Edit,
    Note,
    Duplicate,
}

impl MutationKind {
    fn success_message(&self) -> &'static str {
        match self {
            MutationKind::Delete => "Task deleted successfully.",
            MutationKind::StatusUpdate | MutationKind::Edit => "Task updated successfully.",
            MutationKind::Note => "Note updated successfully.",
            MutationKind::Duplicate => "Task duplicated successfully.",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            MutationKind::Delete => "Failed to delete task.",
            MutationKind::StatusUpdate | MutationKind::Edit => "Failed to update task.",
            MutationKind::Note => "Failed to update note.",
            MutationKind::Duplicate => "Failed to duplicate task.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notice {
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MutationFollowUp {
    pub notice: Notice,
    pub refetch: bool,
    /// The server rejected the token; the caller signs out.
    pub unauthorized: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PaginationView {
    pub pages: Vec<u32>,
    pub active: u32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TaskListController {
    scope: TaskScope,
    tasks: Vec<Task>,
    current_page: u32,
    total_pages: u32,
    filters: BTreeMap<FilterColumn, String>,
    loading: bool,
    generation: u64,
    fetch_pending: bool,
    mutations_in_flight: u32,
}

impl TaskListController {
    pub fn new(scope: TaskScope) -> Self {
        Self {
            scope,
            tasks: Vec::new(),
            current_page: 1,
            total_pages: 1,
            filters: BTreeMap::new(),
            loading: false,
            generation: 0,
            fetch_pending: false,
            mutations_in_flight: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[cfg(test)]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[cfg(test)]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts a fetch of the current page. Any ticket handed out earlier
    /// becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.fetch_pending = true;
        self.sync_loading();
        FetchTicket {
            generation: self.generation,
            scope: self.scope,
            page: self.current_page,
            per_page: TASKS_PER_PAGE,
        }
    }

    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: ApiResult<TaskPage>) -> FetchOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "dropping stale task page"
            );
            return FetchOutcome::Stale;
        }

        self.fetch_pending = false;
        self.sync_loading();
        match result {
            Ok(page) => {
                self.tasks = page.tasks;
                self.total_pages = page.pages;
                FetchOutcome::Applied
            }
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    /// Moves to `page` without clamping. The caller fetches afterwards.
    pub fn set_page(&mut self, page: u32) {
        self.current_page = page;
    }

    pub fn select_filter(&mut self, column: FilterColumn, choice: FilterChoice) {
        match choice {
            FilterChoice::All => {
                self.filters.remove(&column);
            }
            FilterChoice::Value(v) => {
                self.filters.insert(column, v);
            }
        }
    }

    pub fn active_filter(&self, column: FilterColumn) -> Option<&str> {
        self.filters.get(&column).map(String::as_str)
    }

    /// Distinct cell values of `column` on the loaded page, first-seen order.
    /// An active value missing from the page is appended so it stays
    /// selected and can be cleared.
    pub fn filter_options(&self, column: FilterColumn) -> Vec<String> {
        let mut seen = Vec::new();
        for task in &self.tasks {
            let text = column.cell_text(task);
            if !seen.contains(&text) {
                seen.push(text);
            }
        }
        if let Some(active) = self.filters.get(&column) {
            if !seen.contains(active) {
                seen.push(active.clone());
            }
        }
        seen
    }

    /// Rows of the loaded page that pass every active filter.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| {
                self.filters
                    .iter()
                    .all(|(column, value)| column.cell_text(task) == *value)
            })
            .cloned()
            .collect()
    }

    pub fn begin_mutation(&mut self) {
        self.mutations_in_flight += 1;
        self.sync_loading();
    }

    /// Busy while a fetch or any mutation is outstanding.
    fn sync_loading(&mut self) {
        self.loading = self.fetch_pending || self.mutations_in_flight > 0;
    }

    pub fn finish_mutation(
        &mut self,
        kind: MutationKind,
        result: ApiResult<MessageResponse>,
    ) -> MutationFollowUp {
        self.mutations_in_flight = self.mutations_in_flight.saturating_sub(1);
        self.sync_loading();
        match result {
            Ok(resp) => {
                let message = match kind {
                    MutationKind::Note => resp
                        .message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| kind.success_message().to_string()),
                    _ => kind.success_message().to_string(),
                };
                MutationFollowUp {
                    notice: Notice {
                        kind: ToastKind::Success,
                        message,
                    },
                    refetch: true,
                    unauthorized: false,
                }
            }
            Err(e) => {
                tracing::warn!(?kind, error = %e, "task mutation failed");
                MutationFollowUp {
                    notice: Notice {
                        kind: ToastKind::Error,
                        message: kind.failure_message().to_string(),
                    },
                    refetch: kind != MutationKind::Duplicate,
                    unauthorized: e.is_unauthorized(),
                }
            }
        }
    }

    pub fn prepare_duplicate(
        &self,
        task: &Task,
        now: DateTime<Utc>,
    ) -> Result<DuplicateTaskRequest, DuplicateRejected> {
        duplicate_request(task, now)
    }

    /// `None` while the server reports no pages.
    pub fn pagination(&self) -> Option<PaginationView> {
        if self.total_pages == 0 {
            return None;
        }
        Some(PaginationView {
            pages: (1..=self.total_pages).collect(),
            active: self.current_page,
            prev_disabled: self.current_page <= 1,
            next_disabled: self.current_page >= self.total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use crate::models::{TaskId, TaskStatus, TaskType, UserId};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn task(id: i64, entity: &str, task_type: TaskType, contact: &str, status: TaskStatus) -> Task {
        Task {
            id: TaskId(id),
            date_created: None,
            entity_name: entity.to_string(),
            task_type,
            time_of_task: Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap(),
            contact_person: contact.to_string(),
            contact_person_id: None,
            note: None,
            status,
            user_id: Some(UserId(1)),
        }
    }

    fn sample_page() -> TaskPage {
        TaskPage {
            tasks: vec![
                task(1, "Acme", TaskType::Call, "Bob", TaskStatus::Open),
                task(2, "Globex", TaskType::Meeting, "Bob", TaskStatus::Closed),
                task(3, "Acme", TaskType::Meeting, "Cleo", TaskStatus::Open),
                task(4, "Initech", TaskType::Call, "Cleo", TaskStatus::Open),
            ],
            pages: 1,
            total: Some(4),
            current_page: Some(1),
        }
    }

    fn loaded() -> TaskListController {
        let mut c = TaskListController::new(TaskScope::All);
        let ticket = c.begin_fetch();
        assert!(matches!(c.apply_fetch(ticket, Ok(sample_page())), FetchOutcome::Applied));
        c
    }

    fn server_error(status: u16) -> ApiError {
        ApiError {
            kind: ApiErrorKind::Http,
            status: Some(status),
            message: "boom".to_string(),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id.0).collect()
    }

    #[test]
    fn test_fetch_ticket_carries_page_and_size() {
        let mut c = TaskListController::new(TaskScope::Mine);
        c.set_page(2);
        let ticket = c.begin_fetch();
        assert!(c.is_loading());
        assert_eq!(ticket.page, 2);
        assert_eq!(ticket.per_page, TASKS_PER_PAGE);
        assert_eq!(ticket.scope, TaskScope::Mine);
    }

    #[test]
    fn test_second_page_of_three() {
        let mut c = TaskListController::new(TaskScope::All);
        c.set_page(2);
        let ticket = c.begin_fetch();
        let page = TaskPage {
            tasks: (1..=6)
                .map(|i| task(i, "E", TaskType::Call, "Bob", TaskStatus::Open))
                .collect(),
            pages: 3,
            total: None,
            current_page: None,
        };
        c.apply_fetch(ticket, Ok(page));

        assert!(!c.is_loading());
        assert_eq!(c.visible_tasks().len(), 6);
        let view = c.pagination().expect("pages reported");
        assert_eq!(view.pages, vec![1, 2, 3]);
        assert_eq!(view.active, 2);
        assert!(!view.prev_disabled);
        assert!(!view.next_disabled);
    }

    #[test]
    fn test_stale_response_never_overwrites_newer_state() {
        let mut c = TaskListController::new(TaskScope::All);
        let first = c.begin_fetch();
        c.set_page(2);
        let second = c.begin_fetch();

        assert!(matches!(c.apply_fetch(second, Ok(sample_page())), FetchOutcome::Applied));
        let stale = TaskPage {
            tasks: vec![task(99, "Old", TaskType::Other, "X", TaskStatus::Open)],
            pages: 7,
            ..TaskPage::default()
        };
        assert!(matches!(c.apply_fetch(first, Ok(stale)), FetchOutcome::Stale));
        assert_eq!(ids(c.tasks()), vec![1, 2, 3, 4]);
        assert_eq!(c.total_pages(), 1);
    }

    #[test]
    fn test_stale_response_leaves_loading_for_newer_fetch() {
        let mut c = TaskListController::new(TaskScope::All);
        let first = c.begin_fetch();
        let _second = c.begin_fetch();
        assert!(matches!(c.apply_fetch(first, Ok(sample_page())), FetchOutcome::Stale));
        assert!(c.is_loading());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_rows() {
        let mut c = loaded();
        let ticket = c.begin_fetch();
        let outcome = c.apply_fetch(ticket, Err(server_error(500)));
        assert!(matches!(outcome, FetchOutcome::Failed(ref e) if e.status == Some(500)));
        assert!(!c.is_loading());
        assert_eq!(ids(c.tasks()), vec![1, 2, 3, 4]);
    }

    #[rstest]
    #[case(FilterColumn::EntityName, "Acme", vec![1, 3])]
    #[case(FilterColumn::TaskType, "Meeting", vec![2, 3])]
    #[case(FilterColumn::ContactPerson, "Cleo", vec![3, 4])]
    #[case(FilterColumn::Status, "closed", vec![2])]
    #[case(FilterColumn::EntityName, "Nobody", vec![])]
    fn test_filter_matches_cell_text(
        #[case] column: FilterColumn,
        #[case] value: &str,
        #[case] expected: Vec<i64>,
    ) {
        let mut c = loaded();
        c.select_filter(column, FilterChoice::Value(value.to_string()));
        assert_eq!(ids(&c.visible_tasks()), expected);
    }

    #[test]
    fn test_filters_are_anded_and_all_restores_page() {
        let mut c = loaded();
        c.select_filter(FilterColumn::EntityName, FilterChoice::Value("Acme".to_string()));
        c.select_filter(FilterColumn::TaskType, FilterChoice::Value("Meeting".to_string()));
        assert_eq!(ids(&c.visible_tasks()), vec![3]);
        assert_eq!(c.active_filter(FilterColumn::TaskType), Some("Meeting"));

        c.select_filter(FilterColumn::TaskType, FilterChoice::All);
        assert_eq!(ids(&c.visible_tasks()), vec![1, 3]);
        c.select_filter(FilterColumn::EntityName, FilterChoice::All);
        assert_eq!(ids(&c.visible_tasks()), vec![1, 2, 3, 4]);
        assert_eq!(c.active_filter(FilterColumn::EntityName), None);
    }

    #[test]
    fn test_filter_options_are_distinct_in_first_seen_order() {
        let c = loaded();
        assert_eq!(
            c.filter_options(FilterColumn::EntityName),
            vec!["Acme", "Globex", "Initech"]
        );
        assert_eq!(c.filter_options(FilterColumn::Status), vec!["open", "closed"]);
        // Missing notes share the empty cell.
        assert_eq!(c.filter_options(FilterColumn::Note), vec![""]);
    }

    #[test]
    fn test_filter_kept_across_page_change_stays_clearable() {
        let mut c = loaded();
        c.select_filter(FilterColumn::EntityName, FilterChoice::Value("Globex".to_string()));
        assert_eq!(ids(&c.visible_tasks()), vec![2]);

        c.set_page(2);
        let ticket = c.begin_fetch();
        let next = TaskPage {
            tasks: vec![
                task(7, "Umbrella", TaskType::Call, "Dan", TaskStatus::Open),
                task(8, "Hooli", TaskType::Other, "Eve", TaskStatus::Open),
            ],
            pages: 2,
            ..TaskPage::default()
        };
        c.apply_fetch(ticket, Ok(next));

        assert_eq!(c.current_page(), 2);
        assert!(c.visible_tasks().is_empty());
        assert_eq!(
            c.filter_options(FilterColumn::EntityName),
            vec!["Umbrella", "Hooli", "Globex"]
        );
        c.select_filter(FilterColumn::EntityName, FilterChoice::All);
        assert_eq!(ids(&c.visible_tasks()), vec![7, 8]);
        assert_eq!(c.filter_options(FilterColumn::EntityName), vec!["Umbrella", "Hooli"]);
    }

    #[test]
    fn test_blank_note_filters_as_empty_cell() {
        let mut c = TaskListController::new(TaskScope::All);
        let ticket = c.begin_fetch();
        let mut blank = task(1, "Acme", TaskType::Call, "Bob", TaskStatus::Open);
        blank.note = Some("   ".to_string());
        let bare = task(2, "Globex", TaskType::Call, "Bob", TaskStatus::Open);
        c.apply_fetch(
            ticket,
            Ok(TaskPage {
                tasks: vec![blank, bare],
                pages: 1,
                ..TaskPage::default()
            }),
        );

        assert_eq!(c.filter_options(FilterColumn::Note), vec![""]);
        c.select_filter(FilterColumn::Note, FilterChoice::Value(String::new()));
        assert_eq!(ids(&c.visible_tasks()), vec![1, 2]);
    }

    #[test]
    fn test_mutation_does_not_clear_loading_of_pending_fetch() {
        let mut c = loaded();
        c.begin_mutation();
        c.set_page(2);
        let ticket = c.begin_fetch();

        c.finish_mutation(MutationKind::Delete, Ok(MessageResponse::default()));
        assert!(c.is_loading());

        c.apply_fetch(ticket, Ok(TaskPage { pages: 2, ..TaskPage::default() }));
        assert!(!c.is_loading());
    }

    #[test]
    fn test_fetch_does_not_clear_loading_of_pending_mutation() {
        let mut c = TaskListController::new(TaskScope::All);
        let ticket = c.begin_fetch();
        c.begin_mutation();
        c.apply_fetch(ticket, Ok(sample_page()));
        assert!(c.is_loading());

        c.finish_mutation(MutationKind::Edit, Ok(MessageResponse::default()));
        assert!(!c.is_loading());
    }

    #[test]
    fn test_time_filter_uses_displayed_time() {
        let mut c = loaded();
        let shown = display_time(&c.tasks()[0].time_of_task);
        c.select_filter(FilterColumn::TimeOfTask, FilterChoice::Value(shown));
        assert_eq!(c.visible_tasks().len(), 4);
    }

    #[rstest]
    #[case(1, 3, true, false)]
    #[case(3, 3, false, true)]
    #[case(1, 1, true, true)]
    fn test_pagination_edges(
        #[case] page: u32,
        #[case] total: u32,
        #[case] prev_disabled: bool,
        #[case] next_disabled: bool,
    ) {
        let mut c = TaskListController::new(TaskScope::All);
        c.set_page(page);
        let ticket = c.begin_fetch();
        c.apply_fetch(
            ticket,
            Ok(TaskPage {
                pages: total,
                ..TaskPage::default()
            }),
        );
        let view = c.pagination().expect("pages reported");
        assert_eq!(view.pages.len() as u32, total);
        assert_eq!(view.prev_disabled, prev_disabled);
        assert_eq!(view.next_disabled, next_disabled);
    }

    #[test]
    fn test_no_pagination_without_pages() {
        let mut c = TaskListController::new(TaskScope::Mine);
        let ticket = c.begin_fetch();
        c.apply_fetch(ticket, Ok(TaskPage::default()));
        assert_eq!(c.pagination(), None);
        assert!(c.visible_tasks().is_empty());
    }

    #[test]
    fn test_failed_delete_keeps_rows_and_requests_refetch() {
        let mut c = loaded();
        c.begin_mutation();
        assert!(c.is_loading());
        let follow = c.finish_mutation(MutationKind::Delete, Err(server_error(500)));
        assert_eq!(
            follow,
            MutationFollowUp {
                notice: Notice {
                    kind: ToastKind::Error,
                    message: "Failed to delete task.".to_string()
                },
                refetch: true,
                unauthorized: false,
            }
        );
        assert!(!c.is_loading());
        assert_eq!(ids(c.tasks()), vec![1, 2, 3, 4]);
    }

    #[rstest]
    #[case(MutationKind::Delete, "Task deleted successfully.")]
    #[case(MutationKind::StatusUpdate, "Task updated successfully.")]
    #[case(MutationKind::Edit, "Task updated successfully.")]
    #[case(MutationKind::Duplicate, "Task duplicated successfully.")]
    fn test_successful_mutations_refetch(#[case] kind: MutationKind, #[case] message: &str) {
        let mut c = loaded();
        c.begin_mutation();
        let follow = c.finish_mutation(kind, Ok(MessageResponse::default()));
        assert_eq!(follow.notice.kind, ToastKind::Success);
        assert_eq!(follow.notice.message, message);
        assert!(follow.refetch);
    }

    #[test]
    fn test_failed_duplicate_does_not_refetch() {
        let mut c = loaded();
        c.begin_mutation();
        let follow = c.finish_mutation(MutationKind::Duplicate, Err(server_error(400)));
        assert!(!follow.refetch);
        assert_eq!(follow.notice.message, "Failed to duplicate task.");
    }

    #[test]
    fn test_note_success_prefers_server_message() {
        let mut c = loaded();
        let follow = c.finish_mutation(
            MutationKind::Note,
            Ok(MessageResponse {
                message: Some("Task updated".to_string()),
            }),
        );
        assert_eq!(follow.notice.message, "Task updated");

        let follow = c.finish_mutation(MutationKind::Note, Ok(MessageResponse::default()));
        assert_eq!(follow.notice.message, "Note updated successfully.");
    }

    #[test]
    fn test_unauthorized_mutation_is_flagged() {
        let mut c = loaded();
        let err = ApiError {
            kind: ApiErrorKind::Unauthorized,
            status: Some(401),
            message: "Token has expired".to_string(),
        };
        let follow = c.finish_mutation(MutationKind::StatusUpdate, Err(err));
        assert!(follow.unauthorized);
        assert_eq!(follow.notice.message, "Failed to update task.");
    }

    #[test]
    fn test_prepare_duplicate_rejects_past_task() {
        let c = loaded();
        let now = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            c.prepare_duplicate(&c.tasks()[0], now),
            Err(DuplicateRejected::PastTask)
        );

        let earlier = Utc.with_ymd_and_hms(2029, 1, 1, 0, 0, 0).unwrap();
        let req = c
            .prepare_duplicate(&c.tasks()[0], earlier)
            .expect("future task duplicates");
        assert_eq!(req.entity_name, "Acme");
    }
}
