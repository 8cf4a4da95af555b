use crate::api::{CreateTaskRequest, DuplicateTaskRequest, UpdateTaskRequest};
use crate::models::{format_wire_time, ContactPerson, Task, TaskStatus, TaskType, UserId};
use crate::util::{
    format_datetime_local, format_naive_utc, local_to_utc, parse_datetime_local, to_local_naive,
};
use chrono::{DateTime, Days, Months, NaiveDateTime, Utc};
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Characters that satisfy the "special character" password rule.
pub(crate) const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
pub(crate) enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordRule {
    pub fn description(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "At least 8 characters long",
            PasswordRule::Uppercase => "Contain at least one uppercase letter",
            PasswordRule::Lowercase => "Contain at least one lowercase letter",
            PasswordRule::Digit => "Contain at least one number",
            PasswordRule::Special => "Contain at least one special character (@$!%*?&)",
        }
    }

    pub fn is_met(&self, password: &str) -> bool {
        match self {
            PasswordRule::MinLength => password.chars().count() >= MIN_PASSWORD_LEN,
            PasswordRule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRule::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRule::Special => password.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
        }
    }
}

/// Every rule paired with whether `password` satisfies it, in display order.
pub(crate) fn check_password(password: &str) -> Vec<(PasswordRule, bool)> {
    PasswordRule::iter()
        .map(|rule| (rule, rule.is_met(password)))
        .collect()
}

pub(crate) fn is_strong_password(password: &str) -> bool {
    PasswordRule::iter().all(|rule| rule.is_met(password))
}

/// Bounds for a task's scheduled time, in local wall time: from "now" to two
/// calendar months ahead, both inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScheduleWindow {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

impl ScheduleWindow {
    pub fn from_now(now: NaiveDateTime) -> Self {
        let max = now
            .checked_add_months(Months::new(2))
            .or_else(|| now.checked_add_days(Days::new(61)))
            .unwrap_or(now);
        Self { min: now, max }
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        *at >= self.min && *at <= self.max
    }

    /// `min` attribute for the picker.
    pub fn min_attr(&self) -> String {
        format_datetime_local(&self.min)
    }

    /// `max` attribute for the picker.
    pub fn max_attr(&self) -> String {
        format_datetime_local(&self.max)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum TaskFormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Unknown task type: {0}")]
    UnknownTaskType(String),
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
    #[error("Invalid date and time")]
    InvalidTime,
    #[error("Time must be between now and two months from now")]
    OutsideWindow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum DuplicateRejected {
    #[error("Cannot duplicate past tasks.")]
    PastTask,
}

/// Raw values of a task form as typed by the user. Every field is the exact
/// string bound to its input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TaskDraft {
    pub entity_name: String,
    pub task_type: String,
    /// `datetime-local` value, local wall time.
    pub time_of_task: String,
    pub contact_person: String,
    pub contact_person_id: Option<UserId>,
    pub note: String,
    pub status: String,
}

impl TaskDraft {
    /// Blank creation form. Status is fixed to open.
    pub fn blank() -> Self {
        Self {
            status: TaskStatus::Open.to_string(),
            ..Self::default()
        }
    }

    /// Edit form prefilled from a table row.
    pub fn from_task(task: &Task) -> Self {
        Self {
            entity_name: task.entity_name.clone(),
            task_type: task.task_type.to_string(),
            time_of_task: format_datetime_local(&to_local_naive(&task.time_of_task)),
            contact_person: task.contact_person.clone(),
            contact_person_id: task.contact_person_id,
            note: task.note.clone().unwrap_or_default(),
            status: task.status.to_string(),
        }
    }

    /// Fields required by both forms are non-blank.
    pub fn has_required(&self) -> bool {
        self.missing_field().is_none()
    }

    fn missing_field(&self) -> Option<&'static str> {
        [
            ("Entity name", &self.entity_name),
            ("Task type", &self.task_type),
            ("Time of task", &self.time_of_task),
            ("Contact person", &self.contact_person),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map(|(label, _)| label)
    }

    fn check_common(&self) -> Result<(TaskType, NaiveDateTime), TaskFormError> {
        if let Some(label) = self.missing_field() {
            return Err(TaskFormError::Missing(label));
        }
        let task_type = TaskType::from_str(&self.task_type)
            .map_err(|_| TaskFormError::UnknownTaskType(self.task_type.clone()))?;
        let picked = parse_datetime_local(&self.time_of_task).ok_or(TaskFormError::InvalidTime)?;
        Ok((task_type, picked))
    }

    /// True when the creation form may be submitted.
    pub fn can_create(&self, window: &ScheduleWindow) -> bool {
        self.to_create_request(window).is_ok()
    }

    pub fn to_create_request(
        &self,
        window: &ScheduleWindow,
    ) -> Result<CreateTaskRequest, TaskFormError> {
        let (task_type, picked) = self.check_common()?;
        if !window.contains(&picked) {
            return Err(TaskFormError::OutsideWindow);
        }
        let at = local_to_utc(&picked).ok_or(TaskFormError::InvalidTime)?;
        Ok(CreateTaskRequest {
            entity_name: self.entity_name.trim().to_string(),
            task_type,
            time_of_task: format_naive_utc(&at),
            contact_person: self.contact_person.clone(),
            contact_person_id: self.contact_person_id,
            note: self.note.clone(),
            status: TaskStatus::Open,
        })
    }

    /// Full-field update for the edit form. The schedule window is not
    /// enforced when editing.
    pub fn to_update_request(&self) -> Result<UpdateTaskRequest, TaskFormError> {
        let (task_type, picked) = self.check_common()?;
        let status = TaskStatus::from_str(&self.status)
            .map_err(|_| TaskFormError::UnknownStatus(self.status.clone()))?;
        let at = local_to_utc(&picked).ok_or(TaskFormError::InvalidTime)?;
        Ok(UpdateTaskRequest {
            entity_name: Some(self.entity_name.trim().to_string()),
            task_type: Some(task_type),
            time_of_task: Some(format_naive_utc(&at)),
            contact_person: Some(self.contact_person.clone()),
            contact_person_id: self.contact_person_id,
            note: Some(self.note.clone()),
            status: Some(status),
        })
    }
}

/// Id of the first contact whose name matches exactly.
pub(crate) fn resolve_contact_id(contacts: &[ContactPerson], name: &str) -> Option<UserId> {
    contacts.iter().find(|c| c.name == name).map(|c| c.id)
}

/// Contacts offered when editing. The signed-in user is left out.
pub(crate) fn contacts_except(contacts: Vec<ContactPerson>, user_name: Option<&str>) -> Vec<ContactPerson> {
    match user_name {
        Some(name) => contacts.into_iter().filter(|c| c.name != name).collect(),
        None => contacts,
    }
}

/// Copy of `task` ready for the duplicate endpoint. Past tasks are refused.
pub(crate) fn duplicate_request(
    task: &Task,
    now: DateTime<Utc>,
) -> Result<DuplicateTaskRequest, DuplicateRejected> {
    if task.time_of_task < now {
        return Err(DuplicateRejected::PastTask);
    }
    Ok(DuplicateTaskRequest {
        entity_name: task.entity_name.clone(),
        task_type: task.task_type,
        time_of_task: format_wire_time(&task.time_of_task),
        contact_person: task.contact_person.clone(),
        note: task.note.clone(),
        status: task.status,
        user_id: task.user_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid date")
    }

    fn contacts() -> Vec<ContactPerson> {
        vec![
            ContactPerson {
                id: UserId(2),
                name: "Bob".to_string(),
            },
            ContactPerson {
                id: UserId(3),
                name: "Cleo".to_string(),
            },
            ContactPerson {
                id: UserId(9),
                name: "Bob".to_string(),
            },
        ]
    }

    fn task_at(time: DateTime<Utc>) -> Task {
        Task {
            id: TaskId(5),
            date_created: None,
            entity_name: "Acme".to_string(),
            task_type: TaskType::Meeting,
            time_of_task: time,
            contact_person: "Bob".to_string(),
            contact_person_id: Some(UserId(2)),
            note: Some("bring slides".to_string()),
            status: TaskStatus::Open,
            user_id: Some(UserId(2)),
        }
    }

    fn filled_draft(time: &str) -> TaskDraft {
        TaskDraft {
            entity_name: "Acme".to_string(),
            task_type: "Video Call".to_string(),
            time_of_task: time.to_string(),
            contact_person: "Cleo".to_string(),
            contact_person_id: Some(UserId(3)),
            note: String::new(),
            status: "open".to_string(),
        }
    }

    #[rstest]
    #[case("", false)]
    #[case("short1!", false)]
    #[case("alllowercase1!", false)]
    #[case("ALLUPPERCASE1!", false)]
    #[case("NoDigitsHere!", false)]
    #[case("NoSpecial123", false)]
    #[case("Secret1#", false)]
    #[case("Secret1!", true)]
    #[case("Ab3$efgh", true)]
    fn test_password_strength(#[case] password: &str, #[case] strong: bool) {
        assert_eq!(is_strong_password(password), strong);
    }

    #[rstest]
    #[case(PasswordRule::MinLength, "abcdefgh", true)]
    #[case(PasswordRule::MinLength, "abcdefg", false)]
    #[case(PasswordRule::Uppercase, "abcD", true)]
    #[case(PasswordRule::Lowercase, "ABCd", true)]
    #[case(PasswordRule::Digit, "abc", false)]
    #[case(PasswordRule::Special, "a&b", true)]
    #[case(PasswordRule::Special, "a#b", false)]
    fn test_individual_rules(#[case] rule: PasswordRule, #[case] pw: &str, #[case] met: bool) {
        assert_eq!(rule.is_met(pw), met);
    }

    #[test]
    fn test_check_password_lists_all_rules_in_order() {
        let checks = check_password("abc");
        let rules: Vec<_> = checks.iter().map(|(r, _)| *r).collect();
        assert_eq!(
            rules,
            vec![
                PasswordRule::MinLength,
                PasswordRule::Uppercase,
                PasswordRule::Lowercase,
                PasswordRule::Digit,
                PasswordRule::Special,
            ]
        );
        assert_eq!(
            checks.iter().filter(|(_, ok)| *ok).count(),
            1,
            "only the lowercase rule holds"
        );
    }

    #[test]
    fn test_schedule_window_is_two_calendar_months() {
        let window = ScheduleWindow::from_now(at(2024, 12, 31, 9, 0));
        assert_eq!(window.max, at(2025, 2, 28, 9, 0));
        assert_eq!(window.min_attr(), "2024-12-31T09:00");
        assert_eq!(window.max_attr(), "2025-02-28T09:00");
    }

    #[test]
    fn test_schedule_window_bounds_are_inclusive() {
        let window = ScheduleWindow::from_now(at(2024, 10, 15, 9, 0));
        assert!(window.contains(&at(2024, 10, 15, 9, 0)));
        assert!(window.contains(&at(2024, 12, 15, 9, 0)));
        assert!(!window.contains(&at(2024, 10, 15, 8, 59)));
        assert!(!window.contains(&at(2024, 12, 15, 9, 1)));
    }

    #[test]
    fn test_create_request_requires_fields() {
        let window = ScheduleWindow::from_now(at(2024, 10, 15, 9, 0));
        let mut draft = filled_draft("2024-10-20T10:00");
        draft.contact_person = " ".to_string();
        assert_eq!(
            draft.to_create_request(&window),
            Err(TaskFormError::Missing("Contact person"))
        );
        assert!(!draft.can_create(&window));
        assert!(!TaskDraft::blank().has_required());
    }

    #[test]
    fn test_create_request_rejects_time_outside_window() {
        let window = ScheduleWindow::from_now(at(2024, 10, 15, 9, 0));
        let past = filled_draft("2024-10-14T10:00");
        assert_eq!(
            past.to_create_request(&window),
            Err(TaskFormError::OutsideWindow)
        );
        let far = filled_draft("2025-01-01T10:00");
        assert_eq!(far.to_create_request(&window), Err(TaskFormError::OutsideWindow));
        let garbage = filled_draft("tomorrow");
        assert_eq!(
            garbage.to_create_request(&window),
            Err(TaskFormError::InvalidTime)
        );
    }

    #[test]
    fn test_create_request_sends_picked_time_as_utc() {
        let window = ScheduleWindow::from_now(at(2024, 10, 15, 9, 0));
        let req = filled_draft("2024-10-20T10:00")
            .to_create_request(&window)
            .expect("draft is valid");
        let expected = local_to_utc(&at(2024, 10, 20, 10, 0)).expect("unambiguous");
        assert_eq!(req.time_of_task, format_naive_utc(&expected));
        assert_eq!(req.task_type, TaskType::VideoCall);
        assert_eq!(req.status, TaskStatus::Open);
        assert_eq!(req.contact_person_id, Some(UserId(3)));
    }

    #[test]
    fn test_edit_draft_roundtrips_row_into_update() {
        let time = Utc.with_ymd_and_hms(2024, 10, 15, 10, 30, 0).unwrap();
        let mut draft = TaskDraft::from_task(&task_at(time));
        assert_eq!(draft.status, "open");
        assert_eq!(draft.task_type, "Meeting");
        draft.status = "closed".to_string();

        let req = draft.to_update_request().expect("draft is valid");
        assert_eq!(req.status, Some(TaskStatus::Closed));
        assert_eq!(req.time_of_task.as_deref(), Some("2024-10-15T10:30:00"));
        assert_eq!(req.note.as_deref(), Some("bring slides"));
        assert_eq!(req.contact_person_id, Some(UserId(2)));
    }

    #[test]
    fn test_edit_draft_rejects_unknown_status() {
        let mut draft = filled_draft("2024-10-20T10:00");
        draft.status = "archived".to_string();
        assert_eq!(
            draft.to_update_request(),
            Err(TaskFormError::UnknownStatus("archived".to_string()))
        );
    }

    #[test]
    fn test_contact_resolution_first_match_or_none() {
        let contacts = contacts();
        assert_eq!(resolve_contact_id(&contacts, "Bob"), Some(UserId(2)));
        assert_eq!(resolve_contact_id(&contacts, "Cleo"), Some(UserId(3)));
        assert_eq!(resolve_contact_id(&contacts, "Dana"), None);
        assert_eq!(resolve_contact_id(&contacts, ""), None);
    }

    #[test]
    fn test_contacts_except_drops_signed_in_user() {
        let names: Vec<_> = contacts_except(contacts(), Some("Bob"))
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Cleo"]);
        assert_eq!(contacts_except(contacts(), None).len(), 3);
    }

    #[test]
    fn test_duplicate_of_past_task_is_rejected() {
        let now = Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0).unwrap();
        let past = task_at(Utc.with_ymd_and_hms(2024, 10, 15, 11, 59, 0).unwrap());
        assert_eq!(duplicate_request(&past, now), Err(DuplicateRejected::PastTask));
        assert_eq!(
            DuplicateRejected::PastTask.to_string(),
            "Cannot duplicate past tasks."
        );
    }

    #[test]
    fn test_duplicate_of_task_due_right_now_is_allowed() {
        let now = Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0).unwrap();
        let req = duplicate_request(&task_at(now), now).expect("task due now duplicates");
        assert_eq!(req.time_of_task, "2024-10-15T12:00:00.000Z");
    }

    #[test]
    fn test_duplicate_copies_fields_with_wire_time() {
        let now = Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0).unwrap();
        let future = task_at(Utc.with_ymd_and_hms(2024, 10, 20, 8, 15, 0).unwrap());
        let req = duplicate_request(&future, now).expect("future task duplicates");
        assert_eq!(req.time_of_task, "2024-10-20T08:15:00.000Z");
        assert_eq!(req.entity_name, "Acme");
        assert_eq!(req.note.as_deref(), Some("bring slides"));
        assert_eq!(req.user_id, Some(UserId(2)));
    }
}
