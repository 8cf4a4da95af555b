use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

mod wire_time;

pub(crate) use wire_time::format_wire_time;

/// Server-assigned task id. Opaque to the client.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub(crate) struct TaskId(pub i64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account id. Contact persons are other accounts, so the same id space is
/// used for `contact_person_id` and `user_id`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub(crate) struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter,
    EnumString,
)]
pub(crate) enum TaskType {
    Call,
    #[serde(rename = "Video Call")]
    #[strum(serialize = "Video Call")]
    VideoCall,
    Meeting,
    Other,
}

impl TaskType {
    pub fn emoji(&self) -> &'static str {
        match self {
            TaskType::Call => "📞",
            TaskType::VideoCall => "📹",
            TaskType::Meeting => "📅",
            TaskType::Other => "🔗",
        }
    }
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum TaskStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Task {
    pub id: TaskId,

    #[serde(default)]
    pub date_created: Option<String>,

    pub entity_name: String,
    pub task_type: TaskType,

    #[serde(with = "wire_time")]
    pub time_of_task: DateTime<Utc>,

    pub contact_person: String,

    /// Not every listing endpoint reports this; forms resolve it from the
    /// contact name when missing.
    #[serde(default)]
    pub contact_person_id: Option<UserId>,

    #[serde(default)]
    pub note: Option<String>,

    pub status: TaskStatus,

    /// Assignee account. Absent from the my-tasks listing.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl Task {
    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ContactPerson {
    pub id: UserId,
    pub name: String,
}

/// One page of tasks as returned by the listing endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct TaskPage {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}

/// Which subset of tasks a list view shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum TaskScope {
    #[default]
    All,
    Mine,
}

impl TaskScope {
    pub fn endpoint(&self) -> &'static str {
        match self {
            TaskScope::All => "/tasks/all-tasks",
            TaskScope::Mine => "/tasks/my-tasks",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            TaskScope::All => "Great job! All tasks are completed!",
            TaskScope::Mine => "You have completed all your tasks!",
        }
    }
}
