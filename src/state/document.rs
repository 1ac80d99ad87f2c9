use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StateError;

/// Open-shape journal entries coming from the dashboard. The client decides the fields, the
/// store only stamps an id and a timestamp.
pub type JournalEntry = Map<String, Value>;

/// The top-level UI context selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Selection,
    Work,
    Chill,
}

impl Mode {
    pub fn parse(value: &str) -> Result<Self, StateError> {
        match value {
            "selection" => Ok(Self::Selection),
            "work" => Ok(Self::Work),
            "chill" => Ok(Self::Chill),
            other => Err(StateError::Validation(format!("Unknown mode '{other}'"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Work => "work",
            Self::Chill => "chill",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Which journal list an entry lands in, and how many points logging it awards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Sentiment,
    Food,
    Comfort,
}

impl EntryKind {
    pub fn points_awarded(self) -> i64 {
        match self {
            Self::Sentiment => 15,
            Self::Food => 5,
            Self::Comfort => 5,
        }
    }

    // The comfort vault historically stamps `createdAt` where the other journals use `date`.
    fn timestamp_field(self) -> &'static str {
        match self {
            Self::Sentiment | Self::Food => "date",
            Self::Comfort => "createdAt",
        }
    }
}

/// Result of flipping a task's completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskToggle {
    pub completed: bool,
    pub focus_points: i64,
}

/// The single persisted document shared by the tracker, the CLI and the dashboard API.
///
/// Field names are part of the on-disk and over-the-wire contract; `notes`, `reminders` and
/// `focus_history` are dashboard-owned lists the daemon never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppDocument {
    pub user: Value,
    pub current_mode: Mode,
    pub tasks: Vec<Task>,
    pub notes: Vec<Value>,
    pub reminders: Vec<Value>,
    pub daily_goal: String,
    pub daily_goal_completed: bool,
    pub sentiment_entries: Vec<JournalEntry>,
    pub food_entries: Vec<JournalEntry>,
    pub focus_points: i64,
    pub comfort_vault: Vec<JournalEntry>,
    pub focus_history: Vec<Value>,
}

impl Default for AppDocument {
    fn default() -> Self {
        Self {
            user: Value::Null,
            current_mode: Mode::Selection,
            tasks: Vec::new(),
            notes: Vec::new(),
            reminders: Vec::new(),
            daily_goal: String::new(),
            daily_goal_completed: false,
            sentiment_entries: Vec::new(),
            food_entries: Vec::new(),
            focus_points: 0,
            comfort_vault: Vec::new(),
            focus_history: Vec::new(),
        }
    }
}

const TASK_COMPLETION_POINTS: i64 = 10;

impl AppDocument {
    /// Appends a task. Ids are assigned as the current task count, which keeps the legacy
    /// behavior of ids not being stable under deletion.
    pub fn add_task(&mut self, text: &str, now: DateTime<Utc>) -> Result<Task, StateError> {
        if text.is_empty() {
            return Err(StateError::Validation("Task text required".into()));
        }
        let task = Task {
            id: self.tasks.len() as i64,
            text: text.to_string(),
            completed: false,
            created_at: now,
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flips completion of the task with `id`, awarding points on completion and taking them
    /// back when a task is unchecked.
    pub fn toggle_task(&mut self, id: i64) -> Result<TaskToggle, StateError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Err(StateError::NotFound(format!("Task {id} not found")));
        };
        task.completed = !task.completed;
        if task.completed {
            self.focus_points += TASK_COMPLETION_POINTS;
        } else {
            self.focus_points -= TASK_COMPLETION_POINTS;
        }
        Ok(TaskToggle {
            completed: task.completed,
            focus_points: self.focus_points,
        })
    }

    /// Removes every task with `id`. Deleting an unknown id is a no-op, not an error.
    pub fn delete_task(&mut self, id: i64) {
        self.tasks.retain(|t| t.id != id);
    }

    /// Stamps `entry` with an id and a timestamp, prepends it to the kind's journal (newest
    /// first) and returns the points awarded.
    pub fn log_entry(&mut self, kind: EntryKind, mut entry: JournalEntry, now: DateTime<Utc>) -> i64 {
        entry.insert("id".into(), Value::String(entry_id(now)));
        entry.insert(
            kind.timestamp_field().into(),
            Value::String(now.to_rfc3339()),
        );
        let journal = match kind {
            EntryKind::Sentiment => &mut self.sentiment_entries,
            EntryKind::Food => &mut self.food_entries,
            EntryKind::Comfort => &mut self.comfort_vault,
        };
        journal.insert(0, entry);
        let points = kind.points_awarded();
        self.focus_points += points;
        points
    }

    /// Unbounded point adjustment. Returns the new total.
    pub fn adjust_points(&mut self, delta: i64) -> i64 {
        self.focus_points += delta;
        self.focus_points
    }

    pub fn set_goal(&mut self, text: String, completed: bool) {
        self.daily_goal = text;
        self.daily_goal_completed = completed;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.current_mode = mode;
    }
}

/// Entry ids are epoch seconds with a fractional part, kept as a string.
fn entry_id(now: DateTime<Utc>) -> String {
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}
