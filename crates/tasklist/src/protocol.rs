//! Wire format of the task endpoint.
//!
//! Every call is a `multipart/form-data` POST carrying an `action` field plus
//! the action's inputs. Every reply is a JSON object with a `success` flag, an
//! optional `error` string, and action-specific payload fields.

use crate::error::ClientError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use zeroize::Zeroizing;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Server-assigned user identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(#[serde(deserialize_with = "string_or_number")] String);

/// Server-assigned task identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(#[serde(deserialize_with = "string_or_number")] String);

macro_rules! opaque_id {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }
    };
}

opaque_id!(UserId);
opaque_id!(TaskId);

/// A password held only for the duration of one login or signup call.
/// Wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(s: impl Into<String>) -> Self {
        Self(Zeroizing::new(s.into()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

// ---------------------------------------------------------------------------
// Task record
// ---------------------------------------------------------------------------

/// A to-do item as stored by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "taskId")]
    pub task_id: TaskId,
    pub task: String,
    #[serde(deserialize_with = "bool_or_string")]
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The `action` field selecting which operation the endpoint runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Login,
    Signup,
    GetTasks,
    AddTask,
    UpdateTask,
    DeleteTask,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Login => "login",
            Action::Signup => "signup",
            Action::GetTasks => "getTasks",
            Action::AddTask => "addTask",
            Action::UpdateTask => "updateTask",
            Action::DeleteTask => "deleteTask",
        }
    }

    /// Shown when the endpoint reports `success: false` without an `error`.
    pub fn failure_message(self) -> &'static str {
        match self {
            Action::Login => "Login failed.",
            Action::Signup => "Signup failed.",
            Action::GetTasks => "Failed to fetch tasks.",
            Action::AddTask => "Failed to add task.",
            Action::UpdateTask => "Failed to update task.",
            Action::DeleteTask => "Failed to delete task.",
        }
    }

    /// Shown when the endpoint could not be reached or answered garbage.
    pub fn transport_message(self) -> &'static str {
        match self {
            Action::Login => "An error occurred during login. Please try again.",
            Action::Signup => "An error occurred during signup. Please try again.",
            Action::GetTasks => "An error occurred while fetching tasks.",
            Action::AddTask => "An error occurred while adding the task.",
            Action::UpdateTask => "An error occurred while updating the task.",
            Action::DeleteTask => "An error occurred while deleting the task.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One call to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Login { username: String, password: Password },
    Signup { username: String, password: Password },
    GetTasks { user_id: UserId },
    AddTask { user_id: UserId, task: String },
    UpdateTask { task_id: TaskId, completed: bool },
    DeleteTask { task_id: TaskId },
}

impl Request {
    pub fn action(&self) -> Action {
        match self {
            Request::Login { .. } => Action::Login,
            Request::Signup { .. } => Action::Signup,
            Request::GetTasks { .. } => Action::GetTasks,
            Request::AddTask { .. } => Action::AddTask,
            Request::UpdateTask { .. } => Action::UpdateTask,
            Request::DeleteTask { .. } => Action::DeleteTask,
        }
    }

    /// Form fields in submission order, `action` first.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("action", self.action().as_str().to_string())];
        match self {
            Request::Login { username, password } | Request::Signup { username, password } => {
                fields.push(("username", username.clone()));
                fields.push(("password", password.expose().to_string()));
            }
            Request::GetTasks { user_id } => {
                fields.push(("userId", user_id.to_string()));
            }
            Request::AddTask { user_id, task } => {
                fields.push(("userId", user_id.to_string()));
                fields.push(("task", task.clone()));
            }
            Request::UpdateTask { task_id, completed } => {
                fields.push(("taskId", task_id.to_string()));
                fields.push(("completed", completed.to_string()));
            }
            Request::DeleteTask { task_id } => {
                fields.push(("taskId", task_id.to_string()));
            }
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// The decoded payload of a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    LoggedIn { username: String, user_id: UserId },
    SignedUp,
    Tasks(Vec<Task>),
    Added(Task),
    Updated,
    Deleted,
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
    username: String,
    user_id: UserId,
}

#[derive(Deserialize)]
struct TasksPayload {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct AddedPayload {
    task: Task,
}

/// Interpret a JSON reply to `action`.
///
/// `success: false` becomes [`ClientError::Rejected`] carrying the server's
/// message, or the action's fallback when the message is absent or empty.
pub fn decode_reply(action: Action, body: serde_json::Value) -> Result<Reply, ClientError> {
    let envelope: Envelope = serde_json::from_value(body.clone())
        .map_err(|e| ClientError::malformed(action, e))?;

    if !envelope.success {
        return Err(ClientError::rejected(action, envelope.error));
    }

    let reply = match action {
        Action::Login => {
            let payload: LoginPayload =
                serde_json::from_value(body).map_err(|e| ClientError::malformed(action, e))?;
            Reply::LoggedIn {
                username: payload.username,
                user_id: payload.user_id,
            }
        }
        Action::Signup => Reply::SignedUp,
        Action::GetTasks => {
            let payload: TasksPayload =
                serde_json::from_value(body).map_err(|e| ClientError::malformed(action, e))?;
            Reply::Tasks(payload.tasks)
        }
        Action::AddTask => {
            let payload: AddedPayload =
                serde_json::from_value(body).map_err(|e| ClientError::malformed(action, e))?;
            Reply::Added(payload.task)
        }
        Action::UpdateTask => Reply::Updated,
        Action::DeleteTask => Reply::Deleted,
    };
    Ok(reply)
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn bool_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Flag(b) => Ok(b),
        Raw::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Raw::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        Raw::Text(s) => Err(serde::de::Error::custom(format!(
            "expected a boolean, got {s:?}"
        ))),
    }
}
