//! In-memory stand-in for the task endpoint.

use crate::client::Remote;
use crate::error::ClientError;
use crate::protocol::{Action, Reply, Request, Task, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Store {
    /// username -> (password, user id)
    users: HashMap<String, (String, UserId)>,
    /// (owner, task) in insertion order.
    tasks: Vec<(UserId, Task)>,
    next_id: u64,
}

/// Behaves like the real endpoint and records every request it sees.
#[derive(Default)]
pub struct MemoryRemote {
    store: Mutex<Store>,
    calls: Mutex<Vec<Request>>,
    offline: Mutex<HashSet<Action>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `action` fail as if the network were down.
    pub fn go_offline(&self, action: Action) {
        self.offline.lock().unwrap().insert(action);
    }

    pub fn calls(&self) -> Vec<Request> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, action: Action) -> Vec<Request> {
        self.calls()
            .into_iter()
            .filter(|r| r.action() == action)
            .collect()
    }

    /// What a fresh getTasks would return for `user_id`.
    pub fn tasks_of(&self, user_id: &UserId) -> Vec<Task> {
        self.store
            .lock()
            .unwrap()
            .tasks
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, task)| task.clone())
            .collect()
    }
}

#[async_trait]
impl Remote for MemoryRemote {
    async fn call(&self, request: &Request) -> Result<Reply, ClientError> {
        self.calls.lock().unwrap().push(request.clone());
        let action = request.action();
        if self.offline.lock().unwrap().contains(&action) {
            return Err(ClientError::transport(
                action,
                std::io::Error::other("connection refused"),
            ));
        }

        let mut store = self.store.lock().unwrap();
        match request {
            Request::Signup { username, password } => {
                if store.users.contains_key(username) {
                    return Err(ClientError::rejected(
                        action,
                        Some("Username already exists.".to_string()),
                    ));
                }
                store.next_id += 1;
                let user_id = UserId::from(format!("u{}", store.next_id));
                store
                    .users
                    .insert(username.clone(), (password.expose().to_string(), user_id));
                Ok(Reply::SignedUp)
            }
            Request::Login { username, password } => match store.users.get(username) {
                Some((stored, user_id)) if stored == password.expose() => Ok(Reply::LoggedIn {
                    username: username.clone(),
                    user_id: user_id.clone(),
                }),
                _ => Err(ClientError::rejected(
                    action,
                    Some("Invalid username or password.".to_string()),
                )),
            },
            Request::GetTasks { user_id } => Ok(Reply::Tasks(
                store
                    .tasks
                    .iter()
                    .filter(|(owner, _)| owner == user_id)
                    .map(|(_, task)| task.clone())
                    .collect(),
            )),
            Request::AddTask { user_id, task } => {
                store.next_id += 1;
                let task = Task {
                    task_id: store.next_id.to_string().into(),
                    task: task.clone(),
                    completed: false,
                };
                store.tasks.push((user_id.clone(), task.clone()));
                Ok(Reply::Added(task))
            }
            Request::UpdateTask { task_id, completed } => {
                match store.tasks.iter_mut().find(|(_, t)| t.task_id == *task_id) {
                    Some((_, task)) => {
                        task.completed = *completed;
                        Ok(Reply::Updated)
                    }
                    None => Err(ClientError::rejected(action, None)),
                }
            }
            Request::DeleteTask { task_id } => {
                let before = store.tasks.len();
                store.tasks.retain(|(_, t)| t.task_id != *task_id);
                if store.tasks.len() == before {
                    return Err(ClientError::rejected(action, None));
                }
                Ok(Reply::Deleted)
            }
        }
    }
}
