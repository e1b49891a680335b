use crate::config::Config;
use crate::error::ClientError;
use crate::protocol::{Action, Password, Reply, Request, Task, TaskId, UserId, decode_reply};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::multipart::Form;
use tracing::debug;

/// Anything that can carry a [`Request`] to the task endpoint and bring back
/// its [`Reply`].
#[async_trait]
pub trait Remote: Send + Sync {
    async fn call(&self, request: &Request) -> Result<Reply, ClientError>;
}

/// HTTP client for the form-post task endpoint.
///
/// One instance keeps a pooled connection; calls are independent and carry no
/// session token (the user id travels in each task request).
#[derive(Debug, Clone)]
pub struct ScriptClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ScriptClient {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        let mut builder = reqwest::Client::builder()
            .user_agent(format!("tasklist/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build HTTP client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Remote for ScriptClient {
    async fn call(&self, request: &Request) -> Result<Reply, ClientError> {
        let action = request.action();
        debug!(%action, endpoint = %self.endpoint, "posting form");

        let form = request
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        // The endpoint reports failures in the body, so the status code is
        // not checked before decoding.
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::transport(action, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(action, e))?;

        let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::malformed(action, format!("HTTP {status}: {e}"))
        })?;
        decode_reply(action, body)
    }
}

/// Typed wrappers over [`Remote::call`], one per action.
#[async_trait]
pub trait RemoteExt: Remote {
    async fn login(&self, username: &str, password: Password) -> Result<(String, UserId), ClientError> {
        let request = Request::Login {
            username: username.to_string(),
            password,
        };
        match self.call(&request).await? {
            Reply::LoggedIn { username, user_id } => Ok((username, user_id)),
            other => Err(unexpected(Action::Login, &other)),
        }
    }

    async fn signup(&self, username: &str, password: Password) -> Result<(), ClientError> {
        let request = Request::Signup {
            username: username.to_string(),
            password,
        };
        match self.call(&request).await? {
            Reply::SignedUp => Ok(()),
            other => Err(unexpected(Action::Signup, &other)),
        }
    }

    async fn get_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, ClientError> {
        let request = Request::GetTasks {
            user_id: user_id.clone(),
        };
        match self.call(&request).await? {
            Reply::Tasks(tasks) => Ok(tasks),
            other => Err(unexpected(Action::GetTasks, &other)),
        }
    }

    async fn add_task(&self, user_id: &UserId, task: &str) -> Result<Task, ClientError> {
        let request = Request::AddTask {
            user_id: user_id.clone(),
            task: task.to_string(),
        };
        match self.call(&request).await? {
            Reply::Added(task) => Ok(task),
            other => Err(unexpected(Action::AddTask, &other)),
        }
    }

    async fn update_task(&self, task_id: &TaskId, completed: bool) -> Result<(), ClientError> {
        let request = Request::UpdateTask {
            task_id: task_id.clone(),
            completed,
        };
        match self.call(&request).await? {
            Reply::Updated => Ok(()),
            other => Err(unexpected(Action::UpdateTask, &other)),
        }
    }

    async fn delete_task(&self, task_id: &TaskId) -> Result<(), ClientError> {
        let request = Request::DeleteTask {
            task_id: task_id.clone(),
        };
        match self.call(&request).await? {
            Reply::Deleted => Ok(()),
            other => Err(unexpected(Action::DeleteTask, &other)),
        }
    }
}

impl<R: Remote + ?Sized> RemoteExt for R {}

pub(crate) fn unexpected(action: Action, reply: &Reply) -> ClientError {
    ClientError::malformed(action, format!("unexpected reply {reply:?}"))
}
