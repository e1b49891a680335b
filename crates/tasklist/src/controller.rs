//! View state of the client: which view is showing, who is logged in, what
//! the task list looks like, and which remote calls are in flight.
//!
//! The controller never performs I/O. User operations return an [`Effect`]
//! describing the call to make; whoever runs it hands the finished call back
//! through [`Controller::apply`], which updates the view and may ask for more
//! calls (a login is followed by a fetch, a mutation by a refetch).

use crate::error::ClientError;
use crate::protocol::{Password, Reply, Request, TaskId, UserId};
use crate::render::TaskList;
use crate::session::Session;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};
use zeroize::Zeroizing;

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Signup successful! You can now log in.";
pub const CREDENTIALS_REQUIRED_MESSAGE: &str = "Username and password are required.";

/// Which of the two exclusive views is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Auth,
    Tasks,
}

/// Which form the auth view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthField {
    #[default]
    Username,
    Password,
}

/// Contents of the login or signup form. The password is wiped when the
/// form is reset or dropped.
#[derive(Default)]
pub struct AuthForm {
    pub username: String,
    pub password: Zeroizing<String>,
    pub focus: AuthField,
}

impl fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthForm")
            .field("username", &self.username)
            .field("password", &"***")
            .field("focus", &self.focus)
            .finish()
    }
}

impl AuthForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut *self.password,
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Username,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

/// Identifies one issued call. `epoch` changes on every login and logout so
/// replies meant for an earlier session can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    seq: u64,
}

/// A remote call the controller wants made.
#[derive(Debug, Clone)]
pub struct Effect {
    pub ticket: Ticket,
    pub request: Request,
}

impl Effect {
    pub fn complete(self, result: Result<Reply, ClientError>) -> Outcome {
        Outcome {
            ticket: self.ticket,
            request: self.request,
            result,
        }
    }
}

/// A finished call, ready for [`Controller::apply`].
#[derive(Debug)]
pub struct Outcome {
    pub ticket: Ticket,
    pub request: Request,
    pub result: Result<Reply, ClientError>,
}

/// Calls that must not be issued twice at once. Fetches are absent: they are
/// idempotent and stale replies are discarded instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Pending {
    Login,
    Signup,
    AddTask(String),
    Task(TaskId),
}

impl Pending {
    fn of(request: &Request) -> Option<Self> {
        match request {
            Request::Login { .. } => Some(Pending::Login),
            Request::Signup { .. } => Some(Pending::Signup),
            Request::AddTask { task, .. } => Some(Pending::AddTask(task.clone())),
            Request::UpdateTask { task_id, .. } | Request::DeleteTask { task_id } => {
                Some(Pending::Task(task_id.clone()))
            }
            Request::GetTasks { .. } => None,
        }
    }
}

pub struct Controller {
    view: View,
    auth_mode: AuthMode,
    auth_form: AuthForm,
    session: Option<Session>,
    tasks: TaskList,
    draft: String,
    alert: Option<Alert>,
    epoch: u64,
    next_seq: u64,
    /// Sequence number of the newest fetch rendered in this epoch.
    rendered_fetch: Option<u64>,
    in_flight: HashSet<Pending>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// A controller showing the login form.
    pub fn new() -> Self {
        let mut controller = Self {
            view: View::Auth,
            auth_mode: AuthMode::Login,
            auth_form: AuthForm::default(),
            session: None,
            tasks: TaskList::default(),
            draft: String::new(),
            alert: None,
            epoch: 0,
            next_seq: 0,
            rendered_fetch: None,
            in_flight: HashSet::new(),
        };
        controller.show_auth_form();
        controller
    }

    // -- View switching ------------------------------------------------------

    /// Show the auth view in login mode, ending any session and emptying the
    /// rendered list.
    pub fn show_auth_form(&mut self) {
        self.view = View::Auth;
        self.session = None;
        self.tasks.clear();
        self.draft.clear();
        self.begin_epoch();
        self.toggle_auth_mode(false);
    }

    /// Show the task view for a freshly logged-in user and return the fetch
    /// that populates it.
    pub fn show_todo_app(&mut self, username: String, user_id: UserId) -> Effect {
        self.view = View::Tasks;
        self.auth_form = AuthForm::default();
        self.begin_epoch();
        debug!(%user_id, "session started");
        self.session = Some(Session::new(user_id.clone(), username));
        self.issue(Request::GetTasks { user_id })
    }

    /// Swap the auth form between login and signup. The form is reset.
    pub fn toggle_auth_mode(&mut self, is_signup: bool) {
        self.auth_mode = if is_signup {
            AuthMode::Signup
        } else {
            AuthMode::Login
        };
        self.auth_form = AuthForm::default();
    }

    pub fn logout(&mut self) {
        if let Some(session) = &self.session {
            debug!(user_id = %session.user_id(), "session ended");
        }
        self.show_auth_form();
    }

    // -- User operations -----------------------------------------------------

    /// Submit whichever form the auth view is showing.
    pub fn submit_auth(&mut self) -> Option<Effect> {
        match self.auth_mode {
            AuthMode::Login => self.submit_login(),
            AuthMode::Signup => self.submit_signup(),
        }
    }

    pub fn submit_login(&mut self) -> Option<Effect> {
        let (username, password) = self.credentials()?;
        self.issue_once(Request::Login { username, password })
    }

    pub fn submit_signup(&mut self) -> Option<Effect> {
        let (username, password) = self.credentials()?;
        self.issue_once(Request::Signup { username, password })
    }

    /// Send the new-task input. Nothing is sent for a blank input.
    pub fn submit_new_task(&mut self) -> Option<Effect> {
        if self.view != View::Tasks || self.draft.trim().is_empty() {
            return None;
        }
        let user_id = self.session.as_ref()?.user_id().clone();
        let task = self.draft.clone();
        self.issue_once(Request::AddTask { user_id, task })
    }

    /// Flip a rendered task: sends the negation of the flag currently shown.
    pub fn toggle_task(&mut self, task_id: &TaskId) -> Option<Effect> {
        let item = self.rendered(task_id)?;
        let request = Request::UpdateTask {
            task_id: item.task_id.clone(),
            completed: !item.completed,
        };
        self.issue_once(request)
    }

    pub fn delete_task(&mut self, task_id: &TaskId) -> Option<Effect> {
        let item = self.rendered(task_id)?;
        let request = Request::DeleteTask {
            task_id: item.task_id.clone(),
        };
        self.issue_once(request)
    }

    /// Fetch the list again for the current session.
    pub fn refresh(&mut self) -> Option<Effect> {
        let user_id = self.session.as_ref()?.user_id().clone();
        Some(self.issue(Request::GetTasks { user_id }))
    }

    // -- Replies -------------------------------------------------------------

    /// Fold a finished call into the view. Returns the calls it triggers.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        let Outcome {
            ticket,
            request,
            result,
        } = outcome;

        if ticket.epoch != self.epoch {
            debug!(action = %request.action(), "discarding reply from an earlier session");
            return Vec::new();
        }
        if let Some(key) = Pending::of(&request) {
            self.in_flight.remove(&key);
        }

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(action = %err.action(), error = %err, "remote call failed");
                self.set_alert(AlertLevel::Error, err.alert_message());
                return Vec::new();
            }
        };

        match (request, reply) {
            (Request::Login { .. }, Reply::LoggedIn { username, user_id }) => {
                vec![self.show_todo_app(username, user_id)]
            }
            (Request::Signup { .. }, Reply::SignedUp) => {
                self.toggle_auth_mode(false);
                self.set_alert(AlertLevel::Info, SIGNUP_SUCCESS_MESSAGE.to_string());
                Vec::new()
            }
            (Request::GetTasks { .. }, Reply::Tasks(tasks)) => {
                if self.rendered_fetch.is_some_and(|seq| seq > ticket.seq) {
                    debug!(seq = ticket.seq, "discarding fetch older than the rendered list");
                } else {
                    self.rendered_fetch = Some(ticket.seq);
                    self.tasks.replace_all(&tasks);
                }
                Vec::new()
            }
            (Request::AddTask { task: sent, .. }, Reply::Added(task)) => {
                if self.draft == sent {
                    self.draft.clear();
                }
                // A fetch issued before the add cannot know about this task.
                self.rendered_fetch = self.rendered_fetch.max(Some(ticket.seq));
                // A fetch issued after the add may already have rendered it.
                if self.tasks.get(&task.task_id).is_none() {
                    self.tasks.append(&task);
                }
                Vec::new()
            }
            (Request::UpdateTask { .. }, Reply::Updated)
            | (Request::DeleteTask { .. }, Reply::Deleted) => self.refresh().into_iter().collect(),
            (request, reply) => {
                let action = request.action();
                warn!(%action, ?reply, "reply does not match request");
                self.set_alert(AlertLevel::Error, action.transport_message().to_string());
                Vec::new()
            }
        }
    }

    // -- Accessors -----------------------------------------------------------

    pub fn view(&self) -> View {
        self.view
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn auth_form(&self) -> &AuthForm {
        &self.auth_form
    }

    pub fn auth_form_mut(&mut self) -> &mut AuthForm {
        &mut self.auth_form
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskList {
        &mut self.tasks
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// True while any login, signup or mutation is awaiting its reply.
    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    // -- Internals -----------------------------------------------------------

    fn begin_epoch(&mut self) {
        self.epoch += 1;
        self.rendered_fetch = None;
        self.in_flight.clear();
    }

    fn credentials(&mut self) -> Option<(String, Password)> {
        if self.view != View::Auth {
            return None;
        }
        if self.auth_form.username.trim().is_empty() || self.auth_form.password.is_empty() {
            self.set_alert(AlertLevel::Error, CREDENTIALS_REQUIRED_MESSAGE.to_string());
            return None;
        }
        Some((
            self.auth_form.username.clone(),
            Password::new(self.auth_form.password.as_str()),
        ))
    }

    fn rendered(&self, task_id: &TaskId) -> Option<&crate::render::TaskItem> {
        if self.view != View::Tasks {
            return None;
        }
        self.tasks.get(task_id)
    }

    /// Issue `request` unless an identical call is still in flight.
    fn issue_once(&mut self, request: Request) -> Option<Effect> {
        if let Some(key) = Pending::of(&request)
            && !self.in_flight.insert(key)
        {
            debug!(action = %request.action(), "ignoring duplicate submission");
            return None;
        }
        self.alert = None;
        Some(self.issue(request))
    }

    fn issue(&mut self, request: Request) -> Effect {
        self.next_seq += 1;
        Effect {
            ticket: Ticket {
                epoch: self.epoch,
                seq: self.next_seq,
            },
            request,
        }
    }

    fn set_alert(&mut self, level: AlertLevel, message: String) {
        self.alert = Some(Alert { level, message });
    }
}
