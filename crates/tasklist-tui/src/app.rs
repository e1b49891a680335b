use tasklist::controller::{Controller, View};

/// Which pane of the task view receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

/// The TUI application state.
pub struct App {
    pub controller: Controller,
    pub focus: Focus,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            controller: Controller::new(),
            focus: Focus::Input,
            should_quit: false,
        }
    }

    pub fn view(&self) -> View {
        self.controller.view()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::List,
            Focus::List => Focus::Input,
        };
    }

    /// Return to the login form; the next session starts typing a new task.
    pub fn logout(&mut self) {
        self.controller.logout();
        self.focus = Focus::Input;
    }
}
