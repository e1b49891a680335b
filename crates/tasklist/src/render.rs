//! View-model for the task list.
//!
//! Front ends draw [`TaskItem`]s; they never see [`Task`] records directly.

use crate::protocol::{Task, TaskId};

pub const COMPLETE_LABEL: &str = "Complete";
pub const UNCOMPLETE_LABEL: &str = "Uncomplete";
pub const DELETE_LABEL: &str = "Delete";

/// One rendered row: the task text plus its two controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: TaskId,
    pub text: String,
    /// Drives the "completed" styling.
    pub completed: bool,
}

impl TaskItem {
    pub fn toggle_label(&self) -> &'static str {
        if self.completed {
            UNCOMPLETE_LABEL
        } else {
            COMPLETE_LABEL
        }
    }

    pub fn delete_label(&self) -> &'static str {
        DELETE_LABEL
    }
}

impl From<&Task> for TaskItem {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.task_id.clone(),
            text: task.task.clone(),
            completed: task.completed,
        }
    }
}

/// The rendered list plus a selection cursor.
#[derive(Debug, Default, Clone)]
pub struct TaskList {
    items: Vec<TaskItem>,
    selected: usize,
}

impl TaskList {
    /// Drop every rendered row and render `tasks` in order.
    pub fn replace_all(&mut self, tasks: &[Task]) {
        self.items.clear();
        self.items.extend(tasks.iter().map(TaskItem::from));
        self.clamp_selection();
    }

    /// Render one more row at the end.
    pub fn append(&mut self, task: &Task) {
        self.items.push(TaskItem::from(task));
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, task_id: &TaskId) -> Option<&TaskItem> {
        self.items.iter().find(|item| item.task_id == *task_id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&TaskItem> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }
}
