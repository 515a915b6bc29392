use super::task::Task;

/// Top-level view state. Derived from the stored token at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unauthenticated,
    Authenticated,
}

/// Edit panel sub-state, only meaningful while Authenticated
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditPanel {
    #[default]
    Hidden,
    /// Editing the given task, as it was in the mirror when editing began
    Visible(Task),
}

impl EditPanel {
    pub fn is_visible(&self) -> bool {
        matches!(self, EditPanel::Visible(_))
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            EditPanel::Visible(task) => Some(task),
            EditPanel::Hidden => None,
        }
    }
}
