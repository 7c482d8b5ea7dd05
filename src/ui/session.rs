/// Transient popup state: which host is shown and which one the browser has open
use std::fmt::Display;
use std::rc::Rc;
use yew::Reducible;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Main,
    SiteList,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PopupSession {
    /// Host whose record the editor shows
    pub current_host: Option<String>,
    /// Host of the browser's active tab; only drives the list indicator
    pub active_tab_host: Option<String>,
    pub view: View,
}

impl PopupSession {
    pub fn new(active_tab_host: Option<String>) -> Self {
        PopupSession {
            current_host: None,
            active_tab_host,
            view: View::Main,
        }
    }

    /// Host to show when the popup opens
    ///
    /// The active tab wins even when it has no saved data yet; otherwise
    /// fall back to the first saved host.
    pub fn startup_host(active_tab_host: Option<&str>, saved_hosts: &[String]) -> Option<String> {
        active_tab_host
            .map(|host| host.to_string())
            .or_else(|| saved_hosts.first().cloned())
    }

    /// Host shown once the current one has been deleted
    pub fn host_after_removal(remaining: &[String]) -> Option<String> {
        remaining.first().cloned()
    }

    pub fn title(&self) -> &str {
        self.current_host.as_deref().unwrap_or("(none)")
    }

    pub fn is_active_tab(&self, host: &str) -> bool {
        self.active_tab_host.as_deref() == Some(host)
    }

    pub fn is_current(&self, host: &str) -> bool {
        self.current_host.as_deref() == Some(host)
    }

    /// Show `host` in the editor
    pub fn select(&mut self, host: impl Into<String>) {
        self.current_host = Some(host.into());
        self.view = View::Main;
    }

    /// After the current host was deleted, move to the first remaining one
    pub fn after_removal(&mut self, remaining: &[String]) {
        self.current_host = Self::host_after_removal(remaining);
    }
}

/// Changes the popup makes to its session
///
/// Async handlers dispatch these instead of writing back a copy of the
/// session they captured, so a late refresh cannot undo a newer selection.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    Start {
        active_tab_host: Option<String>,
        host: Option<String>,
    },
    Select(String),
    ActiveTab(Option<String>),
    Removed(Vec<String>),
    ShowList,
    ShowMain,
}

impl Reducible for PopupSession {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: SessionAction) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            SessionAction::Start { active_tab_host, host } => {
                next = PopupSession::new(active_tab_host);
                if let Some(host) = host {
                    next.select(host);
                }
            }
            SessionAction::Select(host) => next.select(host),
            SessionAction::ActiveTab(host) => next.active_tab_host = host,
            SessionAction::Removed(remaining) => next.after_removal(&remaining),
            SessionAction::ShowList => next.view = View::SiteList,
            SessionAction::ShowMain => next.view = View::Main,
        }
        Rc::new(next)
    }
}

/// Status line above the editor
#[derive(Clone, Debug, PartialEq)]
pub enum AppState {
    Idle,
    Loading(String),
    Error(String),
}

impl AppState {
    /// State once an operation has finished; success clears an earlier error
    pub fn settled<T, E: Display>(result: &Result<T, E>, context: &str) -> AppState {
        match result {
            Ok(_) => AppState::Idle,
            Err(e) => AppState::Error(format!("{}: {}", context, e)),
        }
    }
}

/// Record edits made from the main view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    AddTask,
    ToggleTask,
    DeleteTask,
    ClearTasks,
    ClearNotes,
    AddFiles,
    DeleteFile,
}

impl Edit {
    /// Whether the notes box is reloaded from the saved record afterwards
    ///
    /// Only clearing notes does; for any other edit the box may hold a
    /// draft whose debounced save has not run yet.
    pub fn reloads_notes(self) -> bool {
        matches!(self, Edit::ClearNotes)
    }
}
