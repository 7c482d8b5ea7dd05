/// Data structures for the per-site scratchpad
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single to-do entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Task {
        Task {
            text: text.into(),
            done: false,
        }
    }
}

/// A reference to a file the user attached to a site (metadata only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
}

impl FileRef {
    pub fn new(name: impl Into<String>, size: u64) -> FileRef {
        FileRef {
            name: name.into(),
            size,
        }
    }

    /// Size in whole kilobytes, halves rounded up
    pub fn size_label(&self) -> String {
        format!("{} KB", self.size.saturating_add(512) / 1024)
    }
}

/// Everything stored for one hostname
///
/// The host itself is the storage key, so it is not part of the
/// serialized value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SiteRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<FileRef>,
}

impl SiteRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.notes.is_empty() && self.files.is_empty()
    }

    /// Append a task; blank input is ignored
    pub fn add_task(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.tasks.push(Task::new(text));
        true
    }

    pub fn toggle_task(&mut self, index: usize) -> bool {
        self.tasks
            .get_mut(index)
            .map(|task| {
                task.done = !task.done;
            })
            .is_some()
    }

    pub fn delete_task(&mut self, index: usize) -> bool {
        if index >= self.tasks.len() {
            return false;
        }
        self.tasks.remove(index);
        true
    }

    pub fn clear_tasks(&mut self) -> bool {
        if self.tasks.is_empty() {
            return false;
        }
        self.tasks.clear();
        true
    }

    /// Replace notes verbatim; whitespace is the user's
    pub fn update_notes(&mut self, text: &str) -> bool {
        if self.notes == text {
            return false;
        }
        self.notes = text.to_string();
        true
    }

    pub fn clear_notes(&mut self) -> bool {
        self.update_notes("")
    }

    pub fn add_files(&mut self, files: &[FileRef]) -> bool {
        if files.is_empty() {
            return false;
        }
        self.files.extend_from_slice(files);
        true
    }

    pub fn delete_file(&mut self, index: usize) -> bool {
        if index >= self.files.len() {
            return false;
        }
        self.files.remove(index);
        true
    }

    /// Tasks as a markdown-ish bullet list, used for the clipboard
    pub fn tasks_as_text(&self) -> String {
        self.tasks
            .iter()
            .map(|task| format!("- {}", task.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
