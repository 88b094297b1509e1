use std::path::PathBuf;

/// Snapshot of the browser's selection state: the single highlighted entry
/// and the user's ordered mark set. The host owns the live state; the core
/// reads one snapshot per command invocation and never holds onto it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub focused: Option<PathBuf>,
    pub marked: Vec<PathBuf>,
}

impl Selection {
    pub fn focused(path: impl Into<PathBuf>) -> Self {
        Self {
            focused: Some(path.into()),
            marked: Vec::new(),
        }
    }

    pub fn marked(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            focused: None,
            marked: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// The paths a command operates on: the mark set when non-empty (in
    /// mark order, duplicates preserved as the host reported them), else
    /// the focused entry, else nothing. Marks winning over focus is the one
    /// rule every command relies on; no command re-derives it.
    pub fn resolve(&self) -> Vec<PathBuf> {
        if !self.marked.is_empty() {
            self.marked.clone()
        } else {
            self.focused.iter().cloned().collect()
        }
    }
}
