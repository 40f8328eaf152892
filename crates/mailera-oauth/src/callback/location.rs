//! The address the app was entered at.

/// Current location (path and query) with history replacement.
///
/// In a browser this is the address bar; in the loopback listener it is the
/// location the browser is redirected to once the callback finishes.
pub trait Location {
    /// Current path and query.
    fn current(&self) -> String;

    /// Replaces the current entry without adding history.
    fn replace(&mut self, path_and_query: &str);
}

/// In-memory [`Location`] that records every replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLocation {
    current: String,
    replacements: Vec<String>,
}

impl MemoryLocation {
    /// Location starting at `path_and_query`.
    #[must_use]
    pub fn new(path_and_query: impl Into<String>) -> Self {
        Self {
            current: path_and_query.into(),
            replacements: Vec::new(),
        }
    }

    /// Every value passed to [`replace`](Location::replace), oldest first.
    #[must_use]
    pub fn replacements(&self) -> &[String] {
        &self.replacements
    }
}

impl Location for MemoryLocation {
    fn current(&self) -> String {
        self.current.clone()
    }

    fn replace(&mut self, path_and_query: &str) {
        self.current = path_and_query.to_string();
        self.replacements.push(self.current.clone());
    }
}
