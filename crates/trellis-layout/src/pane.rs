use serde::{Deserialize, Serialize};
use trellis_common::PaneId;

/// Title shown for panes that have none yet.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pane {
    pub id: PaneId,
    pub title: String,
    pub uri: String,
}

impl Pane {
    /// New pane with a freshly allocated id.
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::with_id(PaneId::next(), title, uri)
    }

    pub fn with_id(id: PaneId, title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            uri: uri.into(),
        }
    }

    /// Title for display, falling back to [`UNTITLED`].
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_allocates_distinct_ids() {
        let a = Pane::new("a", "about:blank");
        let b = Pane::new("b", "about:blank");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn display_title_falls_back() {
        let pane = Pane::with_id(PaneId(1), "  ", "https://example.com");
        assert_eq!(pane.display_title(), "Untitled");
        let pane = Pane::with_id(PaneId(2), "Docs", "https://example.com");
        assert_eq!(pane.display_title(), "Docs");
    }
}
