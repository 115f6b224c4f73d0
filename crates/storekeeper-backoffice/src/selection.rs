//! # Selection State
//!
//! The two-state selection machine shared by the management screens.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Selection Transitions                               │
//! │                                                                         │
//! │                      select(row)                                        │
//! │   ┌──────────────┐ ───────────────► ┌──────────────┐                   │
//! │   │  Unselected  │                  │ Selected(T)  │──┐ select(other)  │
//! │   │  (create     │ ◄─────────────── │  (edit mode) │◄─┘                │
//! │   │   mode)      │   clear()        └──────────────┘                   │
//! │   └──────────────┘   after deselect                                    │
//! │                      or successful delete                              │
//! │                                                                         │
//! │  The submit button means INSERT in create mode and UPDATE in edit      │
//! │  mode; controllers branch on is_editing() instead of probing a         │
//! │  nullable current-row field.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Selection
// =============================================================================

/// Whether a management screen currently has a row selected.
///
/// A freshly opened screen starts [`Unselected`](Selection::Unselected);
/// clicking a list row moves it to [`Selected`](Selection::Selected) and the
/// form fields are repopulated from the carried value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// No row selected; submitting the form creates a new row.
    Unselected,

    /// A row is selected; submitting the form updates it.
    Selected(T),
}

// Not derived: deriving would bound T: Default, and the carried row types
// have no meaningful default value.
impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Unselected
    }
}

impl<T> Selection<T> {
    /// Selects a row, replacing any previous selection.
    pub fn select(&mut self, value: T) {
        *self = Selection::Selected(value);
    }

    /// Clears the selection, returning the screen to create mode.
    pub fn clear(&mut self) {
        *self = Selection::Unselected;
    }

    /// Returns true when a row is selected (the screen is in edit mode).
    pub fn is_editing(&self) -> bool {
        matches!(self, Selection::Selected(_))
    }

    /// Returns the selected value, if any.
    pub fn selected(&self) -> Option<&T> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(value) => Some(value),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unselected() {
        let selection: Selection<i64> = Selection::default();
        assert!(!selection.is_editing());
        assert!(selection.selected().is_none());
    }

    #[test]
    fn test_select_enters_edit_mode() {
        let mut selection = Selection::Unselected;
        selection.select(42);

        assert!(selection.is_editing());
        assert_eq!(selection.selected(), Some(&42));
    }

    #[test]
    fn test_select_replaces_previous_selection() {
        let mut selection = Selection::Unselected;
        selection.select("first");
        selection.select("second");

        assert_eq!(selection.selected(), Some(&"second"));
    }

    #[test]
    fn test_clear_returns_to_create_mode() {
        let mut selection = Selection::Unselected;
        selection.select(7);
        selection.clear();

        assert!(!selection.is_editing());
        assert!(selection.selected().is_none());
    }
}
