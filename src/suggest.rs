//! Compound name suggestions.

/// Maximum number of suggestions offered for a query.
pub const MAX_SUGGESTIONS: usize = 8;

/// Names whose lowercase form contains the lowercase query, in source order.
///
/// An empty query yields nothing. At most [`MAX_SUGGESTIONS`] names are returned.
pub fn suggestions<'a, S: AsRef<str>>(query: &str, names: &'a [S]) -> Vec<&'a str> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggestion list with a keyboard-driven highlight.
#[derive(Debug, Default)]
pub struct SuggestionList {
    items: Vec<String>,
    selected: Option<usize>,
}

impl SuggestionList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the list for a new query.
    pub fn refresh<S: AsRef<str>>(&mut self, query: &str, names: &[S]) {
        self.items = suggestions(query, names)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.selected = None;
    }

    /// Drop all suggestions.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = None;
    }

    /// Current suggestions.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Whether there is anything to show.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the highlighted suggestion.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Highlighted suggestion.
    pub fn selected(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }

    /// Move the highlight down, wrapping to the top.
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        });
    }

    /// Move the highlight up, wrapping to the bottom.
    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Take the highlighted suggestion and clear the list.
    pub fn pick(&mut self) -> Option<String> {
        let picked = self.selected().map(str::to_string);
        if picked.is_some() {
            self.clear();
        }
        picked
    }
}
