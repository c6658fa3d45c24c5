// Search box state, owned by whichever front end drives it
// The index stays read-only; all mutation happens here

use crate::format;
use crate::index::AreaIndex;
use crate::parser::AreaRecord;

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Raw text as typed
    pub query: String,
    /// Last found or selected area; kept while the user keeps typing
    pub result: Option<AreaRecord>,
    pub has_searched: bool,
    pub show_suggestions: bool,
    /// Position in the visible suggestion list
    pub highlighted: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text changed
    pub fn on_input(&mut self, text: &str) {
        self.query = text.to_string();
        self.has_searched = false;
        self.show_suggestions = true;
        self.highlighted = None;
    }

    pub fn push_char(&mut self, c: char) {
        let mut text = self.query.clone();
        text.push(c);
        self.on_input(&text);
    }

    pub fn pop_char(&mut self) {
        let mut text = self.query.clone();
        text.pop();
        self.on_input(&text);
    }

    pub fn on_focus(&mut self) {
        self.show_suggestions = true;
    }

    pub fn hide_suggestions(&mut self) {
        self.show_suggestions = false;
        self.highlighted = None;
    }

    /// Explicit search for the exact name
    pub fn submit(&mut self, index: &AreaIndex) {
        if self.query.trim().is_empty() {
            self.result = None;
            self.has_searched = false;
        } else {
            self.result = index.find_exact(&self.query).cloned();
            self.has_searched = true;
        }
        self.hide_suggestions();
    }

    /// Picked from the suggestion list
    pub fn select(&mut self, record: &AreaRecord) {
        self.query = record.area_name.clone();
        self.result = Some(record.clone());
        self.has_searched = true;
        self.hide_suggestions();
    }

    pub fn visible_suggestions<'a>(&self, index: &'a AreaIndex) -> Vec<&'a AreaRecord> {
        if self.show_suggestions {
            index.suggest(&self.query)
        } else {
            Vec::new()
        }
    }

    pub fn highlight_next(&mut self, index: &AreaIndex) {
        let len = self.visible_suggestions(index).len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn highlight_previous(&mut self, index: &AreaIndex) {
        let len = self.visible_suggestions(index).len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Enter: take the highlighted suggestion if there is one, search otherwise
    pub fn accept(&mut self, index: &AreaIndex) {
        let chosen = self
            .highlighted
            .and_then(|i| self.visible_suggestions(index).get(i).map(|r| (*r).clone()));

        match chosen {
            Some(record) => self.select(&record),
            None => self.submit(index),
        }
    }

    pub fn not_found_message(&self) -> Option<String> {
        if self.result.is_none() && self.has_searched {
            Some(format::not_found_message(&self.query))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Count;

    fn index() -> AreaIndex {
        let record = |name: &str| AreaRecord {
            year: 2024,
            area_name: name.to_string(),
            age_category: "Yhteensä".to_string(),
            total_enrolled: Count::Parsed(100),
            foreign_language_enrolled: Count::Parsed(10),
            line: 0,
        };
        AreaIndex::new(
            vec![record("Espoo"), record("Helsinki"), record("Hollola"), record("KOKO MAA")],
            "KOKO MAA",
        )
    }

    #[test]
    fn test_typing_shows_suggestions_and_resets_search() {
        let index = index();
        let mut state = SearchState::new();
        state.has_searched = true;

        state.on_input("ho");
        assert!(state.show_suggestions);
        assert!(!state.has_searched);

        let names: Vec<&str> = state
            .visible_suggestions(&index)
            .iter()
            .map(|r| r.area_name.as_str())
            .collect();
        assert_eq!(names, vec!["Hollola"]);
    }

    #[test]
    fn test_submit_found() {
        let index = index();
        let mut state = SearchState::new();
        state.on_input(" HELSINKI ");
        state.submit(&index);

        assert_eq!(state.result.as_ref().unwrap().area_name, "Helsinki");
        assert!(state.has_searched);
        assert!(!state.show_suggestions);
        assert!(state.not_found_message().is_none());
    }

    #[test]
    fn test_submit_not_found_quotes_raw_query() {
        let index = index();
        let mut state = SearchState::new();
        state.on_input("Helsingfors");
        state.submit(&index);

        assert!(state.result.is_none());
        assert_eq!(
            state.not_found_message().unwrap(),
            "Kuntaa \"Helsingfors\" ei löytynyt (tarkista kirjoitusasu)."
        );
    }

    #[test]
    fn test_submit_blank_clears() {
        let index = index();
        let mut state = SearchState::new();
        state.on_input("Espoo");
        state.submit(&index);
        assert!(state.result.is_some());

        state.on_input("  ");
        state.submit(&index);
        assert!(state.result.is_none());
        assert!(!state.has_searched);
        assert!(state.not_found_message().is_none());
    }

    #[test]
    fn test_result_kept_while_typing() {
        let index = index();
        let mut state = SearchState::new();
        state.on_input("Espoo");
        state.submit(&index);

        state.push_char('x');
        assert_eq!(state.query, "Espoox");
        assert!(state.result.is_some());
        assert!(state.not_found_message().is_none());
    }

    #[test]
    fn test_highlight_and_accept() {
        let index = index();
        let mut state = SearchState::new();
        state.on_input("h");

        state.highlight_next(&index);
        state.highlight_next(&index);
        assert_eq!(state.highlighted, Some(1));

        state.accept(&index);
        assert_eq!(state.query, "Hollola");
        assert_eq!(state.result.as_ref().unwrap().area_name, "Hollola");
        assert!(!state.show_suggestions);
    }

    #[test]
    fn test_highlight_wraps() {
        let index = index();
        let mut state = SearchState::new();
        state.on_input("h");

        state.highlight_previous(&index);
        assert_eq!(state.highlighted, Some(1));
        state.highlight_next(&index);
        assert_eq!(state.highlighted, Some(0));
    }

    #[test]
    fn test_accept_without_highlight_submits() {
        let index = index();
        let mut state = SearchState::new();
        state.on_input("espoo");
        state.accept(&index);

        assert_eq!(state.result.as_ref().unwrap().area_name, "Espoo");
    }

    #[test]
    fn test_hidden_suggestions_are_empty() {
        let index = index();
        let mut state = SearchState::new();
        assert!(state.visible_suggestions(&index).is_empty());

        state.on_focus();
        assert_eq!(state.visible_suggestions(&index).len(), 4);
    }
}
