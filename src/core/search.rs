use crate::config::SearchSettings;
use crate::core::model::{Graph, Node};
use crate::graph::ops::find_node_by_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub min_term_len: usize,
    pub case_insensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_term_len: 3,
            case_insensitive: true,
        }
    }
}

impl From<&SearchSettings> for SearchOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            min_term_len: settings.min_term_len,
            case_insensitive: settings.case_insensitive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome<'g> {
    Found(&'g Node),
    TermTooShort,
    NotFound,
}

impl<'g> SearchOutcome<'g> {
    pub fn node(self) -> Option<&'g Node> {
        match self {
            SearchOutcome::Found(node) => Some(node),
            _ => None,
        }
    }
}

/// Looks a node up by label. Anything other than `Found` means the caller
/// should keep showing the full graph.
pub fn search<'g>(graph: &'g Graph, term: &str, options: SearchOptions) -> SearchOutcome<'g> {
    let term = term.trim();
    if term.chars().count() < options.min_term_len {
        return SearchOutcome::TermTooShort;
    }
    match find_node_by_label(graph, term, options.case_insensitive) {
        Some(node) => SearchOutcome::Found(node),
        None => SearchOutcome::NotFound,
    }
}
