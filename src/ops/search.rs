use std::ops::Range;

use regex::Regex;

use crate::model::task::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Description,
}

/// A search hit within the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Position in the list
    pub index: usize,
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// Compile a case-insensitive pattern, falling back to a literal match when
/// the input is not a valid regex. Empty patterns compile to None.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// All hits, in list order, title before description
pub fn search_tasks(tasks: &[Task], re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for (index, task) in tasks.iter().enumerate() {
        for (field, text) in [
            (MatchField::Title, task.title.as_str()),
            (MatchField::Description, task.description.as_str()),
        ] {
            let spans = find_matches(re, text);
            if !spans.is_empty() {
                hits.push(SearchHit {
                    index,
                    field,
                    spans,
                });
            }
        }
    }
    hits
}

/// List positions with at least one hit, deduplicated and ascending
pub fn matching_indices(tasks: &[Task], re: &Regex) -> Vec<usize> {
    let mut indices: Vec<usize> = search_tasks(tasks, re).iter().map(|h| h.index).collect();
    indices.dedup();
    indices
}

/// Next matching position after `cursor` (or before it, going backward),
/// wrapping around the list.
pub fn next_match(indices: &[usize], cursor: usize, forward: bool) -> Option<usize> {
    if indices.is_empty() {
        return None;
    }
    if forward {
        indices
            .iter()
            .copied()
            .find(|&i| i > cursor)
            .or_else(|| indices.first().copied())
    } else {
        indices
            .iter()
            .rev()
            .copied()
            .find(|&i| i < cursor)
            .or_else(|| indices.last().copied())
    }
}

/// First matching position at or after `cursor`, wrapping to the top
pub fn first_match_from(indices: &[usize], cursor: usize) -> Option<usize> {
    indices
        .iter()
        .copied()
        .find(|&i| i >= cursor)
        .or_else(|| indices.first().copied())
}
