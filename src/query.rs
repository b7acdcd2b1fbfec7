//! Ad-hoc search over a normalized record set.
//!
//! Terms match case-insensitively as literal substrings; a `column:term`
//! prefix scopes the match to one display column. No wildcard or regex
//! syntax is exposed.

use regex::{Regex, RegexBuilder};

use crate::{error::PipelineError, project, record::CallRecord};

/// A parsed search request; lives for a single filter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Whitespace-only input: the evaluator applies no filter.
    NoFilter,
    /// Match the term against every display column.
    AllColumns { term: String },
    /// Match the term against a single record field.
    Column {
        field: &'static str,
        term: String,
    },
}

/// Splits `search` into an optional column tag and a term.
///
/// A colon splits the input only when the character immediately before it is
/// not numeric, so time-of-day terms like `10:30:00` stay full-text
/// searches. An unknown tag is an error, never a silent full-text fallback.
pub fn parse_query(search: &str) -> Result<Query, PipelineError> {
    if !search.is_empty() && search.chars().all(char::is_whitespace) {
        return Ok(Query::NoFilter);
    }
    if let Some(idx) = search.find(':') {
        let numeric_before = search[..idx]
            .chars()
            .next_back()
            .is_some_and(|ch| ch.is_numeric());
        if !numeric_before {
            let tag = &search[..idx];
            let term = &search[idx + 1..];
            let field = project::field_for_label(tag)
                .ok_or_else(|| PipelineError::InvalidColumnName(tag.to_string()))?;
            return Ok(Query::Column {
                field,
                term: term.to_string(),
            });
        }
    }
    Ok(Query::AllColumns {
        term: search.to_string(),
    })
}

/// Filters `records` by `search`. `Ok(None)` means no filter was applied;
/// the caller keeps its current view.
pub fn filter(
    records: &[CallRecord],
    search: &str,
) -> Result<Option<Vec<CallRecord>>, PipelineError> {
    let matched = match parse_query(search)? {
        Query::NoFilter => return Ok(None),
        Query::AllColumns { term } => {
            let matcher = literal_matcher(&term)?;
            records
                .iter()
                .filter(|record| {
                    project::DISPLAY_COLUMNS
                        .iter()
                        .any(|(_, field)| field_matches(record, field, &matcher))
                })
                .cloned()
                .collect()
        }
        Query::Column { field, term } => {
            let matcher = literal_matcher(&term)?;
            records
                .iter()
                .filter(|record| field_matches(record, field, &matcher))
                .cloned()
                .collect()
        }
    };
    Ok(Some(matched))
}

fn field_matches(record: &CallRecord, field: &str, matcher: &Regex) -> bool {
    record
        .field(field)
        .is_some_and(|value| matcher.is_match(value))
}

/// Case-insensitive literal substring matcher; the term is escaped so regex
/// metacharacters match themselves.
fn literal_matcher(term: &str) -> Result<Regex, PipelineError> {
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .map_err(|err| PipelineError::Parse(err.to_string()))
}
