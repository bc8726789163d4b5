//! # Query Module
//!
//! Translates a [`MatchCriteria`] into a [`Predicate`] tree. The tree knows
//! nothing about any database; backends render it into their own query
//! language (see [`sql`]) or evaluate it directly with [`Predicate::matches`].
//!
//! ## Shape of a translated predicate
//!
//! The result is always a single `And` whose conjuncts appear in this order,
//! each present only when the corresponding criteria field is set:
//!
//! 1. labels: `Or` of `Equals(labels, v)`
//! 2. origin services: `Or` of `Equals(originService, v)`
//! 3. log levels: `Or` of `Equals(logLevel, v)`
//! 4. keywords: `Or` of `Matches(message, ".*kw.*")`; a keyword whose pattern
//!    does not compile becomes an empty `Or`, so it selects nothing on every backend
//! 5. start: `GreaterThan(created, start)`
//! 6. end: `LessThan(created, end)`
//!
//! An `And` with no conjuncts matches every entry.
//!
//! In-memory evaluation goes through [`Predicate::compile`], which builds each
//! keyword regex once so a scan over many entries reuses it.

pub mod sql;

use crate::models::{LogEntry, MatchCriteria};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Types                              ****//
///////////////////////////////////////////////////////////////////////////////

/// Stored log entry fields a predicate can test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Message,
    LogLevel,
    OriginService,
    /// Array field: `Equals` means "contains"
    Labels,
    Created,
}

impl Field {
    /// Name of the field as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Message => "message",
            Field::LogLevel => "logLevel",
            Field::OriginService => "originService",
            Field::Labels => "labels",
            Field::Created => "created",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-agnostic boolean filter over log entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals { field: Field, value: String },
    /// Regular expression match against a text field
    Matches { field: Field, pattern: String },
    GreaterThan { field: Field, value: i64 },
    LessThan { field: Field, value: i64 },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

/// How keywords become message patterns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMatch {
    /// The keyword is used verbatim inside the pattern, so regex
    /// metacharacters in it keep their regex meaning
    #[default]
    Pattern,
    /// The keyword is escaped and matched as a plain substring
    Literal,
}

impl KeywordMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordMatch::Pattern => "pattern",
            KeywordMatch::Literal => "literal",
        }
    }

    /// Build the "contains anywhere" pattern for one keyword
    pub fn pattern_for(&self, keyword: &str) -> String {
        match self {
            KeywordMatch::Pattern => format!(".*{}.*", keyword),
            KeywordMatch::Literal => format!(".*{}.*", regex::escape(keyword)),
        }
    }
}

impl FromStr for KeywordMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pattern" | "regex" => Ok(KeywordMatch::Pattern),
            "literal" | "substring" => Ok(KeywordMatch::Literal),
            other => Err(format!("expected 'pattern' or 'literal', got '{}'", other)),
        }
    }
}

impl fmt::Display for KeywordMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Translate criteria into a predicate, keywords used as raw patterns
pub fn translate(criteria: &MatchCriteria) -> Predicate {
    translate_with(criteria, KeywordMatch::Pattern)
}

/// Translate criteria into a predicate with an explicit keyword mode
pub fn translate_with(criteria: &MatchCriteria, keyword_match: KeywordMatch) -> Predicate {
    let mut conditions = Vec::new();

    if !criteria.labels.is_empty() {
        conditions.push(any_equal(Field::Labels, &criteria.labels));
    }

    if !criteria.origin_services.is_empty() {
        conditions.push(any_equal(Field::OriginService, &criteria.origin_services));
    }

    if !criteria.log_levels.is_empty() {
        conditions.push(any_equal(Field::LogLevel, &criteria.log_levels));
    }

    if !criteria.keywords.is_empty() {
        let keyword_conditions = criteria
            .keywords
            .iter()
            .map(|keyword| {
                let pattern = keyword_match.pattern_for(keyword);
                if Regex::new(&pattern).is_ok() {
                    Predicate::Matches {
                        field: Field::Message,
                        pattern,
                    }
                } else {
                    Predicate::Or(Vec::new())
                }
            })
            .collect();
        conditions.push(Predicate::Or(keyword_conditions));
    }

    if criteria.start != 0 {
        conditions.push(Predicate::GreaterThan {
            field: Field::Created,
            value: criteria.start,
        });
    }

    if criteria.end != 0 {
        conditions.push(Predicate::LessThan {
            field: Field::Created,
            value: criteria.end,
        });
    }

    Predicate::And(conditions)
}

fn any_equal(field: Field, values: &[String]) -> Predicate {
    Predicate::Or(
        values
            .iter()
            .map(|value| Predicate::Equals {
                field,
                value: value.clone(),
            })
            .collect(),
    )
}

///////////////////////////////////////////////////////////////////////////////
//****                         Evaluation                                ****//
///////////////////////////////////////////////////////////////////////////////

impl Predicate {
    /// True for an empty conjunction, which selects every entry
    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::And(conditions) if conditions.is_empty())
    }

    /// Compile every pattern in the tree once for repeated evaluation
    pub fn compile(&self) -> CompiledPredicate<'_> {
        match self {
            Predicate::Equals { field, value } => CompiledPredicate::Equals {
                field: *field,
                value: value.as_str(),
            },
            Predicate::Matches { field, pattern } => CompiledPredicate::Matches {
                field: *field,
                regex: Regex::new(pattern).ok(),
            },
            Predicate::GreaterThan { field, value } => CompiledPredicate::GreaterThan {
                field: *field,
                value: *value,
            },
            Predicate::LessThan { field, value } => CompiledPredicate::LessThan {
                field: *field,
                value: *value,
            },
            Predicate::And(conditions) => {
                CompiledPredicate::And(conditions.iter().map(Predicate::compile).collect())
            }
            Predicate::Or(conditions) => {
                CompiledPredicate::Or(conditions.iter().map(Predicate::compile).collect())
            }
        }
    }

    /// Evaluate this predicate against one entry in memory.
    ///
    /// Compiles on every call; use [`Predicate::compile`] when scanning many entries.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.compile().matches(entry)
    }
}

/// A [`Predicate`] whose patterns are compiled
#[derive(Debug)]
pub enum CompiledPredicate<'a> {
    Equals { field: Field, value: &'a str },
    /// `None` when the pattern failed to compile; matches nothing
    Matches { field: Field, regex: Option<Regex> },
    GreaterThan { field: Field, value: i64 },
    LessThan { field: Field, value: i64 },
    And(Vec<CompiledPredicate<'a>>),
    Or(Vec<CompiledPredicate<'a>>),
}

impl CompiledPredicate<'_> {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        match self {
            CompiledPredicate::Equals { field, value } => match field {
                Field::Labels => entry.labels.iter().any(|label| label == value),
                Field::Created => value.parse::<i64>().is_ok_and(|v| entry.created == v),
                _ => text_field(entry, *field).is_some_and(|text| text == *value),
            },
            CompiledPredicate::Matches { field, regex } => {
                let Some(regex) = regex else {
                    return false;
                };
                match field {
                    Field::Labels => entry.labels.iter().any(|label| regex.is_match(label)),
                    Field::Created => regex.is_match(&entry.created.to_string()),
                    _ => text_field(entry, *field).is_some_and(|text| regex.is_match(text)),
                }
            }
            CompiledPredicate::GreaterThan { field, value } => {
                numeric_field(entry, *field).is_some_and(|n| n > *value)
            }
            CompiledPredicate::LessThan { field, value } => {
                numeric_field(entry, *field).is_some_and(|n| n < *value)
            }
            CompiledPredicate::And(conditions) => conditions.iter().all(|c| c.matches(entry)),
            CompiledPredicate::Or(conditions) => conditions.iter().any(|c| c.matches(entry)),
        }
    }
}

fn text_field(entry: &LogEntry, field: Field) -> Option<&str> {
    match field {
        Field::Message => Some(&entry.message),
        Field::LogLevel => Some(&entry.level),
        Field::OriginService => Some(&entry.origin_service),
        Field::Labels | Field::Created => None,
    }
}

fn numeric_field(entry: &LogEntry, field: Field) -> Option<i64> {
    match field {
        Field::Created => Some(entry.created),
        _ => None,
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
