//! Renders a [`Predicate`] into a SQLite boolean expression.
//!
//! Every value is pushed as a bind parameter. Column names come from
//! [`Field::as_str`] and are always double-quoted because `logLevel` and
//! `originService` are mixed case.

use super::{Field, Predicate};
use sqlx::{QueryBuilder, Sqlite};

/// Append `predicate` to `builder` as a parenthesized boolean expression
pub fn push_predicate(builder: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::Equals { field: Field::Labels, value } => {
            builder.push("EXISTS (SELECT 1 FROM json_each(\"labels\") WHERE json_each.value = ");
            builder.push_bind(value.clone());
            builder.push(")");
        }
        Predicate::Equals { field, value } => {
            builder.push(column(*field));
            builder.push(" = ");
            builder.push_bind(value.clone());
        }
        Predicate::Matches { field, pattern } => {
            builder.push(column(*field));
            builder.push(" REGEXP ");
            builder.push_bind(pattern.clone());
        }
        Predicate::GreaterThan { field, value } => {
            builder.push(column(*field));
            builder.push(" > ");
            builder.push_bind(*value);
        }
        Predicate::LessThan { field, value } => {
            builder.push(column(*field));
            builder.push(" < ");
            builder.push_bind(*value);
        }
        Predicate::And(conditions) => push_group(builder, conditions, " AND ", "1 = 1"),
        Predicate::Or(conditions) => push_group(builder, conditions, " OR ", "1 = 0"),
    }
}

fn push_group(
    builder: &mut QueryBuilder<'_, Sqlite>,
    conditions: &[Predicate],
    separator: &str,
    identity: &str,
) {
    if conditions.is_empty() {
        builder.push(identity);
        return;
    }

    builder.push("(");
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        push_predicate(builder, condition);
    }
    builder.push(")");
}

fn column(field: Field) -> String {
    format!("\"{}\"", field.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchCriteria;
    use crate::query::translate;

    fn render(predicate: &Predicate) -> String {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM logs WHERE ");
        push_predicate(&mut builder, predicate);
        builder.sql().to_string()
    }

    #[test]
    fn test_empty_criteria_renders_tautology() {
        let sql = render(&translate(&MatchCriteria::default()));
        assert_eq!(sql, "SELECT * FROM logs WHERE 1 = 1");
    }

    #[test]
    fn test_empty_or_renders_contradiction() {
        assert_eq!(render(&Predicate::Or(vec![])), "SELECT * FROM logs WHERE 1 = 0");
    }

    #[test]
    fn test_levels_and_services() {
        let criteria = MatchCriteria::new()
            .with_origin_service("svc-a")
            .with_log_level("ERROR")
            .with_log_level("WARN");
        let sql = render(&translate(&criteria));
        assert_eq!(
            sql,
            "SELECT * FROM logs WHERE ((\"originService\" = ?) AND (\"logLevel\" = ? OR \"logLevel\" = ?))"
        );
    }

    #[test]
    fn test_labels_use_json_membership() {
        let sql = render(&translate(&MatchCriteria::new().with_label("a")));
        assert!(
            sql.contains("EXISTS (SELECT 1 FROM json_each(\"labels\") WHERE json_each.value = ?)")
        );
    }

    #[test]
    fn test_keywords_and_time_range() {
        let criteria = MatchCriteria::new()
            .with_keyword("disk")
            .with_time_range(10, 20);
        let sql = render(&translate(&criteria));
        assert_eq!(
            sql,
            "SELECT * FROM logs WHERE ((\"message\" REGEXP ?) AND \"created\" > ? AND \"created\" < ?)"
        );
    }

    #[test]
    fn test_uncompilable_keyword_renders_contradiction() {
        let criteria = MatchCriteria::new()
            .with_keyword("(unclosed")
            .with_keyword("disk");
        let sql = render(&translate(&criteria));
        assert_eq!(sql, "SELECT * FROM logs WHERE ((1 = 0 OR \"message\" REGEXP ?))");
        assert!(!sql.contains("unclosed"));
    }

    #[test]
    fn test_keyword_text_is_never_inlined() {
        let sql = render(&translate(&MatchCriteria::new().with_keyword("'; DROP TABLE logs; --")));
        assert!(!sql.contains("DROP"));
    }
}
