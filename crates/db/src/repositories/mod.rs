//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Single-row reads and writes accept any `PgExecutor`, so stores can run
//! them inside a transaction with `&mut *tx`; listings take `&PgPool`.

pub mod audit_repo;
pub mod case_repo;
pub mod question_repo;
pub mod revision_repo;
pub mod user_repo;

pub use audit_repo::AuditLogRepo;
pub use case_repo::CaseRepo;
pub use question_repo::QuestionRepo;
pub use revision_repo::RevisionRepo;
pub use user_repo::UserRepo;

/// Typed bind value for dynamically-built WHERE clauses.
pub(crate) enum BindValue {
    BigInt(i64),
    Text(String),
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub(crate) fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
pub(crate) fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Accumulates `AND`-joined conditions with positional parameters.
pub(crate) struct FilterBuilder {
    conditions: Vec<String>,
    values: Vec<BindValue>,
}

impl FilterBuilder {
    pub(crate) fn new() -> Self {
        Self {
            conditions: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Index the next bound value will take.
    pub(crate) fn next_idx(&self) -> usize {
        self.values.len() + 1
    }

    /// Add a condition that references `$n` for a single new value.
    ///
    /// `condition` receives the placeholder (e.g. `"$3"`) and returns the SQL.
    pub(crate) fn push(&mut self, value: BindValue, condition: impl FnOnce(&str) -> String) {
        let placeholder = format!("${}", self.next_idx());
        self.conditions.push(condition(&placeholder));
        self.values.push(value);
    }

    /// The `WHERE ...` clause (empty when there are no conditions) and its values.
    pub(crate) fn finish(self) -> (String, Vec<BindValue>) {
        let where_clause = if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        };
        (where_clause, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder_has_no_where_clause() {
        let (clause, values) = FilterBuilder::new().finish();
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn placeholders_are_numbered_in_push_order() {
        let mut builder = FilterBuilder::new();
        builder.push(BindValue::BigInt(7), |p| format!("a = {p}"));
        builder.push(BindValue::Text("x".into()), |p| format!("(b ILIKE {p} OR c ILIKE {p})"));
        assert_eq!(builder.next_idx(), 3);
        let (clause, values) = builder.finish();
        assert_eq!(clause, "WHERE a = $1 AND (b ILIKE $2 OR c ILIKE $2)");
        assert_eq!(values.len(), 2);
    }
}
