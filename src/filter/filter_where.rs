use crate::database::partial_update::SqlValue;

/// Rendered `WHERE` clause (empty when there are no conditions) and its
/// positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    pub clause: String,
    pub params: Vec<SqlValue>,
}

/// Accumulates AND-ed conditions, numbering placeholders in push order.
#[derive(Debug, Default)]
pub struct FilterWhere {
    conditions: Vec<String>,
    param_values: Vec<SqlValue>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition; `{}` in `template` is replaced by the next placeholder.
    pub fn push_param(&mut self, template: &str, value: impl Into<SqlValue>) -> &mut Self {
        let placeholder = self.param(value.into());
        self.conditions.push(template.replacen("{}", &placeholder, 1));
        self
    }

    pub fn push_raw(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn build(self) -> WhereClause {
        let clause = if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        };
        WhereClause { clause, params: self.param_values }
    }

    fn param(&mut self, value: SqlValue) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}
