use std::collections::HashMap;

use super::{parse_count, FilterError, FilterWhere, WhereClause};

/// Search filters accepted by `GET /jobs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i64>,
    pub has_equity: bool,
}

impl JobFilter {
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, FilterError> {
        let mut filter = JobFilter::default();

        for (key, value) in query {
            match key.as_str() {
                "title" => filter.title = Some(value.clone()),
                "minSalary" => filter.min_salary = Some(parse_count("minSalary", value)?),
                // only the literal "true" turns the filter on
                "hasEquity" => filter.has_equity = value == "true",
                other => return Err(FilterError::UnknownField(other.to_string())),
            }
        }

        Ok(filter)
    }

    pub fn to_where(&self) -> WhereClause {
        let mut w = FilterWhere::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            w.push_param("title ILIKE {}", format!("%{}%", title));
        }
        if let Some(min) = self.min_salary {
            w.push_param("salary >= {}", min);
        }
        if self.has_equity {
            w.push_raw("equity > 0");
        }
        w.build()
    }
}
