use std::collections::HashMap;

use super::{parse_count, FilterError, FilterWhere, WhereClause};

/// Search filters accepted by `GET /companies`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
}

impl CompanyFilter {
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, FilterError> {
        let mut filter = CompanyFilter::default();

        for (key, value) in query {
            match key.as_str() {
                "name" => filter.name = Some(value.clone()),
                "minEmployees" => filter.min_employees = Some(parse_count("minEmployees", value)?),
                "maxEmployees" => filter.max_employees = Some(parse_count("maxEmployees", value)?),
                other => return Err(FilterError::UnknownField(other.to_string())),
            }
        }

        if let (Some(min), Some(max)) = (filter.min_employees, filter.max_employees) {
            if min > max {
                return Err(FilterError::InvalidRange(
                    "minEmployees cannot be greater than maxEmployees".to_string(),
                ));
            }
        }

        Ok(filter)
    }

    pub fn to_where(&self) -> WhereClause {
        let mut w = FilterWhere::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            w.push_param("name ILIKE {}", format!("%{}%", name));
        }
        if let Some(min) = self.min_employees {
            w.push_param("num_employees >= {}", min);
        }
        if let Some(max) = self.max_employees {
            w.push_param("num_employees <= {}", max);
        }
        w.build()
    }
}
