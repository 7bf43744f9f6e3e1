use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

/// A filter predicate in the PatentsView query syntax. Equality leaves
/// serialize to `{"field": value}`; composites wrap their children in
/// `{"_and": [...]}` / `{"_or": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: String, value: Value },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn and(filters: Vec<Filter>) -> Filter {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Filter {
        Filter::Or(filters)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Filter::Eq { field, value } => {
                let mut leaf = Map::new();
                leaf.insert(field.clone(), value.clone());
                Value::Object(leaf)
            }
            Filter::And(filters) => {
                json!({ "_and": filters.iter().map(Filter::to_value).collect::<Vec<_>>() })
            }
            Filter::Or(filters) => {
                json!({ "_or": filters.iter().map(Filter::to_value).collect::<Vec<_>>() })
            }
        }
    }
}

/// One query's worth of parameters: a filter, the fields to request, and
/// an options mapping (notably `per_page`). Immutable once built; each spec
/// lives for a single request.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    filter: Filter,
    fields: Vec<String>,
    options: BTreeMap<String, Value>,
}

impl QuerySpec {
    pub fn new(filter: Filter) -> QuerySpec {
        QuerySpec {
            filter,
            fields: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    /// Field names are sent in the given order; the API tolerates
    /// duplicates, so none are removed here.
    pub fn fields<I, S>(mut self, fields: I) -> QuerySpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> QuerySpec {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn per_page(self, per_page: u64) -> QuerySpec {
        self.option("per_page", per_page)
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    /// Encode as the `q`/`f`/`o` query-string parameters. `o` is always
    /// emitted, possibly as `{}`, so the parameter set stays uniform.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.filter.to_value().to_string()),
            ("f", Value::from(self.fields.clone()).to_string()),
            (
                "o",
                Value::Object(self.options.clone().into_iter().collect()).to_string(),
            ),
        ]
    }
}

#[test]
fn test_filter_shapes() {
    let eq = Filter::eq("patent_type", "utility");
    assert_eq!(eq.to_value(), json!({"patent_type": "utility"}));

    let composed = Filter::and(vec![
        Filter::eq("assignee_organization", "university of maryland"),
        Filter::or(vec![
            Filter::eq("patent_date", "2020-01-07"),
            Filter::eq("patent_date", "2020-01-14"),
        ]),
    ]);
    assert_eq!(
        composed.to_value(),
        json!({"_and": [
            {"assignee_organization": "university of maryland"},
            {"_or": [{"patent_date": "2020-01-07"}, {"patent_date": "2020-01-14"}]},
        ]})
    );
}

#[test]
fn test_params_keep_field_order() {
    let spec = QuerySpec::new(Filter::eq("patent_id", "10000001"))
        .fields(["patent_title", "patent_id", "patent_date"]);

    let params = spec.to_params();
    assert_eq!(params[1].0, "f");
    assert_eq!(
        params[1].1,
        r#"["patent_title","patent_id","patent_date"]"#
    );
}
