//! List filtering and ordering.

use std::collections::HashMap;

use serde_json::Value;

use crate::constants::{FILTER_ALL, SEARCH_PARAM};

use super::spec::{Filter, ResourceSpec, SortOrder};
use super::Resource;

/// Query-string parameters of a list request. Unknown keys are kept but ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    params: HashMap<String, String>,
}

impl From<HashMap<String, String>> for ListQuery {
    fn from(params: HashMap<String, String>) -> Self {
        Self { params }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ListQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl ListQuery {
    fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Filter and order a collection according to `spec`.
    pub fn apply(&self, spec: &ResourceSpec, mut items: Vec<Resource>) -> Vec<Resource> {
        items.retain(|item| self.matches(spec, item));
        sort(spec.sort, &mut items);
        items
    }

    pub fn matches(&self, spec: &ResourceSpec, item: &Resource) -> bool {
        for filter in spec.filters {
            let Some(wanted) = self.get(filter.param()) else {
                continue;
            };
            if wanted.eq_ignore_ascii_case(FILTER_ALL) {
                continue;
            }
            let keep = match filter {
                Filter::Exact { field, .. } => item
                    .field(field)
                    .is_some_and(|v| scalar_eq(v, wanted)),
                Filter::Tag { field, .. } => item
                    .field(field)
                    .and_then(Value::as_array)
                    .is_some_and(|tags| {
                        tags.iter()
                            .filter_map(Value::as_str)
                            .any(|t| t.eq_ignore_ascii_case(wanted))
                    }),
            };
            if !keep {
                return false;
            }
        }

        if let Some((field, value)) = spec.default_filter {
            if self.get(field).is_none() && item.str_field(field) != Some(value) {
                return false;
            }
        }

        if let Some(term) = self.get(SEARCH_PARAM) {
            if !spec.search.is_empty() {
                let term = term.to_lowercase();
                let hit = spec.search.iter().any(|field| {
                    item.str_field(field)
                        .is_some_and(|v| v.to_lowercase().contains(&term))
                });
                if !hit {
                    return false;
                }
            }
        }

        true
    }
}

/// Query values are always strings, so numbers and booleans compare by their text.
fn scalar_eq(stored: &Value, wanted: &str) -> bool {
    match stored {
        Value::String(s) => s == wanted,
        Value::Number(n) => n.to_string() == wanted,
        Value::Bool(b) => b.to_string() == wanted,
        _ => false,
    }
}

fn sort(order: SortOrder, items: &mut [Resource]) {
    match order {
        SortOrder::OldestFirst => items.sort_by_key(|r| r.created_at),
        SortOrder::NewestFirst => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Alphabetical(field) => items.sort_by_cached_key(|r| {
            (
                r.str_field(field).unwrap_or_default().to_lowercase(),
                r.created_at,
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{catalog, Document};
    use chrono::Duration;
    use serde_json::json;

    fn resource(collection: &str, value: Value, age_secs: i64) -> Resource {
        let data: Document = value.as_object().cloned().unwrap();
        let mut r = Resource::new(collection, data);
        r.created_at = r.created_at - Duration::seconds(age_secs);
        r.updated_at = r.created_at;
        r
    }

    fn blogs() -> Vec<Resource> {
        vec![
            resource(
                "blogs",
                json!({"title": "Visa tips", "excerpt": "How to apply", "status": "Published",
                       "category": "Visa", "tags": ["Canada", "Visa"]}),
                30,
            ),
            resource(
                "blogs",
                json!({"title": "Draft post", "excerpt": "Unfinished", "status": "Draft",
                       "category": "News", "tags": []}),
                20,
            ),
            resource(
                "blogs",
                json!({"title": "Scholarships", "excerpt": "Funding in canada", "status": "Published",
                       "category": "Funding", "tags": ["canada"]}),
                10,
            ),
        ]
    }

    fn titles(items: &[Resource]) -> Vec<&str> {
        items.iter().filter_map(|r| r.str_field("title")).collect()
    }

    #[test]
    fn test_blog_list_defaults_to_published_newest_first() {
        let spec = catalog::find("blogs").unwrap();
        let out = ListQuery::default().apply(spec, blogs());
        assert_eq!(titles(&out), vec!["Scholarships", "Visa tips"]);
    }

    #[test]
    fn test_blog_status_param_overrides_default() {
        let spec = catalog::find("blogs").unwrap();
        let q: ListQuery = [("status", "Draft")].into_iter().collect();
        assert_eq!(titles(&q.apply(spec, blogs())), vec!["Draft post"]);

        let all: ListQuery = [("status", "all")].into_iter().collect();
        assert_eq!(all.apply(spec, blogs()).len(), 3);
    }

    #[test]
    fn test_tag_filter_ignores_case() {
        let spec = catalog::find("blogs").unwrap();
        let q: ListQuery = [("tag", "CANADA")].into_iter().collect();
        assert_eq!(titles(&q.apply(spec, blogs())), vec!["Scholarships", "Visa tips"]);
    }

    #[test]
    fn test_search_spans_title_and_excerpt() {
        let spec = catalog::find("blogs").unwrap();
        let q: ListQuery = [("search", "canada")].into_iter().collect();
        assert_eq!(titles(&q.apply(spec, blogs())), vec!["Scholarships"]);
    }

    #[test]
    fn test_unknown_params_are_ignored() {
        let spec = catalog::find("blogs").unwrap();
        let q: ListQuery = [("colour", "blue")].into_iter().collect();
        assert_eq!(q.apply(spec, blogs()).len(), 2);
    }

    #[test]
    fn test_universities_sorted_by_name_ignoring_case() {
        let spec = catalog::find("universities").unwrap();
        let items = vec![
            resource("universities", json!({"name": "toronto", "country": "Canada", "status": "Active"}), 30),
            resource("universities", json!({"name": "Bristol", "country": "UK", "status": "Active"}), 20),
            resource("universities", json!({"name": "Auckland", "country": "NZ", "status": "Active"}), 10),
        ];
        let out = ListQuery::default().apply(spec, items);
        let names: Vec<_> = out.iter().filter_map(|r| r.str_field("name")).collect();
        assert_eq!(names, vec!["Auckland", "Bristol", "toronto"]);
    }

    #[test]
    fn test_exact_filter_on_country() {
        let spec = catalog::find("universities").unwrap();
        let items = vec![
            resource("universities", json!({"name": "A", "country": "Canada", "status": "Active"}), 2),
            resource("universities", json!({"name": "B", "country": "UK", "status": "Active"}), 1),
        ];
        let q: ListQuery = [("country", "UK")].into_iter().collect();
        let out = q.apply(spec, items);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].str_field("name"), Some("B"));
    }
}
