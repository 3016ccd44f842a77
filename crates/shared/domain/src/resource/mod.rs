//! Generic resource records.
//!
//! Every content and lead collection is stored as an opaque JSON document
//! plus a handful of system fields. The per-collection rules live in
//! [`ResourceSpec`]; the records themselves know nothing about them.

pub mod catalog;
pub mod query;
pub mod spec;

use chrono::{DateTime, Duration, DurationRound, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

pub use query::ListQuery;
pub use spec::{EnumField, Filter, Reference, ResourceAccess, ResourceSpec, SortOrder};

/// Fields owned by the server. Clients may send them but they are discarded.
pub const SYSTEM_FIELDS: &[&str] = &["id", "_id", "createdAt", "updatedAt"];

/// JSON document body of a resource.
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: Uuid,
    pub collection: String,
    pub data: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(collection: impl Into<String>, data: Document) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4(),
            collection: collection.into(),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the document with an already merged and validated one.
    pub fn replace(&mut self, data: Document) {
        self.data = data;
        self.updated_at = next_timestamp(self.updated_at);
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }

    /// Client representation: the document plus `id`, `_id`, `createdAt`, `updatedAt`.
    pub fn to_json(&self) -> Value {
        let mut out = self.data.clone();
        let id = Value::String(self.id.to_string());
        out.insert("id".into(), id.clone());
        out.insert("_id".into(), id);
        out.insert("createdAt".into(), Value::String(format_timestamp(self.created_at)));
        out.insert("updatedAt".into(), Value::String(format_timestamp(self.updated_at)));
        Value::Object(out)
    }
}

/// Current time truncated to microseconds, the finest precision every backend keeps.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(Duration::microseconds(1)).unwrap_or(now)
}

/// A timestamp strictly after `previous`, normally the current time.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Drop any client-supplied system fields from a request body.
pub fn strip_system_fields(doc: &mut Document) {
    for field in SYSTEM_FIELDS {
        doc.remove(*field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_new_resources_get_distinct_ids() {
        let a = Resource::new("classes", Document::new());
        let b = Resource::new("classes", Document::new());
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_replace_strictly_increases_updated_at() {
        let mut resource = Resource::new("classes", doc(json!({"title": "A"})));
        let created = resource.created_at;

        for _ in 0..5 {
            let before = resource.updated_at;
            resource.replace(doc(json!({"title": "B"})));
            assert!(resource.updated_at > before);
        }
        assert_eq!(resource.created_at, created);
    }

    #[test]
    fn test_next_timestamp_handles_future_previous() {
        let future = now() + Duration::seconds(60);
        assert_eq!(next_timestamp(future), future + Duration::microseconds(1));
    }

    #[test]
    fn test_to_json_renders_system_fields() {
        let resource = Resource::new("blogs", doc(json!({"title": "Hello"})));
        let json = resource.to_json();

        assert_eq!(json["title"], "Hello");
        assert_eq!(json["id"], resource.id.to_string());
        assert_eq!(json["_id"], json["id"]);
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
    }

    #[test]
    fn test_strip_system_fields() {
        let mut body = doc(json!({
            "id": "x", "_id": "y", "createdAt": "z", "updatedAt": "w", "title": "kept"
        }));
        strip_system_fields(&mut body);
        assert_eq!(body.len(), 1);
        assert_eq!(body["title"], "kept");
    }
}
