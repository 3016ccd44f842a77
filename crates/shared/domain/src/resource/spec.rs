//! Per-collection resource rules.
//!
//! A [`ResourceSpec`] describes everything the generic handler needs to know
//! about one collection: validation, defaults, uniqueness, list filters,
//! ordering, access and inbound references.

use serde_json::Value;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::access::Access;
use crate::error::{DomainError, DomainResult};
use crate::permission::Permission;

use super::{format_timestamp, now, strip_system_fields, Document, Resource};

/// String field restricted to a fixed set of values. The first value is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumField {
    pub field: &'static str,
    pub values: &'static [&'static str],
}

impl EnumField {
    pub fn default_value(&self) -> &'static str {
        self.values.first().copied().unwrap_or_default()
    }
}

/// A query parameter the list operation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// `?param=value` keeps documents whose `field` equals `value`.
    Exact {
        param: &'static str,
        field: &'static str,
    },
    /// `?param=value` keeps documents whose array `field` contains `value`, ignoring case.
    Tag {
        param: &'static str,
        field: &'static str,
    },
}

impl Filter {
    pub fn param(&self) -> &'static str {
        match self {
            Filter::Exact { param, .. } | Filter::Tag { param, .. } => param,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
    /// Case-insensitive ascending on a string field.
    Alphabetical(&'static str),
}

/// Another collection pointing at this one by value.
///
/// A record in `collection` whose `field` matches this record's `key` counts as a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub collection: &'static str,
    pub field: &'static str,
    pub key: &'static str,
    pub noun: &'static str,
}

impl Reference {
    /// Whether `referencing` points at a target whose key field is `key`.
    /// Matches the way unique fields compare: trimmed, case-insensitive.
    pub fn points_at(&self, referencing: &Resource, key: &Value) -> bool {
        same_value(referencing.field(self.field), key)
    }

    /// Whether `updated` changes the key that referencing records match on.
    pub fn key_changed(&self, current: &Document, updated: &Document) -> bool {
        match current.get(self.key) {
            Some(old) if !old.is_null() => !same_value(updated.get(self.key), old),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceAccess {
    pub list: Access,
    pub get: Access,
    pub create: Access,
    pub update: Access,
    pub delete: Access,
}

impl ResourceAccess {
    /// Published content: anyone reads, the owning team writes.
    pub const fn content(permission: Permission) -> Self {
        Self {
            list: Access::Public,
            get: Access::Public,
            create: Access::staff(permission),
            update: Access::staff(permission),
            delete: Access::staff(permission),
        }
    }

    /// Leads: anyone submits, the owning team reads and manages.
    pub const fn lead(permission: Permission) -> Self {
        Self {
            list: Access::staff(permission),
            get: Access::staff(permission),
            create: Access::Public,
            update: Access::staff(permission),
            delete: Access::staff(permission),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Collection name, also the route segment under `/api`.
    pub name: &'static str,
    /// Singular display label used in messages.
    pub label: &'static str,
    pub permission: Permission,
    pub required: &'static [&'static str],
    pub unique: &'static [&'static str],
    pub enums: &'static [EnumField],
    pub emails: &'static [&'static str],
    /// Fields set to the submission time when absent.
    pub timestamps: &'static [&'static str],
    pub filters: &'static [Filter],
    pub search: &'static [&'static str],
    /// Applied unless the client supplies the same parameter.
    pub default_filter: Option<(&'static str, &'static str)>,
    pub sort: SortOrder,
    pub access: ResourceAccess,
    pub referenced_by: &'static [Reference],
}

impl ResourceSpec {
    /// Turn a create body into a stored document: strip system fields, fill
    /// defaults, validate.
    pub fn prepare_create(&self, body: Value) -> DomainResult<Document> {
        let mut doc = into_document(body)?;
        strip_system_fields(&mut doc);
        self.apply_defaults(&mut doc);
        self.validate(&doc)?;
        Ok(doc)
    }

    /// Shallow-merge an update body over the current document and validate the result.
    pub fn prepare_update(&self, current: &Document, body: Value) -> DomainResult<Document> {
        let mut patch = into_document(body)?;
        strip_system_fields(&mut patch);

        let mut merged = current.clone();
        merged.extend(patch);
        self.apply_defaults(&mut merged);
        self.validate(&merged)?;
        Ok(merged)
    }

    pub fn apply_defaults(&self, doc: &mut Document) {
        for e in self.enums {
            if is_absent(doc.get(e.field)) {
                doc.insert(e.field.into(), Value::String(e.default_value().into()));
            }
        }
        for field in self.timestamps {
            if is_absent(doc.get(*field)) {
                doc.insert((*field).into(), Value::String(format_timestamp(now())));
            }
        }
    }

    pub fn validate(&self, doc: &Document) -> DomainResult<()> {
        for field in self.required {
            if is_blank(doc.get(*field)) {
                return Err(DomainError::validation(format!("{} is required", field)));
            }
        }

        for e in self.enums {
            let value = doc.get(e.field).and_then(Value::as_str);
            if !value.is_some_and(|v| e.values.contains(&v)) {
                return Err(DomainError::validation(format!(
                    "Invalid {}. Must be one of: {}",
                    e.field,
                    e.values.join(", ")
                )));
            }
        }

        for field in self.emails {
            match doc.get(*field) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) if s.trim().is_empty() => {}
                Some(Value::String(s)) if s.trim().validate_email() => {}
                Some(_) => {
                    return Err(DomainError::validation(format!(
                        "Please provide a valid {}",
                        field
                    )))
                }
            }
        }

        Ok(())
    }

    /// Reject `candidate` when one of its unique fields matches another record.
    pub fn check_unique<'a>(
        &self,
        candidate: &Document,
        existing: impl IntoIterator<Item = &'a Resource>,
        exclude: Option<Uuid>,
    ) -> DomainResult<()> {
        if self.unique.is_empty() {
            return Ok(());
        }

        let others: Vec<&Resource> = existing
            .into_iter()
            .filter(|r| Some(r.id) != exclude)
            .collect();

        for field in self.unique {
            let Some(value) = candidate.get(*field).filter(|v| !is_blank(Some(v))) else {
                continue;
            };
            if others.iter().any(|r| same_value(r.field(field), value)) {
                return Err(DomainError::conflict(format!(
                    "{} with this {}",
                    self.label, field
                )));
            }
        }

        Ok(())
    }

    pub fn not_found(&self) -> DomainError {
        DomainError::not_found(self.label)
    }

    pub fn deleted_message(&self) -> String {
        format!("{} deleted successfully", self.label)
    }
}

fn into_document(body: Value) -> DomainResult<Document> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(DomainError::validation("Request body must be a JSON object")),
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Strings compare ignoring case and surrounding whitespace, everything else exactly.
fn same_value(stored: Option<&Value>, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Some(Value::String(a)), Value::String(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        (Some(a), b) => a == b,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::catalog;
    use serde_json::json;

    fn blog_spec() -> &'static ResourceSpec {
        catalog::find("blogs").unwrap()
    }

    fn blog_body() -> Value {
        json!({
            "title": "Study in Canada",
            "slug": "study-in-canada",
            "excerpt": "Short",
            "content": "Long",
            "author": "Admin"
        })
    }

    #[test]
    fn test_create_applies_enum_default() {
        let doc = blog_spec().prepare_create(blog_body()).unwrap();
        assert_eq!(doc["status"], "Draft");
    }

    #[test]
    fn test_create_rejects_missing_required_field() {
        let mut body = blog_body();
        body.as_object_mut().unwrap().remove("slug");
        let err = blog_spec().prepare_create(body).unwrap_err();
        assert_eq!(err.to_string(), "slug is required");
    }

    #[test]
    fn test_create_rejects_blank_required_field() {
        let mut body = blog_body();
        body["title"] = json!("   ");
        assert!(blog_spec().prepare_create(body).is_err());
    }

    #[test]
    fn test_create_rejects_unknown_enum_value() {
        let mut body = blog_body();
        body["status"] = json!("Archived");
        let err = blog_spec().prepare_create(body).unwrap_err();
        assert!(err.to_string().starts_with("Invalid status"));
    }

    #[test]
    fn test_create_ignores_system_fields() {
        let mut body = blog_body();
        body["_id"] = json!("forged");
        body["createdAt"] = json!("1970-01-01T00:00:00Z");
        let doc = blog_spec().prepare_create(body).unwrap();
        assert!(!doc.contains_key("_id"));
        assert!(!doc.contains_key("createdAt"));
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(blog_spec().prepare_create(json!(["title"])).is_err());
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let spec = blog_spec();
        let current = spec.prepare_create(blog_body()).unwrap();
        let merged = spec
            .prepare_update(&current, json!({"title": "New title"}))
            .unwrap();

        assert_eq!(merged["title"], "New title");
        assert_eq!(merged["slug"], "study-in-canada");
        assert_eq!(merged["status"], "Draft");
    }

    #[test]
    fn test_update_cannot_blank_required_field() {
        let spec = blog_spec();
        let current = spec.prepare_create(blog_body()).unwrap();
        assert!(spec.prepare_update(&current, json!({"title": ""})).is_err());
        assert!(spec.prepare_update(&current, json!({"title": null})).is_err());
    }

    #[test]
    fn test_lead_email_must_be_valid() {
        let spec = catalog::find("contacts").unwrap();
        let err = spec
            .prepare_create(json!({"name": "A", "email": "not-an-email", "message": "Hi"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Please provide a valid email");

        let ok = spec
            .prepare_create(json!({"name": "A", "email": "a@example.com", "message": "Hi"}))
            .unwrap();
        assert_eq!(ok["status"], "New");
        assert!(ok["date"].is_string());
    }

    #[test]
    fn test_check_unique_reports_label_and_field() {
        let spec = blog_spec();
        let existing = Resource::new("blogs", spec.prepare_create(blog_body()).unwrap());
        let candidate = spec.prepare_create(blog_body()).unwrap();

        let err = spec
            .check_unique(&candidate, [&existing], None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Blog with this slug already exists");
    }

    #[test]
    fn test_check_unique_excludes_self() {
        let spec = blog_spec();
        let existing = Resource::new("blogs", spec.prepare_create(blog_body()).unwrap());
        assert!(spec
            .check_unique(&existing.data, [&existing], Some(existing.id))
            .is_ok());
    }

    #[test]
    fn test_messages_use_label() {
        let spec = catalog::find("classes").unwrap();
        assert_eq!(spec.not_found().to_string(), "Class not found");
        assert_eq!(spec.deleted_message(), "Class deleted successfully");
    }

    #[test]
    fn test_reference_matches_like_unique_fields() {
        let universities = catalog::find("universities").unwrap();
        let reference = universities.referenced_by[0];
        let program = Resource::new(
            "programs",
            catalog::find("programs")
                .unwrap()
                .prepare_create(json!({ "title": "MBA", "university": " toronto " }))
                .unwrap(),
        );
        assert!(reference.points_at(&program, &json!("Toronto")));
        assert!(!reference.points_at(&program, &json!("Monash")));
    }

    #[test]
    fn test_reference_key_change_ignores_case_only_edits() {
        let universities = catalog::find("universities").unwrap();
        let reference = universities.referenced_by[0];
        let current = universities
            .prepare_create(json!({ "name": "Monash", "country": "AU" }))
            .unwrap();

        let recased = universities
            .prepare_update(&current, json!({ "name": "MONASH" }))
            .unwrap();
        let renamed = universities
            .prepare_update(&current, json!({ "name": "Monash University" }))
            .unwrap();
        let untouched = universities
            .prepare_update(&current, json!({ "country": "Australia" }))
            .unwrap();

        assert!(!reference.key_changed(&current, &recased));
        assert!(reference.key_changed(&current, &renamed));
        assert!(!reference.key_changed(&current, &untouched));
    }
}
