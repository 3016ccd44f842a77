//! Generic CRUD service shared by every resource collection.
//!
//! Behaviour per collection comes from its [`ResourceSpec`]; the service
//! itself only sequences load, validate, check and persist.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use common::{AppError, AppResult};
use domain::resource::Reference;
use domain::{ListQuery, Resource, ResourceSpec};

use crate::repository::ResourceRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ResourceService: Send + Sync {
    /// Filtered and ordered records of a collection
    async fn list(&self, spec: &'static ResourceSpec, query: ListQuery) -> AppResult<Vec<Resource>>;

    async fn get(&self, spec: &'static ResourceSpec, id: String) -> AppResult<Resource>;

    async fn create(&self, spec: &'static ResourceSpec, body: Value) -> AppResult<Resource>;

    /// Shallow merge of `body` over the stored document
    async fn update(&self, spec: &'static ResourceSpec, id: String, body: Value)
        -> AppResult<Resource>;

    async fn delete(&self, spec: &'static ResourceSpec, id: String) -> AppResult<()>;
}

pub struct ResourceManager {
    repo: Arc<dyn ResourceRepository>,
}

impl ResourceManager {
    pub fn new(repo: Arc<dyn ResourceRepository>) -> Self {
        Self { repo }
    }

    async fn load(&self, spec: &ResourceSpec, id: &str) -> AppResult<Resource> {
        let id = domain::parse_id(id, spec.label)?;
        self.repo
            .find_by_id(spec.name, id)
            .await?
            .ok_or_else(|| spec.not_found().into())
    }

    async fn count_references(&self, reference: &Reference, target: &Resource) -> AppResult<usize> {
        let Some(key) = target.field(reference.key).filter(|v| !v.is_null()) else {
            return Ok(0);
        };
        let referencing = self.repo.list(reference.collection).await?;
        Ok(referencing
            .iter()
            .filter(|r| reference.points_at(r, key))
            .count())
    }

    /// Refuse `action` on `target` while any record still refers to it.
    async fn ensure_unreferenced(
        &self,
        spec: &ResourceSpec,
        reference: &Reference,
        target: &Resource,
        action: &str,
    ) -> AppResult<()> {
        let count = self.count_references(reference, target).await?;
        if count > 0 {
            return Err(AppError::validation(format!(
                "Cannot {} {} referenced by {} {}(s)",
                action, spec.label, count, reference.noun
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceService for ResourceManager {
    async fn list(&self, spec: &'static ResourceSpec, query: ListQuery) -> AppResult<Vec<Resource>> {
        let items = self.repo.list(spec.name).await?;
        Ok(query.apply(spec, items))
    }

    async fn get(&self, spec: &'static ResourceSpec, id: String) -> AppResult<Resource> {
        self.load(spec, &id).await
    }

    async fn create(&self, spec: &'static ResourceSpec, body: Value) -> AppResult<Resource> {
        let data = spec.prepare_create(body)?;
        if !spec.unique.is_empty() {
            let existing = self.repo.list(spec.name).await?;
            spec.check_unique(&data, &existing, None)?;
        }

        let resource = self.repo.insert(&Resource::new(spec.name, data)).await?;
        tracing::info!(collection = spec.name, id = %resource.id, "Resource created");
        Ok(resource)
    }

    async fn update(
        &self,
        spec: &'static ResourceSpec,
        id: String,
        body: Value,
    ) -> AppResult<Resource> {
        let mut resource = self.load(spec, &id).await?;
        let data = spec.prepare_update(&resource.data, body)?;
        if !spec.unique.is_empty() {
            let existing = self.repo.list(spec.name).await?;
            spec.check_unique(&data, &existing, Some(resource.id))?;
        }
        for reference in spec.referenced_by {
            if reference.key_changed(&resource.data, &data) {
                self.ensure_unreferenced(spec, reference, &resource, "rename")
                    .await?;
            }
        }

        resource.replace(data);

        let resource = self.repo.update(&resource).await?;
        tracing::debug!(collection = spec.name, id = %resource.id, "Resource updated");
        Ok(resource)
    }

    async fn delete(&self, spec: &'static ResourceSpec, id: String) -> AppResult<()> {
        let resource = self.load(spec, &id).await?;

        for reference in spec.referenced_by {
            self.ensure_unreferenced(spec, reference, &resource, "delete")
                .await?;
        }

        if !self.repo.delete(spec.name, resource.id).await? {
            return Err(spec.not_found().into());
        }
        tracing::info!(collection = spec.name, id = %resource.id, "Resource deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockResourceRepository;
    use domain::catalog::{BLOGS, BRANCHES, CLASSES, PROGRAMS, UNIVERSITIES};
    use serde_json::json;

    fn stored(spec: &ResourceSpec, body: Value) -> Resource {
        Resource::new(spec.name, spec.prepare_create(body).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_id_reads_as_not_found() {
        let mut repo = MockResourceRepository::new();
        repo.expect_find_by_id().never();

        let service = ResourceManager::new(Arc::new(repo));
        let err = service.get(&CLASSES, "not-a-uuid".into()).await.unwrap_err();
        assert_eq!(err.user_message(), "Class not found");
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_fills_defaults() {
        let mut repo = MockResourceRepository::new();
        repo.expect_insert().returning(|r| Ok(r.clone()));

        let service = ResourceManager::new(Arc::new(repo));
        let created = service
            .create(&CLASSES, json!({ "title": "IELTS" }))
            .await
            .unwrap();
        assert_eq!(created.str_field("status"), Some("Active"));
        assert_eq!(created.collection, "classes");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_unique_field() {
        let mut repo = MockResourceRepository::new();
        repo.expect_list()
            .withf(|collection| collection == "branches")
            .returning(|_| {
                Ok(vec![stored(
                    &BRANCHES,
                    json!({ "name": "Kathmandu", "address": "A", "phone": "1" }),
                )])
            });
        repo.expect_insert().never();

        let service = ResourceManager::new(Arc::new(repo));
        let err = service
            .create(
                &BRANCHES,
                json!({ "name": " kathmandu ", "address": "B", "phone": "2" }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Branch with this name already exists");
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_merges_and_advances_timestamp() {
        let blog = stored(
            &BLOGS,
            json!({
                "title": "T", "slug": "t", "excerpt": "e", "content": "c", "author": "a"
            }),
        );
        let id = blog.id;
        let before = blog.updated_at;
        let existing = vec![blog.clone()];

        let mut repo = MockResourceRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(blog.clone())));
        repo.expect_list().returning(move |_| Ok(existing.clone()));
        repo.expect_update().returning(|r| Ok(r.clone()));

        let service = ResourceManager::new(Arc::new(repo));
        let updated = service
            .update(&BLOGS, id.to_string(), json!({ "status": "Published" }))
            .await
            .unwrap();

        assert_eq!(updated.str_field("status"), Some("Published"));
        assert_eq!(updated.str_field("slug"), Some("t"));
        assert!(updated.updated_at > before);
        assert_eq!(updated.created_at, before);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_enum() {
        let class = stored(&CLASSES, json!({ "title": "IELTS" }));
        let id = class.id;

        let mut repo = MockResourceRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(class.clone())));
        repo.expect_update().never();

        let service = ResourceManager::new(Arc::new(repo));
        let err = service
            .update(&CLASSES, id.to_string(), json!({ "status": "Archived" }))
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "Invalid status. Must be one of: Active, Inactive"
        );
    }

    #[tokio::test]
    async fn test_delete_referenced_university_is_restricted() {
        let university = stored(&UNIVERSITIES, json!({ "name": "Monash", "country": "AU" }));
        let id = university.id;
        let program = stored(&PROGRAMS, json!({ "title": "MIT", "university": "Monash" }));

        let mut repo = MockResourceRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(university.clone())));
        repo.expect_list()
            .withf(|collection| collection == "programs")
            .returning(move |_| Ok(vec![program.clone()]));
        repo.expect_delete().never();

        let service = ResourceManager::new(Arc::new(repo));
        let err = service
            .delete(&UNIVERSITIES, id.to_string())
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "Cannot delete University referenced by 1 program(s)"
        );
    }

    #[tokio::test]
    async fn test_delete_unreferenced_university() {
        let university = stored(&UNIVERSITIES, json!({ "name": "Monash", "country": "AU" }));
        let id = university.id;

        let mut repo = MockResourceRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(university.clone())));
        repo.expect_list().returning(|_| Ok(vec![]));
        repo.expect_delete().returning(|_, _| Ok(true));

        let service = ResourceManager::new(Arc::new(repo));
        assert!(service.delete(&UNIVERSITIES, id.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_matches_references_ignoring_case() {
        let university = stored(&UNIVERSITIES, json!({ "name": "Toronto", "country": "CA" }));
        let id = university.id;
        let program = stored(&PROGRAMS, json!({ "title": "MBA", "university": "toronto " }));

        let mut repo = MockResourceRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(university.clone())));
        repo.expect_list()
            .withf(|collection| collection == "programs")
            .returning(move |_| Ok(vec![program.clone()]));
        repo.expect_delete().never();

        let service = ResourceManager::new(Arc::new(repo));
        let err = service
            .delete(&UNIVERSITIES, id.to_string())
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "Cannot delete University referenced by 1 program(s)"
        );
    }

    #[tokio::test]
    async fn test_rename_referenced_university_is_restricted() {
        let university = stored(&UNIVERSITIES, json!({ "name": "Monash", "country": "AU" }));
        let id = university.id;
        let sibling = university.clone();
        let program = stored(&PROGRAMS, json!({ "title": "MIT", "university": "Monash" }));

        let mut repo = MockResourceRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(university.clone())));
        repo.expect_list().returning(move |collection| match collection {
            "programs" => Ok(vec![program.clone()]),
            _ => Ok(vec![sibling.clone()]),
        });
        repo.expect_update().never();

        let service = ResourceManager::new(Arc::new(repo));
        let err = service
            .update(&UNIVERSITIES, id.to_string(), json!({ "name": "Monash University" }))
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message(),
            "Cannot rename University referenced by 1 program(s)"
        );
    }

    #[tokio::test]
    async fn test_update_referenced_university_without_rename() {
        let university = stored(&UNIVERSITIES, json!({ "name": "Monash", "country": "AU" }));
        let id = university.id;
        let sibling = university.clone();

        let mut repo = MockResourceRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(university.clone())));
        repo.expect_list()
            .withf(|collection| collection == "universities")
            .returning(move |_| Ok(vec![sibling.clone()]));
        repo.expect_update().returning(|r| Ok(r.clone()));

        let service = ResourceManager::new(Arc::new(repo));
        let updated = service
            .update(&UNIVERSITIES, id.to_string(), json!({ "country": "Australia" }))
            .await
            .unwrap();
        assert_eq!(updated.str_field("country"), Some("Australia"));
    }
}
