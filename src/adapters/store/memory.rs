//! In-memory resource store
//!
//! Backend used by tests and local development. All operations run under a
//! single async mutex, which makes `patch_if` genuinely atomic: no two
//! conditional updates can interleave between precondition check and write.

use super::traits::{apply_partial, precondition_holds, Filter, ResourceStore};
use crate::domain::{Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory store keyed by resource name
///
/// # Examples
///
/// ```
/// use glucotel::adapters::store::{MemoryStore, ResourceStore, Filter};
/// use serde_json::json;
///
/// # async fn example() -> glucotel::domain::Result<()> {
/// let store = MemoryStore::new();
/// let created = store.create("patients", json!({"monitoringMode": "classique"})).await?;
/// let id = created["id"].as_str().unwrap();
/// let fetched = store.get("patients", id).await?;
/// assert_eq!(fetched["monitoringMode"], "classique");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with entities per resource
    ///
    /// Useful in tests to start from a known dataset.
    pub fn with_seed(seed: HashMap<String, Vec<Value>>) -> Self {
        Self {
            resources: Mutex::new(seed),
        }
    }

    fn not_found(resource: &str, id: &str) -> StoreError {
        StoreError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

fn entity_id(entity: &Value) -> Option<&str> {
    entity.get("id").and_then(Value::as_str)
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list(&self, resource: &str, filter: &Filter) -> Result<Vec<Value>> {
        let resources = self.resources.lock().await;
        let entities = resources.get(resource).cloned().unwrap_or_default();
        Ok(entities
            .into_iter()
            .filter(|entity| filter.matches(entity))
            .collect())
    }

    async fn get(&self, resource: &str, id: &str) -> Result<Value> {
        let resources = self.resources.lock().await;
        resources
            .get(resource)
            .and_then(|entities| entities.iter().find(|e| entity_id(e) == Some(id)))
            .cloned()
            .ok_or_else(|| Self::not_found(resource, id).into())
    }

    async fn create(&self, resource: &str, body: Value) -> Result<Value> {
        let mut entity = body;
        if entity.get("id").is_none() {
            if let Some(object) = entity.as_object_mut() {
                object.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
            }
        }

        let mut resources = self.resources.lock().await;
        resources
            .entry(resource.to_string())
            .or_default()
            .push(entity.clone());
        Ok(entity)
    }

    async fn patch(&self, resource: &str, id: &str, partial: Value) -> Result<Value> {
        let mut resources = self.resources.lock().await;
        let entity = resources
            .get_mut(resource)
            .and_then(|entities| entities.iter_mut().find(|e| entity_id(e) == Some(id)))
            .ok_or_else(|| Self::not_found(resource, id))?;

        apply_partial(entity, &partial);
        Ok(entity.clone())
    }

    async fn patch_if(
        &self,
        resource: &str,
        id: &str,
        expected: Value,
        partial: Value,
    ) -> Result<Option<Value>> {
        // Check and write under the same lock acquisition
        let mut resources = self.resources.lock().await;
        let entity = resources
            .get_mut(resource)
            .and_then(|entities| entities.iter_mut().find(|e| entity_id(e) == Some(id)))
            .ok_or_else(|| Self::not_found(resource, id))?;

        if !precondition_holds(entity, &expected) {
            return Ok(None);
        }

        apply_partial(entity, &partial);
        Ok(Some(entity.clone()))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_assigns_id() {
        let store = MemoryStore::new();
        let created = store
            .create("patients", json!({"monitoringMode": "lean"}))
            .await
            .unwrap();
        assert!(created["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_create_keeps_provided_id() {
        let store = MemoryStore::new();
        let created = store
            .create("patients", json!({"id": "patient-1"}))
            .await
            .unwrap();
        assert_eq!(created["id"], "patient-1");
    }

    #[tokio::test]
    async fn test_get_missing_entity_fails() {
        let store = MemoryStore::new();
        let result = store.get("patients", "nope").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let store = MemoryStore::new();
        store
            .create("glycemiaReadings", json!({"id": "r-1", "patientId": "p-1"}))
            .await
            .unwrap();
        store
            .create("glycemiaReadings", json!({"id": "r-2", "patientId": "p-2"}))
            .await
            .unwrap();

        let filter = Filter::new().eq("patientId", json!("p-1"));
        let results = store.list("glycemiaReadings", &filter).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], "r-1");
    }

    #[tokio::test]
    async fn test_patch_merges_and_clears() {
        let store = MemoryStore::new();
        store
            .create("doctors", json!({"id": "d-1", "mfaCode": "123456"}))
            .await
            .unwrap();

        let patched = store
            .patch("doctors", "d-1", json!({"mfaCode": null, "email": "dr@example.com"}))
            .await
            .unwrap();

        assert!(patched.get("mfaCode").is_none());
        assert_eq!(patched["email"], "dr@example.com");
    }

    #[tokio::test]
    async fn test_patch_if_applies_when_precondition_holds() {
        let store = MemoryStore::new();
        store
            .create("trackingCodes", json!({"id": "tc-1", "isActive": true}))
            .await
            .unwrap();

        let result = store
            .patch_if(
                "trackingCodes",
                "tc-1",
                json!({"isActive": true}),
                json!({"isActive": false}),
            )
            .await
            .unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap()["isActive"], false);
    }

    #[tokio::test]
    async fn test_patch_if_rejects_when_precondition_lost() {
        let store = MemoryStore::new();
        store
            .create("trackingCodes", json!({"id": "tc-1", "isActive": false}))
            .await
            .unwrap();

        let result = store
            .patch_if(
                "trackingCodes",
                "tc-1",
                json!({"isActive": true}),
                json!({"isActive": false}),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_patch_if_exactly_one_winner_under_contention() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        store
            .create("trackingCodes", json!({"id": "tc-1", "isActive": true}))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for patient in ["p-a", "p-b", "p-c", "p-d"] {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .patch_if(
                        "trackingCodes",
                        "tc-1",
                        json!({"isActive": true}),
                        json!({"isActive": false, "consumedByPatientId": patient}),
                    )
                    .await
                    .unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
