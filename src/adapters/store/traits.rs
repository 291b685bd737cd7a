//! Resource store abstraction traits
//!
//! This module defines the trait that persistence backends must implement to
//! work with Glucotel. The store is a generic resource collaborator addressed
//! by resource name and filter parameters; entity shapes are the JSON wire
//! shapes of the domain models.

use crate::domain::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Equality filter for `list` queries
///
/// A conjunction of field/value pairs: an entity matches when every pair
/// matches the entity's field exactly.
///
/// # Examples
///
/// ```
/// use glucotel::adapters::store::Filter;
/// use serde_json::json;
///
/// let filter = Filter::new()
///     .eq("patientId", json!("patient-1"))
///     .eq("read", json!(false));
/// assert_eq!(filter.pairs().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pairs: Vec<(String, Value)>,
}

impl Filter {
    /// Creates an empty filter (matches every entity)
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.pairs.push((field.into(), value));
        self
    }

    /// The field/value pairs of this filter
    pub fn pairs(&self) -> &[(String, Value)] {
        &self.pairs
    }

    /// Whether an entity satisfies every condition of this filter
    pub fn matches(&self, entity: &Value) -> bool {
        self.pairs
            .iter()
            .all(|(field, expected)| entity.get(field) == Some(expected))
    }
}

/// Generic resource store collaborator
///
/// This trait defines the request/response interface the core consumes for
/// all persistence: `list`, `get`, `create`, `patch`, plus `patch_if` for
/// the two flows that need at-most-once semantics (MFA verification and
/// tracking-code redemption).
///
/// Resources used by the core: `patients`, `glycemiaReadings`, `doctors`,
/// `trackingCodes`, `patientDoctorMessages`.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// List entities of a resource matching a filter
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. An empty result is `Ok(vec![])`,
    /// never an error.
    async fn list(&self, resource: &str, filter: &Filter) -> Result<Vec<Value>>;

    /// Fetch a single entity by ID
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::StoreError::NotFound`] if no entity with
    /// that ID exists.
    async fn get(&self, resource: &str, id: &str) -> Result<Value>;

    /// Create an entity
    ///
    /// The store assigns an `id` when the body carries none, and returns the
    /// entity as persisted.
    async fn create(&self, resource: &str, body: Value) -> Result<Value>;

    /// Apply a partial update to an entity
    ///
    /// Fields present in `partial` replace the entity's fields; a JSON
    /// `null` clears the field. Returns the entity after the update.
    async fn patch(&self, resource: &str, id: &str, partial: Value) -> Result<Value>;

    /// Apply a partial update only if the entity still matches `expected`
    ///
    /// `expected` is an object of field/value preconditions evaluated
    /// atomically with the update (an expected `null` matches an absent
    /// field). Returns `Ok(Some(entity))` when the update applied and
    /// `Ok(None)` when the precondition no longer held — the caller lost
    /// the race.
    ///
    /// This is the conditional-update primitive that guarantees
    /// at-most-once consumption of MFA codes and tracking codes under
    /// concurrent requests.
    async fn patch_if(
        &self,
        resource: &str,
        id: &str,
        expected: Value,
        partial: Value,
    ) -> Result<Option<Value>>;

    /// Verify the store is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not reachable or not responding.
    async fn health_check(&self) -> Result<()>;
}

/// Merge a partial update into an entity object, JSON-merge-patch style
///
/// Present fields replace; `null` removes the field. Shared by store
/// implementations so both backends apply patches identically.
pub fn apply_partial(entity: &mut Value, partial: &Value) {
    let (Some(target), Some(changes)) = (entity.as_object_mut(), partial.as_object()) else {
        return;
    };

    for (field, value) in changes {
        if value.is_null() {
            target.remove(field);
        } else {
            target.insert(field.clone(), value.clone());
        }
    }
}

/// Whether an entity satisfies a precondition object
///
/// An expected `null` matches an absent field as well as an explicit null.
pub fn precondition_holds(entity: &Value, expected: &Value) -> bool {
    let Some(conditions) = expected.as_object() else {
        return true;
    };

    conditions.iter().all(|(field, value)| match entity.get(field) {
        Some(actual) => actual == value,
        None => value.is_null(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches() {
        let filter = Filter::new()
            .eq("patientId", json!("patient-1"))
            .eq("read", json!(false));

        let matching = json!({"patientId": "patient-1", "read": false, "content": "hi"});
        let wrong_value = json!({"patientId": "patient-1", "read": true});
        let missing_field = json!({"read": false});

        assert!(filter.matches(&matching));
        assert!(!filter.matches(&wrong_value));
        assert!(!filter.matches(&missing_field));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = Filter::new();
        assert!(filter.matches(&json!({"anything": 1})));
    }

    #[test]
    fn test_apply_partial_replaces_and_removes() {
        let mut entity = json!({"id": "d-1", "mfaCode": "123456", "email": "dr@example.com"});
        apply_partial(&mut entity, &json!({"mfaCode": null, "email": "new@example.com"}));

        assert!(entity.get("mfaCode").is_none());
        assert_eq!(entity["email"], "new@example.com");
        assert_eq!(entity["id"], "d-1");
    }

    #[test]
    fn test_precondition_holds() {
        let entity = json!({"id": "tc-1", "isActive": true});

        assert!(precondition_holds(&entity, &json!({"isActive": true})));
        assert!(!precondition_holds(&entity, &json!({"isActive": false})));
        // Absent field matches an expected null
        assert!(precondition_holds(&entity, &json!({"consumedByPatientId": null})));
        assert!(!precondition_holds(&entity, &json!({"missing": "value"})));
    }
}
