//! CRUD façade shared by every entity kind.

use geovision_domain::{Entity, Organization, Person, Source, Website};

use super::error::{require_key, ServiceError};
use crate::repositories::EntityRepository;

pub type PersonService = EntityService<Person>;
pub type OrganizationService = EntityService<Organization>;
pub type SourceService = EntityService<Source>;
pub type WebsiteService = EntityService<Website>;

/// Validates arguments and categorizes errors around one entity repository.
pub struct EntityService<E: Entity> {
    repo: EntityRepository<E>,
}

impl<E: Entity> EntityService<E> {
    pub fn new(repo: EntityRepository<E>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, key: &str) -> Result<E, ServiceError> {
        require_key(key)?;
        self.repo
            .get(key)
            .await
            .map_err(|e| ServiceError::from_repo("get", e))
    }

    pub async fn create(&self, entity: Option<E>) -> Result<E, ServiceError> {
        let entity = entity.ok_or_else(|| payload_required::<E>())?;
        self.repo
            .create(&entity)
            .await
            .map_err(|e| ServiceError::from_repo("create", e))
    }

    pub async fn update(&self, key: &str, patch: Option<E>) -> Result<E, ServiceError> {
        require_key(key)?;
        let patch = patch.ok_or_else(|| payload_required::<E>())?;
        self.repo
            .update(key, &patch)
            .await
            .map_err(|e| ServiceError::from_repo("update", e))
    }

    pub async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        require_key(key)?;
        self.repo
            .delete(key)
            .await
            .map_err(|e| ServiceError::from_repo("delete", e))
    }
}

impl EntityService<Person> {
    /// Listing persons is part of the API surface but not offered yet.
    pub async fn list(&self) -> Result<Vec<Person>, ServiceError> {
        Err(ServiceError::Unimplemented("GetPersons"))
    }
}

fn payload_required<E: Entity>() -> ServiceError {
    ServiceError::bad_request(format!(
        "{} payload is required",
        E::KIND.entity_type().to_lowercase()
    ))
}
