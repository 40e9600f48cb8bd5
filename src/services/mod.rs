//! Business logic services

pub mod catalog;
pub mod permissions;
pub mod rentals;
pub mod storage;
pub mod users;

use crate::{config::StorageConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub rentals: rentals::RentalsService,
    pub users: users::UsersService,
    pub storage: storage::StorageService,
    /// Shared repository, also used by readiness probes
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, storage_config: StorageConfig) -> Self {
        let storage = storage::StorageService::new(storage_config);
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), storage.clone()),
            rentals: rentals::RentalsService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            storage,
            repository,
        }
    }
}
