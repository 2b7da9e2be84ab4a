use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::domain::{NewSchool, School};
use crate::errors::ServiceError;

/// Persistence for school records.
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    async fn create(&self, school: &NewSchool) -> Result<School, ServiceError>;
    async fn list_all(&self) -> Result<Vec<School>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmSchoolRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSchoolRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl SchoolRepository for SeaOrmSchoolRepository {
    async fn create(&self, school: &NewSchool) -> Result<School, ServiceError> {
        let created = models::school::create(&self.db, &school.name, &school.address, school.latitude, school.longitude).await?;
        Ok(created.into())
    }

    async fn list_all(&self) -> Result<Vec<School>, ServiceError> {
        let rows = models::school::list_all(&self.db).await?;
        Ok(rows.into_iter().map(School::from).collect())
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockSchoolRepository {
        schools: Mutex<Vec<School>>,
        failure: Mutex<Option<String>>,
        create_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    impl MockSchoolRepository {
        /// Seed with rows as if they were already stored, bypassing validation.
        pub fn with_schools(schools: Vec<School>) -> Self {
            Self { schools: Mutex::new(schools), ..Self::default() }
        }

        /// Every call fails with a storage error carrying `message`.
        pub fn failing(message: &str) -> Self {
            Self { failure: Mutex::new(Some(message.to_string())), ..Self::default() }
        }

        pub fn create_calls(&self) -> usize { self.create_calls.load(Ordering::SeqCst) }

        pub fn list_calls(&self) -> usize { self.list_calls.load(Ordering::SeqCst) }

        pub fn len(&self) -> usize { lock(&self.schools).len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        fn check_failure(&self) -> Result<(), ServiceError> {
            match lock(&self.failure).as_ref() {
                Some(msg) => Err(ServiceError::Storage(msg.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl SchoolRepository for MockSchoolRepository {
        async fn create(&self, school: &NewSchool) -> Result<School, ServiceError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            self.check_failure()?;
            let mut schools = lock(&self.schools);
            let id = schools.iter().map(|s| s.id).max().unwrap_or(0) + 1;
            let stored = School {
                id,
                name: school.name.clone(),
                address: school.address.clone(),
                latitude: school.latitude,
                longitude: school.longitude,
            };
            schools.push(stored.clone());
            Ok(stored)
        }

        async fn list_all(&self) -> Result<Vec<School>, ServiceError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.check_failure()?;
            Ok(lock(&self.schools).clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn new_school(name: &str, latitude: f64, longitude: f64) -> NewSchool {
        NewSchool { name: name.into(), address: format!("{name} street"), latitude, longitude }
    }

    #[tokio::test]
    async fn seaorm_repository_create_and_list() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmSchoolRepository::new(db);

        let a = repo.create(&new_school("a", 1.0, 2.0)).await?;
        let b = repo.create(&new_school("b", -3.5, 4.25)).await?;
        assert_ne!(a.id, b.id);

        let all = repo.list_all().await?;
        assert_eq!(all, vec![a, b]);
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_repository_maps_validation_errors() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmSchoolRepository::new(db);
        let err = repo.create(&new_school("", 1.0, 2.0)).await.unwrap_err();
        assert!(err.is_validation());
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_repository_reports_storage_errors() -> Result<(), anyhow::Error> {
        // no migration: the table is missing
        let db = models::db::connect_with_config(&configs::DatabaseConfig::sqlite_memory()).await?;
        let repo = SeaOrmSchoolRepository::new(db);
        let err = repo.list_all().await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        Ok(())
    }

    #[tokio::test]
    async fn mock_assigns_sequential_ids() -> Result<(), anyhow::Error> {
        let repo = mock::MockSchoolRepository::default();
        let a = repo.create(&new_school("a", 0.0, 0.0)).await?;
        let b = repo.create(&new_school("b", 0.0, 0.0)).await?;
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.create_calls(), 2);
        Ok(())
    }
}
