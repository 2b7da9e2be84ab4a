use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{AddSchoolInput, ListSchoolsQuery, RankedSchool, School};
use super::proximity;
use super::repository::SchoolRepository;
use super::validation;
use crate::errors::ServiceError;

/// Application service for school records, independent of the web framework.
pub struct SchoolService {
    repo: Arc<dyn SchoolRepository>,
}

impl SchoolService {
    pub fn new(repo: Arc<dyn SchoolRepository>) -> Self { Self { repo } }

    /// Validate and store a school.
    ///
    /// # Examples
    /// ```
    /// use service::school::{SchoolService, repository::mock::MockSchoolRepository};
    /// use service::school::domain::{AddSchoolInput, CoordinateValue};
    /// use std::sync::Arc;
    /// let svc = SchoolService::new(Arc::new(MockSchoolRepository::default()));
    /// let input = AddSchoolInput {
    ///     name: Some("Central High".into()),
    ///     address: Some("1 Main St".into()),
    ///     latitude: Some(CoordinateValue::Number(40.0)),
    ///     longitude: Some(CoordinateValue::Text("-74.0".into())),
    /// };
    /// let school = tokio_test::block_on(svc.add(input)).unwrap();
    /// assert_eq!(school.id, 1);
    /// assert_eq!(school.longitude, -74.0);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn add(&self, input: AddSchoolInput) -> Result<School, ServiceError> {
        let new_school = validation::validate_new_school(&input)?;
        let school = self.repo.create(&new_school).await?;
        info!(school_id = school.id, name = %school.name, event = "school_created", "school added");
        Ok(school)
    }

    /// List every stored school, nearest to the query point first.
    ///
    /// Validation happens before storage is touched.
    ///
    /// # Examples
    /// ```
    /// use service::school::{SchoolService, repository::mock::MockSchoolRepository};
    /// use service::school::domain::{Distance, ListSchoolsQuery, School};
    /// use std::sync::Arc;
    /// let repo = MockSchoolRepository::with_schools(vec![
    ///     School { id: 1, name: "A".into(), address: "X".into(), latitude: 40.0, longitude: -74.0 },
    /// ]);
    /// let svc = SchoolService::new(Arc::new(repo));
    /// let query = ListSchoolsQuery { latitude: Some("40.0".into()), longitude: Some("-74.0".into()) };
    /// let ranked = tokio_test::block_on(svc.list_by_proximity(query)).unwrap();
    /// assert_eq!(ranked[0].distance, Distance::Value(0.0));
    /// ```
    #[instrument(skip(self, query))]
    pub async fn list_by_proximity(&self, query: ListSchoolsQuery) -> Result<Vec<RankedSchool>, ServiceError> {
        let origin = validation::validate_origin(&query)?;
        let schools = self.repo.list_all().await?;
        let ranked = proximity::rank_by_distance(origin, schools);
        debug!(
            count = ranked.len(),
            latitude = origin.latitude,
            longitude = origin.longitude,
            event = "schools_ranked",
            "ranked schools by distance"
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::school::domain::{CoordinateValue, Distance};
    use crate::school::repository::{mock::MockSchoolRepository, SeaOrmSchoolRepository};
    use crate::school::validation::ValidationError;
    use crate::test_support::get_db;

    fn add_input(name: &str, lat: CoordinateValue, lon: CoordinateValue) -> AddSchoolInput {
        AddSchoolInput {
            name: Some(name.into()),
            address: Some("X".into()),
            latitude: Some(lat),
            longitude: Some(lon),
        }
    }

    fn query(lat: &str, lon: &str) -> ListSchoolsQuery {
        ListSchoolsQuery { latitude: Some(lat.into()), longitude: Some(lon.into()) }
    }

    #[tokio::test]
    async fn create_then_list_at_same_point_is_zero() -> Result<(), anyhow::Error> {
        let svc = SchoolService::new(Arc::new(MockSchoolRepository::default()));
        svc.add(add_input("A", CoordinateValue::Number(40.0), CoordinateValue::Number(-74.0))).await?;

        let ranked = svc.list_by_proximity(query("40.0", "-74.0")).await?;
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].school.name, "A");
        assert_eq!(ranked[0].distance, Distance::Value(0.0));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_latitude_is_rejected_and_not_stored() {
        let repo = Arc::new(MockSchoolRepository::default());
        let svc = SchoolService::new(repo.clone());
        let err = svc
            .add(add_input("A", CoordinateValue::Text("not-a-number".into()), CoordinateValue::Number(1.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::InvalidCoordinates)));
        assert!(repo.is_empty());
        assert_eq!(repo.create_calls(), 0);
    }

    #[tokio::test]
    async fn missing_longitude_never_reaches_storage() {
        let repo = Arc::new(MockSchoolRepository::default());
        let svc = SchoolService::new(repo.clone());
        let q = ListSchoolsQuery { latitude: Some("1".into()), longitude: None };
        let err = svc.list_by_proximity(q).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::MissingOrigin)));
        assert_eq!(repo.list_calls(), 0);
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        let repo = Arc::new(MockSchoolRepository::failing("connection reset"));
        let svc = SchoolService::new(repo.clone());

        let err = svc.list_by_proximity(query("0", "0")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(ref m) if m == "connection reset"));

        let err = svc
            .add(add_input("A", CoordinateValue::Number(1.0), CoordinateValue::Number(1.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[tokio::test]
    async fn listing_orders_by_distance_against_database() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let svc = SchoolService::new(Arc::new(SeaOrmSchoolRepository::new(db)));

        // ~5 km and ~2 km north of the origin
        svc.add(add_input("far", CoordinateValue::Number(5.0 / 111.19), CoordinateValue::Number(0.0))).await?;
        svc.add(add_input("near", CoordinateValue::Text((2.0 / 111.19).to_string()), CoordinateValue::Number(0.0))).await?;

        let ranked = svc.list_by_proximity(query("0", "0")).await?;
        let names: Vec<&str> = ranked.iter().map(|r| r.school.name.as_str()).collect();
        assert_eq!(names, vec!["near", "far"]);
        assert_eq!(ranked[0].distance, Distance::Value(2.0));
        Ok(())
    }

    #[tokio::test]
    async fn anomalous_rows_do_not_abort_listing() -> Result<(), anyhow::Error> {
        let repo = MockSchoolRepository::with_schools(vec![
            School { id: 1, name: "broken".into(), address: "?".into(), latitude: f64::NAN, longitude: 0.0 },
            School { id: 2, name: "ok".into(), address: "!".into(), latitude: 0.0, longitude: 0.0 },
        ]);
        let svc = SchoolService::new(Arc::new(repo));
        let ranked = svc.list_by_proximity(query("0", "0")).await?;
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].school.id, 2);
        assert!(ranked[1].distance.km().is_none());
        Ok(())
    }
}
