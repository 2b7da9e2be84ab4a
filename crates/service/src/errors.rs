use thiserror::Error;

use crate::school::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::Validation(ValidationError::Field(msg)),
            models::errors::ModelError::Db(msg) => Self::Storage(msg),
        }
    }
}

impl ServiceError {
    pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn model_db_error_stays_a_storage_error() {
        let e = ServiceError::from(ModelError::Db("connection reset".into()));
        assert!(matches!(e, ServiceError::Storage(ref msg) if msg == "connection reset"));
        assert!(!e.is_validation());
    }

    #[test]
    fn model_validation_error_is_a_field_error() {
        let e = ServiceError::from(ModelError::Validation("name required".into()));
        assert!(matches!(e, ServiceError::Validation(ValidationError::Field(ref msg)) if msg == "name required"));
    }
}
