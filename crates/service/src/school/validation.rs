//! Turns raw request payloads into typed values, or an enumerated failure.

use thiserror::Error;

use super::domain::{AddSchoolInput, Coordinate, CoordinateValue, ListSchoolsQuery, NewSchool};
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Latitude and longitude are required")]
    MissingOrigin,
    #[error("Invalid latitude or longitude values")]
    InvalidCoordinates,
    #[error("{0}")]
    Field(String),
    #[error("Malformed request: {0}")]
    Malformed(String),
}

/// Parse a textual coordinate. Only finite numbers are accepted.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl CoordinateValue {
    pub fn to_degrees(&self) -> Option<f64> {
        match self {
            CoordinateValue::Number(v) => Some(*v).filter(|v| v.is_finite()),
            CoordinateValue::Text(s) => parse_coordinate(s),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Validate a create request.
///
/// Field rules shared with the storage layer surface through [`ServiceError`],
/// so anything other than a validation failure keeps its storage meaning.
pub fn validate_new_school(input: &AddSchoolInput) -> Result<NewSchool, ServiceError> {
    let (Some(name), Some(address), Some(lat), Some(lon)) = (
        present(&input.name),
        present(&input.address),
        input.latitude.as_ref(),
        input.longitude.as_ref(),
    ) else {
        return Err(ValidationError::MissingFields.into());
    };

    let (Some(latitude), Some(longitude)) = (lat.to_degrees(), lon.to_degrees()) else {
        return Err(ValidationError::InvalidCoordinates.into());
    };

    let name = models::school::validate_name(name).map_err(ServiceError::from)?;
    let address = models::school::validate_address(address).map_err(ServiceError::from)?;

    Ok(NewSchool { name, address, latitude, longitude })
}

/// Validate the reference point of a listing request.
pub fn validate_origin(query: &ListSchoolsQuery) -> Result<Coordinate, ValidationError> {
    let (Some(lat), Some(lon)) = (present(&query.latitude), present(&query.longitude)) else {
        return Err(ValidationError::MissingOrigin);
    };
    match (parse_coordinate(lat), parse_coordinate(lon)) {
        (Some(latitude), Some(longitude)) => Ok(Coordinate::new(latitude, longitude)),
        _ => Err(ValidationError::InvalidCoordinates),
    }
}
