use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

pub const NAME_MAX_LEN: usize = 255;
pub const ADDRESS_MAX_LEN: usize = 500;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: String,
    #[sea_orm(column_type = "Double")]
    pub latitude: f64,
    #[sea_orm(column_type = "Double")]
    pub longitude: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<String, errors::ModelError> {
    validate_text("name", name, NAME_MAX_LEN)
}

pub fn validate_address(address: &str) -> Result<String, errors::ModelError> {
    validate_text("address", address, ADDRESS_MAX_LEN)
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<String, errors::ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} required")));
    }
    if trimmed.chars().count() > max {
        return Err(errors::ModelError::Validation(format!("{field} longer than {max} characters")));
    }
    Ok(trimmed.to_string())
}

/// Stored coordinates must be finite numbers; range is not enforced.
pub fn validate_coordinate(field: &str, value: f64) -> Result<f64, errors::ModelError> {
    if !value.is_finite() {
        return Err(errors::ModelError::Validation(format!("{field} must be a finite number")));
    }
    Ok(value)
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    address: &str,
    latitude: f64,
    longitude: f64,
) -> Result<Model, errors::ModelError> {
    let name = validate_name(name)?;
    let address = validate_address(address)?;
    let latitude = validate_coordinate("latitude", latitude)?;
    let longitude = validate_coordinate("longitude", longitude)?;

    let am = ActiveModel {
        id: NotSet,
        name: Set(name),
        address: Set(address),
        latitude: Set(latitude),
        longitude: Set(longitude),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All schools in insertion order.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
