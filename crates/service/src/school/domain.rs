use serde::{Deserialize, Serialize};

/// Persisted school (business view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<models::school::Model> for School {
    fn from(m: models::school::Model) -> Self {
        Self { id: m.id, name: m.name, address: m.address, latitude: m.latitude, longitude: m.longitude }
    }
}

/// Validated school ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchool {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A point in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self { Self { latitude, longitude } }
}

impl School {
    pub fn coordinate(&self) -> Coordinate { Coordinate::new(self.latitude, self.longitude) }
}

/// Coordinate as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

/// Raw `POST /addSchool` body. Every field is optional so absence is reported as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddSchoolInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<CoordinateValue>,
    #[serde(default)]
    pub longitude: Option<CoordinateValue>,
}

/// Raw `GET /listSchools` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSchoolsQuery {
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

/// Stored coordinates that could not be used for a distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateAnomaly {
    pub reason: String,
}

/// Distance from the caller, or the reason it could not be computed.
/// Serialized as `{"value": km}` or `{"anomaly": reason}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    Value(f64),
    Anomaly(CoordinateAnomaly),
}

impl Distance {
    pub fn km(&self) -> Option<f64> {
        match self {
            Distance::Value(km) => Some(*km),
            Distance::Anomaly(_) => None,
        }
    }
}

/// School annotated with its distance for one listing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSchool {
    #[serde(flatten)]
    pub school: School,
    pub distance: Distance,
}
