pub mod directory;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::GeoPoint;
pub use directory::{DataCenterDirectory, ResolvedLatency, Resolution, resolve};

/// A data center as listed by the upstream `/datacenter` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCenter {
    #[serde(rename = "dcId", deserialize_with = "id_from_string_or_number")]
    pub dc_id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DataCenter {
    pub fn geo_point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Body of the upstream data-center listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataCentersResponse {
    #[serde(rename = "dataCenters", default)]
    pub data_centers: Vec<DataCenter>,
}

/// One measured latency between two data centers, ids unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySample {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub from: String,
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub to: String,
    pub value: f64,
}

/// One interval (day) of latency samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLatencies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub latencies: Vec<LatencySample>,
}

/// Body of the upstream real-time map endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealTimeMapResponse {
    #[serde(default)]
    pub data: Vec<DailyLatencies>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}
