use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// OSM tags in the order the server sent them
pub type Tags = IndexMap<String, String>;

/// One normalized point of interest as written to the output files
///
/// Field order here is the field order in the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub name: String,
    pub category: String,
    /// Copied from the source element without conversion
    pub lat: Number,
    pub lon: Number,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub opening_hours: String,
    pub description: String,
    pub tags: Tags,
}
