use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A bookable resort activity. `image` holds the stored filename; handlers
/// rewrite it to a fully-qualified URL before it leaves the API.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Activity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
