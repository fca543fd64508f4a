use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum Title {
    Mr,
    Mrs,
    Ms,
    Dr,
}

impl Title {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Mr" => Some(Title::Mr),
            "Mrs" => Some(Title::Mrs),
            "Ms" => Some(Title::Ms),
            "Dr" => Some(Title::Dr),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum TravellingForWork {
    Yes,
    No,
}

impl TravellingForWork {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Yes" => Some(TravellingForWork::Yes),
            "No" => Some(TravellingForWork::No),
            _ => None,
        }
    }
}

impl Default for TravellingForWork {
    fn default() -> Self {
        TravellingForWork::No
    }
}

/// A contact-details record captured at room-booking time. Created once per
/// submission; the current surface never updates or deletes these.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Customer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "travellingForWork", default)]
    pub travelling_for_work: TravellingForWork,
    pub title: Title,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    /// Stored with the +94 country prefix, e.g. "+94771234567".
    pub phone: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Contact-details submission; `phone` arrives as the 9 national digits and
/// gains the +94 prefix only when stored.
#[derive(Debug, Deserialize, Clone)]
pub struct CustomerInput {
    #[serde(rename = "travellingForWork")]
    pub travelling_for_work: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "confirmEmail")]
    pub confirm_email: Option<String>,
    pub phone: Option<String>,
}
