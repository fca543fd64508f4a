use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BlogCategory {
    Rooms,
    Tasks,
    General,
}

impl BlogCategory {
    /// Parse a submitted category; the accepted set doubles as the 400
    /// message when a write carries anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rooms" => Some(BlogCategory::Rooms),
            "tasks" => Some(BlogCategory::Tasks),
            "general" => Some(BlogCategory::General),
            _ => None,
        }
    }
}

/// A blog post. `rating` is a running average maintained by the rate
/// endpoint together with `ratingCount`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Blog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: BlogCategory,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "ratingCount", default)]
    pub rating_count: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Blog {
    /// Fold one vote into the running average. `rating_count` is the count
    /// before this vote; the caller bumps it alongside the write.
    pub fn rating_after(&self, vote: i32) -> f64 {
        (self.rating * self.rating_count as f64 + vote as f64) / (self.rating_count + 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(rating: f64, rating_count: i32) -> Blog {
        Blog {
            id: None,
            title: "Five quiet corners of the estate".to_string(),
            content: "There is more to the grounds than the pool deck.".to_string(),
            author: "Ishanka".to_string(),
            images: Vec::new(),
            category: BlogCategory::General,
            rating,
            rating_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn first_vote_becomes_the_average() {
        assert_eq!(rated(0.0, 0).rating_after(4), 4.0);
        assert_eq!(rated(0.0, 0).rating_after(1), 1.0);
    }

    #[test]
    fn rating_folds_votes_into_a_running_average() {
        // Two fives on record, then a two: (5*2 + 2) / 3
        assert_eq!(rated(5.0, 2).rating_after(2), 4.0);
        // A fractional average stays exact when the sum divides evenly
        assert_eq!(rated(3.5, 2).rating_after(5), 4.0);
    }

    #[test]
    fn category_parses_known_values_only() {
        assert_eq!(BlogCategory::parse("rooms"), Some(BlogCategory::Rooms));
        assert_eq!(BlogCategory::parse("tasks"), Some(BlogCategory::Tasks));
        assert_eq!(BlogCategory::parse("general"), Some(BlogCategory::General));
        assert_eq!(BlogCategory::parse("Rooms"), None);
        assert_eq!(BlogCategory::parse("travel"), None);
    }

    #[test]
    fn blog_serializes_lowercase_category() {
        let blog = Blog {
            id: None,
            title: "Five quiet corners of the estate".to_string(),
            content: "There is more to the grounds than the pool deck.".to_string(),
            author: "Ishanka".to_string(),
            images: vec!["a.jpg".to_string()],
            category: BlogCategory::General,
            rating: 0.0,
            rating_count: 0,
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&blog).unwrap();
        assert_eq!(value["category"], "general");
        assert_eq!(value["ratingCount"], 0);
    }
}
