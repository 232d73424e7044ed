// ⭐ Review - anonymous body + rating about one section

use crate::error::StoreResult;
use crate::store::{Collection, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::RangeInclusive;

pub const FIELD_SECTION_ID: &str = "sectionId";
pub const FIELD_BODY: &str = "body";
pub const FIELD_RATING: &str = "rating";

/// Ratings the domain allows. The store does not enforce it.
pub const RATING_RANGE: RangeInclusive<i64> = 1..=5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub section_id: String,
    pub body: String,
    pub rating: i64,
}

impl Review {
    pub const COLLECTION: Collection = Collection::Reviews;

    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        Ok(Review {
            id: doc.id.clone(),
            section_id: doc.str_field(FIELD_SECTION_ID)?.to_string(),
            body: doc.str_field(FIELD_BODY)?.to_string(),
            rating: doc.int_field(FIELD_RATING)?,
        })
    }

    pub fn fields(section_id: &str, body: &str, rating: i64) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(FIELD_SECTION_ID.to_string(), Value::from(section_id));
        fields.insert(FIELD_BODY.to_string(), Value::from(body));
        fields.insert(FIELD_RATING.to_string(), Value::from(rating));
        fields
    }

    pub fn has_valid_rating(&self) -> bool {
        RATING_RANGE.contains(&self.rating)
    }
}
