// 📚 Course - catalog entry looked up by its human-readable number

use crate::error::StoreResult;
use crate::store::{Collection, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_COURSE_NUMBER: &str = "courseNumber";
pub const FIELD_NAME: &str = "name";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Store-assigned key
    pub id: String,

    /// External lookup key, e.g. "KIEI-451"
    pub course_number: String,

    pub name: String,
}

impl Course {
    pub const COLLECTION: Collection = Collection::Courses;

    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        Ok(Course {
            id: doc.id.clone(),
            course_number: doc.str_field(FIELD_COURSE_NUMBER)?.to_string(),
            name: doc.str_field(FIELD_NAME)?.to_string(),
        })
    }

    pub fn fields(course_number: &str, name: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(FIELD_COURSE_NUMBER.to_string(), Value::from(course_number));
        fields.insert(FIELD_NAME.to_string(), Value::from(name));
        fields
    }
}
