// 🧑‍🏫 Section - one lecturer's offering of one course
//
// Reifies the many-to-many Course <-> Lecturer relationship. Nothing stops
// the same (course, lecturer) pair from appearing twice; each record is its
// own section with its own reviews.

use crate::error::StoreResult;
use crate::store::{Collection, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_COURSE_ID: &str = "courseId";
pub const FIELD_LECTURER_ID: &str = "lecturerId";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub course_id: String,
    pub lecturer_id: String,
}

impl Section {
    pub const COLLECTION: Collection = Collection::Sections;

    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        Ok(Section {
            id: doc.id.clone(),
            course_id: doc.str_field(FIELD_COURSE_ID)?.to_string(),
            lecturer_id: doc.str_field(FIELD_LECTURER_ID)?.to_string(),
        })
    }

    pub fn fields(course_id: &str, lecturer_id: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(FIELD_COURSE_ID.to_string(), Value::from(course_id));
        fields.insert(FIELD_LECTURER_ID.to_string(), Value::from(lecturer_id));
        fields
    }
}
