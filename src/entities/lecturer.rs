// 🎓 Lecturer - a person who teaches zero or more courses

use crate::error::StoreResult;
use crate::store::{Collection, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_NAME: &str = "name";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: String,
    pub name: String,
}

impl Lecturer {
    pub const COLLECTION: Collection = Collection::Lecturers;

    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        Ok(Lecturer {
            id: doc.id.clone(),
            name: doc.str_field(FIELD_NAME)?.to_string(),
        })
    }

    pub fn fields(name: &str) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(FIELD_NAME.to_string(), Value::from(name));
        fields
    }
}
