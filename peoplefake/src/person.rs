//! The person model and its stored shapes.
//!
//! - [`Person`] - validated name and age, with a random generator
//! - [`PersonDocument`] - what is stored: a person plus a unique `_id`
//! - [`PersonSummary`] - the projected `{name, age}` shape

use std::fmt;

use bson::Uuid;
use fake::{Fake, faker::name::en::FirstName};
use peoplefake_core::document::Document;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DemoError, DemoResult};

pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 120;

/// A person with a first name and an age in `[MIN_AGE, MAX_AGE]`.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    name: String,
    age: i32,
}

impl Person {
    /// Creates a person, rejecting an empty name or an out-of-range age.
    pub fn new(name: impl Into<String>, age: i32) -> DemoResult<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DemoError::InvalidPerson("name must not be empty".to_string()));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(DemoError::InvalidPerson(format!(
                "age {age} is outside {MIN_AGE}..={MAX_AGE}"
            )));
        }

        Ok(Self { name, age })
    }

    /// Generates a person with a fake first name and a uniformly drawn age.
    pub fn random() -> Self {
        Self::random_with_rng(&mut rand::rng())
    }

    /// Same as [`Person::random`] with a caller-supplied random source.
    pub fn random_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            name: FirstName().fake_with_rng(rng),
            age: rng.random_range(MIN_AGE..=MAX_AGE),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }
}

/// A stored person record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub age: i32,
}

impl PersonDocument {
    /// Maps a person to a new document with a fresh unique id.
    pub fn from_person(person: Person) -> Self {
        Self {
            id: Uuid::new(),
            name: person.name,
            age: person.age,
        }
    }
}

impl Document for PersonDocument {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "peopleFake"
    }
}

impl fmt::Display for PersonDocument {
    /// Renders the document as a single JSON line, with the id as a plain string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Serialize)]
        struct JsonLine<'a> {
            #[serde(rename = "_id")]
            id: String,
            name: &'a str,
            age: i32,
        }

        let line = JsonLine { id: self.id.to_string(), name: &self.name, age: self.age };
        f.write_str(&serde_json::to_string(&line).map_err(|_| fmt::Error)?)
    }
}

/// The `{name, age}` projection of a person, without its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub name: String,
    pub age: i32,
}

impl fmt::Display for PersonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serde_json::to_string(self).map_err(|_| fmt::Error)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;
    use peoplefake_core::{document::DocumentExt, error::DocumentStoreError};

    #[test]
    fn rejects_invalid_people() {
        assert!(Person::new("", 30).is_err());
        assert!(Person::new("   ", 30).is_err());
        assert!(Person::new("Kermit", -1).is_err());
        assert!(Person::new("Kermit", 121).is_err());
        assert!(Person::new("Kermit", 0).is_ok());
        assert!(Person::new("Kermit", 120).is_ok());
    }

    #[test]
    fn document_serializes_id_as_underscore_id() {
        let document = PersonDocument::from_person(Person::new("Kermit", 50).unwrap());
        let bson = document.to_bson().unwrap();
        let stored = bson.as_document().unwrap();

        assert!(stored.contains_key("_id"));
        assert_eq!(stored.get_str("name").unwrap(), "Kermit");
        assert_eq!(stored.get_i32("age").unwrap(), 50);
        assert_eq!(PersonDocument::from_bson(bson).unwrap(), document);
    }

    #[test]
    fn object_id_documents_are_rejected() {
        let stored = Bson::Document(bson::doc! {
            "_id": bson::oid::ObjectId::new(),
            "name": "Kermit",
            "age": 50,
        });

        assert!(matches!(
            PersonDocument::from_bson(stored),
            Err(DocumentStoreError::Serialization(_))
        ));
    }

    #[test]
    fn every_mapping_gets_a_fresh_id() {
        let person = Person::new("Kermit", 50).unwrap();

        let first = PersonDocument::from_person(person.clone());
        let second = PersonDocument::from_person(person);

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn display_is_a_json_line() {
        let summary = PersonSummary { name: "Kermit".into(), age: 50 };
        assert_eq!(summary.to_string(), r#"{"name":"Kermit","age":50}"#);

        let document = PersonDocument::from_person(Person::new("Kermit", 50).unwrap());
        assert_eq!(
            document.to_string(),
            format!(r#"{{"_id":"{}","name":"Kermit","age":50}}"#, document.id)
        );
    }
}
