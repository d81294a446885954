//! Populating the people collection.
//!
//! Every function takes the collection handle it writes to; nothing here
//! opens or owns a connection.

use std::io::Write;

use peoplefake_core::{
    backend::{InsertOrdering, InsertOutcome, StoreBackend},
    error::DocumentStoreResult,
};
use tracing::{info, warn};

use crate::{
    error::DemoResult,
    person::{Person, PersonDocument},
    People,
};

/// Number of people the write demo inserts in one batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Inserts a specific person and returns the stored document.
pub async fn insert_person<B: StoreBackend>(
    people: &People<'_, B>,
    person: Person,
) -> DocumentStoreResult<PersonDocument> {
    let document = PersonDocument::from_person(person);
    people.insert_one(document.clone()).await?;

    info!(id = %document.id, name = %document.name, age = document.age, "inserted person");
    Ok(document)
}

/// Generates one random person and inserts it.
pub async fn insert_one<B: StoreBackend>(
    people: &People<'_, B>,
) -> DocumentStoreResult<PersonDocument> {
    insert_person(people, Person::random()).await
}

/// Inserts a batch of people without ordering.
///
/// Each person gets its own id. A rejected document does not stop the rest of
/// the batch; rejections are logged and listed in the returned outcome.
pub async fn insert_people<B: StoreBackend>(
    people: &People<'_, B>,
    persons: Vec<Person>,
) -> DocumentStoreResult<InsertOutcome> {
    let documents = persons
        .into_iter()
        .map(PersonDocument::from_person)
        .collect::<Vec<_>>();

    let outcome = people.insert(documents, InsertOrdering::Unordered).await?;

    for failure in &outcome.failures {
        warn!(index = failure.index, reason = %failure.message, "person not inserted");
    }
    info!(inserted = outcome.inserted, failed = outcome.failures.len(), "inserted people");

    Ok(outcome)
}

/// Generates `count` random people and inserts them as one unordered batch.
pub async fn insert_many<B: StoreBackend>(
    people: &People<'_, B>,
    count: usize,
) -> DocumentStoreResult<InsertOutcome> {
    let persons = (0..count).map(|_| Person::random()).collect();
    insert_people(people, persons).await
}

/// Inserts one person, then a batch of [`DEFAULT_BATCH_SIZE`], reporting each step to `out`.
///
/// Returns the total number of documents inserted.
pub async fn run_write_demo<B: StoreBackend, W: Write>(
    people: &People<'_, B>,
    out: &mut W,
) -> DemoResult<usize> {
    insert_one(people).await?;
    writeln!(out, "One person inserted for {}.", people.name())?;

    let outcome = insert_many(people, DEFAULT_BATCH_SIZE).await?;
    writeln!(out, "{} people inserted for {}.", outcome.inserted, people.name())?;

    Ok(1 + outcome.inserted)
}
