//! Query demonstrations over the people collection.
//!
//! Each function issues a single stateless request through the collection
//! handle it is given. The three age queries share one filter and differ only
//! in how the resulting cursor is consumed: pulled, collected, or pushed.

use std::io::Write;

use bson::doc;
use peoplefake_core::{
    backend::StoreBackend,
    cursor::TypedCursor,
    error::DocumentStoreResult,
    query::{Expr, Filter, Projection, Query, SortDirection},
};

use crate::{
    error::DemoResult,
    person::{PersonDocument, PersonSummary},
    People,
};

/// Which field the upper age bound of [`find_by_name_below_age`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeBound {
    /// `age <= bound`.
    #[default]
    AgeField,
    /// `name <= bound`, as the historical demo wrote it. A string never
    /// compares against a number, so this matches nothing.
    NameField,
}

impl AgeBound {
    fn field(self) -> &'static str {
        match self {
            AgeBound::AgeField => "age",
            AgeBound::NameField => "name",
        }
    }
}

/// Results skipped from the top of [`find_by_name_below_age`].
pub const BELOW_AGE_SKIP: usize = 1;
/// Maximum results returned by [`find_by_name_below_age`].
pub const BELOW_AGE_LIMIT: usize = 4;

fn age_at_least(age: i32) -> Expr {
    Filter::gte("age", age)
}

/// First person with the given name, matched with a literal filter document.
pub async fn find_by_name<B: StoreBackend>(
    people: &People<'_, B>,
    name: &str,
) -> DocumentStoreResult<Option<PersonDocument>> {
    people
        .find_one(Query::filtered(Filter::document(doc! { "name": name })))
        .await
}

/// First person with the given name, matched with the structured equality filter.
pub async fn find_by_name_eq<B: StoreBackend>(
    people: &People<'_, B>,
    name: &str,
) -> DocumentStoreResult<Option<PersonDocument>> {
    people
        .find_one(Query::filtered(Filter::eq("name", name)))
        .await
}

/// People aged at least `age`, as a lazy cursor to pull from.
pub async fn find_by_age_at_least<B: StoreBackend>(
    people: &People<'_, B>,
    age: i32,
) -> DocumentStoreResult<TypedCursor<PersonDocument>> {
    people.find(Query::filtered(age_at_least(age))).await
}

/// People aged at least `age`, fully materialized.
pub async fn find_by_age_at_least_list<B: StoreBackend>(
    people: &People<'_, B>,
    age: i32,
) -> DocumentStoreResult<Vec<PersonDocument>> {
    find_by_age_at_least(people, age).await?.collect().await
}

/// Calls `callback` once per person aged at least `age`, in server order.
///
/// Returns the number of people visited.
pub async fn find_by_age_at_least_push<B, F>(
    people: &People<'_, B>,
    age: i32,
    callback: F,
) -> DocumentStoreResult<usize>
where
    B: StoreBackend,
    F: FnMut(PersonDocument),
{
    find_by_age_at_least(people, age).await?.for_each(callback).await
}

/// The query behind [`find_by_name_below_age`].
///
/// `name == name AND <bound field> <= age`, projected to `{name, age}` without
/// `_id`, oldest first, skipping the oldest match and returning at most four.
pub fn name_below_age_query(name: &str, age: i32, bound: AgeBound) -> Query {
    Query::builder()
        .filter(Filter::eq("name", name).and(Filter::lte(bound.field(), age)))
        .project(Projection::fields(["name", "age"]).exclude_id())
        .sort("age", SortDirection::Desc)
        .offset(BELOW_AGE_SKIP)
        .limit(BELOW_AGE_LIMIT)
        .build()
}

/// People with the given name and at most the given age, see [`name_below_age_query`].
pub async fn find_by_name_below_age<B: StoreBackend>(
    people: &People<'_, B>,
    name: &str,
    age: i32,
    bound: AgeBound,
) -> DocumentStoreResult<Vec<PersonSummary>> {
    people
        .query_as(name_below_age_query(name, age, bound))
        .await
}

/// Fixed inputs of the read demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadDemoParams {
    pub literal_name: String,
    pub eq_name: String,
    pub cursor_age: i32,
    pub list_age: i32,
    pub push_age: i32,
    pub below_age_name: String,
    pub below_age: i32,
    pub bound: AgeBound,
}

impl Default for ReadDemoParams {
    fn default() -> Self {
        Self {
            literal_name: "Marvin Berry".to_string(),
            eq_name: "Kermit".to_string(),
            cursor_age: 78,
            list_age: 99,
            push_age: 105,
            below_age_name: "Marvin Berry".to_string(),
            below_age: 78,
            bound: AgeBound::AgeField,
        }
    }
}

fn write_single<W: Write>(
    out: &mut W,
    label: &str,
    person: Option<PersonDocument>,
) -> std::io::Result<()> {
    match person {
        Some(person) => writeln!(out, "{label}: {person}"),
        None => writeln!(out, "{label}: not found"),
    }
}

/// Runs the six query demonstrations in order, writing a report to `out`.
pub async fn run_read_demo<B: StoreBackend, W: Write>(
    people: &People<'_, B>,
    params: &ReadDemoParams,
    out: &mut W,
) -> DemoResult<()> {
    write_single(out, "Person 1", find_by_name(people, &params.literal_name).await?)?;
    write_single(out, "Person 2", find_by_name_eq(people, &params.eq_name).await?)?;

    writeln!(out, "People list with a cursor:")?;
    let mut cursor = find_by_age_at_least(people, params.cursor_age).await?;
    while let Some(person) = cursor.next().await? {
        writeln!(out, "{person}")?;
    }

    writeln!(out, "People list with a Vec:")?;
    for person in find_by_age_at_least_list(people, params.list_age).await? {
        writeln!(out, "{person}")?;
    }

    writeln!(out, "People list using a callback:")?;
    let mut written = Ok(());
    find_by_age_at_least_push(people, params.push_age, |person| {
        if written.is_ok() {
            written = writeln!(out, "{person}");
        }
    })
    .await?;
    written?;

    writeln!(out, "People sorted, skipped, limited and projected:")?;
    let summaries = find_by_name_below_age(
        people,
        &params.below_age_name,
        params.below_age,
        params.bound,
    )
    .await?;
    for summary in summaries {
        writeln!(out, "{summary}")?;
    }

    Ok(())
}
