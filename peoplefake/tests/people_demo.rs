use std::collections::HashSet;

use peoplefake::{
    memory::InMemoryStore,
    prelude::*,
    reader::{self, name_below_age_query},
    writer,
};
use rand::{SeedableRng, rngs::StdRng};

fn store() -> DocumentStore<InMemoryStore> {
    DocumentStore::new(InMemoryStore::new())
}

async fn seed<B: StoreBackend>(people: &People<'_, B>, entries: &[(&str, i32)]) {
    for (name, age) in entries {
        writer::insert_person(people, Person::new(*name, *age).unwrap())
            .await
            .unwrap();
    }
}

fn ids(documents: &[PersonDocument]) -> Vec<String> {
    let mut ids = documents.iter().map(|d| d.id.to_string()).collect::<Vec<_>>();
    ids.sort();
    ids
}

#[test]
fn generated_people_are_valid() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..500 {
        let person = Person::random_with_rng(&mut rng);
        assert!((0..=120).contains(&person.age()));
        assert!(!person.name().trim().is_empty());
    }
}

#[tokio::test]
async fn insert_many_adds_batch_with_unique_ids() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();

    let outcome = writer::insert_many(&people, writer::DEFAULT_BATCH_SIZE).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.inserted, 50);
    assert_eq!(people.count(None).await.unwrap(), 50);

    let stored = people.query(Query::new()).await.unwrap();
    let unique = stored.iter().map(|d| d.id.to_string()).collect::<HashSet<_>>();
    assert_eq!(unique.len(), 50);
}

#[tokio::test]
async fn write_demo_reports_both_steps() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();
    let mut out = Vec::new();

    let inserted = writer::run_write_demo(&people, &mut out).await.unwrap();

    assert_eq!(inserted, 51);
    assert_eq!(people.count(None).await.unwrap(), 51);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "One person inserted for peopleFake.\n50 people inserted for peopleFake.\n"
    );
}

#[tokio::test]
async fn unordered_batch_tolerates_rejected_document() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();
    let kermit = PersonDocument::from_person(Person::new("Kermit", 50).unwrap());
    let gonzo = PersonDocument::from_person(Person::new("Gonzo", 40).unwrap());

    let outcome = people
        .insert(vec![kermit.clone(), kermit, gonzo], InsertOrdering::Unordered)
        .await
        .unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.failures[0].index, 1);
    assert!(reader::find_by_name(&people, "Gonzo").await.unwrap().is_some());
}

#[tokio::test]
async fn inserted_person_is_found_by_name() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();
    seed(&people, &[("Kermit", 50)]).await;

    let kermit = reader::find_by_name_eq(&people, "Kermit").await.unwrap().unwrap();

    assert_eq!(kermit.name, "Kermit");
    assert_eq!(kermit.age, 50);
}

#[tokio::test]
async fn literal_and_eq_filters_agree() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();
    seed(&people, &[("Gonzo", 40), ("Marvin Berry", 30), ("Kermit", 50)]).await;

    for name in ["Marvin Berry", "Kermit", "Nobody"] {
        assert_eq!(
            reader::find_by_name(&people, name).await.unwrap(),
            reader::find_by_name_eq(&people, name).await.unwrap(),
        );
    }
}

#[tokio::test]
async fn cursor_list_and_push_return_same_people() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();
    let mut rng = StdRng::seed_from_u64(42);
    let persons = (0..200).map(|_| Person::random_with_rng(&mut rng)).collect();
    writer::insert_people(&people, persons).await.unwrap();

    let mut pulled = Vec::new();
    let mut cursor = reader::find_by_age_at_least(&people, 78).await.unwrap();
    while let Some(person) = cursor.next().await.unwrap() {
        pulled.push(person);
    }

    let listed = reader::find_by_age_at_least_list(&people, 78).await.unwrap();

    let mut pushed = Vec::new();
    let visited = reader::find_by_age_at_least_push(&people, 78, |person| pushed.push(person))
        .await
        .unwrap();

    assert!(!listed.is_empty());
    assert!(listed.iter().all(|person| person.age >= 78));
    assert_eq!(visited, pushed.len());
    assert_eq!(ids(&pulled), ids(&listed));
    assert_eq!(ids(&pushed), ids(&listed));
}

#[tokio::test]
async fn name_below_age_skips_oldest_and_limits_to_four() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();
    let marvins = (1..=9).map(|n| ("Marvin Berry", n * 10)).collect::<Vec<_>>();
    seed(&people, &marvins).await;
    seed(&people, &[("Kermit", 70), ("Gonzo", 20)]).await;

    let summaries = reader::find_by_name_below_age(&people, "Marvin Berry", 78, AgeBound::AgeField)
        .await
        .unwrap();

    assert_eq!(
        summaries.iter().map(|s| s.age).collect::<Vec<_>>(),
        vec![60, 50, 40, 30]
    );
    assert!(summaries.iter().all(|s| s.name == "Marvin Berry"));

    let raw = people
        .untyped()
        .query(name_below_age_query("Marvin Berry", 78, AgeBound::AgeField))
        .await
        .unwrap();
    assert_eq!(raw.len(), 4);
    assert!(raw.iter().all(|doc| !doc.as_document().unwrap().contains_key("_id")));
}

#[tokio::test]
async fn name_field_bound_matches_nothing() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();
    seed(&people, &[("Marvin Berry", 10), ("Marvin Berry", 20), ("Marvin Berry", 30)]).await;

    let summaries = reader::find_by_name_below_age(&people, "Marvin Berry", 78, AgeBound::NameField)
        .await
        .unwrap();

    assert!(summaries.is_empty());
}

#[tokio::test]
async fn empty_collection_reports_not_found() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();

    assert!(reader::find_by_name(&people, "Nobody").await.unwrap().is_none());

    let mut out = Vec::new();
    reader::run_read_demo(&people, &ReadDemoParams::default(), &mut out)
        .await
        .unwrap();
    let report = String::from_utf8(out).unwrap();

    assert_eq!(
        report,
        "Person 1: not found\n\
         Person 2: not found\n\
         People list with a cursor:\n\
         People list with a Vec:\n\
         People list using a callback:\n\
         People sorted, skipped, limited and projected:\n"
    );
}

#[tokio::test]
async fn read_demo_output_is_repeatable() {
    let store = store();
    let people: People<'_, _> = store.typed_collection();
    let mut rng = StdRng::seed_from_u64(1);
    let persons = (0..100).map(|_| Person::random_with_rng(&mut rng)).collect();
    writer::insert_people(&people, persons).await.unwrap();
    seed(
        &people,
        &[("Kermit", 50), ("Marvin Berry", 90), ("Marvin Berry", 60), ("Marvin Berry", 40)],
    )
    .await;

    let mut first = Vec::new();
    reader::run_read_demo(&people, &ReadDemoParams::default(), &mut first).await.unwrap();
    let mut second = Vec::new();
    reader::run_read_demo(&people, &ReadDemoParams::default(), &mut second).await.unwrap();

    let report = String::from_utf8(first.clone()).unwrap();
    assert_eq!(first, second);
    assert!(report.contains("Person 2: {\"_id\":"));
    assert!(report.ends_with(
        "People sorted, skipped, limited and projected:\n{\"name\":\"Marvin Berry\",\"age\":40}\n"
    ));
}
