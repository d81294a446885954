#![cfg(feature = "mongodb")]

use peoplefake::{prelude::*, reader, writer};

#[tokio::test]
#[ignore = "requires a MongoDB server on localhost:27017"]
async fn write_then_read_against_local_server() {
    let store = ConnectionSettings::default().connect().await.unwrap();
    let collection = format!("peopleFake_test_{}", bson::Uuid::new());
    let people: People<'_, _> = store.typed_collection_named(&collection);

    writer::insert_person(&people, Person::new("Kermit", 50).unwrap()).await.unwrap();
    for age in [90, 70, 60, 50, 40, 30] {
        writer::insert_person(&people, Person::new("Marvin Berry", age).unwrap()).await.unwrap();
    }
    let outcome = writer::insert_many(&people, writer::DEFAULT_BATCH_SIZE).await.unwrap();
    assert_eq!(outcome.inserted, 50);
    assert_eq!(people.count(None).await.unwrap(), 57);

    let kermit = reader::find_by_name_eq(&people, "Kermit").await.unwrap().unwrap();
    assert_eq!(kermit.age, 50);
    assert_eq!(reader::find_by_name(&people, "Kermit").await.unwrap(), Some(kermit));

    let summaries = reader::find_by_name_below_age(&people, "Marvin Berry", 78, AgeBound::AgeField)
        .await
        .unwrap();
    assert_eq!(summaries.iter().map(|s| s.age).collect::<Vec<_>>(), vec![60, 50, 40, 30]);

    let raw = people
        .untyped()
        .query(reader::name_below_age_query("Marvin Berry", 78, AgeBound::AgeField))
        .await
        .unwrap();
    assert!(raw.iter().all(|doc| !doc.as_document().unwrap().contains_key("_id")));

    let listed = reader::find_by_age_at_least_list(&people, 78).await.unwrap();
    let visited = reader::find_by_age_at_least_push(&people, 78, |_| {}).await.unwrap();
    assert_eq!(visited, listed.len());

    store.drop_collection(&collection).await.unwrap();
    store.shutdown().await.unwrap();
}
