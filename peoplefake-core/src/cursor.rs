//! Lazy, forward-only result sequences.
//!
//! A [`DocumentCursor`] wraps the stream of documents produced by a backend
//! query. It can be consumed three ways: pulled one document at a time with
//! [`next`](DocumentCursor::next), drained into a list with
//! [`collect`](DocumentCursor::collect), or pushed into a callback with
//! [`for_each`](DocumentCursor::for_each). Each cursor is single-pass;
//! dropping or exhausting it releases whatever the backend holds open for it.

use std::{fmt, marker::PhantomData};

use bson::Bson;
use futures::{
    Stream, StreamExt, TryStreamExt,
    stream::{self, BoxStream},
};
use serde::de::DeserializeOwned;

use crate::error::DocumentStoreResult;

/// A lazy sequence of raw BSON documents.
pub struct DocumentCursor {
    inner: BoxStream<'static, DocumentStoreResult<Bson>>,
}

impl DocumentCursor {
    /// Wraps a backend stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = DocumentStoreResult<Bson>> + Send + 'static,
    {
        Self { inner: stream.boxed() }
    }

    /// Builds a cursor over documents that are already in memory.
    pub fn from_documents(documents: Vec<Bson>) -> Self {
        Self::new(stream::iter(documents.into_iter().map(Ok)))
    }

    /// Pulls the next document, or `None` once the cursor is exhausted.
    pub async fn next(&mut self) -> DocumentStoreResult<Option<Bson>> {
        self.inner.try_next().await
    }

    /// Drains the remaining documents into a list.
    pub async fn collect(self) -> DocumentStoreResult<Vec<Bson>> {
        self.inner.try_collect().await
    }

    /// Invokes `callback` once per remaining document and returns how many were visited.
    pub async fn for_each<F>(mut self, mut callback: F) -> DocumentStoreResult<usize>
    where
        F: FnMut(Bson),
    {
        let mut visited = 0;
        while let Some(document) = self.inner.try_next().await? {
            callback(document);
            visited += 1;
        }

        Ok(visited)
    }

    /// Deserializes every document into `T` as it is pulled.
    pub fn typed<T: DeserializeOwned>(self) -> TypedCursor<T> {
        TypedCursor { inner: self, _marker: PhantomData }
    }
}

impl fmt::Debug for DocumentCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCursor").finish_non_exhaustive()
    }
}

/// A [`DocumentCursor`] that yields deserialized values.
pub struct TypedCursor<T> {
    inner: DocumentCursor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> TypedCursor<T> {
    /// Pulls the next value, or `None` once the cursor is exhausted.
    pub async fn next(&mut self) -> DocumentStoreResult<Option<T>> {
        match self.inner.next().await? {
            Some(document) => Ok(Some(bson::de::deserialize_from_bson(document)?)),
            None => Ok(None),
        }
    }

    /// Drains the remaining values into a list.
    pub async fn collect(mut self) -> DocumentStoreResult<Vec<T>> {
        let mut values = Vec::new();
        while let Some(value) = self.next().await? {
            values.push(value);
        }

        Ok(values)
    }

    /// Invokes `callback` once per remaining value and returns how many were visited.
    pub async fn for_each<F>(mut self, mut callback: F) -> DocumentStoreResult<usize>
    where
        F: FnMut(T),
    {
        let mut visited = 0;
        while let Some(value) = self.next().await? {
            callback(value);
            visited += 1;
        }

        Ok(visited)
    }
}

impl<T> fmt::Debug for TypedCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCursor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn names() -> Vec<Bson> {
        ["Kermit", "Gonzo", "Animal"]
            .into_iter()
            .map(|name| Bson::Document(doc! { "name": name }))
            .collect()
    }

    #[tokio::test]
    async fn pull_stops_after_last_document() {
        let mut cursor = DocumentCursor::from_documents(names());

        let mut pulled = 0;
        while cursor.next().await.unwrap().is_some() {
            pulled += 1;
        }

        assert_eq!(pulled, 3);
        assert!(cursor.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn push_visits_in_cursor_order() {
        let mut seen = Vec::new();
        let visited = DocumentCursor::from_documents(names())
            .typed::<Named>()
            .for_each(|named| seen.push(named.name))
            .await
            .unwrap();

        assert_eq!(visited, 3);
        assert_eq!(seen, vec!["Kermit", "Gonzo", "Animal"]);
    }

    #[tokio::test]
    async fn typed_collect_reports_malformed_documents() {
        let result = DocumentCursor::from_documents(vec![Bson::Document(doc! { "age": 3 })])
            .typed::<Named>()
            .collect()
            .await;

        assert!(result.is_err());
    }
}
