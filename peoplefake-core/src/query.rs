//! Query construction and filtering API for document stores.
//!
//! Queries carry an optional filter, a projection, a sort, and skip/limit
//! bounds. Backends interpret the filter tree through [`QueryVisitor`].
//!
//! # Query Building
//!
//! ```ignore
//! use peoplefake_core::query::{Filter, Projection, Query, SortDirection};
//!
//! let query = Query::builder()
//!     .filter(Filter::eq("name", "Kermit").and(Filter::lte("age", 78)))
//!     .project(Projection::fields(["name", "age"]).exclude_id())
//!     .sort("age", SortDirection::Desc)
//!     .offset(1)
//!     .limit(4)
//!     .build();
//! ```
//!
//! # Filter styles
//!
//! The same equality predicate can be written as a literal key/value document
//! or with the structured helpers; both produce an equivalent [`Expr`]:
//!
//! ```ignore
//! let literal = Filter::document(doc! { "name": "Kermit" });
//! let structured = Filter::eq("name", "Kermit");
//! ```

use bson::{Bson, Document as BsonDocument};

use crate::error::DocumentStoreError;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9).
    Asc,
    /// Descending order (Z to A, 9 to 0).
    Desc,
}

/// Sort specification for query results.
#[derive(Debug, Clone)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
}

/// A filter expression for querying documents.
///
/// Expressions can be combined using logical operators (`And`, `Or`, `Not`)
/// to build compound predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match). An empty list matches everything.
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match).
    Or(Vec<Expr>),
    /// Logical NOT of an expression.
    Not(Box<Expr>),
    /// Checks if a field exists or doesn't exist.
    Exists(String, bool),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }

    /// Negates this expression (logical NOT).
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

/// Field selection applied to query results.
///
/// Only the listed fields are returned. The `_id` field is returned as well
/// unless [`Projection::exclude_id`] is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    /// Fields to include in every result.
    pub include: Vec<String>,
    /// Whether the `_id` field is dropped from results.
    pub exclude_id: bool,
}

impl Projection {
    /// Name of the identifier field every stored document carries.
    pub const ID_FIELD: &'static str = "_id";

    /// Creates a projection that includes the given fields.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection {
            include: fields.into_iter().map(Into::into).collect(),
            exclude_id: false,
        }
    }

    /// Drops the `_id` field from results.
    pub fn exclude_id(mut self) -> Self {
        self.exclude_id = true;
        self
    }

    /// Applies this projection to a single document.
    pub fn apply(&self, document: &BsonDocument) -> BsonDocument {
        document
            .iter()
            .filter(|(key, _)| {
                if key.as_str() == Self::ID_FIELD {
                    !self.exclude_id
                } else {
                    self.include.iter().any(|field| field == *key)
                }
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// A structured query for retrieving and filtering documents.
///
/// Use [`QueryBuilder`] for ergonomic construction. Backends apply the parts
/// in the order filter, sort, offset, limit, projection.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Optional field selection for results.
    pub projection: Option<Projection>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Number of matching documents to skip.
    pub offset: Option<usize>,
    /// Sort specification for results.
    pub sort: Option<Sort>,
}

impl Query {
    /// Creates a new empty query that matches every document.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a query that only carries a filter.
    pub fn filtered(filter: Expr) -> Self {
        Query {
            filter: Some(filter),
            ..Query::default()
        }
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Helper struct for constructing filter expressions.
///
/// All methods accept field names and values as `Into<String>` and `Into<Bson>`.
///
/// ```ignore
/// use peoplefake_core::query::Filter;
///
/// let expr = Filter::eq("name", "Kermit").and(Filter::gte("age", 18));
/// ```
pub struct Filter;

impl Filter {
    /// Builds an equality conjunction from a literal key/value document.
    ///
    /// `{ "name": "Kermit", "age": 50 }` matches documents whose `name` is
    /// `"Kermit"` and whose `age` is `50`. An empty document matches everything.
    pub fn document(document: BsonDocument) -> Expr {
        Expr::And(
            document
                .into_iter()
                .map(|(field, value)| Expr::field(field, FieldOp::Eq, value))
                .collect(),
        )
    }

    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Matches documents where the field does not equal the specified value.
    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Ne, value.into())
    }

    /// Matches documents where the field is greater than the specified value.
    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gt, value.into())
    }

    /// Matches documents where the field is greater than or equal to the specified value.
    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Gte, value.into())
    }

    /// Matches documents where the field is less than the specified value.
    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lt, value.into())
    }

    /// Matches documents where the field is less than or equal to the specified value.
    pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Lte, value.into())
    }

    /// Matches documents where the field is present.
    pub fn exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), true)
    }

    /// Matches documents where the field is absent.
    pub fn not_exists(field: impl Into<String>) -> Expr {
        Expr::Exists(field.into(), false)
    }

    /// Combines multiple expressions such that all must match.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Combines multiple expressions such that any can match.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Restricts the fields returned for each document.
    pub fn project(mut self, projection: Projection) -> Self {
        self.query.projection = Some(projection);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the number of documents to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Sets the sort specification for the query results.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort = Some(Sort { field: field.into(), direction });
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// Interprets a filter tree. Each backend implements this once: the MongoDB
/// backend translates to a query document, the in-memory backend evaluates
/// against a stored document.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(expr) => self.visit_not(expr),
            Expr::Exists(field, should_exist) => self.visit_exists(field, *should_exist),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn literal_document_becomes_equality_conjunction() {
        let expr = Filter::document(doc! { "name": "Kermit", "age": 50 });

        assert_eq!(
            expr,
            Expr::And(vec![Filter::eq("name", "Kermit"), Filter::eq("age", 50)])
        );
    }

    #[test]
    fn and_flattens_into_existing_conjunction() {
        let expr = Filter::eq("name", "Kermit")
            .and(Filter::gte("age", 18))
            .and(Filter::lte("age", 78));

        match expr {
            Expr::And(list) => assert_eq!(list.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn builder_sets_every_part() {
        let query = Query::builder()
            .filter(Filter::eq("name", "Marvin Berry"))
            .project(Projection::fields(["name", "age"]).exclude_id())
            .sort("age", SortDirection::Desc)
            .offset(1)
            .limit(4)
            .build();

        assert!(query.filter.is_some());
        assert_eq!(query.offset, Some(1));
        assert_eq!(query.limit, Some(4));
        let sort = query.sort.expect("sort");
        assert_eq!(sort.field, "age");
        assert_eq!(sort.direction, SortDirection::Desc);
        let projection = query.projection.expect("projection");
        assert!(projection.exclude_id);
        assert_eq!(projection.include, vec!["name".to_string(), "age".to_string()]);
    }

    #[test]
    fn projection_keeps_only_listed_fields() {
        let stored = doc! { "_id": 7, "name": "Kermit", "age": 50, "colour": "green" };

        let with_id = Projection::fields(["name"]).apply(&stored);
        assert_eq!(with_id, doc! { "_id": 7, "name": "Kermit" });

        let without_id = Projection::fields(["name", "age"]).exclude_id().apply(&stored);
        assert_eq!(without_id, doc! { "name": "Kermit", "age": 50 });
    }
}
