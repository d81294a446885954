//! Query expression evaluation for in-memory document filtering.

use std::cmp::Ordering;
use bson::{Bson, Document};

use peoplefake_core::{
    query::{QueryVisitor, Expr, FieldOp},
    error::{DocumentStoreError, DocumentStoreResult},
};


/// Comparable view of a BSON value.
///
/// Numeric types are normalized to f64. In filters, values of different kinds
/// never order against each other, so `"Kermit" <= 78` is neither true nor
/// false and the comparison does not match. Sorting uses
/// [`Comparable::sort_cmp`] instead, which orders across kinds.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null | Bson::Undefined => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) | Bson::Symbol(value) => Comparable::String(value),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> Comparable<'a> {
    /// Position of the value's kind in MongoDB's sort order.
    fn type_bracket(&self) -> u8 {
        match self {
            Comparable::Null => 1,
            Comparable::Number(_) => 2,
            Comparable::String(_) => 3,
            Comparable::Bool(_) => 8,
            Comparable::Other(bson) => match bson {
                Bson::MinKey => 0,
                Bson::Document(_) => 4,
                Bson::Array(_) => 5,
                Bson::Binary(_) => 6,
                Bson::ObjectId(_) => 7,
                Bson::DateTime(_) => 9,
                Bson::Timestamp(_) => 10,
                Bson::RegularExpression(_) => 11,
                Bson::MaxKey => 13,
                _ => 12,
            },
        }
    }

    /// Total order used for sorting: kinds first, then values within a kind.
    ///
    /// Values of the same kind that have no natural order compare equal, so a
    /// stable sort keeps them in insertion order.
    pub(crate) fn sort_cmp(&self, other: &Self) -> Ordering {
        self.type_bracket()
            .cmp(&other.type_bracket())
            .then_with(|| match (self, other) {
                (Comparable::Number(a), Comparable::Number(b)) => a.total_cmp(b),
                (Comparable::String(a), Comparable::String(b)) => a.cmp(b),
                (Comparable::Bool(a), Comparable::Bool(b)) => a.cmp(b),
                (Comparable::Other(Bson::DateTime(a)), Comparable::Other(Bson::DateTime(b))) => {
                    a.cmp(b)
                }
                _ => Ordering::Equal,
            })
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            (Comparable::Other(Bson::DateTime(a)), Comparable::Other(Bson::DateTime(b))) => {
                a.partial_cmp(b)
            }
            _ => None,
        }
    }
}


pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Bson) -> DocumentStoreResult<Self> {
        document
            .as_document()
            .map(|document| Self { document })
            .ok_or_else(|| DocumentStoreError::InvalidDocument("Expected document".into()))
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Returns the documents matching `expr`, preserving their order.
    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Bson>,
        expr: &Expr,
    ) -> DocumentStoreResult<Vec<Bson>> {
        let mut matched = Vec::new();
        for doc in documents {
            if DocumentEvaluator::new(doc)?.evaluate(expr)? {
                matched.push(doc.clone());
            }
        }

        Ok(matched)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(!self.visit_expr(expr)?)
    }

    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error> {
        Ok(self.document.get(field).is_some() == should_exist)
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.document.get(field) else {
            // A missing field only satisfies "not equal".
            return Ok(*op == FieldOp::Ne);
        };

        let left = Comparable::from(field_value);
        let right = Comparable::from(value);
        let ordering = left.partial_cmp(&right);

        Ok(match op {
            FieldOp::Eq => left == right,
            FieldOp::Ne => left != right,
            FieldOp::Gt => ordering == Some(Ordering::Greater),
            FieldOp::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            FieldOp::Lt => ordering == Some(Ordering::Less),
            FieldOp::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        })
    }
}
