//! Translation from filter expressions and query options to MongoDB syntax.

use bson::{Document, Bson, doc};

use peoplefake_core::{
    query::{QueryVisitor, Expr, FieldOp, Projection, Sort, SortDirection},
    error::DocumentStoreError,
};


/// Translates filter expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// Builds the filter document for an optional expression; `None` matches everything.
    pub(crate) fn filter(expr: Option<&Expr>) -> Result<Document, DocumentStoreError> {
        match expr {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }

    pub(crate) fn projection(projection: &Projection) -> Document {
        let mut document = Document::new();
        if projection.exclude_id {
            document.insert(Projection::ID_FIELD, 0);
        }
        for field in &projection.include {
            document.insert(field.clone(), 1);
        }
        document
    }

    pub(crate) fn sort(sort: &Sort) -> Document {
        doc! {
            sort.field.clone(): match sort.direction {
                SortDirection::Asc => 1,
                SortDirection::Desc => -1,
            }
        }
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        // MongoDB rejects an empty $and.
        if exprs.is_empty() {
            return Ok(doc! {});
        }

        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        if exprs.is_empty() {
            return Err(DocumentStoreError::InvalidQuery(
                "Or requires at least one expression".to_string(),
            ));
        }

        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        // $not is only valid per field, so negate a whole expression with $nor.
        Ok(doc! {
            "$nor": [self.visit_expr(expr)?],
        })
    }

    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: { "$exists": should_exist },
        })
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peoplefake_core::query::Filter;

    #[test]
    fn literal_and_structured_filters_translate_to_same_predicate() {
        let literal = Filter::document(doc! { "name": "Kermit" });
        let structured = Filter::and([Filter::eq("name", "Kermit")]);

        let literal = MongoQueryTranslator::filter(Some(&literal)).unwrap();
        let structured = MongoQueryTranslator::filter(Some(&structured)).unwrap();

        assert_eq!(literal, structured);
        assert_eq!(literal, doc! { "$and": [{ "name": { "$eq": "Kermit" } }] });
    }

    #[test]
    fn compound_filter() {
        let filter = Filter::eq("name", "Marvin Berry").and(Filter::lte("age", 78));

        assert_eq!(
            MongoQueryTranslator::filter(Some(&filter)).unwrap(),
            doc! {
                "$and": [
                    { "name": { "$eq": "Marvin Berry" } },
                    { "age": { "$lte": 78 } },
                ]
            }
        );
    }

    #[test]
    fn negation_uses_nor() {
        assert_eq!(
            MongoQueryTranslator::filter(Some(&Filter::gte("age", 18).not())).unwrap(),
            doc! { "$nor": [{ "age": { "$gte": 18 } }] }
        );
    }

    #[test]
    fn missing_and_empty_filters_match_everything() {
        assert_eq!(MongoQueryTranslator::filter(None).unwrap(), doc! {});
        let empty = Filter::document(doc! {});
        assert_eq!(MongoQueryTranslator::filter(Some(&empty)).unwrap(), doc! {});
        assert!(MongoQueryTranslator::filter(Some(&Filter::or(Vec::<Expr>::new()))).is_err());
    }

    #[test]
    fn projection_and_sort_options() {
        let projection = Projection::fields(["name", "age"]).exclude_id();
        assert_eq!(
            MongoQueryTranslator::projection(&projection),
            doc! { "_id": 0, "name": 1, "age": 1 }
        );

        let sort = Sort { field: "age".into(), direction: SortDirection::Desc };
        assert_eq!(MongoQueryTranslator::sort(&sort), doc! { "age": -1 });
    }
}
