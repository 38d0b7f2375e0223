use crate::filter::{combine, Filter};
use indexmap::IndexMap;
use tessera_core::{
    driver::operation,
    schema::EntityId,
    stmt::Value,
    Result,
};

/// Parameter and variable values consulted when filters render.
pub type Params = IndexMap<String, Value>;

/// The provider query accumulated for one query source: filter
/// predicates combined with AND, plus a row limit.
///
/// One builder per source, created when the source's from expression is
/// first visited, mutated by predicate visits, consumed once when the
/// request is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    entity: EntityId,
    filters: Vec<Filter>,
    take: Option<i64>,
}

/// The structural identity of one rendered request, used to deduplicate
/// repeated executions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub table: String,
    pub filter: Option<String>,
    pub take: Option<i64>,
}

impl TableQuery {
    pub fn new(table: impl Into<String>, entity: EntityId) -> Self {
        Self {
            table: table.into(),
            entity,
            filters: vec![],
            take: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Tighten the row limit; a wider limit never loosens an existing
    /// one.
    pub fn set_take(&mut self, take: i64) {
        self.take = Some(match self.take {
            Some(existing) => existing.min(take),
            None => take,
        });
    }

    pub fn take(&self) -> Option<i64> {
        self.take
    }

    /// Render the accumulated filters to provider text, AND-combined.
    /// Filters rendering empty (null comparands) are skipped; no filters
    /// at all renders `None`.
    pub fn render_filter(&self, params: &Params) -> Result<Option<String>> {
        let mut combined = None;
        for filter in &self.filters {
            combined = combine(combined, filter.render(params)?);
        }
        Ok(combined.filter(|text| !text.is_empty()))
    }

    pub fn fingerprint(&self, params: &Params) -> Result<Fingerprint> {
        Ok(Fingerprint {
            table: self.table.clone(),
            filter: self.render_filter(params)?,
            take: self.take,
        })
    }

    /// Render to the driver request this builder has been accumulating.
    pub fn to_request(&self, params: &Params) -> Result<operation::Query> {
        Ok(operation::Query {
            table: self.table.clone(),
            filter: self.render_filter(params)?,
            take: self.take,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterFactory;
    use pretty_assertions::assert_eq;
    use tessera_core::{
        schema::Builder,
        stmt::{BinaryOp, Expr, SourceId, Type},
    };

    fn query_with_filters(predicates: &[Expr]) -> TableQuery {
        let schema = Builder::new()
            .entity("Person", |e| {
                e.property("PartitionKey", Type::String);
                e.property("RowKey", Type::String);
                e.property("Age", Type::I64);
                e.primary_key(&["PartitionKey", "RowKey"]);
            })
            .build()
            .unwrap();
        let entity = schema.entity_by_name("Person").unwrap();

        let mut query = TableQuery::new("Person", entity.id);
        for predicate in predicates {
            query.add_filter(FilterFactory::create(predicate, entity).unwrap());
        }
        query
    }

    fn member(name: &str) -> Expr {
        Expr::member(Expr::source_ref(SourceId(0)), name)
    }

    #[test]
    fn filters_combine_with_and() {
        let query = query_with_filters(&[
            Expr::binary_op(member("PartitionKey"), BinaryOp::Eq, Expr::from("US")),
            Expr::binary_op(member("RowKey"), BinaryOp::Eq, Expr::from("42")),
        ]);

        assert_eq!(
            query.render_filter(&Params::new()).unwrap().as_deref(),
            Some("(PartitionKey eq 'US') and (RowKey eq '42')")
        );
    }

    #[test]
    fn null_comparand_renders_empty_and_is_skipped() {
        let query = query_with_filters(&[
            Expr::binary_op(member("Age"), BinaryOp::Ge, Expr::from(21i64)),
            Expr::binary_op(member("RowKey"), BinaryOp::Eq, Expr::null()),
        ]);

        assert_eq!(
            query.render_filter(&Params::new()).unwrap().as_deref(),
            Some("Age ge 21L")
        );
    }

    #[test]
    fn take_only_tightens() {
        let mut query = query_with_filters(&[]);
        query.set_take(10);
        query.set_take(25);
        assert_eq!(query.take(), Some(10));

        query.set_take(1);
        assert_eq!(query.take(), Some(1));
    }

    #[test]
    fn fingerprints_are_value_equal_for_identical_requests() {
        let predicates = [Expr::binary_op(member("Age"), BinaryOp::Ge, Expr::from(21i64))];
        let a = query_with_filters(&predicates);
        let b = query_with_filters(&predicates);

        assert_eq!(
            a.fingerprint(&Params::new()).unwrap(),
            b.fingerprint(&Params::new()).unwrap()
        );
    }
}
