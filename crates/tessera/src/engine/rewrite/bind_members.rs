//! Member-access binding: the last pass before a model reaches a
//! provider backend.
//!
//! - a bare reference to a source that requires materialization becomes
//!   that source's materialization call site
//! - member access over a materialized source resolves to a property
//!   read
//! - member access over a source that only feeds scalar projection
//!   becomes an ordinal read from the row's value buffer
//! - `Key` access on a group-join's range variable unwraps to the join's
//!   outer key selector

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tessera_core::{
    schema::{EntityId, Schema},
    stmt::{self, Expr, Node, Query, SourceId, Visit, VisitMut},
    Error, Result,
};

pub fn apply(schema: &Schema, query: &mut Query, requires: &HashSet<SourceId>) -> Result<()> {
    let mut bind = Bind {
        schema,
        entities: super::source_entities(query),
        group_keys: group_keys(query),
        requires,
        err: None,
    };
    bind.visit_query_mut(query);

    match bind.err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Outer key selector of each group-join range variable, for
/// grouping-key unwrap.
fn group_keys(query: &Query) -> HashMap<SourceId, Expr> {
    struct Collect {
        keys: HashMap<SourceId, Expr>,
    }

    impl Visit for Collect {
        fn visit_group_join_clause(&mut self, i: &stmt::GroupJoinClause) {
            self.keys.insert(i.source, i.join.outer_key.clone());
            stmt::visit::visit_group_join_clause(self, i);
        }
    }

    let mut collect = Collect {
        keys: HashMap::new(),
    };
    collect.visit_query(query);
    collect.keys
}

struct Bind<'a> {
    schema: &'a Schema,
    entities: IndexMap<SourceId, EntityId>,
    group_keys: HashMap<SourceId, Expr>,
    requires: &'a HashSet<SourceId>,
    err: Option<Error>,
}

impl VisitMut for Bind<'_> {
    fn visit_expr_mut(&mut self, i: &mut Expr) {
        if self.err.is_some() {
            return;
        }

        if let Expr::Member(member) = i {
            if let Expr::SourceRef(source_ref) = &*member.base {
                let source = source_ref.source;

                if member.name == "Key" {
                    if let Some(key) = self.group_keys.get(&source) {
                        *i = key.clone();
                        self.visit_expr_mut(i);
                        return;
                    }
                }

                if let Some(&entity) = self.entities.get(&source) {
                    match self
                        .schema
                        .entity(entity)
                        .property_by_name(&member.name)
                        .map(|property| (property.id, property.ty.clone()))
                    {
                        Some((property, ty)) => {
                            *i = if self.requires.contains(&source) {
                                Expr::property(source, property)
                            } else {
                                Expr::buffer_read(property.index, ty)
                            };
                        }
                        None => {
                            self.err = Some(Error::unsupported_expression(
                                "Member",
                                "visit_expr_member_mut (unresolved member on an entity source)",
                            ));
                        }
                    }
                    return;
                }
            }
        }

        stmt::visit_mut::visit_expr_mut(self, i);

        if let Expr::SourceRef(source_ref) = i {
            if let Some(&entity) = self.entities.get(&source_ref.source) {
                if self.requires.contains(&source_ref.source) {
                    *i = Expr::materialize(source_ref.source, entity);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tessera_core::{
        schema::Builder,
        stmt::{
            BinaryOp, FromClause, GroupJoinClause, JoinClause, SelectClause, Type, WhereClause,
        },
    };

    fn schema() -> Schema {
        Builder::new()
            .entity("Person", |e| {
                e.property("Id", Type::I64);
                e.property("Name", Type::String);
                e.property("Age", Type::I64);
                e.primary_key(&["Id"]);
            })
            .build()
            .unwrap()
    }

    fn person_query(schema: &Schema, select: Expr) -> Query {
        let person = schema.entity_by_name("Person").unwrap();
        Query {
            main: FromClause::new(SourceId(0), "p", Expr::root(person.id)),
            body: vec![WhereClause::new(Expr::binary_op(
                Expr::member(Expr::source_ref(SourceId(0)), "Age"),
                BinaryOp::Ge,
                Expr::from(21i64),
            ))
            .into()],
            select: SelectClause::new(select),
            operators: vec![],
        }
    }

    #[test]
    fn materialized_source_binds_to_properties() {
        let schema = schema();
        let person = schema.entity_by_name("Person").unwrap();
        let age = person.property_by_name("Age").unwrap().id;

        let mut query = person_query(&schema, Expr::source_ref(SourceId(0)));
        let requires = HashSet::from([SourceId(0)]);

        apply(&schema, &mut query, &requires).unwrap();

        assert_eq!(
            query.select.expr,
            Expr::materialize(SourceId(0), person.id)
        );
        let stmt::BodyClause::Where(where_clause) = &query.body[0] else {
            panic!("expected where clause");
        };
        assert_eq!(
            where_clause.predicate,
            Expr::binary_op(
                Expr::property(SourceId(0), age),
                BinaryOp::Ge,
                Expr::from(21i64)
            )
        );
    }

    #[test]
    fn scalar_source_binds_to_buffer_reads() {
        let schema = schema();

        let mut query = person_query(
            &schema,
            Expr::member(Expr::source_ref(SourceId(0)), "Name"),
        );
        let requires = HashSet::new();

        apply(&schema, &mut query, &requires).unwrap();

        // Name is ordinal 1, Age ordinal 2.
        assert_eq!(query.select.expr, Expr::buffer_read(1, Type::String));
        let stmt::BodyClause::Where(where_clause) = &query.body[0] else {
            panic!("expected where clause");
        };
        assert_eq!(
            where_clause.predicate,
            Expr::binary_op(
                Expr::buffer_read(2, Type::I64),
                BinaryOp::Ge,
                Expr::from(21i64)
            )
        );
    }

    #[test]
    fn unresolved_member_is_a_structured_failure() {
        let schema = schema();

        let mut query = person_query(
            &schema,
            Expr::member(Expr::source_ref(SourceId(0)), "Missing"),
        );

        let err = apply(&schema, &mut query, &HashSet::new()).unwrap_err();
        assert!(err.is_unsupported_expression());
    }

    #[test]
    fn group_key_access_unwraps_to_the_outer_key() {
        let schema = schema();
        let person = schema.entity_by_name("Person").unwrap();
        let name = person.property_by_name("Name").unwrap().id;

        let group_source = SourceId(2);
        let mut query = Query {
            main: FromClause::new(SourceId(0), "p", Expr::root(person.id)),
            body: vec![stmt::BodyClause::GroupJoin(GroupJoinClause {
                source: group_source,
                name: "g".to_string(),
                join: JoinClause {
                    source: SourceId(1),
                    name: "q".to_string(),
                    inner: Expr::root(person.id),
                    outer_key: Expr::property(SourceId(0), name),
                    inner_key: Expr::property(SourceId(1), name),
                },
            })],
            select: SelectClause::new(Expr::member(Expr::source_ref(group_source), "Key")),
            operators: vec![],
        };

        apply(&schema, &mut query, &HashSet::new()).unwrap();

        assert_eq!(query.select.expr, Expr::property(SourceId(0), name));
    }
}
