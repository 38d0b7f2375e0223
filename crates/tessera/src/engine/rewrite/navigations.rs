//! Navigation rewriting: member chains that traverse navigation
//! properties become explicit joins, direct foreign-key reads, or
//! correlated sub-queries.
//!
//! Chain classification:
//!
//! - a to-one navigation whose accessed property is the principal-key
//!   property backing the foreign key reads the foreign-key column
//!   directly, with a widening cast when the column types differ
//! - a navigation inside a join's inner key selector becomes a
//!   correlated first-or-default sub-query, so a join is never built
//!   inside a join
//! - anything else becomes an explicit join; the same (source,
//!   navigation) pair always reuses the join it created first
//! - a collection navigation in a from clause replaces that source's
//!   origin with the target entity's root and adds a correlating where
//!   clause
//! - equality between navigation-valued expressions is rewritten to
//!   compare the underlying foreign-key selectors, pairwise for
//!   composite keys, with an all-null composite standing in for a null
//!   comparand

use super::super::CompileContext;
use indexmap::IndexMap;
use std::collections::HashSet;
use tessera_core::{
    schema::{EntityId, ForeignKey, Navigation, NavigationId},
    stmt::{
        BinaryOp, BodyClause, Expr, FromClause, JoinClause, Query, ResultOperator, SelectClause,
        SourceId, WhereClause,
    },
    Error, Result,
};

pub fn apply(cx: &mut CompileContext<'_>, query: &mut Query) -> Result<()> {
    let mut rewriter = NavigationRewriter {
        entities: super::source_entities(query),
        joins: IndexMap::new(),
        inserted: HashSet::new(),
        cx,
    };
    rewriter.rewrite_query(query)
}

type Pending = Vec<(SourceId, BodyClause)>;

struct NavigationRewriter<'a, 'cx> {
    cx: &'cx mut CompileContext<'a>,

    /// Entity backing each entity-rooted source, kept current as joins
    /// and flattened sources are introduced.
    entities: IndexMap<SourceId, EntityId>,

    /// Join deduplication: traversing the same navigation from the same
    /// source reuses the synthesized join.
    joins: IndexMap<(SourceId, NavigationId), SourceId>,

    /// Sources of join clauses this pass inserted, used to keep sibling
    /// joins in creation order.
    inserted: HashSet<SourceId>,
}

impl NavigationRewriter<'_, '_> {
    fn rewrite_query(&mut self, query: &mut Query) -> Result<()> {
        for (source, entity) in super::source_entities(query) {
            self.entities.entry(source).or_insert(entity);
        }

        // Joins synthesized while flattening (to-one prefixes of a
        // collection traversal) join the same insertion batch as the
        // expression phase's.
        let mut pending = self.flatten_from_clauses(query)?;

        self.rewrite_expr(&mut query.main.expr, false, &mut pending)?;

        for clause in &mut query.body {
            match clause {
                BodyClause::From(from) => {
                    self.rewrite_expr(&mut from.expr, false, &mut pending)?;
                }
                BodyClause::Join(join) => {
                    self.rewrite_expr(&mut join.inner, false, &mut pending)?;
                    self.rewrite_expr(&mut join.outer_key, false, &mut pending)?;
                    self.rewrite_expr(&mut join.inner_key, true, &mut pending)?;
                }
                BodyClause::GroupJoin(group) => {
                    self.rewrite_expr(&mut group.join.inner, false, &mut pending)?;
                    self.rewrite_expr(&mut group.join.outer_key, false, &mut pending)?;
                    self.rewrite_expr(&mut group.join.inner_key, true, &mut pending)?;
                }
                BodyClause::Where(where_clause) => {
                    self.rewrite_expr(&mut where_clause.predicate, false, &mut pending)?;
                }
                BodyClause::OrderBy(order_by) => {
                    for ordering in &mut order_by.orderings {
                        self.rewrite_expr(&mut ordering.expr, false, &mut pending)?;
                    }
                }
            }
        }

        self.rewrite_expr(&mut query.select.expr, false, &mut pending)?;

        for operator in &mut query.operators {
            if let ResultOperator::Take(expr) | ResultOperator::Skip(expr) = operator {
                self.rewrite_expr(expr, false, &mut pending)?;
            }
        }

        self.insert_pending(query, pending);
        Ok(())
    }

    /// Collection navigations in from clauses flatten the one-to-many
    /// into the primary enumeration.
    fn flatten_from_clauses(&mut self, query: &mut Query) -> Result<Pending> {
        let mut pending: Pending = vec![];
        let mut inserts: Vec<(usize, BodyClause)> = vec![];

        if let Some(where_clause) = self.try_flatten(&mut query.main, &mut pending)? {
            inserts.push((0, where_clause.into()));
        }

        for index in 0..query.body.len() {
            let mut clause = std::mem::replace(
                &mut query.body[index],
                BodyClause::Where(WhereClause::new(true)),
            );
            if let BodyClause::From(from) = &mut clause {
                if let Some(where_clause) = self.try_flatten(from, &mut pending)? {
                    inserts.push((index + 1, where_clause.into()));
                }
            }
            query.body[index] = clause;
        }

        for (position, clause) in inserts.into_iter().rev() {
            query.body.insert(position, clause);
        }

        Ok(pending)
    }

    fn try_flatten(
        &mut self,
        from: &mut FromClause,
        pending: &mut Pending,
    ) -> Result<Option<WhereClause>> {
        let Some((base, segments)) = decompose(&from.expr) else {
            return Ok(None);
        };
        let Some(&entity) = self.entities.get(&base) else {
            return Ok(None);
        };
        if self
            .cx
            .schema
            .entity(entity)
            .navigation_by_name(segments[0])
            .is_none()
        {
            return Ok(None);
        }

        // To-one prefix segments resolve to joins on the originating
        // source before the collection segment is reached.
        let mut source = base;
        let mut entity = entity;

        for (index, segment) in segments.iter().enumerate() {
            let nav = self
                .cx
                .schema
                .entity(entity)
                .navigation_by_name(segment)
                .cloned()
                .ok_or_else(|| {
                    Error::invalid_statement(format!(
                        "`{segment}` is not a navigation of a from-clause chain"
                    ))
                })?;
            let fk = self.cx.schema.foreign_key(nav.foreign_key).clone();

            if nav.to_many {
                if index + 1 != segments.len() {
                    return Err(Error::unsupported_expression(
                        "Member",
                        "flatten_from_clause (traversal beyond a collection navigation)",
                    ));
                }

                let target = self.cx.schema.navigation_target(nav.id);
                from.expr = Expr::root(target);
                self.entities.insert(from.source, target);

                let principal_key = self.cx.schema.key(fk.principal_key).clone();
                let pairs: Vec<Expr> = fk
                    .properties
                    .iter()
                    .zip(&principal_key.properties)
                    .map(|(fk_prop, principal_prop)| {
                        Expr::eq(
                            Expr::property(from.source, *fk_prop),
                            Expr::property(source, *principal_prop),
                        )
                    })
                    .collect();

                return Ok(Some(WhereClause::new(Expr::and_from_vec(pairs))));
            }

            source = self.get_or_create_join(source, &nav, &fk, pending);
            entity = self.cx.schema.navigation_target(nav.id);
        }

        Err(Error::unsupported_expression(
            "Member",
            "flatten_from_clause (from clause over a to-one navigation)",
        ))
    }

    fn rewrite_expr(
        &mut self,
        expr: &mut Expr,
        in_inner_key: bool,
        pending: &mut Pending,
    ) -> Result<()> {
        match expr {
            Expr::Member(_) => {
                if let Some(rewritten) = self.try_rewrite_chain(expr, in_inner_key, pending)? {
                    *expr = rewritten;
                    return Ok(());
                }
                let Expr::Member(member) = expr else {
                    unreachable!()
                };
                self.rewrite_expr(&mut member.base, in_inner_key, pending)
            }
            Expr::BinaryOp(_) => {
                if let Some(rewritten) = self.try_rewrite_comparison(expr, pending)? {
                    *expr = rewritten;
                    return Ok(());
                }
                let Expr::BinaryOp(op) = expr else {
                    unreachable!()
                };
                self.rewrite_expr(&mut op.lhs, in_inner_key, pending)?;
                self.rewrite_expr(&mut op.rhs, in_inner_key, pending)
            }
            Expr::And(and) => {
                for operand in &mut and.operands {
                    self.rewrite_expr(operand, in_inner_key, pending)?;
                }
                Ok(())
            }
            Expr::Or(or) => {
                for operand in &mut or.operands {
                    self.rewrite_expr(operand, in_inner_key, pending)?;
                }
                Ok(())
            }
            Expr::Not(not) => self.rewrite_expr(&mut not.expr, in_inner_key, pending),
            Expr::Cast(cast) => self.rewrite_expr(&mut cast.expr, in_inner_key, pending),
            Expr::Record(record) => {
                for field in &mut record.fields {
                    self.rewrite_expr(field, in_inner_key, pending)?;
                }
                Ok(())
            }
            Expr::Condition(condition) => {
                self.rewrite_expr(&mut condition.test, in_inner_key, pending)?;
                self.rewrite_expr(&mut condition.when_true, in_inner_key, pending)?;
                self.rewrite_expr(&mut condition.when_false, in_inner_key, pending)
            }
            Expr::Call(call) => {
                for arg in &mut call.args {
                    self.rewrite_expr(arg, in_inner_key, pending)?;
                }
                Ok(())
            }
            Expr::Invoke(invoke) => {
                self.rewrite_expr(&mut invoke.lambda, in_inner_key, pending)?;
                for arg in &mut invoke.args {
                    self.rewrite_expr(arg, in_inner_key, pending)?;
                }
                Ok(())
            }
            Expr::Subquery(subquery) => self.rewrite_query(&mut subquery.query),

            // Lambda bodies are evaluated per row at execution time.
            Expr::Lambda(_) => Ok(()),

            Expr::Value(_)
            | Expr::Var(_)
            | Expr::Param(_)
            | Expr::Property(_)
            | Expr::SourceRef(_)
            | Expr::Root(_)
            | Expr::Materialize(_)
            | Expr::BufferRead(_) => Ok(()),
        }
    }

    /// Rewrite a member chain that traverses one or more navigations.
    /// `None` leaves the chain for the member binder.
    fn try_rewrite_chain(
        &mut self,
        expr: &Expr,
        in_inner_key: bool,
        pending: &mut Pending,
    ) -> Result<Option<Expr>> {
        let Some((base, segments)) = decompose(expr) else {
            return Ok(None);
        };
        let Some(&entity) = self.entities.get(&base) else {
            return Ok(None);
        };
        if self
            .cx
            .schema
            .entity(entity)
            .navigation_by_name(segments[0])
            .is_none()
        {
            return Ok(None);
        }

        let mut source = base;
        let mut entity = entity;
        let mut index = 0;

        while index < segments.len() {
            let segment = segments[index];
            let entity_ref = self.cx.schema.entity(entity);

            if let Some(nav) = entity_ref.navigation_by_name(segment) {
                let nav = nav.clone();
                let fk = self.cx.schema.foreign_key(nav.foreign_key).clone();

                if nav.to_many {
                    return Err(Error::unsupported_expression(
                        "Member",
                        "rewrite_navigation_chain (collection navigation outside a from clause)",
                    ));
                }

                if index + 2 == segments.len() {
                    if let Some(shortcut) =
                        self.try_fk_shortcut(source, &fk, segments[index + 1])
                    {
                        return Ok(Some(shortcut));
                    }
                }

                if in_inner_key {
                    let subquery = self.correlated_subquery(source, &nav, &fk);
                    let mut result = Expr::subquery(subquery);
                    for rest in &segments[index + 1..] {
                        result = Expr::member(result, *rest);
                    }
                    return Ok(Some(result));
                }

                source = self.get_or_create_join(source, &nav, &fk, pending);
                entity = self.cx.schema.navigation_target(nav.id);
                index += 1;
            } else if let Some(property) = entity_ref.property_by_name(segment) {
                if index + 1 == segments.len() {
                    return Ok(Some(Expr::property(source, property.id)));
                }
                return Err(Error::unsupported_expression(
                    "Member",
                    "rewrite_navigation_chain (member access through a scalar property)",
                ));
            } else {
                return Err(Error::invalid_statement(format!(
                    "`{segment}` is neither a property nor a navigation of the traversed entity"
                )));
            }
        }

        // The chain ends at a to-one navigation: the joined range
        // variable stands in for the related entity.
        Ok(Some(Expr::source_ref(source)))
    }

    /// `order.Customer.Id` reads `order.CustomerId` directly when the
    /// accessed property is the principal-key property the foreign key
    /// references and the column types are compatible.
    fn try_fk_shortcut(
        &mut self,
        source: SourceId,
        fk: &ForeignKey,
        accessed: &str,
    ) -> Option<Expr> {
        let principal_key = self.cx.schema.key(fk.principal_key);
        let principal_entity = self.cx.schema.entity(fk.principal_entity);

        let position = principal_key
            .properties
            .iter()
            .position(|id| principal_entity.property(*id).name == accessed)?;

        let fk_property = self.cx.schema.property(fk.properties[position]);
        let principal_property = principal_entity.property(principal_key.properties[position]);

        if fk_property.ty == principal_property.ty {
            Some(Expr::property(source, fk_property.id))
        } else if fk_property.ty.widens_to(&principal_property.ty) {
            Some(Expr::cast(
                Expr::property(source, fk_property.id),
                principal_property.ty.clone(),
            ))
        } else {
            None
        }
    }

    /// Equality between navigation-valued expressions compares the
    /// underlying key selectors; the join for the terminal navigation is
    /// never built.
    fn try_rewrite_comparison(
        &mut self,
        expr: &Expr,
        pending: &mut Pending,
    ) -> Result<Option<Expr>> {
        let Expr::BinaryOp(op) = expr else {
            return Ok(None);
        };
        if !op.op.is_equality() {
            return Ok(None);
        }

        let lhs_terminal = self.is_nav_terminal(&op.lhs);
        let rhs_terminal = self.is_nav_terminal(&op.rhs);

        let (keys, other) = match (lhs_terminal, rhs_terminal) {
            (true, true) => {
                let lhs = self.chain_key_selector(&op.lhs, pending)?;
                let rhs = self.chain_key_selector(&op.rhs, pending)?;
                if lhs.len() != rhs.len() {
                    return Ok(None);
                }
                return Ok(Some(pairwise(op.op, lhs, rhs)));
            }
            (true, false) if op.rhs.is_value_null() => {
                (self.chain_key_selector(&op.lhs, pending)?, Expr::null())
            }
            (false, true) if op.lhs.is_value_null() => {
                (self.chain_key_selector(&op.rhs, pending)?, Expr::null())
            }
            _ => return Ok(None),
        };

        // Null comparand: an all-null composite of matching width.
        let nulls = vec![other; keys.len()];
        Ok(Some(pairwise(op.op, keys, nulls)))
    }

    /// True when the expression is a member chain of to-one navigations
    /// ending at a navigation (not at a scalar property).
    fn is_nav_terminal(&self, expr: &Expr) -> bool {
        let Some((base, segments)) = decompose(expr) else {
            return false;
        };
        let Some(&entity) = self.entities.get(&base) else {
            return false;
        };

        let mut entity = entity;
        for (index, segment) in segments.iter().enumerate() {
            match self.cx.schema.entity(entity).navigation_by_name(segment) {
                Some(nav) if !nav.to_many => {
                    if index + 1 == segments.len() {
                        return true;
                    }
                    entity = self.cx.schema.navigation_target(nav.id);
                }
                _ => return false,
            }
        }
        false
    }

    /// Foreign-key property reads standing in for the chain's terminal
    /// navigation; leading navigations resolve through joins.
    fn chain_key_selector(&mut self, expr: &Expr, pending: &mut Pending) -> Result<Vec<Expr>> {
        let (base, segments) = decompose(expr)
            .ok_or_else(|| Error::invalid_statement("expected a navigation chain"))?;

        let mut source = base;
        let mut entity = self.entities[&base];

        for (index, segment) in segments.iter().enumerate() {
            let nav = self
                .cx
                .schema
                .entity(entity)
                .navigation_by_name(segment)
                .cloned()
                .ok_or_else(|| Error::invalid_statement("expected a navigation chain"))?;
            let fk = self.cx.schema.foreign_key(nav.foreign_key).clone();

            if index + 1 == segments.len() {
                return Ok(fk
                    .properties
                    .iter()
                    .map(|property| Expr::property(source, *property))
                    .collect());
            }

            source = self.get_or_create_join(source, &nav, &fk, pending);
            entity = self.cx.schema.navigation_target(nav.id);
        }

        Err(Error::invalid_statement("expected a navigation chain"))
    }

    fn get_or_create_join(
        &mut self,
        origin: SourceId,
        nav: &Navigation,
        fk: &ForeignKey,
        pending: &mut Pending,
    ) -> SourceId {
        if let Some(&existing) = self.joins.get(&(origin, nav.id)) {
            return existing;
        }

        let target = self.cx.schema.navigation_target(nav.id);
        let source = self.cx.sources.next_id();
        let principal_key = self.cx.schema.key(fk.principal_key).clone();

        let outer_key = key_selector(origin, &fk.properties);
        let inner_key = key_selector(source, &principal_key.properties);

        tracing::debug!(navigation = %nav.name, %origin, %source, "synthesized navigation join");

        pending.push((
            origin,
            BodyClause::Join(JoinClause {
                source,
                name: nav.name.clone(),
                inner: Expr::root(target),
                outer_key,
                inner_key,
            }),
        ));

        self.entities.insert(source, target);
        self.joins.insert((origin, nav.id), source);
        source
    }

    /// A navigation on the right side of a join becomes a correlated
    /// first-or-default sub-query instead of a join inside a join.
    fn correlated_subquery(&mut self, origin: SourceId, nav: &Navigation, fk: &ForeignKey) -> Query {
        let target = self.cx.schema.navigation_target(nav.id);
        let source = self.cx.sources.next_id();
        let principal_key = self.cx.schema.key(fk.principal_key).clone();

        let pairs: Vec<Expr> = principal_key
            .properties
            .iter()
            .zip(&fk.properties)
            .map(|(principal_prop, fk_prop)| {
                Expr::eq(
                    Expr::property(source, *principal_prop),
                    Expr::property(origin, *fk_prop),
                )
            })
            .collect();

        self.entities.insert(source, target);

        Query {
            main: FromClause::new(source, nav.name.clone(), Expr::root(target)),
            body: vec![WhereClause::new(Expr::and_from_vec(pairs)).into()],
            select: SelectClause::new(Expr::source_ref(source)),
            operators: vec![ResultOperator::First { or_default: true }],
        }
    }

    fn insert_pending(&mut self, query: &mut Query, pending: Pending) {
        for (origin, clause) in pending {
            let mut position = match query.body_index_of(origin) {
                Some(index) => index + 1,
                None => 0,
            };

            // Keep sibling joins for the same origin in creation order.
            while position < query.body.len() {
                match &query.body[position] {
                    BodyClause::Join(join) if self.inserted.contains(&join.source) => {
                        position += 1;
                    }
                    _ => break,
                }
            }

            if let Some(source) = clause.produced_source() {
                self.inserted.insert(source);
            }
            query.body.insert(position, clause);
        }
    }
}

fn decompose<'e>(expr: &'e Expr) -> Option<(SourceId, Vec<&'e str>)> {
    let mut segments = vec![];
    let mut current = expr;

    loop {
        match current {
            Expr::Member(member) => {
                segments.push(member.name.as_str());
                current = &member.base;
            }
            Expr::SourceRef(source_ref) => {
                if segments.is_empty() {
                    return None;
                }
                segments.reverse();
                return Some((source_ref.source, segments));
            }
            _ => return None,
        }
    }
}

fn key_selector(source: SourceId, properties: &[tessera_core::schema::PropertyId]) -> Expr {
    if properties.len() == 1 {
        Expr::property(source, properties[0])
    } else {
        Expr::record(
            properties
                .iter()
                .map(|property| Expr::property(source, *property)),
        )
    }
}

/// `eq` over composite selectors becomes an AND of pairwise equalities,
/// `ne` an OR of pairwise inequalities.
fn pairwise(op: BinaryOp, lhs: Vec<Expr>, rhs: Vec<Expr>) -> Expr {
    let comparisons: Vec<Expr> = lhs
        .into_iter()
        .zip(rhs)
        .map(|(l, r)| Expr::binary_op(l, op, r))
        .collect();

    if op.is_eq() {
        Expr::and_from_vec(comparisons)
    } else {
        Expr::or_from_vec(comparisons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineOptions, Vars};
    use pretty_assertions::assert_eq;
    use tessera_core::{
        schema::{Builder, Schema},
        stmt::{SelectClause, SourceGen, Type},
    };

    fn schema() -> Schema {
        Builder::new()
            .entity("Region", |e| {
                e.property("Id", Type::I64);
                e.property("Name", Type::String);
                e.primary_key(&["Id"]);
            })
            .entity("Customer", |e| {
                e.property("Id", Type::I64);
                e.property("Name", Type::String);
                e.property("RegionId", Type::I64);
                e.primary_key(&["Id"]);
                e.belongs_to("Region", "Region", &["RegionId"]);
                e.has_many("Orders", "Order");
            })
            .entity("Order", |e| {
                e.property("Id", Type::I64);
                e.property("CustomerId", Type::I64);
                e.property("Total", Type::F64);
                e.primary_key(&["Id"]);
                e.belongs_to("Customer", "Customer", &["CustomerId"]);
            })
            .build()
            .unwrap()
    }

    fn orders_query(schema: &Schema, predicate: Expr, select: Expr) -> Query {
        let order = schema.entity_by_name("Order").unwrap();
        Query {
            main: FromClause::new(SourceId(0), "o", Expr::root(order.id)),
            body: vec![WhereClause::new(predicate).into()],
            select: SelectClause::new(select),
            operators: vec![],
        }
    }

    fn rewrite(schema: &Schema, query: &mut Query) {
        let options = EngineOptions::default();
        let vars = Vars::new();
        let mut cx = CompileContext::new(
            schema,
            &options,
            &vars,
            SourceGen::starting_at(super::super::max_source_id(query) + 1),
        );
        apply(&mut cx, query).unwrap();
    }

    fn order_ref() -> Expr {
        Expr::source_ref(SourceId(0))
    }

    #[test]
    fn fk_principal_key_access_skips_the_join() {
        let schema = schema();
        let order = schema.entity_by_name("Order").unwrap();
        let customer_id = order.property_by_name("CustomerId").unwrap().id;

        // o.Customer.Id reads o.CustomerId directly
        let mut query = orders_query(
            &schema,
            Expr::eq(
                Expr::member(Expr::member(order_ref(), "Customer"), "Id"),
                Expr::from(7i64),
            ),
            order_ref(),
        );

        rewrite(&schema, &mut query);

        assert_eq!(query.body.len(), 1, "no join should be synthesized");
        let BodyClause::Where(where_clause) = &query.body[0] else {
            panic!("expected the original where clause");
        };
        assert_eq!(
            where_clause.predicate,
            Expr::eq(Expr::property(SourceId(0), customer_id), Expr::from(7i64))
        );
    }

    #[test]
    fn navigation_traversal_synthesizes_one_deduplicated_join() {
        let schema = schema();
        let customer = schema.entity_by_name("Customer").unwrap();
        let name = customer.property_by_name("Name").unwrap().id;

        // Two traversals of o.Customer share one join.
        let predicate = Expr::and(
            Expr::eq(
                Expr::member(Expr::member(order_ref(), "Customer"), "Name"),
                Expr::from("a"),
            ),
            Expr::ne(
                Expr::member(Expr::member(order_ref(), "Customer"), "Name"),
                Expr::from("b"),
            ),
        );
        let mut query = orders_query(&schema, predicate, order_ref());

        rewrite(&schema, &mut query);

        let joins: Vec<_> = query
            .body
            .iter()
            .filter_map(|clause| match clause {
                BodyClause::Join(join) => Some(join),
                _ => None,
            })
            .collect();
        assert_eq!(joins.len(), 1);

        let join = joins[0];
        assert_eq!(join.inner, Expr::root(customer.id));

        // The join lands ahead of the predicate that references it.
        assert!(matches!(&query.body[0], BodyClause::Join(_)));
        let BodyClause::Where(where_clause) = &query.body[1] else {
            panic!("expected the where clause after the join");
        };
        let expected = Expr::and(
            Expr::eq(Expr::property(join.source, name), Expr::from("a")),
            Expr::ne(Expr::property(join.source, name), Expr::from("b")),
        );
        assert_eq!(where_clause.predicate, expected);
    }

    #[test]
    fn two_step_chain_builds_a_join_tree() {
        let schema = schema();
        let region = schema.entity_by_name("Region").unwrap();
        let region_name = region.property_by_name("Name").unwrap().id;

        // o.Customer.Region.Name joins Customer, then Region off it.
        let chain = Expr::member(
            Expr::member(Expr::member(order_ref(), "Customer"), "Region"),
            "Name",
        );
        let mut query = orders_query(&schema, Expr::eq(chain, Expr::from("west")), order_ref());

        rewrite(&schema, &mut query);

        let joins: Vec<_> = query
            .body
            .iter()
            .filter_map(|clause| match clause {
                BodyClause::Join(join) => Some(join.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(joins.len(), 2);

        // The second join originates from the first one's source.
        let customer_join = &joins[0];
        let region_join = &joins[1];
        assert_eq!(region_join.inner, Expr::root(region.id));
        assert!(matches!(
            &region_join.outer_key,
            Expr::Property(p) if p.source == customer_join.source
        ));

        let BodyClause::Where(where_clause) = query.body.last().unwrap() else {
            panic!("expected the where clause last");
        };
        assert_eq!(
            where_clause.predicate,
            Expr::eq(
                Expr::property(region_join.source, region_name),
                Expr::from("west")
            )
        );
    }

    #[test]
    fn navigation_null_comparison_compares_the_foreign_key() {
        let schema = schema();
        let order = schema.entity_by_name("Order").unwrap();
        let customer_id = order.property_by_name("CustomerId").unwrap().id;

        // o.Customer == null compares o.CustomerId against null; no join.
        let mut query = orders_query(
            &schema,
            Expr::eq(Expr::member(order_ref(), "Customer"), Expr::null()),
            order_ref(),
        );

        rewrite(&schema, &mut query);

        assert_eq!(query.body.len(), 1);
        let BodyClause::Where(where_clause) = &query.body[0] else {
            panic!("expected a where clause");
        };
        assert_eq!(
            where_clause.predicate,
            Expr::eq(Expr::property(SourceId(0), customer_id), Expr::null())
        );
    }

    #[test]
    fn navigation_equality_compares_key_selectors() {
        let schema = schema();
        let order = schema.entity_by_name("Order").unwrap();
        let customer_id = order.property_by_name("CustomerId").unwrap().id;

        // o1.Customer == o2.Customer, with o2 from a second from clause.
        let order_id = order.id;
        let mut query = Query {
            main: FromClause::new(SourceId(0), "o1", Expr::root(order_id)),
            body: vec![
                FromClause::new(SourceId(1), "o2", Expr::root(order_id)).into(),
                WhereClause::new(Expr::eq(
                    Expr::member(order_ref(), "Customer"),
                    Expr::member(Expr::source_ref(SourceId(1)), "Customer"),
                ))
                .into(),
            ],
            select: SelectClause::new(order_ref()),
            operators: vec![],
        };

        rewrite(&schema, &mut query);

        let BodyClause::Where(where_clause) = &query.body[1] else {
            panic!("expected the where clause in place");
        };
        assert_eq!(
            where_clause.predicate,
            Expr::eq(
                Expr::property(SourceId(0), customer_id),
                Expr::property(SourceId(1), customer_id),
            )
        );
    }

    #[test]
    fn collection_navigation_flattens_the_from_clause() {
        let schema = schema();
        let order = schema.entity_by_name("Order").unwrap();
        let customer = schema.entity_by_name("Customer").unwrap();
        let customer_id_on_order = order.property_by_name("CustomerId").unwrap().id;
        let customer_pk = customer.property_by_name("Id").unwrap().id;

        // from c in Customers, from o in c.Orders: the second from
        // becomes a root over Order plus a correlating filter.
        let mut query = Query {
            main: FromClause::new(SourceId(0), "c", Expr::root(customer.id)),
            body: vec![FromClause::new(
                SourceId(1),
                "o",
                Expr::member(Expr::source_ref(SourceId(0)), "Orders"),
            )
            .into()],
            select: SelectClause::new(Expr::source_ref(SourceId(1))),
            operators: vec![],
        };

        rewrite(&schema, &mut query);

        let BodyClause::From(from) = &query.body[0] else {
            panic!("expected the additional from clause first");
        };
        assert_eq!(from.expr, Expr::root(order.id));

        let BodyClause::Where(where_clause) = &query.body[1] else {
            panic!("expected the correlating where clause");
        };
        assert_eq!(
            where_clause.predicate,
            Expr::eq(
                Expr::property(SourceId(1), customer_id_on_order),
                Expr::property(SourceId(0), customer_pk),
            )
        );
    }

    #[test]
    fn navigation_in_inner_key_selector_becomes_a_subquery() {
        let schema = schema();
        let order = schema.entity_by_name("Order").unwrap();
        let customer = schema.entity_by_name("Customer").unwrap();

        // The join's inner key traverses o.Customer; a join inside a join
        // is avoided by the correlated sub-query rewrite.
        let mut query = Query {
            main: FromClause::new(SourceId(0), "c", Expr::root(customer.id)),
            body: vec![BodyClause::Join(JoinClause {
                source: SourceId(1),
                name: "o".to_string(),
                inner: Expr::root(order.id),
                outer_key: Expr::member(Expr::source_ref(SourceId(0)), "Name"),
                inner_key: Expr::member(
                    Expr::member(Expr::source_ref(SourceId(1)), "Customer"),
                    "Name",
                ),
            })],
            select: SelectClause::new(Expr::source_ref(SourceId(1))),
            operators: vec![],
        };

        rewrite(&schema, &mut query);

        let BodyClause::Join(join) = &query.body[0] else {
            panic!("expected the join clause");
        };
        let Expr::Member(member) = &join.inner_key else {
            panic!("expected member over sub-query, got {:?}", join.inner_key);
        };
        let Expr::Subquery(subquery) = &*member.base else {
            panic!("expected a correlated sub-query");
        };
        assert_eq!(
            subquery.query.operators,
            vec![ResultOperator::First { or_default: true }]
        );
        assert_eq!(subquery.query.main.expr, Expr::root(customer.id));
    }

    #[test]
    fn collection_navigation_in_a_predicate_is_rejected() {
        let schema = schema();
        let customer = schema.entity_by_name("Customer").unwrap();

        let mut query = Query {
            main: FromClause::new(SourceId(0), "c", Expr::root(customer.id)),
            body: vec![WhereClause::new(Expr::member(
                Expr::member(Expr::source_ref(SourceId(0)), "Orders"),
                "Id",
            ))
            .into()],
            select: SelectClause::new(Expr::source_ref(SourceId(0))),
            operators: vec![],
        };

        let options = EngineOptions::default();
        let vars = Vars::new();
        let mut cx = CompileContext::new(&schema, &options, &vars, SourceGen::starting_at(10));
        let err = apply(&mut cx, &mut query).unwrap_err();
        assert!(err.is_unsupported_expression());
    }
}
