//! Filter synthesis from predicate expressions.
//!
//! "This predicate is not translatable" is an expected outcome, not a
//! failure: [`FilterFactory::try_create`] returns
//! `Result<Filter, Untranslatable>` and the caller falls back to
//! post-materialization evaluation. [`FilterFactory::create`] is the
//! hard-error variant for callers that require translation.

use super::{ConstantFilter, ConstructedFilter, Filter, LiteralKind, MemberFilter, KEY_COLUMNS};
use tessera_core::{
    schema::{EntityType, Property},
    stmt::{BinaryOp, Expr, Value},
    Error, Result,
};

/// The expected negative outcome of filter synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Untranslatable;

pub struct FilterFactory;

impl FilterFactory {
    /// Synthesize a filter from a boolean member expression, a logical
    /// not, or a binary comparison. Never fails hard; anything the
    /// backend cannot express reports [`Untranslatable`].
    pub fn try_create(
        expr: &Expr,
        entity: &EntityType,
    ) -> core::result::Result<Filter, Untranslatable> {
        match expr {
            Expr::BinaryOp(op) => Self::comparison(&op.lhs, op.op, &op.rhs, entity),

            // `!flag` compares the flag against false; a negation that
            // is not over a boolean member is out of grammar.
            Expr::Not(not) => {
                let property = resolve_property(&not.expr, entity).ok_or(Untranslatable)?;
                Self::boolean(property, false)
            }

            // A bare boolean member (possibly under a no-op conversion
            // wrapper) compares against true.
            _ => {
                let property = resolve_property(expr, entity).ok_or(Untranslatable)?;
                Self::boolean(property, true)
            }
        }
    }

    /// Like [`Self::try_create`], but untranslatable predicates are a
    /// structured error.
    pub fn create(expr: &Expr, entity: &EntityType) -> Result<Filter> {
        Self::try_create(expr, entity).map_err(|Untranslatable| {
            Error::invalid_statement("predicate is not translatable to a table filter")
        })
    }

    fn boolean(property: &Property, value: bool) -> core::result::Result<Filter, Untranslatable> {
        if !property.ty.is_bool() {
            return Err(Untranslatable);
        }

        Ok(Filter::Constant(ConstantFilter {
            column: property.column.clone(),
            op: BinaryOp::Eq,
            value: Value::Bool(value),
            renderer: renderer_for(&property.column, Some(&property.ty)).ok_or(Untranslatable)?,
        }))
    }

    /// Exactly one side must resolve to an entity property, the other to
    /// a value producer. A property on the right flips the operator to
    /// normalize to property-on-left; if the first assignment fails, the
    /// swapped one is tried before giving up.
    fn comparison(
        lhs: &Expr,
        op: BinaryOp,
        rhs: &Expr,
        entity: &EntityType,
    ) -> core::result::Result<Filter, Untranslatable> {
        if let Some(filter) = Self::assign(lhs, op, rhs, entity) {
            return Ok(filter);
        }
        if let Some(filter) = Self::assign(rhs, op.commute(), lhs, entity) {
            return Ok(filter);
        }
        Err(Untranslatable)
    }

    fn assign(
        property_side: &Expr,
        op: BinaryOp,
        value_side: &Expr,
        entity: &EntityType,
    ) -> Option<Filter> {
        let property = resolve_property(property_side, entity)?;
        let value = classify_value(value_side)?;

        // The renderer comes from the static type of the value-producing
        // side; a parameter placeholder has none, so the property's
        // declared type (which the extracted expression matched) stands
        // in.
        let renderer = renderer_for(
            &property.column,
            value_side.const_ty().as_ref().or(Some(&property.ty)),
        )?;

        let column = property.column.clone();

        Some(match value {
            ValueSide::Constant(value) => Filter::Constant(ConstantFilter {
                column,
                op,
                value: value.clone(),
                renderer,
            }),
            ValueSide::Lazy => Filter::Member(MemberFilter {
                column,
                op,
                expr: value_side.clone(),
                renderer,
            }),
            ValueSide::Constructed => Filter::Constructed(ConstructedFilter {
                column,
                op,
                expr: value_side.clone(),
                renderer,
            }),
        })
    }
}

enum ValueSide<'a> {
    Constant(&'a Value),
    Lazy,
    Constructed,
}

/// The property side: a depth-1 member over a range variable, a bound
/// property access, or an ordinal buffer read. Nested member chains are
/// rejected. Conversion wrappers are transparent.
fn resolve_property<'e>(expr: &Expr, entity: &'e EntityType) -> Option<&'e Property> {
    match expr {
        Expr::Member(member) => match &*member.base {
            Expr::SourceRef(_) => entity.property_by_name(&member.name),
            _ => None,
        },
        Expr::Property(property) if property.property.entity == entity.id => {
            Some(entity.property(property.property))
        }
        Expr::BufferRead(read) => entity.properties.get(read.ordinal),
        Expr::Cast(cast) => resolve_property(&cast.expr, entity),
        _ => None,
    }
}

/// The value side: a constant, an independently-evaluable variable or
/// parameter reference, or a constructing conversion over one.
fn classify_value(expr: &Expr) -> Option<ValueSide<'_>> {
    match expr {
        Expr::Value(value) => Some(ValueSide::Constant(value)),
        Expr::Var(_) | Expr::Param(_) => Some(ValueSide::Lazy),
        Expr::Cast(cast) => match classify_value(&cast.expr)? {
            ValueSide::Constant(_) | ValueSide::Lazy | ValueSide::Constructed => {
                Some(ValueSide::Constructed)
            }
        },
        _ => None,
    }
}

fn renderer_for(
    column: &str,
    ty: Option<&tessera_core::stmt::Type>,
) -> Option<LiteralKind> {
    if KEY_COLUMNS.contains(&column) {
        return Some(LiteralKind::Key);
    }
    LiteralKind::of(ty?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Params;
    use pretty_assertions::assert_eq;
    use tessera_core::{
        schema::{Builder, Schema},
        stmt::{SourceId, Type},
    };

    fn schema() -> Schema {
        Builder::new()
            .entity("Person", |e| {
                e.property("PartitionKey", Type::I64);
                e.property("RowKey", Type::String);
                e.property("Age", Type::I64);
                e.property("Active", Type::Bool);
                e.primary_key(&["PartitionKey", "RowKey"]);
            })
            .build()
            .unwrap()
    }

    fn age() -> Expr {
        Expr::member(Expr::source_ref(SourceId(0)), "Age")
    }

    fn render(filter: &Filter) -> String {
        filter.render(&Params::new()).unwrap()
    }

    #[test]
    fn boolean_member_renders_eq_true() {
        let schema = schema();
        let entity = schema.entity_by_name("Person").unwrap();

        let expr = Expr::member(Expr::source_ref(SourceId(0)), "Active");
        let filter = FilterFactory::create(&expr, entity).unwrap();

        assert_eq!(render(&filter), "Active eq true");
    }

    #[test]
    fn negated_boolean_member_renders_eq_false() {
        let schema = schema();
        let entity = schema.entity_by_name("Person").unwrap();

        let expr = Expr::not(Expr::member(Expr::source_ref(SourceId(0)), "Active"));
        let filter = FilterFactory::create(&expr, entity).unwrap();

        assert_eq!(render(&filter), "Active eq false");
    }

    #[test]
    fn mirrored_comparisons_render_identically() {
        let schema = schema();
        let entity = schema.entity_by_name("Person").unwrap();

        // `p.Age > 5` and `5 < p.Age` normalize to the same filter text.
        let direct = FilterFactory::create(
            &Expr::binary_op(age(), BinaryOp::Gt, Expr::from(5i64)),
            entity,
        )
        .unwrap();
        let mirrored = FilterFactory::create(
            &Expr::binary_op(Expr::from(5i64), BinaryOp::Lt, age()),
            entity,
        )
        .unwrap();

        assert_eq!(render(&direct), render(&mirrored));
        assert_eq!(render(&direct), "Age gt 5L");
    }

    #[test]
    fn key_columns_compare_as_strings_whatever_the_type() {
        let schema = schema();
        let entity = schema.entity_by_name("Person").unwrap();

        // PartitionKey is declared i64; it still renders quoted.
        let expr = Expr::binary_op(
            Expr::member(Expr::source_ref(SourceId(0)), "PartitionKey"),
            BinaryOp::Eq,
            Expr::from(42i64),
        );
        let filter = FilterFactory::create(&expr, entity).unwrap();

        assert_eq!(render(&filter), "PartitionKey eq '42'");
    }

    #[test]
    fn nested_member_chains_are_untranslatable() {
        let schema = schema();
        let entity = schema.entity_by_name("Person").unwrap();

        let nested = Expr::member(
            Expr::member(Expr::source_ref(SourceId(0)), "Address"),
            "City",
        );
        let expr = Expr::binary_op(nested, BinaryOp::Eq, Expr::from("x"));

        assert_eq!(
            FilterFactory::try_create(&expr, entity),
            Err(Untranslatable)
        );
        assert!(FilterFactory::create(&expr, entity)
            .unwrap_err()
            .is_invalid_statement());
    }

    #[test]
    fn member_filters_resolve_at_render_time() {
        let schema = schema();
        let entity = schema.entity_by_name("Person").unwrap();

        let expr = Expr::binary_op(
            age(),
            BinaryOp::Ge,
            Expr::var("min_age", Type::I64),
        );
        let filter = FilterFactory::create(&expr, entity).unwrap();

        let mut params = Params::new();
        params.insert("min_age".to_string(), Value::from(21i64));
        assert_eq!(filter.render(&params).unwrap(), "Age ge 21L");

        // The captured variable changed; the next render observes it.
        params.insert("min_age".to_string(), Value::from(30i64));
        assert_eq!(filter.render(&params).unwrap(), "Age ge 30L");
    }

    #[test]
    fn rendering_is_deterministic() {
        let schema = schema();
        let entity = schema.entity_by_name("Person").unwrap();

        let expr = Expr::binary_op(age(), BinaryOp::Le, Expr::from(9i64));
        let filter = FilterFactory::create(&expr, entity).unwrap();

        assert_eq!(render(&filter), render(&filter));
    }

    #[test]
    fn constructed_values_render_with_typed_literals() {
        let schema = schema();
        let entity = schema.entity_by_name("Person").unwrap();

        let expr = Expr::binary_op(
            Expr::member(Expr::source_ref(SourceId(0)), "RowKey"),
            BinaryOp::Eq,
            Expr::cast(Expr::from("1f0e8f8e-0000-0000-0000-000000000000"), Type::Uuid),
        );

        // RowKey is a key column, so even a constructed guid renders as
        // a string comparison.
        let filter = FilterFactory::create(&expr, entity).unwrap();
        assert_eq!(
            render(&filter),
            "RowKey eq '1f0e8f8e-0000-0000-0000-000000000000'"
        );
    }
}
