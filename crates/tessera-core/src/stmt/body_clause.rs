use super::{FromClause, GroupJoinClause, JoinClause, OrderByClause, SourceId, WhereClause};

/// One clause in a query model's body, between the main `from` and the
/// select.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyClause {
    From(FromClause),
    Join(JoinClause),
    GroupJoin(GroupJoinClause),
    Where(WhereClause),
    OrderBy(OrderByClause),
}

impl BodyClause {
    /// The range variable this clause produces, if it produces one.
    pub fn produced_source(&self) -> Option<SourceId> {
        match self {
            BodyClause::From(from) => Some(from.source),
            BodyClause::Join(join) => Some(join.source),
            BodyClause::GroupJoin(group) => Some(group.source),
            BodyClause::Where(_) | BodyClause::OrderBy(_) => None,
        }
    }
}

impl From<FromClause> for BodyClause {
    fn from(value: FromClause) -> Self {
        Self::From(value)
    }
}

impl From<JoinClause> for BodyClause {
    fn from(value: JoinClause) -> Self {
        Self::Join(value)
    }
}

impl From<GroupJoinClause> for BodyClause {
    fn from(value: GroupJoinClause) -> Self {
        Self::GroupJoin(value)
    }
}

impl From<WhereClause> for BodyClause {
    fn from(value: WhereClause) -> Self {
        Self::Where(value)
    }
}

impl From<OrderByClause> for BodyClause {
    fn from(value: OrderByClause) -> Self {
        Self::OrderBy(value)
    }
}
