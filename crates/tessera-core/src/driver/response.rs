use crate::stmt::ValueBuffer;

pub type Rows = Vec<ValueBuffer>;

/// Raw rows returned by a driver operation. Operations that return no
/// rows produce an empty response.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,
}

impl Response {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Rows) -> Self {
        Self { rows }
    }
}
