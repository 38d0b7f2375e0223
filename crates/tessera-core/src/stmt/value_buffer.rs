use super::Value;
use crate::{Error, Result};

/// One materialized row: an ordinal-indexed array of loosely-typed
/// values, matching entity property ordinals.
///
/// A buffer is produced once per row and consumed exactly once by the
/// materializer; [`ValueBuffer::take`] moves a slot out, leaving null
/// behind, so double consumption shows up as an unexpected null rather
/// than silently cloned data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueBuffer {
    values: Vec<Value>,
}

impl ValueBuffer {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Result<&Value> {
        self.values.get(ordinal).ok_or_else(|| {
            Error::invalid_statement(format!(
                "ordinal {ordinal} out of range for a {}-wide row",
                self.values.len()
            ))
        })
    }

    /// Move the value at `ordinal` out of the buffer.
    pub fn take(&mut self, ordinal: usize) -> Result<Value> {
        match self.values.get_mut(ordinal) {
            Some(slot) => Ok(slot.take()),
            None => Err(Error::invalid_statement(format!(
                "ordinal {ordinal} out of range for a {}-wide row",
                self.values.len()
            ))),
        }
    }
}

impl FromIterator<Value> for ValueBuffer {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_leaves_null_behind() {
        let mut buffer = ValueBuffer::new(vec![Value::from(1i64), Value::from("a")]);

        assert_eq!(buffer.take(1).unwrap(), Value::from("a"));
        assert_eq!(*buffer.get(1).unwrap(), Value::Null);
        assert_eq!(*buffer.get(0).unwrap(), Value::from(1i64));
    }

    #[test]
    fn out_of_range_ordinal_errors() {
        let mut buffer = ValueBuffer::new(vec![Value::Null]);
        assert!(buffer.take(3).is_err());
    }
}
