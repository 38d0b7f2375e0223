use super::Flavor;
use tessera_core::{stmt::Value, Error, Result};

/// Render a constant as a SQL literal.
pub(crate) fn literal(flavor: Flavor, value: &Value) -> Result<String> {
    let sql = match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(v) => match flavor {
            Flavor::Postgresql => if *v { "TRUE" } else { "FALSE" }.to_string(),
            Flavor::Sqlite => if *v { "1" } else { "0" }.to_string(),
        },
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::F64(v) => {
            if v.fract() == 0.0 && v.is_finite() {
                format!("{v:.1}")
            } else {
                v.to_string()
            }
        }
        Value::String(v) => quoted(v),
        Value::Bytes(v) => match flavor {
            Flavor::Postgresql => format!("'\\x{}'::bytea", hex(v)),
            Flavor::Sqlite => format!("X'{}'", hex(v)),
        },
        Value::DateTime(v) => quoted(&v.to_rfc3339()),
        Value::Uuid(v) => quoted(&v.to_string()),
        Value::Record(_) => {
            return Err(Error::unsupported_feature(
                "composite values have no SQL literal form",
            ))
        }
    };

    Ok(sql)
}

fn quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02X}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_escape_quotes() {
        let sql = literal(Flavor::Postgresql, &Value::from("it's")).unwrap();
        assert_eq!(sql, "'it''s'");
    }

    #[test]
    fn bytes_render_per_flavor() {
        let value = Value::from(vec![0xDEu8, 0xAD]);
        assert_eq!(
            literal(Flavor::Postgresql, &value).unwrap(),
            "'\\xDEAD'::bytea"
        );
        assert_eq!(literal(Flavor::Sqlite, &value).unwrap(), "X'DEAD'");
    }
}
