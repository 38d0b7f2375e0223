use std::fmt;

/// A double-quoted SQL identifier; embedded quotes are doubled.
pub(crate) struct Ident<'a>(pub &'a str);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for ch in self.0.chars() {
            if ch == '"' {
                f.write_str("\"\"")?;
            } else {
                fmt::Write::write_char(f, ch)?;
            }
        }
        f.write_str("\"")
    }
}
