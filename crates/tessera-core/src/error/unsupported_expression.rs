use super::Error;

/// Error when a rewrite pass encounters an expression kind it cannot
/// handle.
///
/// This is the translation pipeline's hard stop: the node's kind and the
/// visit method that rejected it are carried in the message. There is no
/// silent fallback at this layer; a caller may still decide to evaluate
/// the query client-side.
#[derive(Debug)]
pub(super) struct UnsupportedExpressionError {
    node_kind: Box<str>,
    visit_method: Box<str>,
}

impl std::error::Error for UnsupportedExpressionError {}

impl core::fmt::Display for UnsupportedExpressionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported expression `{}` in {}",
            self.node_kind, self.visit_method
        )
    }
}

impl Error {
    /// Creates an unsupported expression error naming the node kind and
    /// the rejecting visit method.
    pub fn unsupported_expression(
        node_kind: impl Into<String>,
        visit_method: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnsupportedExpression(
            UnsupportedExpressionError {
                node_kind: node_kind.into().into(),
                visit_method: visit_method.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unsupported expression error.
    pub fn is_unsupported_expression(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedExpression(_))
    }
}
