use super::Error;

/// Error when eager evaluation of a candidate sub-expression fails.
///
/// This occurs during parameter extraction, when a sub-expression judged
/// constant-evaluable turns out not to be: an unbound variable, a type
/// mismatch mid-evaluation, or a non-evaluable node reached through a
/// record constructor.
///
/// The offending expression is carried for diagnostics. When sensitive-data
/// logging is disabled, the caller passes a redacted rendering instead of
/// the literal values.
#[derive(Debug)]
pub(super) struct ExpressionEvaluationFailedError {
    expression: Box<str>,
    message: Box<str>,
}

impl std::error::Error for ExpressionEvaluationFailedError {}

impl core::fmt::Display for ExpressionEvaluationFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "expression evaluation failed: {}; expression={}",
            self.message, self.expression
        )
    }
}

impl Error {
    /// Creates an expression evaluation failure carrying the rendered
    /// offending expression.
    pub fn expression_evaluation_failed(
        expression: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::ExpressionEvaluationFailed(
            ExpressionEvaluationFailedError {
                expression: expression.into().into(),
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an expression evaluation failure.
    pub fn is_expression_evaluation_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ExpressionEvaluationFailed(_))
    }
}
