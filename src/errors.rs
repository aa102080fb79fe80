//! Parse errors.

/// Errors that can occur while parsing a stylesheet.
///
/// The parser is lenient with locally malformed constructs (a declaration
/// without a colon, an at-rule it does not model) and only fails when the
/// input is structurally unrecoverable.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("unterminated block starting at byte {offset}")]
    UnterminatedBlock { offset: usize },
}
