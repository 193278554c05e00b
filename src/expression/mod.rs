//! DAX formula rewriting

mod identifier_utils;
mod rewriter;
mod scanner;

pub use identifier_utils::{
    format_column_reference, format_table_name, is_word_char, needs_quoting, quote_table_name,
    unbracket_column, unquote_table_name,
};
pub use rewriter::{rewrite_column_references, rewrite_expression, rewrite_table_references};
pub use scanner::{tokenize, ExpressionScanner, Token, TokenKind};
