//! Structural rewriting of parsed report documents

mod entity_pass;
mod property_pass;
mod rewriter;
pub mod schema;

pub use rewriter::{rewrite_document, DocumentRewriter, DocumentTree, RewriteOutcome};
