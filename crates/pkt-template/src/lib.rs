//! Message template rendering for Packet Studio.
//!
//! Templates contain `{{token}}` placeholders. Rendering is a pure string
//! transformation with strict rules:
//!
//! - malformed tokens (no closing `}}`) are never matched
//! - unknown tokens stay in the output byte for byte
//! - known tokens without a value render as nothing
//! - values are inserted verbatim and never rendered again
//!
//! [`render_validated`] additionally reports unknown and unresolved tokens
//! without changing the output.

pub mod grammar;
pub mod render;
pub mod tokens;

pub use grammar::{TokenGrammar, scan_tokens};
pub use render::{
    RenderOutput, TokenResolution, ValidationReport, render, render_validated,
    render_validated_with, render_with,
};
pub use tokens::{
    PASCAL_CASE_TOKENS, RenderedMessage, SNAKE_CASE_TOKENS, TokenContext, message_tokens,
    migrate_pascal_tokens, pascal_case_tokens, render_message, snake_case_tokens, snake_token,
    system_tokens,
};
