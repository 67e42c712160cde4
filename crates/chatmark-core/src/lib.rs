//! Renders chat-style markdown into escaped, display-ready HTML.
//!
//! The renderer is a fixed sequence of text passes. Citation links, rendered
//! math and code are parked behind per-call placeholder tokens so that later
//! passes cannot rewrite them, and restored at the very end.

mod autolink;
mod blockquote;
mod citation;
mod code;
mod emphasis;
mod escape;
mod heading;
mod list;
mod math;
mod options;
mod paragraph;
mod placeholder;
mod render;
mod sanitize;
mod table;
mod typst_math;

pub use autolink::DEFAULT_LINK_DISPLAY_LIMIT;
pub use citation::{Citation, CitationSource};
pub use math::{MathError, MathRenderer};
pub use options::RenderOptions;
pub use render::{render, render_sanitized, render_sanitized_with_options, render_with_options};
pub use typst_math::{FONT_PATHS_ENV, TypstMath};
