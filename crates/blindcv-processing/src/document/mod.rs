//! Document conversion module

pub mod extractor;
pub mod layout;
pub mod renderer;

pub use extractor::extract_text;
pub use layout::PageLayout;
pub use renderer::{render_text, render_text_with_layout, RenderReport};
