pub mod html;
pub mod inspector;
mod scan;

pub use html::HtmlForm;
pub use inspector::{FormInspector, OptionRef};
