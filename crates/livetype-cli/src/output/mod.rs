//! Host-side surfaces and terminal output for `livetype play`.
//!
//! Structure:
//! - `html.rs`: `style.css` / `preview.html` files
//! - `script.rs`: runs script regions through an external command
//! - `typed.rs`: echoes typed characters to the terminal

pub mod html;
pub mod script;
pub mod typed;

pub use html::{CssFile, HtmlPreview};
pub use script::CommandExecutor;
pub use typed::TypedEcho;
