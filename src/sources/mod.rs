pub mod file;
pub mod source;
pub mod web;

pub use file::StaticPage;
pub use source::{PageSource, SourceError};
pub use web::WebPage;
