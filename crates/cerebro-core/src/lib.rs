//! Section engine and template store behind the `cerebro` tool.
//!
//! [`section`] is pure text manipulation over `## <name>` headings; [`store`]
//! persists reusable section bodies; [`document`] covers reading and writing
//! the target file.

pub mod diff;
pub mod document;
pub mod error;
pub mod section;
pub mod store;

pub use document::{process_document, read_document, write_document, DocumentChange};
pub use error::{CoreError, CoreResult, ExitCode};
pub use section::{delete, extract, insert, locate, section_names, Section};
pub use store::{FsTemplateStore, MemoryTemplateStore, TemplateStore, TEMPLATE_EXTENSION};
