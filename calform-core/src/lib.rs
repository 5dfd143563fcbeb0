//! Core of calform: author calendar items through a form and export them.
//!
//! - `form` and `store` hold the header and the per-item subforms
//! - `collect` reads an item's raw fields into a typed `CalendarItem`
//! - `ics`, `json`, `csv` and `text` serialize collected items
//! - `file_io` saves exports and reads CSV uploads

pub mod collect;
pub mod config;
pub mod csv;
pub mod error;
pub mod export;
pub mod fields;
pub mod file_io;
pub mod form;
pub mod ics;
pub mod item;
pub mod json;
pub mod store;
pub mod text;

pub use error::{CalFormError, CalFormResult};
pub use export::ExportFormat;
pub use fields::{Field, ItemFields};
pub use form::{CalendarHeader, Form};
pub use item::*;
