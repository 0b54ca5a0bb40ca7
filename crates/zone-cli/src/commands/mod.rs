//! CLI commands

pub mod check;
pub mod delete;
pub mod fetch;
pub mod lookup;
pub mod restore;
pub mod xref;

pub use check::CheckCommand;
pub use delete::DeleteCommand;
pub use fetch::{FetchCommand, FetchTarget};
pub use lookup::LookupCommand;
pub use restore::RestoreCommand;
pub use xref::XrefCommand;
