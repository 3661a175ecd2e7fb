//! Cash entries and tabular entry loading

mod entry;
pub mod loader;

pub use entry::CashEntry;
pub use loader::{load_entries, load_entries_from_reader};
