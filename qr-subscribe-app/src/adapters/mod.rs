//! Platform-agnostic storage adapters for non-mobile frontends (CLI, tests).

mod json_file_store;

pub use json_file_store::JsonFileStore;
