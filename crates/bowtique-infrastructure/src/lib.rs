//! Concrete backing stores and path resolution for the Bowtique client core.

pub mod paths;
pub mod storage;

pub use storage::JsonFileStore;
