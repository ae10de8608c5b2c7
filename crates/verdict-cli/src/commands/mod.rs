//! Command implementations.

pub mod export;
pub mod import;
pub mod results;

pub use self::export::execute_export;
pub use self::import::execute_import;
pub use self::results::execute_results;
