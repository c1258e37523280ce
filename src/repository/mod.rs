//! Persistence ports. Workflows depend only on these traits, never on the
//! in-memory implementation directly, so a real SQL-backed adapter can
//! replace [`memory::Store`] without touching a single workflow.

pub mod memory;
pub mod traits;

pub use memory::Store;
pub use traits::*;
