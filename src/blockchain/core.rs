// Chain data model and structural validation live in separate submodules.
pub mod chain;
pub mod validation;

pub use chain::*;
pub use validation::*;
