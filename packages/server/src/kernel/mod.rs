//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod knowledge;
pub mod registry;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use knowledge::{KnowledgeAdapter, SONAR_PRO};
pub use registry::RdapRegistry;
pub use test_dependencies::{MockKnowledgeProvider, MockRegistryLookup};
pub use traits::*;
