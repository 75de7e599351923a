/// Testscope
///
/// Module-scoped test selection: keeps the test cases owned by a set of target
/// modules and, outside strict mode, the test cases that reach those modules
/// through shared constraints, test steps, or pages.
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod index;
pub mod logging;
pub mod output;
pub mod reference;
pub mod resolver;

pub use catalog::{TestCaseDescriptor, TestCaseId};
pub use config::ModuleFilterConfig;
pub use filter::{Selection, SelectionReport, TestSelectionFilter};
pub use index::{AffectedSet, ModuleFilterIndex};
pub use resolver::ModuleName;
