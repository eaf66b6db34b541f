pub mod catalog;
pub mod description;
pub mod hits;

pub use catalog::{
    ClassRecord, FunctionRecord, ImportRecord, ModuleRecord, ProjectRecord, VariableRecord,
};
pub use description::{
    ClassDescription, FunctionDescription, ImportDescription, ModuleDescription,
    VariableDescription,
};
pub use hits::{ClassHit, FunctionHit, ModuleHit, SearchResults, VariableHit};
