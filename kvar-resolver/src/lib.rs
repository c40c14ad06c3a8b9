mod resolver;
pub mod task;

pub use resolver::{VariableEntry, VariableResolver};
pub use task::{ResolveTask, Task, TaskRunner};
