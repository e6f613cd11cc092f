//! 任务执行：任务描述、运行时上下文与顺序执行器

pub mod executor;
pub mod runtime;
pub mod structured;
pub mod task;
pub mod types;

pub use executor::PipelineExecutor;
pub use runtime::RuntimeContext;
pub use structured::{clean_response, parse_structured};
pub use task::{OutputSchema, TaskDescriptor};
pub use types::{PipelineRun, TaskOutput};
