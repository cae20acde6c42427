//! Tool catalog, approval gating and dispatch.

mod approval;
mod context;
mod dispatcher;
mod function;
mod registry;
mod traits;

pub use approval::{ApprovalDecision, ApprovalPolicy, FnApprover, ToolApprover};
pub use context::ToolContext;
pub use dispatcher::ToolDispatcher;
pub use function::{DeferredTool, FunctionTool};
pub use registry::{ToolCatalog, ToolIndex};
pub use traits::{SchemaTool, Tool, ToolExecution};
