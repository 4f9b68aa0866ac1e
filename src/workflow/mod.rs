pub mod completion_flow;
pub mod item_ctx;

pub use completion_flow::{CompletionFlow, CompletionOutcome};
pub use item_ctx::ItemCtx;
