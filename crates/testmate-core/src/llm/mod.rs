mod traits;
mod claude;
mod deferred;

pub use traits::*;
pub use claude::ClaudeClient;
pub use deferred::DeferredClient;
