// ABOUTME: Tool module - defines tools, results, and the dispatching registry.
// ABOUTME: Core abstraction for the agent's lookup capabilities.

mod registry;
mod result;
mod traits;

pub use registry::*;
pub use result::*;
pub use traits::*;
