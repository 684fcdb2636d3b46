//! Hook endpoints for the composite-controller runtime.

pub mod contract;
pub mod server;

pub use server::{HOOK_PORT, HookState, create_hook_router, run_hook_server};
