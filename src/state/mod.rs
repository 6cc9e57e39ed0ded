//! Shared server state: the registry and per-connection session handles.

mod registry;
mod session;

pub use registry::{GroupCreateError, Registry};
pub use session::SessionHandle;
