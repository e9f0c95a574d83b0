//! IPC boundary between the UI and the backend.

mod protocol;
mod router;

pub use protocol::{IpcRequest, IpcResponse};
pub use router::Router;
