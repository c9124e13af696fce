// Core module - Connection lifecycle and byte bridge
pub mod console;
pub mod device;
pub mod link;
pub mod session;
pub mod supervisor;

pub use supervisor::{SessionSupervisor, SupervisorSettings};
