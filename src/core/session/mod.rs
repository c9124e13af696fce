// Session module - One connected bridge session
pub mod bridge;
pub mod outcome;
pub mod relay;

pub use bridge::BridgeSession;
pub use outcome::{SessionOutcome, SessionState};
pub use relay::RelayEnd;
