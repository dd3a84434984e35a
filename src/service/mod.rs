//! Service layer: relay routing and session supervision.

pub mod relay_router;
pub mod session_supervisor;

pub use relay_router::{DropReason, ForwardingPolicy, RelayRouter, RouteOutcome};
pub use session_supervisor::SessionSupervisor;
