//! Application review: kinds, statuses and the approve/reject state machine.

mod error;
mod kind;
mod machine;
mod queue;


pub use error::{ReviewError, ReviewResult};
pub use kind::{Application, ApplicationKind, ApplicationStatus};
pub use machine::set_status;
pub use queue::ReviewQueue;
