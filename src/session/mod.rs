pub mod orchestrator;
pub mod state;
pub mod types;
pub mod worker;

pub use orchestrator::{SessionOrchestrator, ASSISTANT_UNAVAILABLE, OVERRIDE_ANNOUNCEMENT};
pub use state::{Session, SessionSnapshot, SharedSession};
pub use types::{Announcement, LogEntry, LogKind, SecurityStatus, SubmitOutcome};
pub use worker::{SessionCommand, SessionEvent, SessionHandle, SessionWorker};
