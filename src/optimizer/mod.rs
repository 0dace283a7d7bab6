// ===== demoforge/src/optimizer/mod.rs =====
pub mod mutation;
pub mod runner;

pub use self::mutation::{Change, MembershipAction};
pub use self::runner::{ProgressSink, SearchLoop, SearchOptions, SearchSummary};

/// Where a search step currently is in its lifecycle. `run` leaves the loop
/// back in `Idle`; a finished step reads `Committed` or `RolledBack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Idle,
    Proposing,
    Evaluating,
    Committed,
    RolledBack,
}
