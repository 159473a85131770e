//! Credential proof workflow.
//!
//! # Data Flow
//! ```text
//! phase.rs    pure (phase, event) → phase table
//! machine.rs  drives the proof SDK, the launcher and the wallet session
//!             through that table
//! notify.rs   keyed notices (proof-init, proof-verify, mint-tx)
//! launcher.rs hands the verification URL to the holder
//! ```

pub mod launcher;
pub mod machine;
pub mod notify;
pub mod phase;

pub use launcher::{TerminalLauncher, VerificationLauncher};
pub use machine::{CredentialWorkflow, VerifiedProof, WorkflowError, WorkflowSettings};
pub use notify::{Notice, NoticeLevel, NotificationCenter};
pub use phase::{transition, Phase, TransitionError, WorkflowEvent};
