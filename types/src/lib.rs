//! Fundamental types for the ballot workspace.
//!
//! Shared by every other crate: participant identities, the workflow status
//! enum, and the voter and proposal records.

pub mod error;
pub mod identity;
pub mod proposal;
pub mod status;
pub mod voter;

pub use error::TypesError;
pub use identity::Identity;
pub use proposal::{Proposal, ProposalId};
pub use status::WorkflowStatus;
pub use voter::Voter;
