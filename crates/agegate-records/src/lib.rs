//! Agegate Records — persistence seam and orchestration for verified proofs.

pub mod error;
pub mod memory;
pub mod repository;
pub mod service;

pub use error::RecordError;
pub use memory::InMemoryVerificationRepository;
pub use repository::VerificationRecordRepository;
pub use service::{can_trust, VerificationService};
