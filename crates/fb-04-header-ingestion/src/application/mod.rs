//! Application layer: the reusable multisig guard and the ingestion service.

pub mod guard;
pub mod service;

pub use guard::MultisigGuard;
pub use service::HeaderIngestionService;
