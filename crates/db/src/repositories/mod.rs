//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. The ledger repository is the
//! only writer of balance rows and transactions; every balance change goes
//! through one of its lock-guarded operations.

pub mod generation_repo;
pub mod ledger_repo;
pub mod package_repo;

pub use generation_repo::GenerationRepo;
pub use ledger_repo::LedgerRepo;
pub use package_repo::CreditPackageRepo;
