// Service exports
pub mod enrollment;
pub mod matching;
pub mod postgres;
pub mod store;

pub use enrollment::EnrollmentManager;
pub use matching::MatchingService;
pub use postgres::PostgresStore;
pub use store::{CapacityOutcome, EnrollOutcome, Store, WithdrawOutcome};
