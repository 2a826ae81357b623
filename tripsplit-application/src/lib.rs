#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger;
pub mod model;
pub mod ports;

pub use error::{LedgerError, StoreError, ValidationError};
pub use ledger::TripLedger;
pub use model::{
    CUSTOM_TOTAL_TOLERANCE, EnteredAmount, ExpenseDraft, ForeignAmount, GroupSummary,
};
pub use ports::{GroupStore, IdGenerator};
