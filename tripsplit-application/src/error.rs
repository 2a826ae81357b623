use rust_decimal::Decimal;
use std::io;
use thiserror::Error;
use tripsplit_domain::{ExpenseId, GroupId, MemberId, Money};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("group `{0}` not found")]
    NotFound(GroupId),
    #[error("group document `{id}` is corrupt: {detail}")]
    Corrupt { id: GroupId, detail: String },
    #[error("group storage I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Input rejected before it reaches the balance engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expense title must not be empty")]
    EmptyTitle,
    #[error("expense amount must be positive (got {0})")]
    NonPositiveAmount(Money),
    #[error("exchange rate must be positive (got {0})")]
    NonPositiveRate(Decimal),
    #[error("converted amount is out of range")]
    ConversionOverflow,
    #[error("member `{0}` is not part of the group")]
    UnknownMember(MemberId),
    #[error("expense must be split between at least one member")]
    EmptySplit,
    #[error("custom share of `{member}` must not be negative (got {amount})")]
    NegativeShare { member: MemberId, amount: Money },
    #[error("member `{0}` has more than one custom share")]
    DuplicateShare(MemberId),
    #[error("custom split needs at least one positive share")]
    EmptyCustomSplit,
    #[error("custom shares total {total} but the expense is {amount}")]
    CustomTotalMismatch { total: Money, amount: Money },
    #[error("member name must not be empty")]
    EmptyMemberName,
    #[error("group name must not be empty")]
    EmptyGroupName,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("expense `{0}` not found")]
    UnknownExpense(ExpenseId),
    #[error("a member named `{0}` already exists")]
    DuplicateMemberName(String),
}
