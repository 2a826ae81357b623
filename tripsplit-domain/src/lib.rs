#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    BalanceRow, Expense, ExpenseId, FxIndexMap, Group, GroupId, Member, MemberBalances, MemberId,
    Money, Settlement, SplitAmounts, SplitMode, SplitRule,
};
pub use services::{
    BalanceCalculator, MatchOrder, ParseMatchOrderError, SETTLEMENT_EPSILON, SettlementPlanner,
};
