pub mod balance_calculator;
pub mod settlement_planner;

pub use balance_calculator::{BalanceCalculator, apply_expense};
pub use settlement_planner::{
    MatchOrder, ParseMatchOrderError, SETTLEMENT_EPSILON, SettlementPlanner,
};
