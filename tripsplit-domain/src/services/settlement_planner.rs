use crate::model::{BalanceRow, Member, Money, Settlement};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Remaining amounts at or below this are treated as settled.
pub const SETTLEMENT_EPSILON: Money = Money::CENT;

/// Order in which creditors and debtors are matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchOrder {
    /// Balances are matched in the order they arrive (usually member order).
    #[default]
    InputOrder,
    /// Largest amounts are matched first; ties keep arrival order.
    LargestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown match order `{0}` (expected `input` or `largest-first`)")]
pub struct ParseMatchOrderError(String);

impl FromStr for MatchOrder {
    type Err = ParseMatchOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" | "input-order" => Ok(Self::InputOrder),
            "largest-first" | "largest" => Ok(Self::LargestFirst),
            other => Err(ParseMatchOrderError(other.to_owned())),
        }
    }
}

impl fmt::Display for MatchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputOrder => f.write_str("input"),
            Self::LargestFirst => f.write_str("largest-first"),
        }
    }
}

struct Position<'a> {
    member: &'a Member,
    remaining: Money,
}

/// Greedy two-cursor settlement planning.
///
/// Produces at most `creditors + debtors - 1` transfers. The result is one
/// valid resolution, not a minimum-count one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementPlanner {
    order: MatchOrder,
}

impl SettlementPlanner {
    pub fn new(order: MatchOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> MatchOrder {
        self.order
    }

    pub fn plan(&self, balances: &[BalanceRow]) -> Vec<Settlement> {
        if balances
            .iter()
            .all(|row| row.balance.abs().round_cents() <= SETTLEMENT_EPSILON)
        {
            return Vec::new();
        }

        let (mut creditors, mut debtors) = partition(balances);

        if self.order == MatchOrder::LargestFirst {
            creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
            debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        }

        let mut settlements =
            Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let mut debtor_idx = 0;
        let mut creditor_idx = 0;

        while let (Some(debtor), Some(creditor)) =
            (debtors.get_mut(debtor_idx), creditors.get_mut(creditor_idx))
        {
            let payment = debtor.remaining.min(creditor.remaining);
            if payment.is_positive() {
                settlements.push(Settlement {
                    from: debtor.member.clone(),
                    to: creditor.member.clone(),
                    amount: payment,
                });
            }

            debtor.remaining = (debtor.remaining - payment).round_cents();
            creditor.remaining = (creditor.remaining - payment).round_cents();

            if debtor.remaining <= SETTLEMENT_EPSILON {
                debtor_idx += 1;
            }
            if creditor.remaining <= SETTLEMENT_EPSILON {
                creditor_idx += 1;
            }
        }

        let unmatched_debt: Money = debtors.iter().map(|position| position.remaining).sum();
        let unmatched_credit: Money = creditors.iter().map(|position| position.remaining).sum();
        if unmatched_debt > SETTLEMENT_EPSILON || unmatched_credit > SETTLEMENT_EPSILON {
            tracing::debug!(
                unmatched_debt = %unmatched_debt,
                unmatched_credit = %unmatched_credit,
                "Residual imbalance dropped after settlement planning"
            );
        }

        tracing::debug!(
            match_order = %self.order,
            creditor_count = creditors.len(),
            debtor_count = debtors.len(),
            settlement_count = settlements.len(),
            "Settlement plan built"
        );

        settlements
    }
}

/// Splits rows into (creditors, debtors) carrying cent-rounded magnitudes.
///
/// Rows that round to zero join neither side.
fn partition(balances: &[BalanceRow]) -> (Vec<Position<'_>>, Vec<Position<'_>>) {
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();

    for row in balances {
        let remaining = row.balance.abs().round_cents();
        if remaining.is_zero() {
            continue;
        }
        let position = Position {
            member: &row.member,
            remaining,
        };
        if row.balance.is_positive() {
            creditors.push(position);
        } else {
            debtors.push(position);
        }
    }

    (creditors, debtors)
}
