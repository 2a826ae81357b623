use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tripsplit_domain::{
    BalanceCalculator, BalanceRow, Expense, ExpenseId, Group, GroupId, MemberId, Money,
    Settlement, SettlementPlanner, SplitMode, SplitRule,
};

/// Custom shares may miss the expense amount by at most this much.
pub const CUSTOM_TOTAL_TOLERANCE: Money = Money::CENT;

/// An amount paid in another currency, converted at a user-entered rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignAmount {
    pub currency: String,
    pub amount: Money,
    /// Home-currency units per foreign unit.
    pub rate: Decimal,
}

/// The amount as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnteredAmount {
    Home(Money),
    Foreign(ForeignAmount),
}

impl EnteredAmount {
    fn entered(&self) -> Money {
        match self {
            Self::Home(amount) => *amount,
            Self::Foreign(foreign) => foreign.amount,
        }
    }

    fn to_home(&self, value: Money) -> Result<Money, ValidationError> {
        match self {
            Self::Home(_) => Ok(value),
            Self::Foreign(foreign) => value
                .convert(foreign.rate)
                .ok_or(ValidationError::ConversionOverflow),
        }
    }
}

/// Unvalidated expense input.
///
/// Custom shares are expressed in the same currency as `amount`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: EnteredAmount,
    pub paid_by: MemberId,
    pub split_between: Vec<MemberId>,
    pub mode: SplitMode,
    pub split_amounts: Vec<(MemberId, Money)>,
}

impl ExpenseDraft {
    pub fn equal(
        title: impl Into<String>,
        amount: Money,
        paid_by: MemberId,
        split_between: Vec<MemberId>,
    ) -> Self {
        Self {
            title: title.into(),
            amount: EnteredAmount::Home(amount),
            paid_by,
            split_between,
            mode: SplitMode::Equal,
            split_amounts: Vec::new(),
        }
    }

    pub fn custom(
        title: impl Into<String>,
        amount: Money,
        paid_by: MemberId,
        split_amounts: Vec<(MemberId, Money)>,
    ) -> Self {
        Self {
            title: title.into(),
            amount: EnteredAmount::Home(amount),
            paid_by,
            split_between: split_amounts.iter().map(|(id, _)| id.clone()).collect(),
            mode: SplitMode::Custom,
            split_amounts,
        }
    }

    pub fn in_foreign_currency(mut self, currency: impl Into<String>, rate: Decimal) -> Self {
        self.amount = EnteredAmount::Foreign(ForeignAmount {
            currency: currency.into(),
            amount: self.amount.entered(),
            rate,
        });
        self
    }

    /// Validates the draft against `group` and converts it to a home-currency expense.
    pub fn build(
        &self,
        group: &Group,
        id: ExpenseId,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<Expense, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let entered = self.amount.entered();
        if !entered.is_positive() {
            return Err(ValidationError::NonPositiveAmount(entered));
        }
        if let EnteredAmount::Foreign(foreign) = &self.amount {
            if foreign.rate <= Decimal::ZERO {
                return Err(ValidationError::NonPositiveRate(foreign.rate));
            }
        }

        ensure_member(group, &self.paid_by)?;

        let amount = self.amount.to_home(entered)?;
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount(amount));
        }

        let (split_between, split) = match self.mode {
            SplitMode::Equal => (self.equal_members(group)?, SplitRule::Equal),
            SplitMode::Custom => {
                let shares = self.custom_shares(group, entered)?;
                let shares = self.convert_shares(shares, amount)?;
                let split_between = if self.split_between.is_empty() {
                    shares.iter().map(|(id, _)| id.clone()).collect()
                } else {
                    self.split_between.clone()
                };
                (split_between, SplitRule::custom(shares))
            }
        };

        Ok(Expense {
            id,
            title: title.to_owned(),
            amount,
            paid_by: Some(self.paid_by.clone()),
            split_between,
            split,
            created_at,
        })
    }

    fn equal_members(&self, group: &Group) -> Result<Vec<MemberId>, ValidationError> {
        let mut members: Vec<MemberId> = Vec::with_capacity(self.split_between.len());
        for id in &self.split_between {
            ensure_member(group, id)?;
            if !members.contains(id) {
                members.push(id.clone());
            }
        }
        if members.is_empty() {
            return Err(ValidationError::EmptySplit);
        }
        Ok(members)
    }

    /// Positive shares in entry currency, checked against the entered total.
    fn custom_shares(
        &self,
        group: &Group,
        entered: Money,
    ) -> Result<Vec<(MemberId, Money)>, ValidationError> {
        let mut shares = Vec::with_capacity(self.split_amounts.len());
        for (idx, (member, amount)) in self.split_amounts.iter().enumerate() {
            ensure_member(group, member)?;
            if self.split_amounts[..idx].iter().any(|(seen, _)| seen == member) {
                return Err(ValidationError::DuplicateShare(member.clone()));
            }
            if amount.is_negative() {
                return Err(ValidationError::NegativeShare {
                    member: member.clone(),
                    amount: *amount,
                });
            }
            if amount.is_positive() {
                shares.push((member.clone(), *amount));
            }
        }
        if shares.is_empty() {
            return Err(ValidationError::EmptyCustomSplit);
        }

        let total: Money = shares.iter().map(|(_, amount)| *amount).sum();
        if !total.approx_eq(entered, CUSTOM_TOTAL_TOLERANCE) {
            return Err(ValidationError::CustomTotalMismatch {
                total,
                amount: entered,
            });
        }
        Ok(shares)
    }

    /// Spreads the home amount over the shares in proportion, rounding the
    /// running total so converted shares add up exactly and never go negative.
    fn convert_shares(
        &self,
        shares: Vec<(MemberId, Money)>,
        home_total: Money,
    ) -> Result<Vec<(MemberId, Money)>, ValidationError> {
        if matches!(self.amount, EnteredAmount::Home(_)) {
            return Ok(shares);
        }

        let entered_total: Money = shares.iter().map(|(_, amount)| *amount).sum();
        let mut running = Money::ZERO;
        let mut allocated = Money::ZERO;
        let mut converted = Vec::with_capacity(shares.len());
        for (member, amount) in shares {
            running = running
                .checked_add(amount)
                .ok_or(ValidationError::ConversionOverflow)?;
            let cumulative = home_total
                .as_decimal()
                .checked_mul(running.as_decimal())
                .and_then(|value| value.checked_div(entered_total.as_decimal()))
                .map(|value| Money::from_decimal(value).round_cents())
                .ok_or(ValidationError::ConversionOverflow)?;
            converted.push((member, cumulative - allocated));
            allocated = cumulative;
        }
        Ok(converted)
    }
}

fn ensure_member(group: &Group, id: &MemberId) -> Result<(), ValidationError> {
    if group.has_member(id) {
        Ok(())
    } else {
        Err(ValidationError::UnknownMember(id.clone()))
    }
}

/// Engine output for one group snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub group_name: String,
    pub currency: Option<String>,
    pub balances: Vec<BalanceRow>,
    pub settlements: Vec<Settlement>,
    pub total_spent: Money,
}

impl GroupSummary {
    pub fn from_group(group: &Group, planner: &SettlementPlanner) -> Self {
        let balances = BalanceCalculator.balances(group);
        let settlements = planner.plan(&balances);

        Self {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            currency: group.currency.clone(),
            balances,
            settlements,
            total_spent: group.total_spent(),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }
}
