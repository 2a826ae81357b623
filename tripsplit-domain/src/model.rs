use chrono::{DateTime, Utc};
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Net balance per member id, in first-seen order.
pub type MemberBalances = FxIndexMap<MemberId, Money>;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Home-currency amount.
///
/// Backed by [`Decimal`], so sums and differences are exact. Division (equal
/// splits) is carried at full decimal precision and only rounded to cents
/// where settlement planning asks for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);
    /// One minor unit (0.01).
    pub const CENT: Self = Self(Decimal::from_parts(1, 0, 0, false, 2));

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Rounds to two decimal places, midpoints away from zero.
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// One equal share of `self` among `parts` participants.
    ///
    /// Returns `None` when `parts` is zero.
    pub fn share(self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        self.0.checked_div(Decimal::from(parts)).map(Self)
    }

    /// Converts a foreign amount at a user-entered rate, rounded to cents.
    pub fn convert(self, rate: Decimal) -> Option<Self> {
        self.0.checked_mul(rate).map(|value| Self(value).round_cents())
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// True when `self` and `other` differ by at most `tolerance`.
    pub fn approx_eq(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() <= tolerance
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Saturates at the representable range instead of overflowing.
impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |total, value| Self(total.0.saturating_add(value.0)))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Explicit per-member amounts of a custom split.
///
/// Never empty and holds only positive amounts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitAmounts(FxIndexMap<MemberId, Money>);

impl SplitAmounts {
    /// Keeps the positive entries, or returns `None` if none are left.
    pub fn new<I>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = (MemberId, Money)>,
    {
        let amounts: FxIndexMap<MemberId, Money> = entries
            .into_iter()
            .filter(|(_, amount)| amount.is_positive())
            .collect();
        if amounts.is_empty() {
            None
        } else {
            Some(Self(amounts))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Money)> + '_ {
        self.0.iter().map(|(id, amount)| (id, *amount))
    }

    pub fn get(&self, member: &MemberId) -> Option<Money> {
        self.0.get(member).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> Money {
        self.0.values().sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitMode {
    Equal,
    Custom,
}

/// How an expense is divided among participants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SplitRule {
    /// Equal shares across `split_between`, or the payer alone when that is empty.
    #[default]
    Equal,
    Custom(SplitAmounts),
}

impl SplitRule {
    /// Builds a custom rule; collapses to [`SplitRule::Equal`] when no
    /// positive amount is given.
    pub fn custom<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (MemberId, Money)>,
    {
        SplitAmounts::new(entries).map_or(Self::Equal, Self::Custom)
    }

    pub fn mode(&self) -> SplitMode {
        match self {
            Self::Equal => SplitMode::Equal,
            Self::Custom(_) => SplitMode::Custom,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub title: String,
    pub amount: Money,
    pub paid_by: Option<MemberId>,
    pub split_between: Vec<MemberId>,
    pub split: SplitRule,
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// The paying member, treating an empty id as missing.
    pub fn payer(&self) -> Option<&MemberId> {
        self.paid_by.as_ref().filter(|id| !id.is_empty())
    }

    /// Members sharing an equal split: `split_between` without repeats, or
    /// the payer alone when nobody is listed.
    pub fn equal_split_members(&self) -> Vec<&MemberId> {
        let mut seen: FxHashSet<&MemberId> = FxHashSet::default();
        let members: Vec<&MemberId> = self
            .split_between
            .iter()
            .filter(|id| seen.insert(*id))
            .collect();
        if members.is_empty() {
            self.payer().into_iter().collect()
        } else {
            members
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Display code of the home currency, if any.
    pub currency: Option<String>,
    pub members: Vec<Member>,
    /// Newest first.
    pub expenses: Vec<Expense>,
}

impl Group {
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            currency: None,
            members: Vec::new(),
            expenses: Vec::new(),
        }
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    pub fn has_member(&self, id: &MemberId) -> bool {
        self.member(id).is_some()
    }

    /// Case-insensitive lookup by display name, ignoring surrounding whitespace.
    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        let name = name.trim();
        self.members
            .iter()
            .find(|member| member.name.trim().eq_ignore_ascii_case(name))
    }

    /// Resolves a member by id first, then by name.
    pub fn resolve_member(&self, key: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|member| member.id.as_str() == key)
            .or_else(|| self.member_by_name(key))
    }

    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| &expense.id == id)
    }

    pub fn total_spent(&self) -> Money {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceRow {
    pub member: Member,
    pub balance: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub from: Member,
    pub to: Member,
    pub amount: Money,
}
