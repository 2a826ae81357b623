//! JSON wire format for group documents.
//!
//! Keys are camelCase. Amounts are written as decimal strings and read from
//! either strings or JSON numbers.

use chrono::{DateTime, Utc};
use fxhash::FxHashSet;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tripsplit_domain::{
    Expense, ExpenseId, Group, GroupId, Member, MemberId, Money, SplitRule,
};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed group document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("member id `{0}` appears more than once")]
    DuplicateMemberId(String),
    #[error("expense id `{0}` appears more than once")]
    DuplicateExpenseId(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDocument {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberDocument>,
    #[serde(default)]
    pub expenses: Vec<ExpenseDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDocument {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitModeDocument {
    #[default]
    Equal,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDocument {
    pub id: String,
    pub title: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub split_between: Vec<String>,
    #[serde(default)]
    pub split_mode: SplitModeDocument,
    /// Only read in custom mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_amounts: Option<IndexMap<String, Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl GroupDocument {
    pub fn from_json(json: &str) -> Result<Group, DocumentError> {
        let document: Self = serde_json::from_str(json)?;
        document.into_group()
    }

    pub fn to_json(group: &Group) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&Self::from(group))?)
    }

    pub fn into_group(self) -> Result<Group, DocumentError> {
        let mut seen = FxHashSet::default();
        if let Some(dup) = self.members.iter().find(|member| !seen.insert(member.id.as_str())) {
            return Err(DocumentError::DuplicateMemberId(dup.id.clone()));
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = self
            .expenses
            .iter()
            .find(|expense| !seen.insert(expense.id.as_str()))
        {
            return Err(DocumentError::DuplicateExpenseId(dup.id.clone()));
        }

        let mut group = Group::new(GroupId::new(self.id), self.name);
        group.currency = self.currency;
        group.members = self
            .members
            .into_iter()
            .map(|member| Member::new(member.id, member.name))
            .collect();
        group.expenses = self.expenses.into_iter().map(Expense::from).collect();
        Ok(group)
    }
}

impl From<&Group> for GroupDocument {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.as_str().to_owned(),
            name: group.name.clone(),
            currency: group.currency.clone(),
            members: group
                .members
                .iter()
                .map(|member| MemberDocument {
                    id: member.id.as_str().to_owned(),
                    name: member.name.clone(),
                })
                .collect(),
            expenses: group.expenses.iter().map(ExpenseDocument::from).collect(),
        }
    }
}

impl From<&Expense> for ExpenseDocument {
    fn from(expense: &Expense) -> Self {
        let (split_mode, split_amounts) = match &expense.split {
            SplitRule::Equal => (SplitModeDocument::Equal, None),
            SplitRule::Custom(amounts) => (
                SplitModeDocument::Custom,
                Some(
                    amounts
                        .iter()
                        .map(|(member, amount)| (member.as_str().to_owned(), amount.as_decimal()))
                        .collect(),
                ),
            ),
        };

        Self {
            id: expense.id.as_str().to_owned(),
            title: expense.title.clone(),
            amount: expense.amount.as_decimal(),
            paid_by: expense.paid_by.as_ref().map(|id| id.as_str().to_owned()),
            split_between: expense
                .split_between
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
            split_mode,
            split_amounts,
            created_at: expense.created_at,
        }
    }
}

impl From<ExpenseDocument> for Expense {
    fn from(document: ExpenseDocument) -> Self {
        let split = match (document.split_mode, document.split_amounts) {
            (SplitModeDocument::Custom, Some(amounts)) => SplitRule::custom(
                amounts
                    .into_iter()
                    .map(|(member, amount)| (MemberId::new(member), Money::from_decimal(amount))),
            ),
            _ => SplitRule::Equal,
        };

        Self {
            id: ExpenseId::new(document.id),
            title: document.title,
            amount: Money::from_decimal(document.amount),
            paid_by: document.paid_by.map(MemberId::new),
            split_between: document.split_between.into_iter().map(MemberId::new).collect(),
            split,
            created_at: document.created_at,
        }
    }
}
