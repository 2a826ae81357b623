use crate::{
    error::{LedgerError, ValidationError},
    model::{ExpenseDraft, GroupSummary},
    ports::{GroupStore, IdGenerator},
};
use chrono::Utc;
use tripsplit_domain::{ExpenseId, Group, GroupId, Member, MemberId, SettlementPlanner};

/// Group use cases over a document store.
///
/// Every mutation loads the current snapshot, applies one change, saves the
/// whole document and recomputes the summary from what was saved.
#[derive(Clone, Copy)]
pub struct TripLedger<'a> {
    store: &'a dyn GroupStore,
    ids: &'a dyn IdGenerator,
    planner: SettlementPlanner,
}

impl<'a> TripLedger<'a> {
    pub fn new(
        store: &'a dyn GroupStore,
        ids: &'a dyn IdGenerator,
        planner: SettlementPlanner,
    ) -> Self {
        Self {
            store,
            ids,
            planner,
        }
    }

    pub fn planner(&self) -> SettlementPlanner {
        self.planner
    }

    pub fn create_group(
        &self,
        name: &str,
        currency: Option<&str>,
    ) -> Result<GroupSummary, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyGroupName.into());
        }

        let mut group = Group::new(GroupId::new(self.ids.next_id()), name);
        group.currency = currency
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_uppercase);
        self.store.save(&group)?;

        tracing::info!(group_id = %group.id, name = %group.name, "created group");
        Ok(self.summarize(&group))
    }

    pub fn add_member(
        &self,
        group_id: &GroupId,
        name: &str,
    ) -> Result<(Member, GroupSummary), LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyMemberName.into());
        }

        let mut group = self.store.load(group_id)?;
        if group.member_by_name(name).is_some() {
            return Err(LedgerError::DuplicateMemberName(name.to_owned()));
        }

        let member = Member::new(MemberId::new(self.ids.next_id()), name);
        group.members.push(member.clone());
        self.store.save(&group)?;

        tracing::info!(
            group_id = %group.id,
            member_id = %member.id,
            member_count = group.members.len(),
            "added member"
        );
        Ok((member, self.summarize(&group)))
    }

    pub fn add_expense(
        &self,
        group_id: &GroupId,
        draft: &ExpenseDraft,
    ) -> Result<(ExpenseId, GroupSummary), LedgerError> {
        let mut group = self.store.load(group_id)?;
        let expense = draft.build(&group, ExpenseId::new(self.ids.next_id()), Some(Utc::now()))?;
        let expense_id = expense.id.clone();

        tracing::info!(
            group_id = %group.id,
            expense_id = %expense_id,
            amount = %expense.amount,
            mode = ?expense.split.mode(),
            "added expense"
        );
        group.expenses.insert(0, expense);
        self.store.save(&group)?;

        Ok((expense_id, self.summarize(&group)))
    }

    /// Replaces an expense in place, keeping its id, position and creation time.
    pub fn edit_expense(
        &self,
        group_id: &GroupId,
        expense_id: &ExpenseId,
        draft: &ExpenseDraft,
    ) -> Result<GroupSummary, LedgerError> {
        let mut group = self.store.load(group_id)?;
        let Some(index) = group
            .expenses
            .iter()
            .position(|expense| &expense.id == expense_id)
        else {
            return Err(LedgerError::UnknownExpense(expense_id.clone()));
        };

        let created_at = group.expenses[index].created_at;
        let expense = draft.build(&group, expense_id.clone(), created_at)?;
        tracing::info!(
            group_id = %group.id,
            expense_id = %expense_id,
            amount = %expense.amount,
            "edited expense"
        );
        group.expenses[index] = expense;
        self.store.save(&group)?;

        Ok(self.summarize(&group))
    }

    pub fn delete_expense(
        &self,
        group_id: &GroupId,
        expense_id: &ExpenseId,
    ) -> Result<GroupSummary, LedgerError> {
        let mut group = self.store.load(group_id)?;
        let before = group.expenses.len();
        group.expenses.retain(|expense| &expense.id != expense_id);
        if group.expenses.len() == before {
            return Err(LedgerError::UnknownExpense(expense_id.clone()));
        }
        self.store.save(&group)?;

        tracing::info!(group_id = %group.id, expense_id = %expense_id, "deleted expense");
        Ok(self.summarize(&group))
    }

    pub fn summary(&self, group_id: &GroupId) -> Result<GroupSummary, LedgerError> {
        let group = self.store.load(group_id)?;
        Ok(self.summarize(&group))
    }

    pub fn group(&self, group_id: &GroupId) -> Result<Group, LedgerError> {
        Ok(self.store.load(group_id)?)
    }

    pub fn groups(&self) -> Result<Vec<GroupId>, LedgerError> {
        Ok(self.store.list()?)
    }

    pub fn summarize(&self, group: &Group) -> GroupSummary {
        GroupSummary::from_group(group, &self.planner)
    }
}
