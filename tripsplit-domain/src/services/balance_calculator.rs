use crate::model::{
    BalanceRow, Expense, FxIndexMap, Group, MemberBalances, MemberId, Money, SplitRule,
};

/// Derives each member's net position from a group's expenses.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Net balance of every id touched by the group, members first.
    ///
    /// Ids referenced by expenses but missing from `members` are tracked
    /// with their own zero-initialised balance.
    pub fn ledger(&self, group: &Group) -> MemberBalances {
        let mut balances: MemberBalances = group
            .members
            .iter()
            .map(|member| (member.id.clone(), Money::ZERO))
            .collect();

        let mut skipped = 0usize;
        for expense in &group.expenses {
            if !apply_expense(&mut balances, expense) {
                skipped += 1;
            }
        }

        tracing::debug!(
            group_id = %group.id,
            member_count = group.members.len(),
            expense_count = group.expenses.len(),
            skipped_expenses = skipped,
            tracked_ids = balances.len(),
            "Balances calculated"
        );

        balances
    }

    /// One row per group member, in member order.
    pub fn balances(&self, group: &Group) -> Vec<BalanceRow> {
        let ledger = self.ledger(group);
        group
            .members
            .iter()
            .map(|member| BalanceRow {
                member: member.clone(),
                balance: ledger.get(&member.id).copied().unwrap_or(Money::ZERO),
            })
            .collect()
    }
}

/// Credits the payer and debits the split targets of one expense.
///
/// Returns `false` when the expense was skipped, either for lack of a payer
/// or because a balance would leave the representable range. A skipped
/// expense leaves `balances` untouched.
pub fn apply_expense(balances: &mut MemberBalances, expense: &Expense) -> bool {
    let Some(payer) = expense.payer() else {
        return false;
    };

    let mut postings: Vec<(&MemberId, Money)> = vec![(payer, expense.amount)];
    match &expense.split {
        SplitRule::Custom(amounts) => {
            postings.extend(amounts.iter().map(|(member, amount)| (member, -amount)));
        }
        SplitRule::Equal => {
            let members = expense.equal_split_members();
            // Never empty here: the payer is the fallback.
            let Some(share) = expense.amount.share(members.len()) else {
                return false;
            };
            postings.extend(members.into_iter().map(|member| (member, -share)));
        }
    }

    let mut staged: FxIndexMap<&MemberId, Money> = FxIndexMap::default();
    for (member, delta) in postings {
        let current = staged
            .get(member)
            .or_else(|| balances.get(member))
            .copied()
            .unwrap_or(Money::ZERO);
        let Some(next) = current.checked_add(delta) else {
            tracing::warn!(
                expense_id = %expense.id,
                member_id = %member,
                "Expense skipped: balance out of range"
            );
            return false;
        };
        staged.insert(member, next);
    }

    for (member, balance) in staged {
        balances.insert(member.clone(), balance);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseId, GroupId, Member, MemberId};
    use rstest::{fixture, rstest};

    fn money(value: &str) -> Money {
        value.parse().expect("valid decimal")
    }

    fn expense(
        id: &str,
        amount: &str,
        paid_by: Option<&str>,
        split_between: &[&str],
        split: SplitRule,
    ) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            title: id.to_owned(),
            amount: money(amount),
            paid_by: paid_by.map(MemberId::from),
            split_between: split_between.iter().copied().map(MemberId::from).collect(),
            split,
            created_at: None,
        }
    }

    fn custom(entries: &[(&str, &str)]) -> SplitRule {
        SplitRule::custom(
            entries
                .iter()
                .map(|(id, amount)| (MemberId::from(*id), money(amount))),
        )
    }

    fn group(expenses: Vec<Expense>) -> Group {
        Group {
            id: GroupId::new("g"),
            name: "trip".to_owned(),
            currency: None,
            members: vec![
                Member::new("a", "Ana"),
                Member::new("b", "Bruno"),
                Member::new("c", "Carla"),
            ],
            expenses,
        }
    }

    #[fixture]
    fn calculator() -> BalanceCalculator {
        BalanceCalculator
    }

    fn assert_rows(rows: &[BalanceRow], expected: &[(&str, &str)]) {
        let actual: Vec<(&str, Money)> = rows
            .iter()
            .map(|row| (row.member.id.as_str(), row.balance))
            .collect();
        let expected: Vec<(&str, Money)> = expected
            .iter()
            .map(|(id, amount)| (*id, money(amount)))
            .collect();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::no_expenses(vec![], &[("a", "0"), ("b", "0"), ("c", "0")])]
    #[case::equal_three_ways(
        vec![expense("e1", "90", Some("a"), &["a", "b", "c"], SplitRule::Equal)],
        &[("a", "60"), ("b", "-30"), ("c", "-30")]
    )]
    #[case::equal_then_custom(
        vec![
            expense("e2", "30", Some("b"), &["c"], custom(&[("c", "30")])),
            expense("e1", "90", Some("a"), &["a", "b", "c"], SplitRule::Equal),
        ],
        &[("a", "60"), ("b", "0"), ("c", "-60")]
    )]
    #[case::empty_split_falls_back_to_payer(
        vec![expense("e1", "40", Some("b"), &[], SplitRule::Equal)],
        &[("a", "0"), ("b", "0"), ("c", "0")]
    )]
    #[case::missing_payer_is_skipped(
        vec![expense("e1", "40", None, &["a", "b"], SplitRule::Equal)],
        &[("a", "0"), ("b", "0"), ("c", "0")]
    )]
    #[case::empty_payer_is_skipped(
        vec![expense("e1", "40", Some(""), &["a", "b"], SplitRule::Equal)],
        &[("a", "0"), ("b", "0"), ("c", "0")]
    )]
    #[case::custom_omits_members(
        vec![expense("e1", "50", Some("a"), &["a", "b", "c"], custom(&[("b", "20"), ("a", "30")]))],
        &[("a", "20"), ("b", "-20"), ("c", "0")]
    )]
    #[case::empty_custom_splits_equally(
        vec![expense("e1", "30", Some("c"), &["a", "c"], custom(&[("a", "0")]))],
        &[("a", "-15"), ("b", "0"), ("c", "15")]
    )]
    fn balance_calculator_cases(
        calculator: BalanceCalculator,
        #[case] expenses: Vec<Expense>,
        #[case] expected: &[(&str, &str)],
    ) {
        let rows = calculator.balances(&group(expenses));
        assert_rows(&rows, expected);
    }

    #[rstest]
    fn unknown_ids_are_tracked_but_not_reported(calculator: BalanceCalculator) {
        let group = group(vec![
            expense("e1", "30", Some("ghost"), &["a", "b"], SplitRule::Equal),
            expense("e2", "12", Some("a"), &["a", "stale"], SplitRule::Equal),
        ]);

        let ledger = calculator.ledger(&group);
        assert_eq!(ledger.get(&MemberId::from("ghost")), Some(&money("30")));
        assert_eq!(ledger.get(&MemberId::from("stale")), Some(&money("-6")));
        assert_eq!(ledger.values().copied().sum::<Money>(), Money::ZERO);

        let rows = calculator.balances(&group);
        assert_rows(&rows, &[("a", "-9"), ("b", "-15"), ("c", "0")]);
    }

    #[rstest]
    fn ledger_keeps_members_first_then_first_seen_ids(calculator: BalanceCalculator) {
        let group = group(vec![expense(
            "e1",
            "10",
            Some("z"),
            &["y", "a"],
            SplitRule::Equal,
        )]);
        let ledger = calculator.ledger(&group);
        let order: Vec<&str> = ledger.keys().map(MemberId::as_str).collect();
        assert_eq!(order, vec!["a", "b", "c", "z", "y"]);
    }

    #[rstest]
    fn empty_member_list_yields_no_rows(calculator: BalanceCalculator) {
        let mut group = group(vec![expense("e1", "10", Some("a"), &["a"], SplitRule::Equal)]);
        group.members.clear();
        assert!(calculator.balances(&group).is_empty());
    }

    #[rstest]
    fn uneven_equal_split_stays_zero_sum(calculator: BalanceCalculator) {
        let group = group(vec![expense(
            "e1",
            "100",
            Some("a"),
            &["a", "b", "c"],
            SplitRule::Equal,
        )]);
        let total: Money = calculator.ledger(&group).values().sum();
        assert!(total.approx_eq(Money::ZERO, money("0.000001")));
    }

    #[rstest]
    fn out_of_range_expense_is_skipped_whole(calculator: BalanceCalculator) {
        let huge = "79228162514264337593543950335";
        let first = expense("e1", huge, Some("a"), &["a", "b"], SplitRule::Equal);
        let second = expense("e2", huge, Some("a"), &["b"], SplitRule::Equal);

        let expected = calculator.ledger(&group(vec![first.clone()]));
        let ledger = calculator.ledger(&group(vec![first, second.clone()]));
        assert_eq!(ledger, expected);

        let mut balances = expected.clone();
        assert!(!apply_expense(&mut balances, &second));
        assert_eq!(balances, expected);
    }
}
