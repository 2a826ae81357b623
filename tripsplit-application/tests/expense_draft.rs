use proptest::prelude::*;
use rust_decimal::Decimal;
use tripsplit_application::{ExpenseDraft, GroupSummary, ValidationError};
use tripsplit_domain::{
    ExpenseId, Group, GroupId, Member, MemberId, Money, SettlementPlanner, SplitRule,
};

fn group(member_count: usize) -> Group {
    let mut group = Group::new(GroupId::new("g"), "trip");
    group.members = (0..member_count)
        .map(|idx| Member::new(format!("m{idx}"), format!("Member {idx}")))
        .collect();
    group
}

fn member_id(idx: usize) -> MemberId {
    MemberId::new(format!("m{idx}"))
}

fn rate() -> impl Strategy<Value = Decimal> {
    (1i64..=5_000_000).prop_map(|units| Decimal::new(units, 4))
}

proptest! {
    #[test]
    fn foreign_custom_shares_add_up_to_converted_amount(
        share_cents in prop::collection::vec(1i64..=200_000, 1..=6),
        rate in rate(),
    ) {
        let group = group(share_cents.len());
        let shares: Vec<(MemberId, Money)> = share_cents
            .iter()
            .enumerate()
            .map(|(idx, cents)| (member_id(idx), Money::new(*cents, 2)))
            .collect();
        let total = Money::new(share_cents.iter().sum(), 2);
        let draft = ExpenseDraft::custom("Ferry", total, member_id(0), shares)
            .in_foreign_currency("USD", rate);

        match draft.build(&group, ExpenseId::new("e"), None) {
            Ok(expense) => {
                let SplitRule::Custom(split) = &expense.split else {
                    panic!("expected a custom split");
                };
                prop_assert_eq!(split.total(), expense.amount);
                prop_assert_eq!(expense.amount, total.convert(rate).expect("in range"));
            }
            // Tiny amounts at tiny rates round down to nothing.
            Err(ValidationError::NonPositiveAmount(amount)) => prop_assert!(amount.is_zero()),
            Err(other) => prop_assert!(false, "unexpected rejection: {other}"),
        }
    }

    #[test]
    fn accepted_expenses_keep_the_group_balanced(
        drafts in prop::collection::vec((1i64..=100_000, 0usize..4, prop::collection::vec(0usize..4, 1..=4)), 1..=15),
    ) {
        let mut group = group(4);
        for (idx, (cents, payer, split)) in drafts.into_iter().enumerate() {
            let draft = ExpenseDraft::equal(
                format!("expense {idx}"),
                Money::new(cents, 2),
                member_id(payer),
                split.into_iter().map(member_id).collect(),
            );
            let expense = draft
                .build(&group, ExpenseId::new(format!("e{idx}")), None)
                .expect("all members are known");
            group.expenses.insert(0, expense);
        }

        let summary = GroupSummary::from_group(&group, &SettlementPlanner::default());
        let total: Money = summary.balances.iter().map(|row| row.balance).sum();
        prop_assert!(total.approx_eq(Money::ZERO, Money::new(1, 6)));
        prop_assert!(summary.settlements.len() <= 3);
    }
}
