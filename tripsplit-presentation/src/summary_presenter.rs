use crate::{
    currency::CurrencyFormat,
    text_table::{Alignment, TextTableBuilder},
};
use std::{borrow::Cow, fmt::Write};
use tripsplit_application::GroupSummary;
use tripsplit_domain::{BalanceRow, Settlement};

pub const SETTLED_MESSAGE: &str = "All settled up.";

const MEMBER: &str = "Member";
const BALANCE: &str = "Balance";
const FROM: &str = "From";
const TO: &str = "To";
const AMOUNT: &str = "Amount";

pub struct SummaryPresenter;

impl SummaryPresenter {
    /// Heading, balance table, then either the transfer table or
    /// [`SETTLED_MESSAGE`].
    pub fn render(summary: &GroupSummary, format: &CurrencyFormat) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} ({}): {} spent",
            summary.group_name,
            summary.group_id,
            format.amount(summary.total_spent)
        );
        out.push('\n');
        out.push_str(&Self::build_balance_table(&summary.balances, format));
        out.push('\n');

        if summary.is_settled() {
            out.push_str(SETTLED_MESSAGE);
            out.push('\n');
        } else {
            out.push_str(&Self::build_transfer_table(&summary.settlements, format));
        }
        out
    }

    pub fn build_balance_table(rows: &[BalanceRow], format: &CurrencyFormat) -> String {
        let headers = [Cow::Borrowed(MEMBER), Cow::Borrowed(BALANCE)];
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(rows.iter().map(|row| {
                [
                    Cow::Borrowed(row.member.name.as_str()),
                    Cow::Owned(format.balance(row.balance)),
                ]
            }))
            .build()
    }

    pub fn build_transfer_table(settlements: &[Settlement], format: &CurrencyFormat) -> String {
        let headers = [Cow::Borrowed(FROM), Cow::Borrowed(TO), Cow::Borrowed(AMOUNT)];
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(settlements.iter().map(|settlement| {
                [
                    Cow::Borrowed(settlement.from.name.as_str()),
                    Cow::Borrowed(settlement.to.name.as_str()),
                    Cow::Owned(format.amount(settlement.amount)),
                ]
            }))
            .build()
    }
}
