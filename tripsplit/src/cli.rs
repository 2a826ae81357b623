use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tripsplit_domain::{MatchOrder, Money};

#[derive(Parser, Debug)]
#[command(name = "tripsplit")]
#[command(about = "Track shared trip expenses and work out who pays whom")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding one JSON document per group.
    #[arg(long, global = true, env = "TRIPSPLIT_DATA_DIR", default_value = "./trips")]
    pub data_dir: PathBuf,

    /// `input` or `largest-first`.
    #[arg(long, global = true, env = "TRIPSPLIT_MATCH_ORDER", default_value_t = MatchOrder::InputOrder)]
    pub match_order: MatchOrder,

    /// Prefix for printed amounts; defaults to the group's currency code.
    #[arg(long, global = true, env = "TRIPSPLIT_CURRENCY_SYMBOL")]
    pub currency_symbol: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty group.
    CreateGroup {
        #[arg(long)]
        name: String,
        /// Home currency code, used for display only.
        #[arg(long)]
        currency: Option<String>,
    },
    /// List the groups in the data directory.
    ListGroups,
    AddMember {
        #[arg(long)]
        group: String,
        #[arg(long)]
        name: String,
    },
    AddExpense {
        #[arg(long)]
        group: String,
        #[command(flatten)]
        expense: ExpenseArgs,
    },
    /// Replace an existing expense, keeping its id and position.
    EditExpense {
        #[arg(long)]
        group: String,
        #[arg(long)]
        expense: String,
        #[command(flatten)]
        details: ExpenseArgs,
    },
    DeleteExpense {
        #[arg(long)]
        group: String,
        #[arg(long)]
        expense: String,
    },
    /// Print balances and suggested transfers.
    Summary {
        #[arg(long)]
        group: String,
    },
    /// Summarize a group document file outside the data directory.
    Show { file: PathBuf },
}

/// Members are named by id or by display name.
#[derive(Args, Debug, Clone)]
pub struct ExpenseArgs {
    #[arg(long)]
    pub title: String,

    /// Amount in the home currency, or in `--foreign-currency` when given.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Money,

    #[arg(long)]
    pub paid_by: String,

    /// Members sharing equally; every member when omitted.
    #[arg(long, num_args = 1.., conflicts_with = "custom")]
    pub split: Vec<String>,

    /// Explicit shares as `member=amount`.
    #[arg(long, num_args = 1.., value_parser = parse_share)]
    pub custom: Vec<(String, Money)>,

    #[arg(long, requires = "rate")]
    pub foreign_currency: Option<String>,

    /// Home-currency units per foreign unit.
    #[arg(long, requires = "foreign_currency", allow_hyphen_values = true)]
    pub rate: Option<Decimal>,
}

fn parse_share(raw: &str) -> Result<(String, Money), String> {
    let Some((member, amount)) = raw.rsplit_once('=') else {
        return Err(format!("expected `member=amount`, got `{raw}`"));
    };
    let member = member.trim();
    if member.is_empty() {
        return Err(format!("missing member in `{raw}`"));
    }
    let amount = amount
        .parse::<Money>()
        .map_err(|err| format!("invalid amount in `{raw}`: {err}"))?;
    Ok((member.to_owned(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("tripsplit").chain(args.iter().copied()))
    }

    #[test]
    fn add_expense_with_custom_shares() {
        let cli = parse(&[
            "add-expense",
            "--group",
            "g1",
            "--title",
            "Hotel",
            "--amount",
            "120",
            "--paid-by",
            "Ana",
            "--custom",
            "Ana=40",
            "Bruno=80",
            "--data-dir",
            "/tmp/trips",
            "--match-order",
            "largest-first",
        ])
        .expect("valid arguments");

        assert_eq!(cli.global.data_dir, PathBuf::from("/tmp/trips"));
        assert_eq!(cli.global.match_order, MatchOrder::LargestFirst);
        let Command::AddExpense { group, expense } = cli.command else {
            panic!("expected add-expense");
        };
        assert_eq!(group, "g1");
        assert_eq!(
            expense.custom,
            vec![
                ("Ana".to_owned(), Money::from_i64(40)),
                ("Bruno".to_owned(), Money::from_i64(80)),
            ]
        );
        assert!(expense.split.is_empty());
    }

    #[rstest]
    #[case::rate_without_currency(&["--rate", "1.1"])]
    #[case::currency_without_rate(&["--foreign-currency", "USD"])]
    #[case::split_and_custom(&["--split", "Ana", "--custom", "Ana=10"])]
    #[case::bad_share(&["--custom", "Ana:10"])]
    #[case::bad_match_order(&["--match-order", "random"])]
    fn rejects_inconsistent_expense_flags(#[case] extra: &[&str]) {
        let mut args = vec![
            "add-expense", "--group", "g", "--title", "t", "--amount", "10", "--paid-by", "Ana",
        ];
        args.extend_from_slice(extra);
        assert!(parse(&args).is_err());
    }

    #[rstest]
    #[case::plain("Ana=12.50", "Ana", "12.50")]
    #[case::spaced(" Ana = 3 ", "Ana", "3")]
    #[case::equals_in_name("a=b=1", "a=b", "1")]
    fn parse_share_cases(#[case] raw: &str, #[case] member: &str, #[case] amount: &str) {
        let expected = (member.to_owned(), amount.parse::<Money>().expect("decimal"));
        assert_eq!(parse_share(raw), Ok(expected));
    }

    #[test]
    fn show_needs_no_data_dir() {
        let cli = parse(&["show", "trip.json"]).expect("valid arguments");
        assert!(matches!(cli.command, Command::Show { file } if file == PathBuf::from("trip.json")));
    }
}
