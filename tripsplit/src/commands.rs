use crate::{
    bootstrap::AppConfig,
    cli::{Command, ExpenseArgs},
};
use std::{
    fmt::Write,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tripsplit_application::{ExpenseDraft, GroupSummary, LedgerError, StoreError, TripLedger};
use tripsplit_domain::{ExpenseId, Group, GroupId, MemberId};
use tripsplit_infrastructure::{DocumentError, GroupDocument, JsonFileGroupStore, UuidIdGenerator};
use tripsplit_presentation::{CurrencyFormat, SummaryPresenter};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read `{path}`: {source}")]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("`{path}`: {source}")]
    Document {
        path: PathBuf,
        source: DocumentError,
    },
    #[error("no member `{member}` in group `{group}`")]
    UnknownMember { group: GroupId, member: String },
}

pub fn execute(config: &AppConfig, command: Command) -> Result<String, CliError> {
    if let Command::Show { file } = &command {
        return show(config, file);
    }

    let store = JsonFileGroupStore::open(&config.data_dir)?;
    let ids = UuidIdGenerator;
    let ledger = TripLedger::new(&store, &ids, config.planner());

    match command {
        Command::CreateGroup { name, currency } => {
            let summary = ledger.create_group(&name, currency.as_deref())?;
            Ok(format!(
                "Created group {} ({})\n",
                summary.group_name, summary.group_id
            ))
        }
        Command::ListGroups => {
            let mut out = String::new();
            for id in ledger.groups()? {
                let group = ledger.group(&id)?;
                let _ = writeln!(
                    out,
                    "{id}  {}  ({} members, {} expenses)",
                    group.name,
                    group.members.len(),
                    group.expenses.len()
                );
            }
            Ok(out)
        }
        Command::AddMember { group, name } => {
            let (member, summary) = ledger.add_member(&GroupId::new(group), &name)?;
            Ok(with_summary(
                format!("Added {} ({})", member.name, member.id),
                &summary,
                config,
            ))
        }
        Command::AddExpense { group, expense } => {
            let group_id = GroupId::new(group);
            let draft = draft_from_args(&ledger.group(&group_id)?, &expense)?;
            let (expense_id, summary) = ledger.add_expense(&group_id, &draft)?;
            Ok(with_summary(
                format!("Added expense {expense_id}"),
                &summary,
                config,
            ))
        }
        Command::EditExpense {
            group,
            expense,
            details,
        } => {
            let group_id = GroupId::new(group);
            let draft = draft_from_args(&ledger.group(&group_id)?, &details)?;
            let expense_id = ExpenseId::new(expense);
            let summary = ledger.edit_expense(&group_id, &expense_id, &draft)?;
            Ok(with_summary(
                format!("Updated expense {expense_id}"),
                &summary,
                config,
            ))
        }
        Command::DeleteExpense { group, expense } => {
            let expense_id = ExpenseId::new(expense);
            let summary = ledger.delete_expense(&GroupId::new(group), &expense_id)?;
            Ok(with_summary(
                format!("Deleted expense {expense_id}"),
                &summary,
                config,
            ))
        }
        Command::Summary { group } => {
            let summary = ledger.summary(&GroupId::new(group))?;
            Ok(render(&summary, config))
        }
        Command::Show { file } => show(config, &file),
    }
}

fn show(config: &AppConfig, path: &Path) -> Result<String, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let group = GroupDocument::from_json(&json).map_err(|source| CliError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(render(
        &GroupSummary::from_group(&group, &config.planner()),
        config,
    ))
}

fn render(summary: &GroupSummary, config: &AppConfig) -> String {
    let format = CurrencyFormat::resolve(
        config.currency_symbol.as_deref(),
        summary.currency.as_deref(),
    );
    SummaryPresenter::render(summary, &format)
}

fn with_summary(headline: String, summary: &GroupSummary, config: &AppConfig) -> String {
    format!("{headline}\n\n{}", render(summary, config))
}

/// Translates member names to ids; an equal split without `--split` covers everyone.
fn draft_from_args(group: &Group, args: &ExpenseArgs) -> Result<ExpenseDraft, CliError> {
    let resolve = |key: &str| {
        group
            .resolve_member(key)
            .map(|member| member.id.clone())
            .ok_or_else(|| CliError::UnknownMember {
                group: group.id.clone(),
                member: key.to_owned(),
            })
    };

    let paid_by = resolve(&args.paid_by)?;
    let mut draft = if args.custom.is_empty() {
        let split_between = if args.split.is_empty() {
            group.members.iter().map(|member| member.id.clone()).collect()
        } else {
            args.split
                .iter()
                .map(|key| resolve(key))
                .collect::<Result<Vec<MemberId>, _>>()?
        };
        ExpenseDraft::equal(&args.title, args.amount, paid_by, split_between)
    } else {
        let shares = args
            .custom
            .iter()
            .map(|(key, amount)| Ok((resolve(key)?, *amount)))
            .collect::<Result<Vec<_>, CliError>>()?;
        ExpenseDraft::custom(&args.title, args.amount, paid_by, shares)
    };

    if let (Some(currency), Some(rate)) = (&args.foreign_currency, args.rate) {
        draft = draft.in_foreign_currency(currency.trim().to_uppercase(), rate);
    }
    Ok(draft)
}
