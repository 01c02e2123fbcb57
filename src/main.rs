use clap::Parser;
use miette::{IntoDiagnostic, Result};
use splitledger::application::engine::{ExpenseDraft, LedgerEngine, MemberProfile};
use splitledger::domain::money::DEFAULT_CURRENCY;
use splitledger::infrastructure::in_memory::{
    InMemoryExpenseStore, InMemoryGroupStore, InMemorySettlementStore, TracingDispatcher,
};
use splitledger::interfaces::csv::balance_writer::BalanceWriter;
use splitledger::interfaces::csv::expense_reader::{ExpenseReader, ExpenseRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input expenses CSV file
    input: PathBuf,

    /// Currency code stamped on every recorded expense
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let engine = LedgerEngine::new(
        Box::new(InMemoryGroupStore::new()),
        Box::new(InMemoryExpenseStore::new()),
        Box::new(InMemorySettlementStore::new()),
        Box::new(TracingDispatcher::new()),
    );

    // Group label from the CSV -> generated group id.
    let mut groups: BTreeMap<String, String> = BTreeMap::new();

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = ExpenseReader::new(file);
    for result in reader.records() {
        match result {
            Ok(record) => {
                if let Err(e) = record_expense(&engine, &mut groups, record, &cli.currency).await {
                    eprintln!("Error recording expense: {e}");
                }
            }
            Err(e) => {
                eprintln!("Error reading expense: {e}");
            }
        }
    }

    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    for (label, group_id) in &groups {
        let mut balances = engine.group_balances(group_id).await.into_diagnostic()?;
        // Report under the CSV label rather than the generated id.
        for balance in &mut balances {
            balance.group_id = label.clone();
        }
        writer.write_balances(&balances).into_diagnostic()?;
    }

    Ok(())
}

fn profile(user_id: &str) -> MemberProfile {
    MemberProfile {
        user_id: user_id.to_string(),
        display_name: user_id.to_string(),
        email: String::new(),
    }
}

/// Records one CSV row: groups and members are created on first sight, then
/// the expense goes through the engine like any other caller's would.
async fn record_expense(
    engine: &LedgerEngine,
    groups: &mut BTreeMap<String, String>,
    record: ExpenseRecord,
    currency: &str,
) -> splitledger::error::Result<()> {
    let participants = record.participant_ids();
    let weights = record.weight_values()?;

    let group_id = match groups.get(&record.group) {
        Some(id) => id.clone(),
        None => {
            let group = engine
                .create_group(record.group.clone(), None, profile(&record.payer))
                .await?;
            groups.insert(record.group.clone(), group.id.clone());
            group.id
        }
    };

    let mut group = engine.get_group(&group_id).await?;
    for user_id in participants.iter().chain(std::iter::once(&record.payer)) {
        if !group.is_member(user_id) {
            group = engine.add_member(&group_id, profile(user_id)).await?;
        }
    }

    engine
        .add_expense(ExpenseDraft {
            group_id,
            title: record.title.clone(),
            description: None,
            amount: record.amount,
            currency: Some(currency.to_string()),
            paid_by: record.payer.clone(),
            split_strategy: record.strategy,
            participants,
            weights,
            category: record.category.clone().unwrap_or_else(|| "Other".to_string()),
            date: None,
            created_by: record.payer.clone(),
        })
        .await?;
    Ok(())
}
