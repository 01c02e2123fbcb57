use chrono::Utc;
use rust_decimal::Decimal;
use splitledger::domain::expense::{Expense, ExpenseSplit, SplitStrategy};
use splitledger::domain::money::Amount;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn expense(
    id: &str,
    payer: &str,
    amount: Decimal,
    splits: &[(&str, Decimal)],
) -> Expense {
    Expense {
        id: id.to_string(),
        group_id: "g1".to_string(),
        title: id.to_string(),
        description: None,
        amount: Amount::new(amount).unwrap(),
        currency: "INR".to_string(),
        paid_by: payer.to_string(),
        split_strategy: SplitStrategy::Exact,
        splits: splits
            .iter()
            .map(|(user_id, share)| ExpenseSplit {
                user_id: user_id.to_string(),
                amount: *share,
                percentage: None,
            })
            .collect(),
        category: "Other".to_string(),
        date: Utc::now(),
        created_by: payer.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Writes `rows` equal-split expenses rotating the payer through five users.
pub fn generate_expenses_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record([
        "group",
        "title",
        "payer",
        "strategy",
        "amount",
        "participants",
        "weights",
        "category",
    ])?;

    for i in 0..rows {
        wtr.write_record([
            "trip",
            &format!("item{i}"),
            &format!("u{}", i % 5),
            "equal",
            "10.00",
            "u0;u1;u2;u3;u4",
            "",
            "Other",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
