use crate::domain::UserId;
use crate::domain::expense::SplitStrategy;
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// One CSV row describing an expense to record.
///
/// `participants` (and `weights`, where the strategy needs them) are
/// `;`-separated lists, e.g. `alice;bob;carol` and `50;30;20`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ExpenseRecord {
    pub group: String,
    pub title: String,
    pub payer: String,
    pub strategy: SplitStrategy,
    pub amount: Decimal,
    pub participants: String,
    pub weights: Option<String>,
    pub category: Option<String>,
}

impl ExpenseRecord {
    pub fn participant_ids(&self) -> Vec<UserId> {
        self.participants
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn weight_values(&self) -> Result<Option<Vec<Decimal>>> {
        let Some(raw) = self.weights.as_deref().filter(|w| !w.trim().is_empty()) else {
            return Ok(None);
        };
        raw.split(';')
            .map(str::trim)
            .map(|s| {
                Decimal::from_str(s).map_err(|_| {
                    LedgerError::ValidationError(format!("invalid weight value: {s}"))
                })
            })
            .collect::<Result<Vec<Decimal>>>()
            .map(Some)
    }
}

/// Reads expense rows from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<ExpenseRecord>`,
/// trimming whitespace and tolerating short rows, so large files stream
/// without being loaded whole.
pub struct ExpenseReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ExpenseReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn records(self) -> impl Iterator<Item = Result<ExpenseRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
