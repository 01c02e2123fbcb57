use crate::domain::balance::Balance;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow<'a> {
    group: &'a str,
    user: &'a str,
    amount: Decimal,
    currency: &'a str,
}

/// Writes balances as `group,user,amount,currency` CSV rows.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_balances(&mut self, balances: &[Balance]) -> Result<()> {
        for balance in balances {
            self.writer.serialize(BalanceRow {
                group: &balance.group_id,
                user: &balance.user_id,
                amount: balance.amount,
                currency: &balance.currency,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
