use crate::domain::UserId;
use crate::domain::expense::{ExpenseSplit, SplitStrategy};
use crate::domain::money::{TOLERANCE, approximately_equal, round_minor_unit};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;

/// Divides `amount` among `participants` according to `strategy`.
///
/// `weights` is required for `Percentage` (percentages) and `Exact` (literal
/// amounts) and must have one entry per participant; it is ignored for
/// `Equal`. Returns one split per participant, in participant order.
///
/// Equal shares are rounded to the minor unit individually and the remainder
/// is not redistributed, so the shares of e.g. 100 over 3 people sum to
/// 99.99. Callers that need an exact partition use `Exact`.
pub fn compute_splits(
    amount: Decimal,
    strategy: SplitStrategy,
    participants: &[UserId],
    weights: Option<&[Decimal]>,
) -> Result<Vec<ExpenseSplit>> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::ValidationError(
            "amount must be positive".to_string(),
        ));
    }
    if participants.is_empty() {
        return Err(LedgerError::ValidationError(
            "at least one participant is required".to_string(),
        ));
    }
    for (i, id) in participants.iter().enumerate() {
        if participants[..i].contains(id) {
            return Err(LedgerError::ValidationError(format!(
                "duplicate participant {id}"
            )));
        }
    }

    match strategy {
        SplitStrategy::Equal => {
            let share = round_minor_unit(amount / Decimal::from(participants.len() as u64));
            Ok(participants
                .iter()
                .map(|user_id| ExpenseSplit {
                    user_id: user_id.clone(),
                    amount: share,
                    percentage: None,
                })
                .collect())
        }
        SplitStrategy::Percentage => {
            let weights = checked_weights(participants, weights, "percentage")?;
            for pct in weights {
                if *pct < Decimal::ZERO || *pct > Decimal::from(100) {
                    return Err(LedgerError::ValidationError(format!(
                        "percentage {pct} is outside [0, 100]"
                    )));
                }
            }
            let sum: Decimal = weights.iter().sum();
            if !approximately_equal(sum, Decimal::from(100), TOLERANCE) {
                return Err(LedgerError::ValidationError(format!(
                    "percentages sum to {sum}, expected 100"
                )));
            }
            Ok(participants
                .iter()
                .zip(weights)
                .map(|(user_id, pct)| ExpenseSplit {
                    user_id: user_id.clone(),
                    amount: round_minor_unit(amount * *pct / Decimal::from(100)),
                    percentage: Some(*pct),
                })
                .collect())
        }
        SplitStrategy::Exact => {
            let weights = checked_weights(participants, weights, "exact")?;
            let sum: Decimal = weights.iter().sum();
            if !approximately_equal(sum, amount, TOLERANCE) {
                return Err(LedgerError::ValidationError(format!(
                    "exact amounts sum to {sum}, expected {amount}"
                )));
            }
            Ok(participants
                .iter()
                .zip(weights)
                .map(|(user_id, share)| ExpenseSplit {
                    user_id: user_id.clone(),
                    amount: *share,
                    percentage: None,
                })
                .collect())
        }
    }
}

fn checked_weights<'a>(
    participants: &[UserId],
    weights: Option<&'a [Decimal]>,
    kind: &str,
) -> Result<&'a [Decimal]> {
    let weights = weights.ok_or_else(|| {
        LedgerError::ValidationError(format!("{kind} splits require weights"))
    })?;
    if weights.len() != participants.len() {
        return Err(LedgerError::ValidationError(format!(
            "{} weights supplied for {} participants",
            weights.len(),
            participants.len()
        )));
    }
    Ok(weights)
}
