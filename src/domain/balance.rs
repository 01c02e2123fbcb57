use crate::domain::expense::Expense;
use crate::domain::money::DEFAULT_CURRENCY;
use crate::domain::{GroupId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user's net position within a group. Positive means the group owes the
/// user, negative means the user owes the group.
///
/// Balances are a derived view: they are recomputed from the full expense
/// history on every call and never stored or mutated incrementally.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Balance {
    pub user_id: UserId,
    pub group_id: GroupId,
    pub amount: Decimal,
    pub currency: String,
}

/// Computes net balances for one group's expense history.
///
/// Each expense credits its payer with the full amount and debits every
/// split user with their share; a payer appearing in their own split set
/// nets only the non-self portion. Accumulation is purely additive, so the
/// result does not depend on the order of `expenses`.
///
/// Users that never appear as payer or split participant get no entry. The
/// output is sorted by user id.
pub fn compute_group_balances(expenses: &[Expense], group_id: &str) -> Vec<Balance> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.paid_by.as_str()).or_default() += expense.amount.value();
        for split in &expense.splits {
            *totals.entry(split.user_id.as_str()).or_default() -= split.amount;
        }
    }

    let currency = expenses
        .first()
        .map(|e| e.currency.as_str())
        .unwrap_or(DEFAULT_CURRENCY);

    let mut balances: Vec<Balance> = totals
        .into_iter()
        .map(|(user_id, amount)| Balance {
            user_id: user_id.to_string(),
            group_id: group_id.to_string(),
            amount,
            currency: currency.to_string(),
        })
        .collect();
    balances.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::{ExpenseSplit, SplitStrategy};
    use crate::domain::money::Amount;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn expense(
        payer: &str,
        amount: Decimal,
        splits: &[(&str, Decimal)],
        strategy: SplitStrategy,
    ) -> Expense {
        Expense {
            id: format!("e-{payer}-{amount}"),
            group_id: "g1".to_string(),
            title: "test".to_string(),
            description: None,
            amount: Amount::new(amount).unwrap(),
            currency: "INR".to_string(),
            paid_by: payer.to_string(),
            split_strategy: strategy,
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

    fn amount_of(balances: &[Balance], user_id: &str) -> Decimal {
        balances
            .iter()
            .find(|b| b.user_id == user_id)
            .map(|b| b.amount)
            .unwrap()
    }

    #[test]
    fn test_equal_split_scenario() {
        // 90 paid by alice, split equally among alice, bob, carol.
        let expenses = vec![expense(
            "alice",
            dec!(90.00),
            &[
                ("alice", dec!(30.00)),
                ("bob", dec!(30.00)),
                ("carol", dec!(30.00)),
            ],
            SplitStrategy::Equal,
        )];

        let balances = compute_group_balances(&expenses, "g1");
        assert_eq!(balances.len(), 3);
        assert_eq!(amount_of(&balances, "alice"), dec!(60.00));
        assert_eq!(amount_of(&balances, "bob"), dec!(-30.00));
        assert_eq!(amount_of(&balances, "carol"), dec!(-30.00));
    }

    #[test]
    fn test_percentage_split_scenario() {
        // 100 paid by alice at 50/30/20.
        let expenses = vec![expense(
            "alice",
            dec!(100.00),
            &[
                ("alice", dec!(50.00)),
                ("bob", dec!(30.00)),
                ("carol", dec!(20.00)),
            ],
            SplitStrategy::Percentage,
        )];

        let balances = compute_group_balances(&expenses, "g1");
        assert_eq!(amount_of(&balances, "alice"), dec!(50.00));
        assert_eq!(amount_of(&balances, "bob"), dec!(-30.00));
        assert_eq!(amount_of(&balances, "carol"), dec!(-20.00));
    }

    #[test]
    fn test_balances_sum_to_zero() {
        let expenses = vec![
            expense(
                "alice",
                dec!(90.00),
                &[
                    ("alice", dec!(30.00)),
                    ("bob", dec!(30.00)),
                    ("carol", dec!(30.00)),
                ],
                SplitStrategy::Equal,
            ),
            expense(
                "bob",
                dec!(40.00),
                &[("alice", dec!(25.00)), ("carol", dec!(15.00))],
                SplitStrategy::Exact,
            ),
        ];

        let balances = compute_group_balances(&expenses, "g1");
        let sum: Decimal = balances.iter().map(|b| b.amount).sum();
        assert_eq!(sum, Decimal::ZERO);
    }

    #[test]
    fn test_order_independence() {
        let mut expenses = vec![
            expense(
                "alice",
                dec!(60.00),
                &[("bob", dec!(30.00)), ("carol", dec!(30.00))],
                SplitStrategy::Exact,
            ),
            expense(
                "bob",
                dec!(10.00),
                &[("alice", dec!(10.00))],
                SplitStrategy::Exact,
            ),
            expense(
                "carol",
                dec!(45.00),
                &[("alice", dec!(20.00)), ("bob", dec!(25.00))],
                SplitStrategy::Exact,
            ),
        ];

        let forward = compute_group_balances(&expenses, "g1");
        expenses.reverse();
        let backward = compute_group_balances(&expenses, "g1");
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_payer_not_in_own_split() {
        let expenses = vec![expense(
            "alice",
            dec!(50.00),
            &[("bob", dec!(50.00))],
            SplitStrategy::Exact,
        )];

        let balances = compute_group_balances(&expenses, "g1");
        assert_eq!(amount_of(&balances, "alice"), dec!(50.00));
        assert_eq!(amount_of(&balances, "bob"), dec!(-50.00));
        // No entry for users that never appear.
        assert!(!balances.iter().any(|b| b.user_id == "carol"));
    }

    #[test]
    fn test_empty_history() {
        assert!(compute_group_balances(&[], "g1").is_empty());
    }

    #[test]
    fn test_currency_taken_from_expenses() {
        let mut e = expense("alice", dec!(10.00), &[("bob", dec!(10.00))], SplitStrategy::Exact);
        e.currency = "EUR".to_string();
        let balances = compute_group_balances(&[e], "g1");
        assert!(balances.iter().all(|b| b.currency == "EUR"));
    }
}
