use crate::models::transaction::{Transaction, TransactionType};

/// Totals derived from the stored transactions. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Balance {
    pub total_credits: f64,
    pub total_debits: f64,
}

impl Balance {
    /// Totals are kept to the cent, so sums taken in a different order or
    /// with a different algorithm compare equal.
    pub fn new(total_credits: f64, total_debits: f64) -> Self {
        Self {
            total_credits: round_to_cents(total_credits),
            total_debits: round_to_cents(total_debits),
        }
    }

    /// Sums the amounts in memory instead of asking the database.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (credits, debits) = transactions
            .iter()
            .fold((0.0, 0.0), |(credits, debits), transaction| {
                match transaction.transaction_type {
                    TransactionType::Credit => (credits + transaction.amount, debits),
                    TransactionType::Debit => (credits, debits + transaction.amount),
                }
            });
        Balance::new(credits, debits)
    }

    pub fn net(&self) -> f64 {
        round_to_cents(self.total_credits - self.total_debits)
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
