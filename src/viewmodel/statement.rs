use super::on_background;
use crate::error::Error;
use crate::models::balance::Balance;
use crate::models::transaction::Transaction;
use crate::repository::TransactionRepository;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    /// The user asked to delete this transaction and has not answered the
    /// confirmation yet.
    PendingConfirmation(Transaction),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementState {
    pub transactions: Vec<Transaction>,
    pub total_credits: f64,
    pub total_debits: f64,
    pub net_balance: f64,
    pub delete_flow: DeleteFlow,
}

impl StatementState {
    pub fn pending_delete(&self) -> Option<&Transaction> {
        match &self.delete_flow {
            DeleteFlow::Idle => None,
            DeleteFlow::PendingConfirmation(transaction) => Some(transaction),
        }
    }
}

/// Loads the statement and drives the delete confirmation.
pub struct StatementViewModel {
    repository: TransactionRepository,
    state: StatementState,
}

impl StatementViewModel {
    pub fn new(repository: TransactionRepository) -> Self {
        Self {
            repository,
            state: StatementState::default(),
        }
    }

    pub fn state(&self) -> &StatementState {
        &self.state
    }

    /// Reloads every transaction from the database. The totals are summed
    /// from the same rows, so the list and the summary always agree.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let repository = self.repository.clone();
        let transactions = on_background(move || repository.get_all_transactions()).await?;
        let balance = Balance::from_transactions(&transactions);

        tracing::debug!(
            "Statement refreshed: {} transactions, net {:.2}",
            transactions.len(),
            balance.net()
        );

        self.state.transactions = transactions;
        self.state.total_credits = balance.total_credits;
        self.state.total_debits = balance.total_debits;
        self.state.net_balance = balance.net();
        Ok(())
    }

    pub fn on_delete_request(&mut self, transaction: Transaction) {
        self.state.delete_flow = DeleteFlow::PendingConfirmation(transaction);
    }

    pub fn on_delete_cancel(&mut self) {
        self.state.delete_flow = DeleteFlow::Idle;
    }

    /// Deletes the pending transaction and reloads. Does nothing when no
    /// delete was requested.
    ///
    /// The statement is reloaded even when the delete fails, so a row that
    /// vanished in the meantime drops out of the list. The delete error wins
    /// over a refresh error.
    pub async fn on_delete_confirm(&mut self) -> Result<(), Error> {
        let DeleteFlow::PendingConfirmation(transaction) =
            std::mem::take(&mut self.state.delete_flow)
        else {
            return Ok(());
        };

        let repository = self.repository.clone();
        let id = transaction.id;
        let deleted = on_background(move || repository.delete_transaction(id)).await;
        if let Err(e) = &deleted {
            tracing::warn!("Delete of transaction {} failed: {}", id, e);
        }

        let refreshed = self.refresh().await;
        deleted.and(refreshed)
    }
}
