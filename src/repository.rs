//! Facade over the transaction store that owns the shared database handle.
use crate::db::transaction_store;
use crate::error::Error;
use crate::models::balance::Balance;
use crate::models::transaction::{
    CreditDetail, DebitDetail, NewTransaction, Transaction, TransactionDetail, TransactionType,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// Stores and retrieves transactions.
///
/// Clones share the same connection, so the view-state holders and the
/// background tasks they spawn all talk to one database handle.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    connection: Arc<Mutex<Connection>>,
}

impl TransactionRepository {
    pub fn new(connection: Connection) -> Self {
        Self::from_shared(Arc::new(Mutex::new(connection)))
    }

    pub fn from_shared(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::LockPoisoned)
    }

    pub fn add_transaction(&self, transaction: &NewTransaction) -> Result<i64, Error> {
        transaction_store::insert_transaction(&*self.lock()?, transaction)
    }

    pub fn add(
        &self,
        amount: f64,
        description: &str,
        date: &str,
        transaction_type: TransactionType,
    ) -> Result<i64, Error> {
        self.add_transaction(&NewTransaction::new(amount, description, date, transaction_type))
    }

    pub fn add_credit_transaction(
        &self,
        amount: f64,
        description: &str,
        date: &str,
        detail: CreditDetail,
    ) -> Result<i64, Error> {
        let transaction = NewTransaction::new(amount, description, date, TransactionType::Credit)
            .detail(Some(TransactionDetail::Credit(detail)));
        self.add_transaction(&transaction)
    }

    pub fn add_debit_transaction(
        &self,
        amount: f64,
        description: &str,
        date: &str,
        detail: DebitDetail,
    ) -> Result<i64, Error> {
        let transaction = NewTransaction::new(amount, description, date, TransactionType::Debit)
            .detail(Some(TransactionDetail::Debit(detail)));
        self.add_transaction(&transaction)
    }

    pub fn get_all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        transaction_store::get_all_transactions(&*self.lock()?)
    }

    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>, Error> {
        transaction_store::get_transaction(&*self.lock()?, id)
    }

    pub fn delete_transaction(&self, id: i64) -> Result<(), Error> {
        transaction_store::delete_transaction(&*self.lock()?, id)
    }

    /// Credit and debit totals computed by the database.
    pub fn get_balance(&self) -> Result<Balance, Error> {
        let conn = self.lock()?;
        let credits = transaction_store::sum_by_type(&conn, TransactionType::Credit)?;
        let debits = transaction_store::sum_by_type(&conn, TransactionType::Debit)?;
        Ok(Balance::new(credits, debits))
    }

    pub fn get_net_balance(&self) -> Result<f64, Error> {
        Ok(self.get_balance()?.net())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    fn test_repository() -> TransactionRepository {
        TransactionRepository::new(establish_test_connection().unwrap())
    }

    #[test]
    fn test_convenience_inserts_set_type_and_detail() {
        let repository = test_repository();

        let salary = repository
            .add_credit_transaction(3000.0, "Salary", "01/02/2025", CreditDetail::Salary)
            .unwrap();
        let rent = repository
            .add_debit_transaction(1200.0, "Rent", "02/02/2025", DebitDetail::Housing)
            .unwrap();

        let salary = repository.get_transaction(salary).unwrap().unwrap();
        assert_eq!(salary.transaction_type, TransactionType::Credit);
        assert_eq!(salary.detail, Some(TransactionDetail::Credit(CreditDetail::Salary)));

        let rent = repository.get_transaction(rent).unwrap().unwrap();
        assert_eq!(rent.transaction_type, TransactionType::Debit);
        assert_eq!(rent.detail, Some(TransactionDetail::Debit(DebitDetail::Housing)));
    }

    #[test]
    fn test_added_record_listed_exactly_once() {
        let repository = test_repository();
        repository.add(10.0, "Coffee", "03/02/2025", TransactionType::Debit).unwrap();
        let id = repository.add(25.0, "Book", "03/02/2025", TransactionType::Debit).unwrap();

        let all = repository.get_all_transactions().unwrap();
        assert_eq!(all.iter().filter(|t| t.id == id).count(), 1);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_sql_balance_matches_in_memory_sum() {
        let repository = test_repository();
        repository.add(1000.0, "Salary", "01/03/2025", TransactionType::Credit).unwrap();
        repository.add(120.5, "Extras", "02/03/2025", TransactionType::Credit).unwrap();
        repository.add(300.25, "Groceries", "03/03/2025", TransactionType::Debit).unwrap();
        repository.add(80.0, "Bus pass", "04/03/2025", TransactionType::Debit).unwrap();

        let from_sql = repository.get_balance().unwrap();
        let in_memory = Balance::from_transactions(&repository.get_all_transactions().unwrap());

        assert_eq!(from_sql, in_memory);
        assert_eq!(from_sql.total_credits, 1120.5);
        assert_eq!(from_sql.total_debits, 380.25);
        assert_eq!(repository.get_net_balance().unwrap(), 1120.5 - 380.25);
    }

    #[test]
    fn test_sql_balance_matches_in_memory_sum_for_fractions() {
        let repository = test_repository();
        repository.add(0.30, "Cashback", "01/03/2025", TransactionType::Credit).unwrap();
        repository.add(0.20, "Cashback", "02/03/2025", TransactionType::Credit).unwrap();
        repository.add(0.10, "Cashback", "03/03/2025", TransactionType::Credit).unwrap();

        let from_sql = repository.get_balance().unwrap();
        let in_memory = Balance::from_transactions(&repository.get_all_transactions().unwrap());

        assert_eq!(from_sql, in_memory);
        assert_eq!(from_sql.total_credits, 0.6);
        assert_eq!(repository.get_net_balance().unwrap(), 0.6);
    }

    #[test]
    fn test_delete_adjusts_balance() {
        let repository = test_repository();
        repository.add(500.0, "Salary", "01/03/2025", TransactionType::Credit).unwrap();
        let lunch = repository.add(40.0, "Lunch", "01/03/2025", TransactionType::Debit).unwrap();

        assert_eq!(repository.get_net_balance().unwrap(), 460.0);

        repository.delete_transaction(lunch).unwrap();

        assert_eq!(repository.get_net_balance().unwrap(), 500.0);
        assert!(repository.get_all_transactions().unwrap().iter().all(|t| t.id != lunch));
    }

    #[test]
    fn test_clones_share_the_connection() {
        let repository = test_repository();
        let clone = repository.clone();

        clone.add(1.0, "Shared", "01/01/2025", TransactionType::Credit).unwrap();

        assert_eq!(repository.get_all_transactions().unwrap().len(), 1);
    }
}
