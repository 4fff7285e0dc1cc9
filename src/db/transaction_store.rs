use crate::error::Error;
use crate::models::transaction::{
    CreditDetail, DebitDetail, NewTransaction, Transaction, TransactionDetail, TransactionType,
};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row, params};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const SELECT_COLUMNS: &str = "SELECT id, amount, description, type, date, credit_detail, \
     debit_detail, created_at FROM transactions";

/// A row as stored, before the type and timestamp columns are interpreted.
struct TransactionRow {
    id: i64,
    amount: f64,
    description: Option<String>,
    transaction_type: String,
    date: String,
    credit_detail: Option<String>,
    debit_detail: Option<String>,
    created_at: String,
}

impl TransactionRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            amount: row.get(1)?,
            description: row.get(2)?,
            transaction_type: row.get(3)?,
            date: row.get(4)?,
            credit_detail: row.get(5)?,
            debit_detail: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction, Error> {
        let transaction_type = parse_transaction_type(&self.transaction_type)?;
        let detail = match transaction_type {
            TransactionType::Credit => self
                .credit_detail
                .as_deref()
                .and_then(CreditDetail::from_storage)
                .map(TransactionDetail::Credit),
            TransactionType::Debit => self
                .debit_detail
                .as_deref()
                .and_then(DebitDetail::from_storage)
                .map(TransactionDetail::Debit),
        };
        let created_at = NaiveDateTime::parse_from_str(&self.created_at, TIMESTAMP_FORMAT)
            .map_err(|e| Error::InvalidTimestamp(self.created_at.clone(), e.to_string()))?;

        Ok(Transaction {
            id: self.id,
            amount: self.amount,
            description: self.description.unwrap_or_default(),
            transaction_type,
            date: self.date,
            detail,
            created_at,
        })
    }
}

fn parse_transaction_type(value: &str) -> Result<TransactionType, Error> {
    match value {
        "CREDIT" => Ok(TransactionType::Credit),
        "DEBIT" => Ok(TransactionType::Debit),
        other => Err(Error::InvalidTransactionType(other.to_string())),
    }
}

/// Inserts one transaction and returns the ID assigned by SQLite.
pub fn insert_transaction(conn: &Connection, transaction: &NewTransaction) -> Result<i64, Error> {
    let detail = transaction
        .detail
        .filter(|detail| detail.transaction_type() == transaction.transaction_type);
    let (credit_detail, debit_detail) = match detail {
        Some(TransactionDetail::Credit(detail)) => (Some(detail.as_storage_str()), None),
        Some(TransactionDetail::Debit(detail)) => (None, Some(detail.as_storage_str())),
        None => (None, None),
    };
    if detail.is_none() && transaction.detail.is_some() {
        tracing::warn!(
            "Dropping detail that does not match a {} transaction",
            transaction.transaction_type
        );
    }

    conn.execute(
        "INSERT INTO transactions
             (amount, description, type, date, credit_detail, debit_detail, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            transaction.amount,
            &transaction.description,
            transaction.transaction_type.as_storage_str(),
            &transaction.date,
            credit_detail,
            debit_detail,
            transaction.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::info!(
        "Inserted {} transaction {} ({:.2})",
        transaction.transaction_type,
        id,
        transaction.amount
    );
    Ok(id)
}

/// All transactions, most recent first.
pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>, Error> {
    let mut stmt = conn.prepare(&format!(
        "{} ORDER BY created_at DESC, id DESC",
        SELECT_COLUMNS
    ))?;
    let rows = stmt.query_map([], TransactionRow::from_row)?;

    let mut transactions = Vec::new();
    for row in rows {
        transactions.push(row?.into_transaction()?);
    }

    tracing::debug!("Loaded {} transactions", transactions.len());
    Ok(transactions)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Option<Transaction>, Error> {
    let row = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            [id],
            TransactionRow::from_row,
        )
        .optional()?;

    row.map(TransactionRow::into_transaction).transpose()
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<(), Error> {
    let rows_affected = conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound(id));
    }

    tracing::info!("Deleted transaction {}", id);
    Ok(())
}

/// Sum of the amounts of one transaction type, `0.0` when there are none.
pub fn sum_by_type(conn: &Connection, transaction_type: TransactionType) -> Result<f64, Error> {
    let total: f64 = conn.query_row(
        "SELECT IFNULL(SUM(amount), 0.0) FROM transactions WHERE type = ?1",
        [transaction_type.as_storage_str()],
        |row| row.get(0),
    )?;

    tracing::debug!("Sum of {} transactions: {:.2}", transaction_type, total);
    Ok(total)
}
