use crate::models::transaction::format_money;
use crate::repository::TransactionRepository;
use crate::viewmodel::statement::{StatementState, StatementViewModel};

pub async fn load_statement(repository: &TransactionRepository) -> Result<StatementState, String> {
    let mut statement = StatementViewModel::new(repository.clone());
    statement
        .refresh()
        .await
        .map_err(|e| format!("Failed to load statement: {}", e))?;
    Ok(statement.state().clone())
}

pub fn format_summary(state: &StatementState) -> String {
    format!(
        "Credits: {}\nDebits:  {}\nBalance: {}",
        format_money(state.total_credits),
        format_money(state.total_debits),
        format_money(state.net_balance)
    )
}

pub fn format_statement(state: &StatementState) -> String {
    let mut out = format_summary(state);
    out.push_str("\n\n");

    if state.transactions.is_empty() {
        out.push_str("No transactions found");
        return out;
    }

    out.push_str(&format!(
        "{:>5}  {:<16}  {:<10}  {:<30}  {:<10}  {:>14}",
        "Id", "Created", "Date", "Description", "Category", "Amount"
    ));
    for tx in &state.transactions {
        out.push('\n');
        out.push_str(&format!(
            "{:>5}  {:<16}  {:<10}  {:<30}  {:<10}  {:>14}",
            tx.id,
            tx.display_created_at(),
            tx.date,
            tx.description,
            tx.detail_label(),
            tx.signed_amount()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::models::transaction::{CreditDetail, TransactionType};

    fn test_repository() -> TransactionRepository {
        TransactionRepository::new(establish_test_connection().unwrap())
    }

    #[tokio::test]
    async fn test_empty_statement() {
        let repository = test_repository();

        let state = load_statement(&repository).await.unwrap();
        let text = format_statement(&state);

        assert!(text.contains("Balance: R$ 0.00"));
        assert!(text.ends_with("No transactions found"));
    }

    #[tokio::test]
    async fn test_statement_lists_every_record() {
        let repository = test_repository();
        repository
            .add_credit_transaction(2500.0, "Salary", "05/08/2025", CreditDetail::Salary)
            .unwrap();
        repository.add(99.99, "Internet", "06/08/2025", TransactionType::Debit).unwrap();

        let state = load_statement(&repository).await.unwrap();
        let text = format_statement(&state);

        assert!(text.contains("Credits: R$ 2500.00"));
        assert!(text.contains("Debits:  R$ 99.99"));
        assert!(text.contains("Balance: R$ 2400.01"));
        assert!(text.contains("salary"));
        assert!(text.contains("- R$ 99.99"));
        assert_eq!(text.lines().count(), 3 + 1 + 1 + 2);
    }
}
