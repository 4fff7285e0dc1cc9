use crate::viewmodel::statement::StatementViewModel;
use crate::repository::TransactionRepository;

/// Looks up the transaction behind `id_input` and, when `confirm` agrees,
/// deletes it through the statement's request/confirm flow.
pub async fn remove_transaction_from_db<F>(
    repository: &TransactionRepository,
    id_input: &str,
    confirm: F,
) -> Result<bool, String>
where
    F: FnOnce(&str) -> bool,
{
    let id_input = id_input.trim();
    if id_input.is_empty() {
        return Err("Transaction ID cannot be empty.".to_string());
    }
    let id = id_input
        .parse::<i64>()
        .map_err(|_| format!("Invalid transaction ID '{}'. Please provide a number.", id_input))?;

    let transaction = repository
        .get_transaction(id)
        .map_err(|e| format!("Failed to look up transaction: {}", e))?
        .ok_or_else(|| format!("Transaction with ID {} not found.", id))?;

    let mut statement = StatementViewModel::new(repository.clone());
    let summary = format!(
        "{} {} ({})",
        transaction.description,
        transaction.signed_amount(),
        transaction.date
    );
    statement.on_delete_request(transaction);

    if !confirm(&summary) {
        statement.on_delete_cancel();
        return Ok(false);
    }

    statement
        .on_delete_confirm()
        .await
        .map_err(|e| format!("Failed to delete transaction: {}", e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::models::transaction::TransactionType;

    fn test_repository() -> TransactionRepository {
        TransactionRepository::new(establish_test_connection().unwrap())
    }

    #[tokio::test]
    async fn test_remove_confirmed() {
        let repository = test_repository();
        let id = repository.add(12.0, "Cinema", "01/07/2025", TransactionType::Debit).unwrap();

        let mut prompt = String::new();
        let result = remove_transaction_from_db(&repository, &id.to_string(), |summary| {
            prompt = summary.to_string();
            true
        })
        .await;

        assert_eq!(result, Ok(true));
        assert_eq!(prompt, "Cinema - R$ 12.00 (01/07/2025)");
        assert!(repository.get_all_transactions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_declined_keeps_record() {
        let repository = test_repository();
        let id = repository.add(12.0, "Cinema", "01/07/2025", TransactionType::Debit).unwrap();

        let result = remove_transaction_from_db(&repository, &id.to_string(), |_| false).await;

        assert_eq!(result, Ok(false));
        assert_eq!(repository.get_all_transactions().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_not_found() {
        let repository = test_repository();

        let result = remove_transaction_from_db(&repository, "99", |_| true).await;
        assert!(result.unwrap_err().contains("not found"));
    }

    #[tokio::test]
    async fn test_remove_invalid_id() {
        let repository = test_repository();

        let empty = remove_transaction_from_db(&repository, "  ", |_| true).await;
        assert_eq!(empty.unwrap_err(), "Transaction ID cannot be empty.");

        let text = remove_transaction_from_db(&repository, "abc", |_| true).await;
        assert!(text.unwrap_err().contains("Invalid transaction ID"));
    }
}
