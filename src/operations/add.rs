use crate::models::transaction::{TransactionDetail, TransactionType};
use crate::repository::TransactionRepository;
use crate::viewmodel::transaction_form::TransactionFormViewModel;

/// Adds a transaction from command-line values, using the same validation
/// as the form screen.
pub async fn add_transaction_to_db(
    repository: &TransactionRepository,
    amount: &str,
    description: &str,
    date: &str,
    transaction_type: &str,
    category: Option<&str>,
) -> Result<(), String> {
    let transaction_type = transaction_type.parse::<TransactionType>()?;

    let mut form = TransactionFormViewModel::new(repository.clone());
    form.on_type_change(transaction_type);
    form.on_amount_change(amount);
    form.on_description_change(description);
    form.on_date_change(date);

    if let Some(category) = category {
        let detail = TransactionDetail::parse(transaction_type, category).ok_or_else(|| {
            let options: Vec<&str> = TransactionDetail::options_for(transaction_type)
                .into_iter()
                .map(TransactionDetail::label)
                .collect();
            format!(
                "Invalid category '{}' for a {} transaction. Use one of: {}",
                category,
                transaction_type,
                options.join(", ")
            )
        })?;
        while form.state().detail != Some(detail) {
            form.on_cycle_detail(true);
        }
    }

    let state = form.state();
    if !state.is_amount_valid() {
        return Err(format!("Invalid amount '{}'. Must be a number greater than zero", amount));
    }
    if !state.is_description_valid() {
        return Err("Description cannot be empty".to_string());
    }
    if !state.is_date_valid() {
        return Err("Date cannot be empty".to_string());
    }

    let saved = form.save().await.map_err(|e| format!("Failed to save transaction: {}", e))?;
    if !saved {
        return Err("Transaction was not saved".to_string());
    }
    form.on_transaction_saved_handled();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::models::transaction::DebitDetail;

    fn test_repository() -> TransactionRepository {
        TransactionRepository::new(establish_test_connection().unwrap())
    }

    #[tokio::test]
    async fn test_add_success_with_category() {
        let repository = test_repository();

        let result = add_transaction_to_db(
            &repository,
            "35.90",
            "Pharmacy",
            "12/05/2025",
            "debit",
            Some("HEALTH"),
        )
        .await;
        assert!(result.is_ok());

        let all = repository.get_all_transactions().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, 35.9);
        assert_eq!(all[0].detail, Some(TransactionDetail::Debit(DebitDetail::Health)));
    }

    #[tokio::test]
    async fn test_add_invalid_type() {
        let repository = test_repository();

        let result =
            add_transaction_to_db(&repository, "10", "Lunch", "12/05/2025", "income", None).await;
        assert!(result.unwrap_err().contains("Invalid transaction type"));
    }

    #[tokio::test]
    async fn test_add_category_of_other_type() {
        let repository = test_repository();

        let result =
            add_transaction_to_db(&repository, "10", "Lunch", "12/05/2025", "credit", Some("food"))
                .await;
        let error = result.unwrap_err();
        assert!(error.contains("Invalid category"));
        assert!(error.contains("salary, extras"));
        assert!(repository.get_all_transactions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_fields() {
        let repository = test_repository();

        let amount =
            add_transaction_to_db(&repository, "abc", "Lunch", "12/05/2025", "debit", None).await;
        assert!(amount.unwrap_err().contains("Invalid amount"));

        let description =
            add_transaction_to_db(&repository, "10", " ", "12/05/2025", "debit", None).await;
        assert_eq!(description.unwrap_err(), "Description cannot be empty");

        let date = add_transaction_to_db(&repository, "10", "Lunch", "", "debit", None).await;
        assert_eq!(date.unwrap_err(), "Date cannot be empty");

        assert!(repository.get_all_transactions().unwrap().is_empty());
    }
}
