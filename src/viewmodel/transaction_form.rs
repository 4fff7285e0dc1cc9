use super::on_background;
use crate::error::Error;
use crate::models::transaction::{TransactionDetail, TransactionType};
use crate::repository::TransactionRepository;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFormState {
    pub amount: String,
    pub description: String,
    pub date: String,
    pub selected_type: TransactionType,
    pub detail: Option<TransactionDetail>,
    /// Set after a successful save until the screen has shown its toast.
    pub is_transaction_saved: bool,
}

impl Default for TransactionFormState {
    fn default() -> Self {
        Self {
            amount: String::new(),
            description: String::new(),
            date: String::new(),
            selected_type: TransactionType::Debit,
            detail: None,
            is_transaction_saved: false,
        }
    }
}

impl TransactionFormState {
    /// The amount as typed, or `0.0` when it is not a number.
    pub fn parsed_amount(&self) -> f64 {
        parse_amount(&self.amount)
    }

    pub fn is_amount_valid(&self) -> bool {
        let amount = self.parsed_amount();
        amount.is_finite() && amount > 0.0
    }

    pub fn is_description_valid(&self) -> bool {
        !self.description.trim().is_empty()
    }

    pub fn is_date_valid(&self) -> bool {
        !self.date.trim().is_empty()
    }

    pub fn can_save(&self) -> bool {
        self.is_amount_valid() && self.is_description_valid() && self.is_date_valid()
    }
}

pub fn parse_amount(input: &str) -> f64 {
    input.trim().parse::<f64>().unwrap_or(0.0)
}

/// Holds the new-transaction form and saves it through the repository.
pub struct TransactionFormViewModel {
    repository: TransactionRepository,
    state: TransactionFormState,
}

impl TransactionFormViewModel {
    pub fn new(repository: TransactionRepository) -> Self {
        Self {
            repository,
            state: TransactionFormState::default(),
        }
    }

    pub fn state(&self) -> &TransactionFormState {
        &self.state
    }

    pub fn on_amount_change(&mut self, amount: &str) {
        self.state.amount = amount.to_string();
    }

    pub fn on_description_change(&mut self, description: &str) {
        self.state.description = description.to_string();
    }

    pub fn on_date_change(&mut self, date: &str) {
        self.state.date = date.to_string();
    }

    /// Fills the date from a picked calendar day. `None` keeps the current text.
    pub fn on_date_selected(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.state.date = date.format(DATE_FORMAT).to_string();
        }
    }

    pub fn on_type_change(&mut self, transaction_type: TransactionType) {
        if self.state.selected_type != transaction_type {
            self.state.selected_type = transaction_type;
            self.state.detail = None;
        }
    }

    /// Steps through "no detail" followed by each detail of the selected type.
    pub fn on_cycle_detail(&mut self, forward: bool) {
        let options = TransactionDetail::options_for(self.state.selected_type);
        let position = self
            .state
            .detail
            .and_then(|detail| options.iter().position(|option| *option == detail));

        // Slot 0 is "no detail", slot i + 1 is options[i].
        let slots = options.len() + 1;
        let current = position.map(|i| i + 1).unwrap_or(0);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };

        self.state.detail = next.checked_sub(1).map(|i| options[i]);
    }

    pub fn on_transaction_saved_handled(&mut self) {
        self.state.is_transaction_saved = false;
    }

    /// Saves the form when it is valid.
    ///
    /// Returns `Ok(false)` without touching the database when validation
    /// fails. On success the text fields are cleared, the selected type is
    /// kept and the saved flag is raised.
    pub async fn save(&mut self) -> Result<bool, Error> {
        if !self.state.can_save() {
            tracing::debug!("Save blocked by validation");
            return Ok(false);
        }

        let amount = self.state.parsed_amount();
        let description = self.state.description.trim().to_string();
        let date = self.state.date.trim().to_string();
        let transaction_type = self.state.selected_type;
        let detail = self.state.detail;
        let repository = self.repository.clone();
        on_background(move || match detail {
            Some(TransactionDetail::Credit(detail)) => {
                repository.add_credit_transaction(amount, &description, &date, detail)
            }
            Some(TransactionDetail::Debit(detail)) => {
                repository.add_debit_transaction(amount, &description, &date, detail)
            }
            None => repository.add(amount, &description, &date, transaction_type),
        })
        .await?;

        self.state = TransactionFormState {
            selected_type: self.state.selected_type,
            is_transaction_saved: true,
            ..TransactionFormState::default()
        };
        Ok(true)
    }

    pub async fn net_balance(&self) -> Result<f64, Error> {
        let repository = self.repository.clone();
        on_background(move || repository.get_net_balance()).await
    }
}
