use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Direction of a transaction: money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn as_storage_str(self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TransactionType::Credit => TransactionType::Debit,
            TransactionType::Debit => TransactionType::Credit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Ok(TransactionType::Credit),
            "debit" => Ok(TransactionType::Debit),
            _ => Err(format!(
                "Invalid transaction type '{}'. Use 'credit' or 'debit'.",
                s.trim()
            )),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditDetail {
    Salary,
    Extras,
}

impl CreditDetail {
    pub const ALL: [CreditDetail; 2] = [CreditDetail::Salary, CreditDetail::Extras];

    pub fn as_storage_str(self) -> &'static str {
        match self {
            CreditDetail::Salary => "SALARY",
            CreditDetail::Extras => "EXTRAS",
        }
    }

    /// Exact match on the stored name. Unknown values are not an error, they
    /// simply have no detail.
    pub fn from_storage(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|detail| detail.as_storage_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitDetail {
    Food,
    Transport,
    Health,
    Housing,
}

impl DebitDetail {
    pub const ALL: [DebitDetail; 4] = [
        DebitDetail::Food,
        DebitDetail::Transport,
        DebitDetail::Health,
        DebitDetail::Housing,
    ];

    pub fn as_storage_str(self) -> &'static str {
        match self {
            DebitDetail::Food => "FOOD",
            DebitDetail::Transport => "TRANSPORT",
            DebitDetail::Health => "HEALTH",
            DebitDetail::Housing => "HOUSING",
        }
    }

    pub fn from_storage(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|detail| detail.as_storage_str() == value)
    }
}

/// Category detail of a transaction. The variant always matches the
/// transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionDetail {
    Credit(CreditDetail),
    Debit(DebitDetail),
}

impl TransactionDetail {
    /// All details available for `transaction_type`, in display order.
    pub fn options_for(transaction_type: TransactionType) -> Vec<TransactionDetail> {
        match transaction_type {
            TransactionType::Credit => CreditDetail::ALL
                .into_iter()
                .map(TransactionDetail::Credit)
                .collect(),
            TransactionType::Debit => DebitDetail::ALL
                .into_iter()
                .map(TransactionDetail::Debit)
                .collect(),
        }
    }

    /// Looks up a detail by name within the details of `transaction_type`,
    /// ignoring case and surrounding whitespace.
    pub fn parse(transaction_type: TransactionType, value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_uppercase();
        match transaction_type {
            TransactionType::Credit => {
                CreditDetail::from_storage(&value).map(TransactionDetail::Credit)
            }
            TransactionType::Debit => {
                DebitDetail::from_storage(&value).map(TransactionDetail::Debit)
            }
        }
    }

    pub fn transaction_type(self) -> TransactionType {
        match self {
            TransactionDetail::Credit(_) => TransactionType::Credit,
            TransactionDetail::Debit(_) => TransactionType::Debit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionDetail::Credit(CreditDetail::Salary) => "salary",
            TransactionDetail::Credit(CreditDetail::Extras) => "extras",
            TransactionDetail::Debit(DebitDetail::Food) => "food",
            TransactionDetail::Debit(DebitDetail::Transport) => "transport",
            TransactionDetail::Debit(DebitDetail::Health) => "health",
            TransactionDetail::Debit(DebitDetail::Housing) => "housing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub description: String,
    pub transaction_type: TransactionType,
    pub date: String,
    pub detail: Option<TransactionDetail>,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub fn display_created_at(&self) -> String {
        self.created_at.format("%d/%m/%Y %H:%M").to_string()
    }

    /// The amount with a `+`/`-` prefix for credits and debits.
    pub fn signed_amount(&self) -> String {
        let sign = match self.transaction_type {
            TransactionType::Credit => "+",
            TransactionType::Debit => "-",
        };
        format!("{} {}", sign, format_money(self.amount))
    }

    pub fn detail_label(&self) -> &'static str {
        self.detail.map(TransactionDetail::label).unwrap_or("-")
    }
}

/// A transaction that has not been stored yet.
///
/// The storage layer assigns the ID. A detail that does not match
/// `transaction_type` is dropped on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub description: String,
    pub transaction_type: TransactionType,
    pub date: String,
    pub detail: Option<TransactionDetail>,
    pub created_at: NaiveDateTime,
}

impl NewTransaction {
    pub fn new(
        amount: f64,
        description: &str,
        date: &str,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            amount,
            description: description.to_string(),
            transaction_type,
            date: date.to_string(),
            detail: None,
            created_at: Local::now().naive_local(),
        }
    }

    pub fn detail(mut self, detail: Option<TransactionDetail>) -> Self {
        self.detail = detail;
        self
    }

    /// Pins the creation time, which is otherwise the moment of construction.
    #[cfg(test)]
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

pub fn format_money(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_transaction_type_parse_case_insensitive() {
        assert_eq!("Credit".parse::<TransactionType>(), Ok(TransactionType::Credit));
        assert_eq!(" DEBIT ".parse::<TransactionType>(), Ok(TransactionType::Debit));
    }

    #[test]
    fn test_transaction_type_parse_invalid() {
        let result = "income".parse::<TransactionType>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid transaction type"));
    }

    #[test]
    fn test_unknown_detail_maps_to_none() {
        assert_eq!(CreditDetail::from_storage("BONUS"), None);
        assert_eq!(DebitDetail::from_storage(""), None);
        assert_eq!(DebitDetail::from_storage("HOUSING"), Some(DebitDetail::Housing));
    }

    #[test]
    fn test_stored_detail_must_match_exactly() {
        assert_eq!(DebitDetail::from_storage("housing"), None);
        assert_eq!(DebitDetail::from_storage(" HOUSING"), None);
        assert_eq!(CreditDetail::from_storage("Salary"), None);
    }

    #[test]
    fn test_detail_parse_respects_type() {
        assert_eq!(
            TransactionDetail::parse(TransactionType::Credit, "salary"),
            Some(TransactionDetail::Credit(CreditDetail::Salary))
        );
        assert_eq!(
            TransactionDetail::parse(TransactionType::Debit, " Housing "),
            Some(TransactionDetail::Debit(DebitDetail::Housing))
        );
        assert_eq!(TransactionDetail::parse(TransactionType::Credit, "food"), None);
        assert_eq!(TransactionDetail::parse(TransactionType::Debit, "salary"), None);
    }

    #[test]
    fn test_options_for_type() {
        let credit = TransactionDetail::options_for(TransactionType::Credit);
        assert_eq!(credit.len(), 2);
        assert!(credit.iter().all(|d| d.transaction_type() == TransactionType::Credit));

        let debit = TransactionDetail::options_for(TransactionType::Debit);
        assert_eq!(debit.len(), 4);
        assert_eq!(debit[0], TransactionDetail::Debit(DebitDetail::Food));
    }

    #[test]
    fn test_display_helpers() {
        let transaction = Transaction {
            id: 1,
            amount: 12.5,
            description: "Lunch".to_string(),
            transaction_type: TransactionType::Debit,
            date: "03/02/2025".to_string(),
            detail: None,
            created_at: NaiveDate::from_ymd_opt(2025, 2, 3)
                .unwrap()
                .and_hms_opt(13, 7, 0)
                .unwrap(),
        };

        assert_eq!(transaction.display_created_at(), "03/02/2025 13:07");
        assert_eq!(transaction.signed_amount(), "- R$ 12.50");
        assert_eq!(transaction.detail_label(), "-");
    }
}
