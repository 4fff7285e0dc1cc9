pub mod connection;
pub mod transaction_store;
