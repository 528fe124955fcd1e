//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account_event;
pub mod credit_transaction;
pub mod ledger_account;
pub mod ledger_entry;
pub mod note_item;

// Re-export specific types to avoid conflicts
pub use account_event::{
    Column as AccountEventColumn, Entity as AccountEvent, Model as AccountEventModel,
};
pub use credit_transaction::{
    Column as CreditTransactionColumn, Entity as CreditTransaction,
    Model as CreditTransactionModel,
};
pub use ledger_account::{
    Column as LedgerAccountColumn, Entity as LedgerAccount, Model as LedgerAccountModel,
};
pub use ledger_entry::{
    Column as LedgerEntryColumn, Entity as LedgerEntry, Model as LedgerEntryModel,
};
pub use note_item::{Column as NoteItemColumn, Entity as NoteItem, Model as NoteItemModel};
