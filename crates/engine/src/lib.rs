pub use demo::DemoUsers;
pub use error::{EngineError, StoreError};
pub use ledger::Posting;
pub use money::Money;
pub use store::{AuthLookup, UserStore};
pub use transactions::{Transaction, TransactionKind};
pub use users::{Language, User};

pub mod ledger;

mod demo;
mod error;
mod money;
mod store;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
