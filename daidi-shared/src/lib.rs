pub mod money;
pub mod pii;
pub mod models;

pub use money::{round_currency, Money, CURRENCY_CODE};
pub use pii::Masked;
