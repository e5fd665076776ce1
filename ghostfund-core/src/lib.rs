//! ghostfund-core: ledger row types, the deposit grammar, and Dhaka time rules.

pub mod amount;
pub mod deposit;
pub mod time;

pub use amount::{extract_amount, is_saving_message};
pub use deposit::{DepositRow, SummaryRow, summarize};
pub use time::{BD_TZ, bd_now, to_bd_datetime, week_range};
