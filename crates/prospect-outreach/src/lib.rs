mod ledger;
mod message;
mod sender;

pub use ledger::{merge_companies, Ledger, LedgerRow};
pub use message::{encode_message, founder_name, MessageTemplate, FOUNDER_NAME_VAR};
pub use sender::{DryRunSender, GmailSender, Notifier, OutreachConfig, TOKEN_ENV_VAR};

pub use anyhow;
