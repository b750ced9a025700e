pub mod filter;
pub mod pager;
pub mod responder;
pub mod templates;

pub use crate::domain::model::{LedgerEntry, PendingReply, Review, ReviewPage, RunMode, RunReport};
pub use crate::domain::ports::{ReplySink, ReviewSource};
pub use crate::utils::error::Result;
