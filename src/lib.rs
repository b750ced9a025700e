pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{BusinessProfileClient, ReviewLedger};
pub use config::Settings;
pub use crate::core::{
    filter::filter_needing_reply,
    pager::ReviewPager,
    responder::ReviewResponder,
    templates::{build_reply, choose_template, render_template},
};
pub use domain::model::{LedgerEntry, PendingReply, Review, RunMode, RunReport};
pub use utils::error::{ResponderError, Result};
