use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一則評論，僅存在於單次處理流程中
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// 空字串代表無法回覆
    pub review_id: String,
    pub location_id: String,
    /// 1..=5，缺漏或格式錯誤時為 0
    pub star_rating: u8,
    pub reviewer_name: Option<String>,
    pub has_reply: bool,
    pub update_time: Option<DateTime<Utc>>,
}

/// 一頁列表結果與續頁 token
#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub next_page_token: Option<String>,
}

/// Ledger 的唯一鍵：(location, review)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub location_id: String,
    pub review_id: String,
}

impl LedgerEntry {
    pub fn new(location_id: impl Into<String>, review_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            review_id: review_id.into(),
        }
    }
}

impl From<&Review> for LedgerEntry {
    fn from(review: &Review) -> Self {
        Self::new(review.location_id.clone(), review.review_id.clone())
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "location={} review={}", self.location_id, self.review_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Live,
    /// 只產生預覽，不呼叫寫入 API，也不寫入 ledger
    Simulate,
}

impl RunMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::Simulate
        } else {
            Self::Live
        }
    }

    pub fn is_simulate(self) -> bool {
        self == Self::Simulate
    }
}

/// 本次執行新回覆（或模擬回覆）的評論
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub entry: LedgerEntry,
    pub star_rating: u8,
    pub reviewer_name: Option<String>,
    pub reply_text: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: RunMode,
    pub replies: Vec<PendingReply>,
    /// Live 模式下實際寫入 ledger 的筆數
    pub recorded: u64,
}

impl RunReport {
    pub fn sent_count(&self) -> usize {
        if self.mode.is_simulate() {
            0
        } else {
            self.replies.len()
        }
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.replies.iter().map(|reply| reply.entry.clone()).collect()
    }
}

/// 執行結束時給操作人員看的摘要：模擬模式列出預覽，正式模式只報數量
impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            RunMode::Simulate if self.replies.is_empty() => {
                write!(f, "No new reviews to respond to.")
            }
            RunMode::Simulate => {
                write!(f, "Reviews queued for response:")?;
                for reply in &self.replies {
                    write!(
                        f,
                        "\n- {} rating={} reply={:?}",
                        reply.entry, reply.star_rating, reply.reply_text
                    )?;
                }
                Ok(())
            }
            RunMode::Live => write!(f, "Sent {} replies.", self.sent_count()),
        }
    }
}

pub fn location_resource_name(account_id: &str, location_id: &str) -> String {
    format!("accounts/{}/locations/{}", account_id, location_id)
}

pub fn review_resource_name(account_id: &str, location_id: &str, review_id: &str) -> String {
    format!(
        "{}/reviews/{}",
        location_resource_name(account_id, location_id),
        review_id
    )
}
