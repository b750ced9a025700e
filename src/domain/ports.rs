use crate::domain::model::{Review, ReviewPage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 遠端評論列表 API
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetches one page, newest update first. `page_token` is the continuation
    /// token returned with the previous page.
    async fn fetch_page(
        &self,
        account_id: &str,
        location_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<ReviewPage>;
}

/// 遠端回覆寫入 API
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(
        &self,
        account_id: &str,
        review: &Review,
        reply_text: &str,
        language_code: &str,
    ) -> Result<()>;
}
