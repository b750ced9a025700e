use crate::domain::model::Review;
use crate::domain::ports::ReviewSource;
use crate::utils::error::Result;
use std::collections::VecDeque;

/// Lazily walks the listing pages of one location, following continuation
/// tokens until the service runs out of pages or `cap` reviews were yielded.
/// Single pass: once exhausted it stays exhausted.
pub struct ReviewPager<'a, S: ReviewSource + ?Sized> {
    source: &'a S,
    account_id: &'a str,
    location_id: &'a str,
    page_size: usize,
    cap: usize,
    buffer: VecDeque<Review>,
    next_token: Option<String>,
    started: bool,
    yielded: usize,
    pages_fetched: usize,
}

impl<'a, S: ReviewSource + ?Sized> ReviewPager<'a, S> {
    pub fn new(
        source: &'a S,
        account_id: &'a str,
        location_id: &'a str,
        page_size: usize,
        cap: usize,
    ) -> Self {
        Self {
            source,
            account_id,
            location_id,
            page_size,
            cap,
            buffer: VecDeque::new(),
            next_token: None,
            started: false,
            yielded: 0,
            pages_fetched: 0,
        }
    }

    /// 取得下一則評論；到達上限或沒有下一頁時回傳 None
    pub async fn next_review(&mut self) -> Result<Option<Review>> {
        loop {
            if self.yielded >= self.cap {
                return Ok(None);
            }

            if let Some(review) = self.buffer.pop_front() {
                self.yielded += 1;
                return Ok(Some(review));
            }

            if self.started && self.next_token.is_none() {
                return Ok(None);
            }

            self.fetch_next_page().await?;
        }
    }

    /// 依序取出全部（受上限約束）
    pub async fn collect(mut self) -> Result<Vec<Review>> {
        let mut reviews = Vec::new();
        while let Some(review) = self.next_review().await? {
            reviews.push(review);
        }
        Ok(reviews)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let token = self.next_token.take();
        tracing::debug!(
            "Fetching reviews page {} for location {} (token: {:?})",
            self.pages_fetched + 1,
            self.location_id,
            token
        );

        let page = self
            .source
            .fetch_page(
                self.account_id,
                self.location_id,
                self.page_size,
                token.as_deref(),
            )
            .await?;

        self.started = true;
        self.pages_fetched += 1;
        self.next_token = page.next_page_token.filter(|t| !t.is_empty());
        self.buffer.extend(page.reviews);
        Ok(())
    }
}
