use crate::adapters::ledger::ReviewLedger;
use crate::config::Settings;
use crate::core::filter::filter_needing_reply;
use crate::core::pager::ReviewPager;
use crate::core::templates::build_reply;
use crate::domain::model::{LedgerEntry, PendingReply, RunMode, RunReport};
use crate::domain::ports::{ReplySink, ReviewSource};
use crate::utils::error::Result;

/// Drives one run: for every configured location pull the capped review
/// feed, reply to what still needs a reply, then record the batch.
///
/// Any fetch, render or send error aborts the run where it happens. The
/// ledger batch is only written after every location succeeded.
pub struct ReviewResponder<S: ReviewSource, K: ReplySink> {
    settings: Settings,
    source: S,
    sink: K,
}

impl<S: ReviewSource, K: ReplySink> ReviewResponder<S, K> {
    pub fn new(settings: Settings, source: S, sink: K) -> Self {
        Self {
            settings,
            source,
            sink,
        }
    }

    pub async fn run(&self, ledger: &ReviewLedger, mode: RunMode) -> Result<RunReport> {
        tracing::info!(
            "🚀 Processing {} location(s) in {:?} mode",
            self.settings.location_ids.len(),
            mode
        );

        let mut replies = Vec::new();
        for location_id in &self.settings.location_ids {
            let responses = self.process_location(ledger, location_id, mode).await?;
            tracing::info!(
                "📍 Location {}: {} review(s) answered",
                location_id,
                responses.len()
            );
            replies.extend(responses);
        }

        let recorded = if mode.is_simulate() {
            tracing::info!("🧪 Simulate mode: ledger left untouched");
            0
        } else {
            let entries: Vec<LedgerEntry> = replies.iter().map(|r| r.entry.clone()).collect();
            ledger.mark_responded(&entries).await?
        };

        Ok(RunReport {
            mode,
            replies,
            recorded,
        })
    }

    /// 處理單一地點：抓取、過濾、略過已回覆、產生並送出回覆
    pub async fn process_location(
        &self,
        ledger: &ReviewLedger,
        location_id: &str,
        mode: RunMode,
    ) -> Result<Vec<PendingReply>> {
        let reviews = ReviewPager::new(
            &self.source,
            &self.settings.account_id,
            location_id,
            self.settings.reviews_page_size,
            self.settings.max_reviews_per_location,
        )
        .collect()
        .await?;
        let fetched = reviews.len();

        let to_reply = filter_needing_reply(reviews);
        tracing::debug!(
            "Location {}: fetched {}, {} without a reply",
            location_id,
            fetched,
            to_reply.len()
        );

        let mut responded = Vec::new();
        for review in to_reply {
            if ledger.has_responded(location_id, &review.review_id).await? {
                tracing::debug!("Skipping {}: already in ledger", review.review_id);
                continue;
            }

            let reply_text = build_reply(&self.settings.response_templates, &review)?;

            if !mode.is_simulate() {
                self.sink
                    .send_reply(
                        &self.settings.account_id,
                        &review,
                        &reply_text,
                        &self.settings.default_language,
                    )
                    .await?;
                tracing::info!(
                    "💬 Replied to review {} ({}★)",
                    review.review_id,
                    review.star_rating
                );
            }

            responded.push(PendingReply {
                entry: LedgerEntry::new(location_id, review.review_id.clone()),
                star_rating: review.star_rating,
                reviewer_name: review.reviewer_name,
                reply_text,
            });
        }

        Ok(responded)
    }
}
