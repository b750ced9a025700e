use crate::config::Settings;
use crate::domain::model::{review_resource_name, Review, ReviewPage};
use crate::domain::ports::{ReplySink, ReviewSource};
use crate::utils::error::{ResponderError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// 最近更新的評論排在最前面
pub const ORDER_BY_UPDATE_TIME_DESC: &str = "update_time desc";

const STAR_RATING_WORDS: [(&str, u8); 5] =
    [("ONE", 1), ("TWO", 2), ("THREE", 3), ("FOUR", 4), ("FIVE", 5)];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListReviewsResponse {
    #[serde(default)]
    reviews: Vec<Value>,
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody<'a> {
    comment: &'a str,
    language_code: &'a str,
}

/// Business Profile reviews API client. Implements both the listing and the
/// reply-write ports; each call is a single attempt with no retry.
#[derive(Debug, Clone)]
pub struct BusinessProfileClient {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl BusinessProfileClient {
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self> {
        let base_url = validate_url("REVIEWS_API_BASE_URL", base_url)?;
        Ok(Self {
            client: Client::new(),
            base_url,
            access_token,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.api_base_url, settings.access_token.clone())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ResponderError::invalid(
                    "REVIEWS_API_BASE_URL",
                    self.base_url.as_str(),
                    "URL cannot be used as a base",
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ReviewSource for BusinessProfileClient {
    async fn fetch_page(
        &self,
        account_id: &str,
        location_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<ReviewPage> {
        let fetch_error = |message: String| ResponderError::Fetch {
            location_id: location_id.to_string(),
            message,
        };

        let url = self.endpoint(&["accounts", account_id, "locations", location_id, "reviews"])?;
        let mut query = vec![
            ("pageSize", page_size.to_string()),
            ("orderBy", ORDER_BY_UPDATE_TIME_DESC.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        tracing::debug!("Making API request to: {}", url);
        let response = self
            .authorize(self.client.get(url).query(&query))
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}: {}", status, body)));
        }

        parse_reviews_page(&body, location_id)
    }
}

#[async_trait]
impl ReplySink for BusinessProfileClient {
    async fn send_reply(
        &self,
        account_id: &str,
        review: &Review,
        reply_text: &str,
        language_code: &str,
    ) -> Result<()> {
        let review_name = review_resource_name(account_id, &review.location_id, &review.review_id);
        let send_error = |message: String| ResponderError::Send {
            review_name: review_name.clone(),
            message,
        };

        let url = self.endpoint(&[
            "accounts",
            account_id,
            "locations",
            review.location_id.as_str(),
            "reviews",
            review.review_id.as_str(),
            "reply",
        ])?;
        let body = ReplyBody {
            comment: reply_text,
            language_code,
        };

        tracing::debug!("Updating reply: {}", review_name);
        let response = self
            .authorize(self.client.put(url).json(&body))
            .send()
            .await
            .map_err(|e| send_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(send_error(format!("HTTP {}: {}", status, detail)));
        }

        Ok(())
    }
}

/// 解析一頁列表回應；單筆欄位錯誤只會降級，不會讓整頁失敗
pub fn parse_reviews_page(body: &str, location_id: &str) -> Result<ReviewPage> {
    let response: ListReviewsResponse =
        serde_json::from_str(body).map_err(|e| ResponderError::Fetch {
            location_id: location_id.to_string(),
            message: format!("Unexpected listing response: {}", e),
        })?;

    Ok(ReviewPage {
        reviews: response
            .reviews
            .iter()
            .map(|raw| parse_review(raw, location_id))
            .collect(),
        next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
    })
}

pub fn parse_review(raw: &Value, location_id: &str) -> Review {
    Review {
        review_id: raw
            .get("reviewId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        location_id: location_id.to_string(),
        star_rating: raw.get("starRating").map(parse_star_rating).unwrap_or(0),
        reviewer_name: raw
            .pointer("/reviewer/displayName")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        has_reply: raw.get("reviewReply").map(is_present).unwrap_or(false),
        update_time: raw
            .get("updateTime")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc)),
    }
}

/// `5`、`5.0`、`"5"`、`"FIVE"` 皆視為 5 星；其他值為 0
pub fn parse_star_rating(value: &Value) -> u8 {
    let rating = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && (1.0..=5.0).contains(f))
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            STAR_RATING_WORDS
                .iter()
                .find(|(word, _)| word.eq_ignore_ascii_case(s))
                .map(|(_, stars)| u64::from(*stars))
                .or_else(|| s.parse::<u64>().ok())
                .unwrap_or(0)
        }
        _ => 0,
    };

    if (1..=5).contains(&rating) {
        rating as u8
    } else {
        0
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Number(_) => true,
    }
}
