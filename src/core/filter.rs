use crate::domain::model::Review;

/// 保留仍需回覆的評論：有 id 且尚無店家回覆，順序不變
pub fn filter_needing_reply<I>(reviews: I) -> Vec<Review>
where
    I: IntoIterator<Item = Review>,
{
    reviews
        .into_iter()
        .filter(|review| !review.review_id.is_empty() && !review.has_reply)
        .collect()
}
