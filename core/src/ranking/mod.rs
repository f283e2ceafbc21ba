pub mod english;
pub mod japanese;
pub mod weights;

pub use japanese::RankedWord;
pub use weights::Weights;

use crate::error::SearchError;
use crate::normalize::normalize;
use crate::store::EntryStore;

/// The unified ranking entry point: normalize, classify, dispatch to
/// whichever pipeline matches, return an ordered list of at most `limit`
/// `(word_id, score)` pairs.
pub struct RankingEngine<'a> {
    store: &'a EntryStore,
    weights: Weights,
}

impl<'a> RankingEngine<'a> {
    pub fn new(store: &'a EntryStore, weights: Weights) -> Self {
        Self { store, weights }
    }

    pub async fn rank(&self, query: &str, limit: i64) -> Result<Vec<RankedWord>, SearchError> {
        let normalized = normalize(query)?;
        if normalized.is_japanese {
            Ok(self.store.rank_japanese(&normalized.text, limit, &self.weights).await?)
        } else {
            Ok(self.store.rank_english(query, limit, &self.weights).await?)
        }
    }
}
