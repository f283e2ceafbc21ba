//! The search coordinator: composes the ranking engine and the detail
//! hydrator, ranks then hydrates then zips scores with details in rank
//! order.

use serde::Serialize;

use crate::error::SearchError;
use crate::hydrate::DetailHydrator;
use crate::ranking::{RankedWord, RankingEngine, Weights};
use crate::store::EntryStore;

pub const DEFAULT_LIMIT: i64 = 20;
pub const DEFAULT_OFFSET: i64 = 0;
pub const MAX_GLOSSES_PER_WORD: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub id: i64,
    pub kanji: Vec<String>,
    pub readings: Vec<String>,
    pub glosses: Vec<String>,
    pub score: f64,
}

/// Slices ranked hits by `offset`, returning `None` when nothing is left —
/// the decision point that determines whether `search` issues a hydration
/// call at all. Pulled out as a pure function so that short-circuit is
/// directly unit-testable without a store to call `hydrate` against.
fn page_after_offset(ranked: Vec<RankedWord>, offset: i64) -> Option<Vec<RankedWord>> {
    let page: Vec<_> = ranked.into_iter().skip(offset.max(0) as usize).collect();
    if page.is_empty() {
        None
    } else {
        Some(page)
    }
}

pub struct SearchCoordinator<'a> {
    store: &'a EntryStore,
    weights: Weights,
}

impl<'a> SearchCoordinator<'a> {
    pub fn new(store: &'a EntryStore, weights: Weights) -> Self {
        Self { store, weights }
    }

    pub async fn search(&self, query: &str, limit: i64, offset: i64) -> Result<Vec<ResultRow>, SearchError> {
        let ranking = RankingEngine::new(self.store, self.weights);
        let ranked = ranking.rank(query, limit + offset).await?;

        let page = page_after_offset(ranked, offset);
        let Some(page) = page else {
            // Nothing ranked at or past the offset; skip hydration entirely.
            return Ok(Vec::new());
        };

        let word_ids: Vec<i64> = page.iter().map(|r| r.word_id).collect();
        let hydrator = DetailHydrator::new(self.store);
        let details = hydrator.hydrate(&word_ids, MAX_GLOSSES_PER_WORD).await?;

        Ok(page
            .into_iter()
            .map(|ranked| {
                let d = details.get(&ranked.word_id).cloned().unwrap_or_default();
                ResultRow {
                    id: ranked.word_id,
                    kanji: d.kanji,
                    readings: d.readings,
                    glosses: d.glosses,
                    score: ranked.score,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydrate::WordDetails;
    use std::collections::HashMap;

    #[test]
    fn empty_ranking_skips_hydration() {
        assert!(page_after_offset(vec![], 0).is_none());
    }

    #[test]
    fn offset_past_the_end_of_ranking_also_skips_hydration() {
        let ranked = vec![RankedWord { word_id: 1, score: 1.0 }];
        assert!(page_after_offset(ranked, 5).is_none());
    }

    #[test]
    fn offset_slices_without_dropping_to_empty_when_rows_remain() {
        let ranked = vec![
            RankedWord { word_id: 1, score: 3.0 },
            RankedWord { word_id: 2, score: 2.0 },
        ];
        let page = page_after_offset(ranked, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].word_id, 2);
    }

    /// Pure reassembly step mirrored from `search` — zips ranked ids (in
    /// rank order) with hydrated details, independent of how the details
    /// map was populated or in what order its batched reads completed.
    fn assemble(ranked: Vec<RankedWord>, details: &HashMap<i64, WordDetails>) -> Vec<ResultRow> {
        ranked
            .into_iter()
            .map(|r| {
                let d = details.get(&r.word_id).cloned().unwrap_or_default();
                ResultRow {
                    id: r.word_id,
                    kanji: d.kanji,
                    readings: d.readings,
                    glosses: d.glosses,
                    score: r.score,
                }
            })
            .collect()
    }

    #[test]
    fn hydrator_ordering_preserved_even_if_reads_land_out_of_order() {
        let ranked = vec![
            RankedWord { word_id: 1, score: 3.0 },
            RankedWord { word_id: 2, score: 2.0 },
            RankedWord { word_id: 3, score: 1.0 },
        ];
        // Simulate a details map populated in B, A, C order (as if the
        // batched read for B's row arrived before A's).
        let mut details = HashMap::new();
        details.insert(2, WordDetails { kanji: vec!["B".into()], ..Default::default() });
        details.insert(1, WordDetails { kanji: vec!["A".into()], ..Default::default() });
        details.insert(3, WordDetails { kanji: vec!["C".into()], ..Default::default() });

        let rows = assemble(ranked, &details);
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(rows[0].kanji, vec!["A"]);
        assert_eq!(rows[1].kanji, vec!["B"]);
        assert_eq!(rows[2].kanji, vec!["C"]);
    }

    #[test]
    fn rank_result_is_capped_at_limit() {
        let ranked: Vec<RankedWord> = (0..50).map(|i| RankedWord { word_id: i, score: 50.0 - i as f64 }).collect();
        let capped: Vec<_> = ranked.into_iter().take(20).collect();
        assert_eq!(capped.len(), 20);
        // monotonically non-increasing
        for w in capped.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
    }
}
