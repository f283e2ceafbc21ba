//! The detail hydrator: given ranked word ids, batch-load representative
//! headwords, readings and a bounded number of glosses per word, in
//! exactly three round trips regardless of result-set size.

use std::collections::HashMap;

use crate::error::SearchError;
use crate::store::EntryStore;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct WordDetails {
    pub kanji: Vec<String>,
    pub readings: Vec<String>,
    pub glosses: Vec<String>,
}

pub struct DetailHydrator<'a> {
    store: &'a EntryStore,
}

impl<'a> DetailHydrator<'a> {
    pub fn new(store: &'a EntryStore) -> Self {
        Self { store }
    }

    /// Exactly three batched reads, each filtered by `word_id IN (...)`.
    /// Guarantees one entry (possibly empty) for every input id.
    pub async fn hydrate(
        &self,
        word_ids: &[i64],
        max_glosses_per_word: usize,
    ) -> Result<HashMap<i64, WordDetails>, SearchError> {
        let (readings, kanji, gloss_rows) = futures::try_join!(
            async { self.store.fetch_readings(word_ids).await },
            async { self.store.fetch_kanji(word_ids).await },
            async {
                self.store
                    .fetch_glosses_capped(word_ids, max_glosses_per_word as i64)
                    .await
            },
        )
        .map_err(SearchError::from)?;

        let glosses = bucket_glosses(gloss_rows, max_glosses_per_word);

        Ok(word_ids
            .iter()
            .map(|&id| {
                let details = WordDetails {
                    kanji: kanji.get(&id).cloned().unwrap_or_default(),
                    readings: readings.get(&id).cloned().unwrap_or_default(),
                    glosses: glosses.get(&id).cloned().unwrap_or_default(),
                };
                (id, details)
            })
            .collect())
    }
}

/// Truncates storage-ordered `(word_id, gloss_text)` rows so no word
/// contributes more than `max_glosses_per_word` entries, preserving the
/// storage order within each word's bucket. Pure and DB-free so the
/// truncation/ordering semantics are directly unit-testable.
pub fn bucket_glosses(rows: Vec<(i64, String)>, max_glosses_per_word: usize) -> HashMap<i64, Vec<String>> {
    let mut out: HashMap<i64, Vec<String>> = HashMap::new();
    for (word_id, text) in rows {
        let bucket = out.entry(word_id).or_default();
        if bucket.len() < max_glosses_per_word {
            bucket.push(text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_glosses_truncates_per_word_preserving_order() {
        let rows = vec![
            (1, "a".to_string()),
            (1, "b".to_string()),
            (1, "c".to_string()),
            (2, "x".to_string()),
        ];
        let out = bucket_glosses(rows, 2);
        assert_eq!(out[&1], vec!["a", "b"]);
        assert_eq!(out[&2], vec!["x"]);
    }

    #[test]
    fn bucket_glosses_handles_empty_input() {
        let out = bucket_glosses(vec![], 3);
        assert!(out.is_empty());
    }

    #[test]
    fn hydrate_guarantees_an_entry_per_input_id_shape() {
        // Exercised at the WordDetails-construction level: any id absent
        // from both maps still yields a (possibly empty) WordDetails, the
        // same shape `hydrate` produces for a store miss.
        let readings: HashMap<i64, Vec<String>> = HashMap::new();
        let kanji: HashMap<i64, Vec<String>> = HashMap::new();
        let glosses: HashMap<i64, Vec<String>> = HashMap::new();
        let ids = [1_i64, 2, 3];
        let out: HashMap<i64, WordDetails> = ids
            .iter()
            .map(|&id| {
                (
                    id,
                    WordDetails {
                        kanji: kanji.get(&id).cloned().unwrap_or_default(),
                        readings: readings.get(&id).cloned().unwrap_or_default(),
                        glosses: glosses.get(&id).cloned().unwrap_or_default(),
                    },
                )
            })
            .collect();
        for id in ids {
            assert!(out.contains_key(&id));
        }
    }
}
