//! The English full-text scoring pipeline.

use regex::Regex;
use sqlx::postgres::Postgres;
use sqlx::QueryBuilder;

use super::weights::Weights;

/// Per-word aggregates from the gloss full-text match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlossStats {
    pub rank_max: f64,
    pub exact_any: bool,
}

/// Pure mirror of the SQL scoring expression:
/// `gloss_weight * rank_max + exact_word_weight * exact_any + common_weight * any_common`.
pub fn final_score(stats: GlossStats, any_common: bool, w: &Weights) -> f64 {
    w.gloss_weight * stats.rank_max
        + w.exact_word_weight * if stats.exact_any { 1.0 } else { 0.0 }
        + w.common_weight * if any_common { 1.0 } else { 0.0 }
}

/// Whole-word, case-insensitive match of `query` inside `gloss_text`,
/// mirroring Postgres `~*` with `\y...\y` word boundaries. Used by the
/// pure mirror above and by `kotoba-ingest`'s tests; production scoring
/// computes this inside Postgres via the same `~*` operator so the
/// behavior can never drift from what the SQL actually evaluates.
pub fn exact_word_match(gloss_text: &str, query: &str) -> bool {
    if query.trim().is_empty() {
        return false;
    }
    let pattern = format!(r"(?i)\b{}\b", regex::escape(query.trim()));
    Regex::new(&pattern).map(|re| re.is_match(gloss_text)).unwrap_or(false)
}

/// Builds the parameterized English full-text query:
/// `ts_rank_cd` over `to_tsvector('english', gloss.text)` against
/// `plainto_tsquery('english', q_raw)`, normalization flags `1 | 16 | 32`,
/// joined against a common-flag rollup over the word's readings/kanji.
pub fn build_query<'a>(q_raw: &'a str, limit: i64, w: &Weights) -> QueryBuilder<'a, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        "WITH gloss_scores AS (\n  \
           SELECT senses.word_id,\n    \
             MAX(ts_rank_cd(to_tsvector('english', coalesce(glosses.text, '')), plainto_tsquery('english', ",
    );
    qb.push_bind(q_raw);
    qb.push(
        "), 49)) AS rank_max,\n    \
             MAX(CASE WHEN glosses.text ~* ('\\y' || ",
    );
    qb.push_bind(q_raw);
    qb.push(
        " || '\\y') THEN 1 ELSE 0 END) AS exact_any\n  \
           FROM glosses JOIN senses ON senses.id = glosses.sense_id\n  \
           WHERE to_tsvector('english', coalesce(glosses.text, '')) @@ plainto_tsquery('english', ",
    );
    qb.push_bind(q_raw);
    qb.push(
        ")\n  GROUP BY senses.word_id\n\
        ),\nany_common AS (\n  \
          SELECT senses.word_id,\n    \
            GREATEST(\n      \
              COALESCE(MAX(readings.is_common::int), 0),\n      \
              COALESCE(MAX(kanjis.is_common::int), 0)\n    \
            ) AS any_common\n  \
          FROM senses\n  \
          LEFT JOIN readings ON readings.word_id = senses.word_id\n  \
          LEFT JOIN kanjis ON kanjis.word_id = senses.word_id\n  \
          GROUP BY senses.word_id\n\
        )\n\
        SELECT gloss_scores.word_id,\n  \
          (",
    );
    qb.push_bind(w.gloss_weight);
    qb.push(" * gloss_scores.rank_max\n   + ");
    qb.push_bind(w.exact_word_weight);
    qb.push(" * gloss_scores.exact_any\n   + ");
    qb.push_bind(w.common_weight);
    qb.push(
        " * COALESCE(any_common.any_common, 0)) AS score\n\
        FROM gloss_scores\n\
        LEFT JOIN any_common ON any_common.word_id = gloss_scores.word_id\n\
        ORDER BY score DESC, gloss_scores.word_id ASC\n\
        LIMIT ",
    );
    qb.push_bind(limit);
    qb
}
