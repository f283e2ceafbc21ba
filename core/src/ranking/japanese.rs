//! The Japanese prefix-match scoring pipeline.
//!
//! The production path composes one parameterized SQL statement per call
//! via `sqlx::QueryBuilder`; `branch_score` below is a pure mirror of the
//! same arithmetic, kept in sync by hand, so the scoring formula can be
//! unit-tested without a database.

use sqlx::postgres::Postgres;
use sqlx::QueryBuilder;

use super::weights::Weights;
use crate::model::APPLIES_TO_ALL;

/// Per-word, per-branch aggregates computed by the `GROUP BY word_id` in
/// each branch's prefix-match CTE.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchStats {
    pub min_len: i64,
    pub is_exact: bool,
    pub any_common: bool,
}

/// Which column family a branch scores over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Reading,
    Kanji,
}

/// Pure mirror of the SQL `CASE`-based branch score computed in Postgres.
/// `query_len` is the normalized query's character count.
pub fn branch_score(branch: Branch, stats: BranchStats, query_len: usize, w: &Weights) -> f64 {
    let (base_weight, exact_weight) = match branch {
        Branch::Reading => (w.reading_weight, w.exact_reading_weight),
        Branch::Kanji => (w.kanji_weight, w.exact_kanji_weight),
    };
    let is_single_char = query_len == 1;

    let base = base_weight * if is_single_char { w.single_char_base_mult } else { 1.0 };
    let exact = if stats.is_exact {
        exact_weight * if is_single_char { w.single_char_exact_mult } else { 1.0 }
    } else {
        0.0
    };
    let length_weight = w.length_weight * if is_single_char { w.single_char_length_mult } else { 1.0 };
    let length_bonus = length_weight * (1.0 / (1.0 + stats.min_len as f64));

    base + exact + length_bonus
}

/// Aggregates branch scores from both branches for one word into the final
/// Japanese-pipeline score: `final = base_score + common_weight?`.
pub fn final_score(branch_scores: &[f64], any_common: bool, w: &Weights) -> f64 {
    let base_score: f64 = branch_scores.iter().sum();
    base_score + if any_common { w.common_weight } else { 0.0 }
}

/// One ranked hit from the Japanese pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedWord {
    pub word_id: i64,
    pub score: f64,
}

/// Builds the parameterized Japanese prefix-search query: two prefix-match
/// CTEs (reading, kanji), unioned and aggregated per word, ordered by final
/// score descending with a `word_id ASC` tie-break, limited to `limit` rows.
///
/// The single-character adjustment is expressed with a `CASE` on
/// `char_length($1)` so the same shape serves every query length.
pub fn build_query<'a>(q_norm: &'a str, limit: i64, w: &Weights) -> QueryBuilder<'a, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("WITH reading_stats AS (\n");
    push_prefix_stats_cte(&mut qb, "readings", q_norm);
    qb.push("\n),\nkanji_stats AS (\n");
    push_prefix_stats_cte(&mut qb, "kanjis", q_norm);
    qb.push("\n),\nreading_hits AS (\n  SELECT word_id, ");
    push_branch_score_expr(&mut qb, w.reading_weight, w.exact_reading_weight, w, q_norm);
    qb.push(" AS branch_score, any_common FROM reading_stats\n),\nkanji_hits AS (\n  SELECT word_id, ");
    push_branch_score_expr(&mut qb, w.kanji_weight, w.exact_kanji_weight, w, q_norm);
    qb.push(
        " AS branch_score, any_common FROM kanji_stats\n\
        ),\nall_hits AS (\n  \
          SELECT word_id, branch_score, any_common FROM reading_hits\n  \
          UNION ALL\n  \
          SELECT word_id, branch_score, any_common FROM kanji_hits\n\
        ),\nscored AS (\n  \
          SELECT word_id, SUM(branch_score) AS base_score, MAX(any_common::int) AS has_common\n  \
          FROM all_hits GROUP BY word_id\n\
        )\n\
        SELECT word_id, (base_score + CASE WHEN has_common = 1 THEN ",
    );
    qb.push_bind(w.common_weight);
    qb.push(" ELSE 0.0 END) AS score FROM scored ORDER BY score DESC, word_id ASC LIMIT ");
    qb.push_bind(limit);
    qb
}

fn push_prefix_stats_cte<'a>(qb: &mut QueryBuilder<'a, Postgres>, table: &'static str, q_norm: &'a str) {
    qb.push("  SELECT word_id,\n    MIN(char_length(text)) AS min_len,\n    MAX(CASE WHEN text = ");
    qb.push_bind(q_norm);
    qb.push(" THEN 1 ELSE 0 END) AS is_exact,\n    MAX(CASE WHEN is_common THEN 1 ELSE 0 END) AS any_common\n  FROM ");
    qb.push(table);
    qb.push("\n  WHERE text ILIKE ");
    qb.push_bind(format!("{}%", q_norm.replace('%', "\\%").replace('_', "\\_")));
    qb.push("\n  GROUP BY word_id");
}

fn push_branch_score_expr<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    base_weight: f64,
    exact_weight: f64,
    w: &Weights,
    q_norm: &'a str,
) {
    qb.push("(");
    qb.push_bind(base_weight);
    qb.push(" * (CASE WHEN char_length(");
    qb.push_bind(q_norm);
    qb.push(") = 1 THEN ");
    qb.push_bind(w.single_char_base_mult);
    qb.push(" ELSE 1.0 END)\n    + CASE WHEN is_exact = 1 THEN ");
    qb.push_bind(exact_weight);
    qb.push(" * (CASE WHEN char_length(");
    qb.push_bind(q_norm);
    qb.push(") = 1 THEN ");
    qb.push_bind(w.single_char_exact_mult);
    qb.push(" ELSE 1.0 END) ELSE 0.0 END\n    + ");
    qb.push_bind(w.length_weight);
    qb.push(" * (CASE WHEN char_length(");
    qb.push_bind(q_norm);
    qb.push(") = 1 THEN ");
    qb.push_bind(w.single_char_length_mult);
    qb.push(" ELSE 1.0 END) * (1.0 / (1.0 + min_len::float8)))");
}

/// `applies_to_kanji`/`applies_to_reading` wildcard check shared by the
/// hydrator and the ingestor's validation: does `list` apply to `text`?
pub fn applies_to(list: &[String], text: &str) -> bool {
    list.iter().any(|v| v == APPLIES_TO_ALL || v == text)
}
