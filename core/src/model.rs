//! The logical schema: `Word` as the owning aggregate, with owned `Kanji`,
//! `Reading` and `Sense` (which in turn owns `Gloss` and `SenseExample`).
//! Enumerated domains (part of speech, dialect, ...) are represented here
//! as their already-validated string codes — `kotoba-ingest` is responsible
//! for parsing JMdict's coded entity values into (and dropping unknown ones
//! before they ever reach) these `Vec<String>` fields, matching the
//! `jsonb` columns of the persisted schema.

use serde::Serialize;

/// A complete dictionary entry, as constructed by the ingestor and as
/// assembled by the detail hydrator. No back-references from child to
/// parent are kept in memory; only `word_id` is persisted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Word {
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct WordAggregate {
    pub id: i64,
    pub kanjis: Vec<Kanji>,
    pub readings: Vec<Reading>,
    pub senses: Vec<Sense>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kanji {
    pub text: String,
    pub is_common: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub text: String,
    pub is_common: bool,
    pub tags: Vec<String>,
    /// Kanji `text` values this reading applies to, or `["*"]` for all.
    pub applies_to_kanji: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sense {
    pub part_of_speech: Vec<String>,
    pub applies_to_kanji: Vec<String>,
    pub applies_to_reading: Vec<String>,
    pub fields: Vec<String>,
    pub dialects: Vec<String>,
    pub misc: Vec<String>,
    pub infos: Vec<String>,
    pub glosses: Vec<Gloss>,
    pub examples: Vec<SenseExample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gloss {
    pub text: String,
    pub gloss_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SenseExample {
    pub source: String,
    pub text: String,
    pub jpn: String,
    pub eng: String,
}

/// The wildcard token meaning "applies to every kanji form of this word".
pub const APPLIES_TO_ALL: &str = "*";

impl WordAggregate {
    /// The aggregate-level invariants: at least one reading, at least one
    /// sense, every sense has at least one gloss, every gloss has
    /// non-empty trimmed text, and every non-wildcard `applies_to_kanji`
    /// entry on a reading actually names one of the word's kanji forms.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.readings.is_empty() {
            return Err(format!("word {} has no readings", self.id));
        }
        if self.senses.is_empty() {
            return Err(format!("word {} has no senses", self.id));
        }
        for reading in &self.readings {
            for text in &reading.applies_to_kanji {
                if text == APPLIES_TO_ALL {
                    continue;
                }
                if !self.kanjis.iter().any(|k| &k.text == text) {
                    return Err(format!(
                        "word {} has a reading whose applies_to_kanji references unknown kanji {:?}",
                        self.id, text
                    ));
                }
            }
        }
        for sense in &self.senses {
            if sense.glosses.is_empty() {
                return Err(format!("word {} has a sense with no glosses", self.id));
            }
            for gloss in &sense.glosses {
                if gloss.text.trim().is_empty() {
                    return Err(format!("word {} has a gloss with empty text", self.id));
                }
            }
        }
        Ok(())
    }
}
