//! JMdict XML (and preprocessed-JSON) parsing into `WordAggregate`s.
//!
//! Uses `roxmltree` with `ParsingOptions { allow_dtd: true }` since JMdict's
//! XML declares a large set of DTD entities for its abbreviations. Never
//! panics on a malformed entry — one bad `<entry>` is skipped, not fatal to
//! the run.

use kotoba_core::model::{Gloss, Kanji, Reading, Sense, SenseExample, WordAggregate, APPLIES_TO_ALL};
use roxmltree::{Document, Node, ParsingOptions};
use serde::Deserialize;

use crate::enums::{Dialect, GlossType, Language, MiscInfo, PartOfSpeech, SubjectField};
use crate::error::IngestError;
use crate::priority::{is_common, parse_priorities};

/// The implicit namespace of the reserved `xml:` prefix (XML 1.0 §2.3),
/// used to read `xml:lang` off `<gloss>` without relying on an explicit
/// `xmlns:xml` declaration that JMdict's DTD never emits.
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parses a full JMdict XML document, returning one `WordAggregate` per
/// well-formed `<entry>`. A malformed entry is dropped with a logged
/// warning rather than aborting the whole file.
pub fn parse_xml(text: &str) -> Result<Vec<WordAggregate>, IngestError> {
    let opts = ParsingOptions { allow_dtd: true };
    let doc = Document::parse_with_options(text, opts)?;

    let mut words = Vec::new();
    for entry_node in doc
        .root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "entry")
    {
        match parse_entry(entry_node) {
            Ok(word) => words.push(word),
            Err(err) => tracing::warn!(error = %err, "dropping malformed entry"),
        }
    }
    Ok(words)
}

fn parse_entry(node: Node) -> Result<WordAggregate, IngestError> {
    let ent_seq_text = node
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == "ent_seq")
        .and_then(|n| n.text())
        .ok_or_else(|| IngestError::MalformedEntry("missing ent_seq".into()))?;
    let ent_seq: i64 = ent_seq_text
        .trim()
        .parse()
        .map_err(|_| IngestError::MalformedEntry(format!("ent_seq {ent_seq_text:?} is not an integer")))?;

    let mut kanjis = Vec::new();
    let mut readings = Vec::new();
    let mut senses = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "ent_seq" => {}
            "k_ele" => kanjis.push(parse_k_ele(child, ent_seq)),
            "r_ele" => readings.push(parse_r_ele(child, ent_seq)),
            "sense" => senses.push(parse_sense(child)),
            other => tracing::debug!(tag = other, ent_seq, "ignoring unexpected top-level tag"),
        }
    }

    let word = WordAggregate { id: ent_seq, kanjis, readings, senses };
    word.check_invariants()
        .map_err(IngestError::MalformedEntry)?;
    Ok(word)
}

fn parse_k_ele(node: Node, ent_seq: i64) -> Kanji {
    let mut text = String::new();
    let mut tags = Vec::new();
    let mut priorities = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "keb" => text = child.text().unwrap_or_default().trim().to_string(),
            "ke_inf" => {
                if let Some(code) = child.text() {
                    tags.extend(code_or_keep(code));
                }
            }
            "ke_pri" => {
                if let Some(tokens) = child.text() {
                    priorities.extend(collect_priority_tokens(tokens, ent_seq));
                }
            }
            _ => {}
        }
    }

    Kanji { text, is_common: is_common(&priorities), tags }
}

fn parse_r_ele(node: Node, ent_seq: i64) -> Reading {
    let mut text = String::new();
    let mut tags = Vec::new();
    let mut priorities = Vec::new();
    let mut applies_to_kanji = vec![APPLIES_TO_ALL.to_string()];

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "reb" => text = child.text().unwrap_or_default().trim().to_string(),
            "re_nokanji" => tags.push("nokanji".to_string()),
            "re_restr" => {
                if let Some(restr) = child.text() {
                    if applies_to_kanji == [APPLIES_TO_ALL.to_string()] {
                        applies_to_kanji.clear();
                    }
                    applies_to_kanji.push(restr.trim().to_string());
                }
            }
            "re_inf" => {
                if let Some(code) = child.text() {
                    tags.extend(code_or_keep(code));
                }
            }
            "re_pri" => {
                if let Some(tokens) = child.text() {
                    priorities.extend(collect_priority_tokens(tokens, ent_seq));
                }
            }
            _ => {}
        }
    }

    Reading { text, is_common: is_common(&priorities), tags, applies_to_kanji }
}

fn parse_sense(node: Node) -> Sense {
    let mut part_of_speech = Vec::new();
    let mut applies_to_kanji = vec![APPLIES_TO_ALL.to_string()];
    let mut applies_to_reading = vec![APPLIES_TO_ALL.to_string()];
    let mut fields = Vec::new();
    let mut dialects = Vec::new();
    let mut misc = Vec::new();
    let mut infos = Vec::new();
    let mut glosses = Vec::new();
    let mut examples = Vec::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "pos" => {
                if let Some(code) = child.text() {
                    if let Some(pos) = PartOfSpeech::parse_or_none(code) {
                        part_of_speech.push(pos.code().to_string());
                    }
                }
            }
            "stagk" => push_restriction(&mut applies_to_kanji, child.text()),
            "stagr" => push_restriction(&mut applies_to_reading, child.text()),
            "field" => {
                if let Some(code) = child.text() {
                    if let Some(field) = SubjectField::parse_or_none(code) {
                        fields.push(field.code().to_string());
                    }
                }
            }
            "dial" => {
                if let Some(code) = child.text() {
                    if let Some(dial) = Dialect::parse_or_none(code) {
                        dialects.push(dial.code().to_string());
                    }
                }
            }
            "misc" => {
                if let Some(code) = child.text() {
                    if let Some(m) = MiscInfo::parse_or_none(code) {
                        misc.push(m.code().to_string());
                    }
                }
            }
            "s_inf" => {
                if let Some(text) = child.text() {
                    infos.push(text.trim().to_string());
                }
            }
            "gloss" => {
                if let Some(text) = child.text() {
                    let gloss_type = child
                        .attribute("g_type")
                        .and_then(GlossType::parse_or_none)
                        .map(|t| t.code().to_string());
                    let lang_is_english = child
                        .attribute((XML_NAMESPACE, "lang"))
                        .and_then(Language::parse_or_none)
                        .map(|l| l == Language::English)
                        .unwrap_or(true);
                    if lang_is_english {
                        glosses.push(Gloss { text: text.trim().to_string(), gloss_type });
                    }
                }
            }
            _ => {}
        }
    }

    Sense {
        part_of_speech,
        applies_to_kanji,
        applies_to_reading,
        fields,
        dialects,
        misc,
        infos,
        glosses,
        examples,
    }
}

fn push_restriction(target: &mut Vec<String>, text: Option<&str>) {
    if let Some(value) = text {
        if target == &[APPLIES_TO_ALL.to_string()] {
            target.clear();
        }
        target.push(value.trim().to_string());
    }
}

/// `ke_inf`/`re_inf` sometimes carry a raw entity name rather than the
/// short code; a code that doesn't parse is kept verbatim rather than
/// dropped, since it may still be meaningful free text.
fn code_or_keep(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn collect_priority_tokens(raw: &str, ent_seq: i64) -> Vec<crate::priority::Priority> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let parsed = parse_priorities(tokens.iter().copied());
    for token in &tokens {
        if crate::priority::parse_priority(token).is_none() {
            let err = IngestError::UnknownPriority { ent_seq, token: token.to_string() };
            tracing::warn!(error = %err, "dropping unrecognized priority token");
        }
    }
    parsed
}

/// The preprocessed JSON ingestion form, an alternative to XML for sources
/// that have already flattened JMdict into a document store. Mirrors the
/// XML shape one-for-one; the example field is named `lang`, not `land`.
#[derive(Debug, Deserialize)]
pub struct JsonEntry {
    pub ent_seq: i64,
    #[serde(default)]
    pub kanjis: Vec<JsonKanji>,
    pub readings: Vec<JsonReading>,
    pub senses: Vec<JsonSense>,
}

#[derive(Debug, Deserialize)]
pub struct JsonKanji {
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct JsonReading {
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(default = "default_applies_to_all")]
    pub applies_to_kanji: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct JsonSense {
    #[serde(default)]
    pub part_of_speech: Vec<String>,
    #[serde(default = "default_applies_to_all")]
    pub applies_to_kanji: Vec<String>,
    #[serde(default = "default_applies_to_all")]
    pub applies_to_reading: Vec<String>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub dialects: Vec<String>,
    #[serde(default)]
    pub misc: Vec<String>,
    #[serde(default)]
    pub infos: Vec<String>,
    pub glosses: Vec<JsonGloss>,
    #[serde(default)]
    pub examples: Vec<JsonExample>,
}

#[derive(Debug, Deserialize)]
pub struct JsonGloss {
    pub text: String,
    #[serde(default)]
    pub gloss_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JsonExample {
    pub source: String,
    pub text: String,
    pub jpn: String,
    /// Named `lang` on purpose — see the module doc comment.
    pub lang: String,
}

fn default_applies_to_all() -> Vec<String> {
    vec![APPLIES_TO_ALL.to_string()]
}

pub fn parse_json(text: &str) -> Result<Vec<WordAggregate>, IngestError> {
    let entries: Vec<JsonEntry> = serde_json::from_str(text)?;
    let mut words = Vec::new();
    for entry in entries {
        match json_entry_to_word(entry) {
            Ok(word) => words.push(word),
            Err(err) => tracing::warn!(error = %err, "dropping malformed JSON entry"),
        }
    }
    Ok(words)
}

fn json_entry_to_word(entry: JsonEntry) -> Result<WordAggregate, IngestError> {
    let kanjis = entry
        .kanjis
        .into_iter()
        .map(|k| Kanji {
            is_common: is_common(&parse_priorities(k.priorities.iter().map(String::as_str))),
            text: k.text,
            tags: k.tags,
        })
        .collect();

    let readings = entry
        .readings
        .into_iter()
        .map(|r| Reading {
            is_common: is_common(&parse_priorities(r.priorities.iter().map(String::as_str))),
            text: r.text,
            tags: r.tags,
            applies_to_kanji: r.applies_to_kanji,
        })
        .collect();

    let senses = entry
        .senses
        .into_iter()
        .map(|s| Sense {
            part_of_speech: s.part_of_speech,
            applies_to_kanji: s.applies_to_kanji,
            applies_to_reading: s.applies_to_reading,
            fields: s.fields,
            dialects: s.dialects,
            misc: s.misc,
            infos: s.infos,
            glosses: s
                .glosses
                .into_iter()
                .map(|g| Gloss { text: g.text, gloss_type: g.gloss_type })
                .collect(),
            examples: s
                .examples
                .into_iter()
                .map(|e| SenseExample { source: e.source, text: e.text, jpn: e.jpn, eng: e.lang })
                .collect(),
        })
        .collect();

    let word = WordAggregate { id: entry.ent_seq, kanjis, readings, senses };
    word.check_invariants().map_err(IngestError::MalformedEntry)?;
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE JMdict [
<!ENTITY adv "adverb">
]>
<JMdict>
<entry>
<ent_seq>1000000</ent_seq>
<k_ele>
<keb>猫</keb>
<ke_pri>news1</ke_pri>
<ke_pri>ichi1</ke_pri>
</k_ele>
<r_ele>
<reb>ねこ</reb>
<re_pri>news1</re_pri>
<re_pri>ichi1</re_pri>
</r_ele>
<sense>
<pos>n</pos>
<gloss>cat</gloss>
</sense>
</entry>
</JMdict>"#;

    #[test]
    fn parses_a_well_formed_entry() {
        let words = parse_xml(SAMPLE).unwrap();
        assert_eq!(words.len(), 1);
        let word = &words[0];
        assert_eq!(word.id, 1000000);
        assert_eq!(word.kanjis[0].text, "猫");
        assert!(word.kanjis[0].is_common);
        assert_eq!(word.readings[0].text, "ねこ");
        assert!(word.readings[0].is_common);
        assert_eq!(word.senses[0].glosses[0].text, "cat");
    }

    #[test]
    fn missing_ent_seq_is_dropped_not_fatal() {
        let doc = r#"<JMdict><entry>
<k_ele><keb>猫</keb></k_ele>
<r_ele><reb>ねこ</reb></r_ele>
<sense><gloss>cat</gloss></sense>
</entry></JMdict>"#;
        let words = parse_xml(doc).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn entry_without_readings_is_dropped() {
        let doc = r#"<JMdict><entry>
<ent_seq>42</ent_seq>
<sense><gloss>nothing</gloss></sense>
</entry></JMdict>"#;
        let words = parse_xml(doc).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn unrecognized_priority_token_is_dropped_not_fatal() {
        let doc = r#"<JMdict><entry>
<ent_seq>7</ent_seq>
<r_ele><reb>ねこ</reb><re_pri>bogus9</re_pri></r_ele>
<sense><gloss>cat</gloss></sense>
</entry></JMdict>"#;
        let words = parse_xml(doc).unwrap();
        assert_eq!(words.len(), 1);
        assert!(!words[0].readings[0].is_common);
    }

    #[test]
    fn parses_json_form_with_lang_field() {
        let json = r#"[{
            "ent_seq": 5,
            "kanjis": [],
            "readings": [{"text": "ねこ", "tags": [], "priorities": ["ichi1"], "applies_to_kanji": ["*"]}],
            "senses": [{
                "part_of_speech": ["n"],
                "applies_to_kanji": ["*"],
                "applies_to_reading": ["*"],
                "fields": [],
                "dialects": [],
                "misc": [],
                "infos": [],
                "glosses": [{"text": "cat"}],
                "examples": [{"source": "tat", "text": "a cat", "jpn": "ねこ", "lang": "eng"}]
            }]
        }]"#;
        let words = parse_json(json).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].senses[0].examples[0].eng, "eng");
    }
}
