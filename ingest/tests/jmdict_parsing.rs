//! Integration tests exercising the full XML parser against multi-entry,
//! multi-kanji documents rather than single-entry fixtures.

use kotoba_ingest::parse_xml;

const TWO_ENTRIES: &str = r#"<JMdict>
<entry>
<ent_seq>1</ent_seq>
<k_ele><keb>早い</keb></k_ele>
<r_ele><reb>はやい</reb></r_ele>
<sense><pos>adj-i</pos><gloss>early</gloss><gloss>fast</gloss></sense>
</entry>
<entry>
<ent_seq>2</ent_seq>
<r_ele><reb>すし</reb></r_ele>
<sense><pos>n</pos><gloss>sushi</gloss></sense>
</entry>
</JMdict>"#;

#[test]
fn parses_multiple_entries_in_one_document() {
    let words = parse_xml(TWO_ENTRIES).unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].id, 1);
    assert_eq!(words[0].kanjis[0].text, "早い");
    assert_eq!(words[0].senses[0].glosses.len(), 2);

    assert_eq!(words[1].id, 2);
    assert!(words[1].kanjis.is_empty());
    assert_eq!(words[1].readings[0].text, "すし");
}

const RESTRICTED_READING: &str = r#"<JMdict>
<entry>
<ent_seq>3</ent_seq>
<k_ele><keb>出来る</keb></k_ele>
<k_ele><keb>出来</keb></k_ele>
<r_ele><reb>できる</reb><re_restr>出来る</re_restr></r_ele>
<sense><pos>v1</pos><gloss>to be able to</gloss></sense>
</entry>
</JMdict>"#;

#[test]
fn re_restr_narrows_applies_to_kanji_away_from_wildcard() {
    let words = parse_xml(RESTRICTED_READING).unwrap();
    let word = &words[0];
    assert_eq!(word.kanjis.len(), 2);
    assert_eq!(word.readings[0].applies_to_kanji, vec!["出来る".to_string()]);
}

const NON_ENGLISH_GLOSS_DROPPED: &str = r#"<JMdict>
<entry>
<ent_seq>4</ent_seq>
<r_ele><reb>ねこ</reb></r_ele>
<sense>
<pos>n</pos>
<gloss xml:lang="eng">cat</gloss>
<gloss xml:lang="ger">Katze</gloss>
</sense>
</entry>
</JMdict>"#;

#[test]
fn only_english_glosses_are_kept() {
    let words = parse_xml(NON_ENGLISH_GLOSS_DROPPED).unwrap();
    let glosses = &words[0].senses[0].glosses;
    assert_eq!(glosses.len(), 1);
    assert_eq!(glosses[0].text, "cat");
}

#[test]
fn malformed_entry_is_skipped_and_later_valid_entries_still_parse() {
    let doc = r#"<JMdict>
<entry>
<ent_seq>not-a-number</ent_seq>
<r_ele><reb>x</reb></r_ele>
<sense><gloss>bad</gloss></sense>
</entry>
<entry>
<ent_seq>5</ent_seq>
<r_ele><reb>いぬ</reb></r_ele>
<sense><pos>n</pos><gloss>dog</gloss></sense>
</entry>
</JMdict>"#;
    let words = parse_xml(doc).unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].id, 5);
}
