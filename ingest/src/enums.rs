//! JMdict's coded enumerated domains. Each is a closed set at the schema
//! level but parsed permissively at the boundary: unknown codes are
//! dropped via `parse_or_none`, never a fatal parse error.

macro_rules! coded_enum {
    ($name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn parse_or_none(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }
    };
}

coded_enum!(PartOfSpeech {
    AdjF => "adj-f",
    AdjI => "adj-i",
    AdjIx => "adj-ix",
    AdjKari => "adj-kari",
    AdjKu => "adj-ku",
    AdjNa => "adj-na",
    AdjNari => "adj-nari",
    AdjNo => "adj-no",
    AdjPn => "adj-pn",
    AdjShiku => "adj-shiku",
    AdjT => "adj-t",
    Adv => "adv",
    AdvTo => "adv-to",
    Aux => "aux",
    AuxAdj => "aux-adj",
    AuxV => "aux-v",
    Conj => "conj",
    CopDa => "cop-da",
    Ctr => "ctr",
    Exp => "exp",
    Int => "int",
    N => "n",
    NAdv => "n-adv",
    NPref => "n-pref",
    NSuf => "n-suf",
    NT => "n-t",
    Num => "num",
    Pn => "pn",
    Pref => "pref",
    Prt => "prt",
    Suf => "suf",
    Unc => "unc",
    VUnspec => "v-unspec",
    V1 => "v1",
    V1S => "v1-s",
    V5Aru => "v5aru",
    V5B => "v5b",
    V5G => "v5g",
    V5K => "v5k",
    V5KS => "v5k-s",
    V5M => "v5m",
    V5N => "v5n",
    V5R => "v5r",
    V5RI => "v5r-i",
    V5S => "v5s",
    V5T => "v5t",
    V5U => "v5u",
    V5US => "v5u-s",
    Vi => "vi",
    Vk => "vk",
    Vn => "vn",
    Vr => "vr",
    Vs => "vs",
    VsC => "vs-c",
    VsI => "vs-i",
    VsS => "vs-s",
    Vt => "vt",
    Vz => "vz",
});

coded_enum!(Dialect {
    Kansai => "ksb",
    Kyoto => "kyb",
    Osaka => "osb",
    Kantou => "ktb",
    Tsugaru => "tsug",
    Tosa => "tsb",
    Touhoku => "thb",
    Kyuushuu => "kyu",
    Ryuukyuu => "rkb",
    Nagano => "nab",
    Hokkaido => "hob",
});

coded_enum!(MiscInfo {
    Abbreviation => "abbr",
    Archaic => "arch",
    Children => "chn",
    Colloquial => "col",
    Derogatory => "derog",
    Familiar => "fam",
    Female => "fem",
    Honorific => "hon",
    Humble => "hum",
    Idiomatic => "id",
    Jocular => "joc",
    Male => "male",
    MaleSlang => "male-sl",
    MangaSlang => "m-sl",
    Obsolete => "obs",
    Obscure => "obsc",
    Onomatopoeia => "on-mim",
    Poetical => "poet",
    Polite => "pol",
    Proverb => "proverb",
    Rare => "rare",
    Sensitive => "sens",
    Slang => "sl",
    Vulgar => "vulg",
    XRated => "X",
    Yojijukugo => "yoji",
});

coded_enum!(SubjectField {
    Anatomy => "anat",
    Astronomy => "astron",
    Baseball => "baseb",
    Biology => "biol",
    Botany => "bot",
    Buddhism => "Buddh",
    Business => "bus",
    Chemistry => "chem",
    Computing => "comp",
    Economics => "econ",
    Engineering => "engr",
    Finance => "finc",
    Food => "food",
    Geology => "geol",
    Law => "law",
    Linguistics => "ling",
    Mathematics => "math",
    Medicine => "med",
    Military => "mil",
    Music => "music",
    Physics => "physics",
    Psychology => "psych",
    Shinto => "Shinto",
    Sports => "sports",
    Zoology => "zool",
});

coded_enum!(GlossType {
    Literal => "lit",
    Figurative => "fig",
    Explanation => "expl",
});

coded_enum!(Language {
    English => "eng",
    German => "ger",
    French => "fre",
    Russian => "rus",
    Dutch => "dut",
    Hungarian => "hun",
    Slovenian => "slv",
    Spanish => "spa",
    Swedish => "swe",
});

coded_enum!(PriorityType {
    News => "news",
    Ichi => "ichi",
    Spec => "spec",
    Gai => "gai",
    Nf => "nf",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes() {
        assert_eq!(PartOfSpeech::parse_or_none("n"), Some(PartOfSpeech::N));
        assert_eq!(Dialect::parse_or_none("ksb"), Some(Dialect::Kansai));
        assert_eq!(MiscInfo::parse_or_none("on-mim"), Some(MiscInfo::Onomatopoeia));
        assert_eq!(GlossType::parse_or_none("fig"), Some(GlossType::Figurative));
        assert_eq!(Language::parse_or_none("eng"), Some(Language::English));
    }

    #[test]
    fn drops_unknown_codes() {
        assert_eq!(PartOfSpeech::parse_or_none("not-a-real-pos"), None);
        assert_eq!(SubjectField::parse_or_none("bogus"), None);
    }

    #[test]
    fn code_round_trips() {
        assert_eq!(PartOfSpeech::N.code(), "n");
        assert_eq!(PartOfSpeech::parse_or_none(PartOfSpeech::AdjNa.code()), Some(PartOfSpeech::AdjNa));
    }
}
