//! The tunable ranking weights. Fixed values for reproducibility; passed
//! explicitly wherever they're needed rather than read from a global, so
//! weight tuning never requires touching the query builders.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub reading_weight: f64,
    pub kanji_weight: f64,
    pub exact_reading_weight: f64,
    pub exact_kanji_weight: f64,
    pub length_weight: f64,
    pub common_weight: f64,
    pub gloss_weight: f64,
    pub exact_word_weight: f64,
    pub single_char_base_mult: f64,
    pub single_char_exact_mult: f64,
    pub single_char_length_mult: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            reading_weight: 5.0,
            kanji_weight: 5.0,
            exact_reading_weight: 6.0,
            exact_kanji_weight: 6.0,
            length_weight: 2.0,
            common_weight: 1.0,
            gloss_weight: 2.0,
            exact_word_weight: 1.5,
            single_char_base_mult: 0.5,
            single_char_exact_mult: 1.75,
            single_char_length_mult: 1.25,
        }
    }
}
