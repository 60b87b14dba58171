use once_cell::sync::Lazy;
use regex::{
    Captures,
    Regex,
};

use crate::core::Language;

struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("speech rule pattern"),
            replacement: replacement.to_string(),
        }
    }

    /// Whole-word, case-insensitive; spaces in `word` match any whitespace run.
    fn word(word: &str, replacement: &str) -> Self {
        let escaped = regex::escape(word).replace(' ', r"\s+");
        Self::new(&format!(r"(?i)\b{escaped}\b"), replacement)
    }

    /// `5ml` and standalone `ml` both become the spoken unit.
    fn unit(unit: &str, spoken: &str) -> [Self; 2] {
        [
            Self::new(&format!(r"(?i)(\d)\s*{unit}\b"), &format!("${{1}} {spoken}")),
            Self::new(&format!(r"(?i)\b{unit}\b"), spoken),
        ]
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement.as_str()).into_owned()
    }
}

fn rules(
    words: &[(&str, &str)],
    abbreviations: &[(&str, &str)],
    units: &[(&str, &str)],
) -> Vec<Rule> {
    let mut rules: Vec<Rule> = words.iter().map(|(w, r)| Rule::word(w, r)).collect();
    rules.extend(abbreviations.iter().map(|(p, r)| Rule::new(p, r)));
    rules.extend(units.iter().flat_map(|(u, r)| Rule::unit(u, r)));
    rules
}

static ENGLISH_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(
        &[],
        &[
            (r"\bAMU\b", "A M U"),
            (r"\bMRL\b", "M R L"),
            (r"\bOCR\b", "O C R"),
            (r"\bDr\.", "Doctor"),
            (r"\bIM\b", "intramuscular"),
        ],
        &[("ml", "milliliters"), ("mg", "milligrams"), ("kg", "kilograms")],
    )
});

static HINDI_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(
        &[
            ("thank you", "धन्यवाद"),
            ("thanks", "धन्यवाद"),
            ("good morning", "सुप्रभात"),
            ("hello", "नमस्ते"),
            ("hi", "नमस्ते"),
            ("yes", "हाँ"),
            ("no", "नहीं"),
            ("okay", "ठीक है"),
            ("ok", "ठीक है"),
            ("welcome", "स्वागत है"),
            ("goodbye", "अलविदा"),
            ("please", "कृपया"),
        ],
        &[
            (r"\bAMU\b", "ए एम यू"),
            (r"\bMRL\b", "एम आर एल"),
            (r"\bOCR\b", "ओ सी आर"),
            (r"\bDr\.", "डॉक्टर"),
        ],
        &[("ml", "मिलीलीटर"), ("mg", "मिलीग्राम"), ("kg", "किलोग्राम")],
    )
});

static BENGALI_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(
        &[
            ("thank you", "ধন্যবাদ"),
            ("thanks", "ধন্যবাদ"),
            ("good morning", "সুপ্রভাত"),
            ("hello", "নমস্কার"),
            ("hi", "নমস্কার"),
            ("yes", "হ্যাঁ"),
            ("no", "না"),
            ("okay", "ঠিক আছে"),
            ("ok", "ঠিক আছে"),
            ("welcome", "স্বাগতম"),
            ("goodbye", "বিদায়"),
            ("please", "অনুগ্রহ করে"),
        ],
        &[
            (r"\bAMU\b", "এ এম ইউ"),
            (r"\bMRL\b", "এম আর এল"),
            (r"\bOCR\b", "ও সি আর"),
            (r"\bDr\.", "ডাক্তার"),
        ],
        &[("ml", "মিলিলিটার"), ("mg", "মিলিগ্রাম"), ("kg", "কিলোগ্রাম")],
    )
});

static DEVANAGARI_THEN_LATIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\p{Devanagari})([A-Za-z0-9])").expect("script boundary pattern"));
static LATIN_THEN_DEVANAGARI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9])(\p{Devanagari})").expect("script boundary pattern"));
// Decimal and grouped numbers match as one run so they are left whole
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:[.,]\d+)*\b").expect("number pattern"));

const HINDI_NUMBERS: [&str; 21] = [
    "शून्य", "एक", "दो", "तीन", "चार", "पाँच", "छह", "सात", "आठ", "नौ", "दस", "ग्यारह", "बारह",
    "तेरह", "चौदह", "पंद्रह", "सोलह", "सत्रह", "अठारह", "उन्नीस", "बीस",
];

const HINDI_TENS: [(u32, &str); 8] = [
    (30, "तीस"),
    (40, "चालीस"),
    (50, "पचास"),
    (60, "साठ"),
    (70, "सत्तर"),
    (80, "अस्सी"),
    (90, "नब्बे"),
    (100, "सौ"),
];

fn hindi_number_word(n: u32) -> Option<&'static str> {
    if let Some(word) = HINDI_NUMBERS.get(n as usize) {
        return Some(*word);
    }
    HINDI_TENS.iter().find(|(value, _)| *value == n).map(|(_, word)| *word)
}

fn devanagari_digits_to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '०'..='९' => char::from(b'0' + (c as u32 - '०' as u32) as u8),
            _ => c,
        })
        .collect()
}

fn expand_hindi_numbers(text: &str) -> String {
    NUMBER_RE
        .replace_all(text, |caps: &Captures| {
            let digits = &caps[0];
            if digits.contains(['.', ',']) {
                return digits.to_string();
            }
            digits
                .parse::<u32>()
                .ok()
                .and_then(hindi_number_word)
                .map(str::to_string)
                .unwrap_or_else(|| digits.to_string())
        })
        .into_owned()
}

fn separate_scripts(text: &str) -> String {
    let text = DEVANAGARI_THEN_LATIN.replace_all(text, "$1 $2");
    LATIN_THEN_DEVANAGARI.replace_all(&text, "$1 $2").into_owned()
}

/// Rewrites `text` so a synthesizer for `language` pronounces it naturally.
///
/// Passes run in order and each sees the previous pass's output.
pub fn prepare_for_speech(text: &str, language: Language) -> String {
    let rules: &[Rule] = match language {
        Language::English => ENGLISH_RULES.as_slice(),
        Language::Hindi => HINDI_RULES.as_slice(),
        Language::Bengali => BENGALI_RULES.as_slice(),
    };

    let mut result = rules.iter().fold(text.to_string(), |acc, rule| rule.apply(&acc));

    if language == Language::Hindi {
        result = devanagari_digits_to_ascii(&result);
        result = separate_scripts(&result);
        result = expand_hindi_numbers(&result);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hindi_greetings() {
        let result = prepare_for_speech("hello, thanks", Language::Hindi);
        assert!(result.contains("नमस्ते"));
        assert!(result.contains("धन्यवाद"));
        assert!(!result.contains("hello"));
        assert!(!result.contains("thanks"));
        assert_eq!(result, "नमस्ते, धन्यवाद");
    }

    #[test]
    fn test_bengali_greetings() {
        let result = prepare_for_speech("Hello! Thank you", Language::Bengali);
        assert_eq!(result, "নমস্কার! ধন্যবাদ");
    }

    #[test]
    fn test_english_abbreviations() {
        let result = prepare_for_speech("Dr. Rao: AMU below MRL, give 5ml", Language::English);
        assert_eq!(result, "Doctor Rao: A M U below M R L, give 5 milliliters");
    }

    #[test]
    fn test_english_leaves_greetings() {
        assert_eq!(prepare_for_speech("hello, thanks", Language::English), "hello, thanks");
    }

    #[test]
    fn test_hindi_numbers_and_units() {
        let result = prepare_for_speech("5ml दवा", Language::Hindi);
        assert_eq!(result, "पाँच मिलीलीटर दवा");

        assert_eq!(prepare_for_speech("२० दिन", Language::Hindi), "बीस दिन");
        // Outside the table digits stay for the synthesizer
        assert_eq!(prepare_for_speech("37 गायें", Language::Hindi), "37 गायें");
    }

    #[test]
    fn test_hindi_decimals_stay_whole() {
        assert_eq!(prepare_for_speech("2.5 ml", Language::Hindi), "2.5 मिलीलीटर");
        assert_eq!(prepare_for_speech("1,5 kg", Language::Hindi), "1,5 किलोग्राम");
        assert_eq!(prepare_for_speech("दिन 3, 4", Language::Hindi), "दिन तीन, चार");
    }

    #[test]
    fn test_hindi_script_spacing() {
        assert_eq!(prepare_for_speech("गायAMU", Language::Hindi), "गाय AMU");
        assert_eq!(prepare_for_speech("Tagगाय", Language::Hindi), "Tag गाय");
    }

    #[test]
    fn test_words_need_boundaries() {
        // "hi" inside "this" and "no" inside "note" stay put
        assert_eq!(prepare_for_speech("this note", Language::Hindi), "this note");
    }
}
