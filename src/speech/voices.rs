use super::types::Voice;
use crate::core::Language;

// Vendor voices that tend to pronounce Indian languages well
const BRANDED: &[&str] = &["google", "microsoft"];

fn name_hints(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => &["rishi", "veena", "heera", "ravi"],
        Language::Hindi => &["lekha", "kalpana", "hemant", "swara", "madhur"],
        Language::Bengali => &["tanishaa", "bashkar", "nabanita"],
    }
}

fn matches_prefix(voice: &Voice, code: &str) -> bool {
    let lang = voice.normalized_lang();
    lang == code || lang.starts_with(&format!("{code}-"))
}

fn is_preferred_name(voice: &Voice, language: Language) -> bool {
    let name = voice.name.to_lowercase();
    BRANDED.iter().chain(name_hints(language)).any(|hint| name.contains(hint))
}

fn select_for_language(voices: &[Voice], language: Language) -> Option<&Voice> {
    let regional = language.regional_tag().to_lowercase();
    let candidates: Vec<&Voice> =
        voices.iter().filter(|v| matches_prefix(v, language.code())).collect();

    let is_regional = |v: &&&Voice| v.normalized_lang() == regional;
    let is_preferred = |v: &&&Voice| is_preferred_name(v, language);

    candidates
        .iter()
        .filter(is_regional)
        .find(is_preferred)
        .or_else(|| candidates.iter().find(is_regional))
        .or_else(|| candidates.iter().find(is_preferred))
        .or_else(|| candidates.first())
        .copied()
}

/// Picks the best available voice for `language`.
///
/// Order: regional variant (`xx-IN`) with a known vendor name, any regional
/// variant, any voice with the language prefix. When nothing matches the
/// target language, the same chain runs for English. `None` leaves the choice
/// to the synthesizer's default voice.
pub fn select_voice(voices: &[Voice], language: Language) -> Option<&Voice> {
    select_for_language(voices, language).or_else(|| {
        if language == Language::English {
            None
        } else {
            select_for_language(voices, Language::English)
        }
    })
}

pub fn find_by_name<'a>(voices: &'a [Voice], name: &str) -> Option<&'a Voice> {
    voices.iter().find(|v| v.name == name).or_else(|| {
        let wanted = name.to_lowercase();
        voices.iter().find(|v| v.name.to_lowercase() == wanted)
    })
}
