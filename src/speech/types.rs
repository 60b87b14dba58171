use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeechError {
    #[error("voice unavailable: {0}")]
    VoiceUnavailable(String),

    #[error("utterance interrupted")]
    Interrupted,

    #[error("{0}")]
    Synthesis(String),
}

/// Per-request synthesis settings. Never persisted by the speech driver itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub preferred_voice: Option<String>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self { rate: 0.9, pitch: 1.0, volume: 1.0, preferred_voice: None }
    }
}

impl VoiceSettings {
    /// Clamp into the ranges synthesizers accept (rate 0.1-10, pitch 0-2, volume 0-1).
    pub fn clamped(&self) -> Self {
        Self {
            rate: self.rate.clamp(0.1, 10.0),
            pitch: self.pitch.clamp(0.0, 2.0),
            volume: self.volume.clamp(0.0, 1.0),
            preferred_voice: self.preferred_voice.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 style tag as reported by the synthesizer (`hi-IN`, `en_US`, ...).
    pub lang: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Voice {
    pub fn new(name: &str, lang: &str) -> Self {
        Self { name: name.to_string(), lang: lang.to_string(), is_default: false }
    }

    pub(crate) fn normalized_lang(&self) -> String {
        self.lang.trim().replace('_', "-").to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    Completed,
    /// A later request or `stop` superseded this utterance.
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_clamp() {
        let wild = VoiceSettings { rate: 40.0, pitch: -1.0, volume: 3.0, preferred_voice: None };
        let clamped = wild.clamped();
        assert_eq!(clamped.rate, 10.0);
        assert_eq!(clamped.pitch, 0.0);
        assert_eq!(clamped.volume, 1.0);
    }

    #[test]
    fn test_normalized_lang() {
        assert_eq!(Voice::new("Lekha", "hi_IN").normalized_lang(), "hi-in");
    }
}
