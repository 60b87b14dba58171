//! Speech output for the dashboard's read-aloud features.
//!
//! Text goes through [`prepare_for_speech`], a voice is chosen with
//! [`select_voice`], and [`Speaker`] drives a [`SpeechSynthesizer`] so that only
//! the most recent request is ever heard.

pub mod engine;
pub mod espeak;
pub mod handle;
pub mod preprocess;
pub mod types;
pub mod voices;

pub use engine::{
    Speaker,
    SpeechSynthesizer,
};
pub use espeak::EspeakSynthesizer;
pub use preprocess::prepare_for_speech;
pub use types::{
    SpeakOutcome,
    SpeechError,
    Utterance,
    Voice,
    VoiceSettings,
};
pub use voices::select_voice;
