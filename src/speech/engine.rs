use std::sync::{
    atomic::{
        AtomicU64,
        Ordering,
    },
    Arc,
    Mutex,
};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{
    handle::UtteranceHandle,
    preprocess::prepare_for_speech,
    types::{
        SpeakOutcome,
        SpeechError,
        Utterance,
        Voice,
        VoiceSettings,
    },
    voices::{
        find_by_name,
        select_voice,
    },
};
use crate::core::Language;

/// Platform speech synthesizer.
///
/// `speak` resolves when the utterance finishes or fails, and must return
/// `SpeechError::Interrupted` once `cancel_token` is cancelled, including when
/// it was cancelled before `speak` started listening. `cancel` stops whatever
/// the synthesizer is playing right now.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn voices(&self) -> Vec<Voice>;

    async fn speak(
        &self,
        utterance: &Utterance,
        cancel_token: &CancellationToken,
    ) -> Result<(), SpeechError>;

    fn cancel(&self);
}

pub struct Speaker<S: SpeechSynthesizer> {
    synth: Arc<S>,
    current: Mutex<Option<UtteranceHandle>>,
    next_id: AtomicU64,
}

impl<S: SpeechSynthesizer> Speaker<S> {
    pub fn new(synth: Arc<S>) -> Self {
        Self { synth, current: Mutex::new(None), next_id: AtomicU64::new(1) }
    }

    pub fn synthesizer(&self) -> &Arc<S> {
        &self.synth
    }

    pub fn is_speaking(&self) -> bool {
        self.current.lock().map(|current| current.is_some()).unwrap_or(false)
    }

    /// Speaks `text` in `language`, interrupting anything already playing.
    ///
    /// The request takes over the speaker before its first await, so of two
    /// overlapping calls the later one always wins.
    pub async fn speak(
        &self,
        text: &str,
        language: Language,
        settings: &VoiceSettings,
    ) -> Result<SpeakOutcome, SpeechError> {
        let handle = self.begin();

        let prepared = prepare_for_speech(text, language);
        let settings = settings.clamped();
        let voices = self.synth.voices().await;

        if handle.is_cancelled() {
            tracing::debug!("Utterance #{} superseded before it started", handle.id());
            self.finish(&handle);
            return Ok(SpeakOutcome::Interrupted);
        }

        let voice = settings
            .preferred_voice
            .as_deref()
            .and_then(|name| find_by_name(&voices, name))
            .or_else(|| select_voice(&voices, language))
            .cloned();

        match &voice {
            Some(v) => tracing::debug!("Speaking with voice {} ({})", v.name, v.lang),
            None => tracing::debug!("No matching voice for {}, using synthesizer default", language),
        }

        let utterance = Utterance {
            text: prepared,
            lang: language.regional_tag().to_string(),
            voice,
            rate: settings.rate,
            pitch: settings.pitch,
            volume: settings.volume,
        };

        let mut result = self.synth.speak(&utterance, handle.token()).await;
        if let Err(SpeechError::VoiceUnavailable(name)) = &result {
            if !handle.is_cancelled() {
                tracing::warn!("Voice {} unavailable, retrying with default voice", name);
                let retry = Utterance { voice: None, ..utterance };
                result = self.synth.speak(&retry, handle.token()).await;
            }
        }

        self.finish(&handle);

        if handle.is_cancelled() {
            return Ok(SpeakOutcome::Interrupted);
        }

        match result {
            Ok(()) => Ok(SpeakOutcome::Completed),
            Err(SpeechError::Interrupted) => Ok(SpeakOutcome::Interrupted),
            Err(e) => {
                tracing::warn!("Speech failed: {}", e);
                Err(e)
            }
        }
    }

    /// Stops the current utterance, if any.
    pub fn stop(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(handle) = current.take() {
                handle.cancel();
            }
        }
        self.synth.cancel();
    }

    fn begin(&self) -> UtteranceHandle {
        let handle = UtteranceHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst));

        if let Ok(mut current) = self.current.lock() {
            if let Some(previous) = current.replace(handle.clone()) {
                tracing::debug!("Interrupting utterance #{}", previous.id());
                previous.cancel();
            }
        }

        self.synth.cancel();
        handle
    }

    fn finish(&self, handle: &UtteranceHandle) {
        if let Ok(mut current) = self.current.lock() {
            if current.as_ref().map(|h| h.id()) == Some(handle.id()) {
                *current = None;
            }
        }
    }
}
