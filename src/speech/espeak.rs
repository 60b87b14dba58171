use std::{
    path::PathBuf,
    process::Stdio,
};

use async_trait::async_trait;
use tokio::{
    process::Command,
    sync::Notify,
};
use tokio_util::sync::CancellationToken;

use super::{
    engine::SpeechSynthesizer,
    types::{
        SpeechError,
        Utterance,
        Voice,
    },
};

const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Local synthesizer backed by the `espeak-ng` command.
pub struct EspeakSynthesizer {
    binary: PathBuf,
    interrupt: Notify,
}

impl Default for EspeakSynthesizer {
    fn default() -> Self {
        Self::new(PathBuf::from("espeak-ng"))
    }
}

impl EspeakSynthesizer {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary, interrupt: Notify::new() }
    }
}

/// Parses `espeak-ng --voices` output:
/// `Pty Language Age/Gender VoiceName File Other Languages`.
pub(crate) fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 4 {
                return None;
            }
            Some(Voice::new(columns[3], columns[1]))
        })
        .collect()
}

pub(crate) fn command_args(utterance: &Utterance) -> Vec<String> {
    let voice = match &utterance.voice {
        Some(voice) => voice.name.clone(),
        None => utterance.lang.split(['-', '_']).next().unwrap_or("en").to_lowercase(),
    };
    let speed = (BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32;
    let pitch = (utterance.pitch * 50.0).round().clamp(0.0, 99.0) as u32;
    let amplitude = (utterance.volume * 100.0).round() as u32;

    vec![
        "-v".to_string(),
        voice,
        "-s".to_string(),
        speed.to_string(),
        "-p".to_string(),
        pitch.to_string(),
        "-a".to_string(),
        amplitude.to_string(),
        "--".to_string(),
        utterance.text.clone(),
    ]
}

#[async_trait]
impl SpeechSynthesizer for EspeakSynthesizer {
    async fn voices(&self) -> Vec<Voice> {
        match Command::new(&self.binary).arg("--voices").output().await {
            Ok(output) if output.status.success() => {
                parse_voice_list(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                tracing::warn!("espeak-ng --voices exited with {}", output.status);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to list espeak-ng voices: {}", e);
                Vec::new()
            }
        }
    }

    async fn speak(
        &self,
        utterance: &Utterance,
        cancel_token: &CancellationToken,
    ) -> Result<(), SpeechError> {
        if cancel_token.is_cancelled() {
            return Err(SpeechError::Interrupted);
        }

        let mut child = Command::new(&self.binary)
            .args(command_args(utterance))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Synthesis(format!("Failed to start espeak-ng: {e}")))?;

        let stderr = child.stderr.take();

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| SpeechError::Synthesis(e.to_string()))?;
                if status.success() {
                    return Ok(());
                }

                let mut message = String::new();
                if let Some(mut stderr) = stderr {
                    use tokio::io::AsyncReadExt;
                    let _ = stderr.read_to_string(&mut message).await;
                }

                match &utterance.voice {
                    Some(voice) if message.to_lowercase().contains("voice") => {
                        Err(SpeechError::VoiceUnavailable(voice.name.clone()))
                    }
                    _ => Err(SpeechError::Synthesis(format!("espeak-ng exited with {status}: {}", message.trim()))),
                }
            }
            _ = cancel_token.cancelled() => {
                let _ = child.kill().await;
                Err(SpeechError::Interrupted)
            }
            _ = self.interrupt.notified() => {
                let _ = child.kill().await;
                Err(SpeechError::Interrupted)
            }
        }
    }

    fn cancel(&self) {
        self.interrupt.notify_waiters();
    }
}
