use tokio_util::sync::CancellationToken;

/// Tracks one in-flight utterance so a newer request can supersede it.
///
/// Cancellation is sticky: a synthesizer that only starts listening after
/// the handle was cancelled still sees it.
#[derive(Debug, Clone)]
pub struct UtteranceHandle {
    id: u64,
    cancel_token: CancellationToken,
}

impl UtteranceHandle {
    pub fn new(id: u64) -> Self {
        Self { id, cancel_token: CancellationToken::new() }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_cancel_before_listening_is_seen() {
        let handle = UtteranceHandle::new(3);
        handle.clone().cancel();

        assert!(handle.is_cancelled());
        tokio::time::timeout(Duration::from_millis(100), handle.token().cancelled())
            .await
            .unwrap();
    }
}
