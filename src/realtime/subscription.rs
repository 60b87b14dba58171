use std::{
    sync::Arc,
    time::Duration,
};

use futures_util::{
    SinkExt,
    StreamExt,
};
use tokio::{
    sync::{
        mpsc,
        watch,
        Notify,
    },
    task::JoinHandle,
    time::{
        interval_at,
        Instant,
    },
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::protocol::Message,
};
use uuid::Uuid;

use super::{
    badge::apply_change,
    types::{
        alerts_topic,
        AlertChange,
        PhoenixMessage,
    },
};
use crate::{
    core::FarmError,
    database::DatabaseClient,
};

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const CHANGE_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub socket_url: String,
    pub access_token: String,
    pub user_id: Uuid,
    pub heartbeat: Duration,
}

impl FeedConfig {
    /// Websocket endpoint of the database service at `base_url`.
    pub fn new(base_url: &str, api_key: &str, user_id: Uuid) -> Result<Self, FarmError> {
        let base = base_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else if base.starts_with("ws://") || base.starts_with("wss://") {
            base.to_string()
        } else {
            return Err(FarmError::Config(format!("Unsupported database URL: {base_url}")));
        };

        Ok(Self {
            socket_url: format!("{ws_base}/realtime/v1/websocket?apikey={api_key}&vsn=1.0.0"),
            access_token: api_key.to_string(),
            user_id,
            heartbeat: HEARTBEAT_INTERVAL,
        })
    }

    /// Joins with the same credentials the client uses for REST calls, so
    /// row-level access rules apply to the feed as they do to selects.
    pub fn from_client(db: &DatabaseClient, user_id: Uuid) -> Result<Self, FarmError> {
        let mut config = Self::new(db.base_url(), db.api_key(), user_id)?;
        config.access_token = db.bearer_token().to_string();
        Ok(config)
    }
}

/// Live subscription to one user's alerts, keeping an unread-count badge.
pub struct AlertFeed {
    unread: watch::Receiver<usize>,
    changes: mpsc::Receiver<AlertChange>,
    shutdown: Arc<Notify>,
    task: JoinHandle<Result<(), FarmError>>,
}

impl AlertFeed {
    /// Seeds the badge from the database, then opens the subscription.
    pub async fn subscribe(db: &DatabaseClient, user_id: Uuid) -> Result<Self, FarmError> {
        let initial = db.unread_alert_count(&user_id).await?;
        tracing::info!("{} unread alerts", initial);
        Self::connect(FeedConfig::from_client(db, user_id)?, initial).await
    }

    pub async fn connect(config: FeedConfig, initial_unread: usize) -> Result<Self, FarmError> {
        let (ws_stream, _) = connect_async(config.socket_url.as_str()).await?;
        tracing::info!("Realtime socket connected for user {}", config.user_id);

        let (unread_tx, unread_rx) = watch::channel(initial_unread);
        let (change_tx, change_rx) = mpsc::channel(CHANGE_BUFFER);
        let shutdown = Arc::new(Notify::new());

        let task = tokio::spawn(run_feed(ws_stream, config, unread_tx, change_tx, shutdown.clone()));

        Ok(Self { unread: unread_rx, changes: change_rx, shutdown, task })
    }

    pub fn unread_count(&self) -> usize {
        *self.unread.borrow()
    }

    /// Receiver that observes every badge update.
    pub fn watch_unread(&self) -> watch::Receiver<usize> {
        self.unread.clone()
    }

    /// Next alert change, `None` once the feed has stopped.
    pub async fn next_change(&mut self) -> Option<AlertChange> {
        self.changes.recv().await
    }

    /// Leaves the channel and waits for the socket task to finish.
    pub async fn close(self) -> Result<(), FarmError> {
        self.shutdown.notify_one();
        self.task.await.map_err(|e| FarmError::Custom(format!("Realtime task failed: {e}")))?
    }
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn run_feed(
    ws_stream: WsStream,
    config: FeedConfig,
    unread: watch::Sender<usize>,
    changes: mpsc::Sender<AlertChange>,
    shutdown: Arc<Notify>,
) -> Result<(), FarmError> {
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<String>(32);

    let forward_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(Message::text(msg)).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    let topic = alerts_topic(&config.user_id);
    let mut next_ref: u64 = 1;
    let join_ref = next_ref;
    tx.send(serde_json::to_string(&PhoenixMessage::join_alerts(
        &config.user_id,
        &config.access_token,
        join_ref,
    ))?)
    .await?;

    let mut heartbeat = interval_at(Instant::now() + config.heartbeat, config.heartbeat);
    let mut result = Ok(());

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                next_ref += 1;
                let leave = PhoenixMessage::leave(&topic, next_ref);
                let _ = tx.send(serde_json::to_string(&leave)?).await;
                tracing::info!("Leaving {}", topic);
                break;
            }
            _ = heartbeat.tick() => {
                next_ref += 1;
                tx.send(serde_json::to_string(&PhoenixMessage::heartbeat(next_ref))?).await?;
            }
            msg = ws_receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let message = match serde_json::from_str::<PhoenixMessage>(text.as_str()) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::debug!("Ignoring unparseable frame: {}", e);
                            continue;
                        }
                    };
                    handle_message(&message, join_ref, &unread, &changes);
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("Realtime socket closed by server: {:?}", frame);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("Realtime socket error: {}", e);
                    result = Err(e.into());
                    break;
                }
                None => {
                    tracing::info!("Realtime socket ended");
                    break;
                }
            }
        }
    }

    drop(tx);
    let _ = forward_task.await;
    result
}

fn handle_message(
    message: &PhoenixMessage,
    join_ref: u64,
    unread: &watch::Sender<usize>,
    changes: &mpsc::Sender<AlertChange>,
) {
    if let Some(ok) = message.reply_ok() {
        if message.reference.as_deref() == Some(join_ref.to_string().as_str()) {
            if ok {
                tracing::info!("Subscribed to {}", message.topic);
            } else {
                tracing::error!("Subscription to {} rejected: {}", message.topic, message.payload);
            }
        }
        return;
    }

    match message.event.as_str() {
        "phx_error" | "phx_close" => {
            tracing::warn!("Channel {} reported {}", message.topic, message.event);
        }
        "system" => tracing::debug!("System message: {}", message.payload),
        _ => {
            let Some(change) = AlertChange::from_message(message) else {
                return;
            };

            unread.send_modify(|count| *count = apply_change(*count, &change));
            tracing::debug!(
                "Alert {:?} {} -> {} unread",
                change.kind,
                change.alert_id().unwrap_or("?"),
                *unread.borrow()
            );

            if changes.try_send(change).is_err() {
                tracing::debug!("Alert change dropped, no reader");
            }
        }
    }
}
