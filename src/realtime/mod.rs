//! Realtime alert notifications over the database service's Phoenix channel
//! socket, driving the dashboard's unread-count badge.

pub mod badge;
pub mod subscription;
pub mod types;

pub use badge::apply_change;
pub use subscription::{
    AlertFeed,
    FeedConfig,
};
pub use types::{
    AlertChange,
    ChangeKind,
    PhoenixMessage,
};
