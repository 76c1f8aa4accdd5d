use async_trait::async_trait;
use uuid::Uuid;

/// What arrived in an inbound event.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// Raw bytes of an uploaded photo (largest size variant).
    Photo(Vec<u8>),
    /// A free-form text message.
    Text(String),
}

/// One inbound event from the messaging platform.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event id for log correlation.
    pub id: String,
    /// Chat to reply into.
    pub chat_id: i64,
    /// Sender, keys the session.
    pub user_id: i64,
    pub kind: EventKind,
}

impl Event {
    pub fn photo(chat_id: i64, user_id: i64, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            user_id,
            kind: EventKind::Photo(bytes),
        }
    }

    pub fn text(chat_id: i64, user_id: i64, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            user_id,
            kind: EventKind::Text(text.into()),
        }
    }
}

/// Outbound side of the messaging platform.
///
/// The dispatcher only talks to this trait, so tests can substitute a
/// recording fake. Delivery retries and timeouts belong to implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<()>;

    /// Send a text message together with a reply keyboard.
    async fn send_text_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &[Vec<String>],
    ) -> anyhow::Result<()>;

    /// Send a single photo with an optional caption.
    async fn send_photo(
        &self,
        chat_id: i64,
        data: Vec<u8>,
        caption: Option<&str>,
    ) -> anyhow::Result<()>;

    /// Send up to 10 photos as one album.
    async fn send_photo_batch(&self, chat_id: i64, photos: Vec<Vec<u8>>) -> anyhow::Result<()>;
}
