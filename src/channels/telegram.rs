//! Telegram channel — long-polls the Bot API for updates.
//!
//! Inbound photos are downloaded immediately (largest size variant) and
//! emitted as [`Event`]s together with text messages; the outbound side
//! implements [`Transport`] on top of `sendMessage`, `sendPhoto`, and
//! `sendMediaGroup`.

use super::traits::{Event, Transport};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tokio::sync::mpsc;

pub struct TelegramChannel {
    bot_token: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.bot_token)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "https://api.telegram.org/file/bot{}/{}",
            self.bot_token, file_path
        )
    }

    /// Check the bot token by calling `getMe`.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Download a file from Telegram by its `file_id`.
    async fn download_file(&self, file_id: &str) -> anyhow::Result<Vec<u8>> {
        // Step 1: resolve the file path via getFile
        let url = self.api_url("getFile");
        let body = serde_json::json!({ "file_id": file_id });

        let resp = self.client.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let err = resp.text().await?;
            anyhow::bail!("Telegram getFile failed: {err}");
        }

        let data: serde_json::Value = resp.json().await?;
        let file_path = data
            .get("result")
            .and_then(|r| r.get("file_path"))
            .and_then(|p| p.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing file_path in getFile response"))?;

        // Step 2: download the file
        let download_url = self.file_url(file_path);
        let file_resp = self.client.get(&download_url).send().await?;

        if !file_resp.status().is_success() {
            anyhow::bail!(
                "Failed to download file from Telegram: {}",
                file_resp.status()
            );
        }

        let bytes = file_resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Poll `getUpdates` forever, emitting inbound events.
    ///
    /// Returns when the receiver side of `tx` is dropped.
    pub async fn listen(&self, tx: mpsc::Sender<Event>) -> anyhow::Result<()> {
        let mut offset: i64 = 0;

        tracing::info!("Telegram channel listening for messages...");

        loop {
            let url = self.api_url("getUpdates");
            let body = serde_json::json!({
                "offset": offset,
                "timeout": 30,
                "allowed_updates": ["message"]
            });

            let resp = match self.client.post(&url).json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Telegram poll error: {e}");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }
            };

            let data: serde_json::Value = match resp.json().await {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Telegram parse error: {e}");
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    continue;
                }
            };

            if let Some(results) = data.get("result").and_then(serde_json::Value::as_array) {
                for update in results {
                    // Advance offset past this update
                    if let Some(uid) = update.get("update_id").and_then(serde_json::Value::as_i64) {
                        offset = uid + 1;
                    }

                    let Some(message) = update.get("message") else {
                        continue;
                    };
                    let Some((chat_id, user_id)) = message_ids(message) else {
                        continue;
                    };

                    let event = if let Some(text) = message.get("text").and_then(|v| v.as_str()) {
                        Event::text(chat_id, user_id, text)
                    } else if let Some(file_id) = photo_file_id(message) {
                        let bytes = match self.download_file(file_id).await {
                            Ok(bytes) => bytes,
                            Err(e) => {
                                tracing::error!("Failed to download photo: {e}");
                                continue;
                            }
                        };
                        tracing::debug!(
                            "Photo downloaded: {} bytes, file_id={file_id}",
                            bytes.len()
                        );
                        Event::photo(chat_id, user_id, bytes)
                    } else {
                        // Other message types (voice, sticker, ...) — skip
                        continue;
                    };

                    if tx.send(event).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Chat and sender ids of a message object.
fn message_ids(message: &serde_json::Value) -> Option<(i64, i64)> {
    let chat_id = message.get("chat")?.get("id")?.as_i64()?;
    let user_id = message.get("from")?.get("id")?.as_i64()?;
    Some((chat_id, user_id))
}

/// `file_id` of the largest size variant of a photo message.
///
/// Telegram orders the `photo` array by ascending size, so the last entry is
/// the full-resolution one.
fn photo_file_id(message: &serde_json::Value) -> Option<&str> {
    message
        .get("photo")?
        .as_array()?
        .last()?
        .get("file_id")?
        .as_str()
}

/// Build the `reply_markup` payload for a reply keyboard.
fn reply_keyboard(keyboard: &[Vec<String>]) -> serde_json::Value {
    serde_json::json!({
        "keyboard": keyboard,
        "resize_keyboard": true
    })
}

#[async_trait]
impl Transport for TelegramChannel {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text
        });

        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = resp.text().await?;
            anyhow::bail!("Telegram sendMessage failed: {err}");
        }

        Ok(())
    }

    async fn send_text_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &[Vec<String>],
    ) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "reply_markup": reply_keyboard(keyboard)
        });

        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = resp.text().await?;
            anyhow::bail!("Telegram sendMessage with keyboard failed: {err}");
        }

        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        data: Vec<u8>,
        caption: Option<&str>,
    ) -> anyhow::Result<()> {
        let part = Part::bytes(data).file_name("photo.jpg".to_string());

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", part);

        if let Some(cap) = caption {
            form = form.text("caption", cap.to_string());
        }

        let resp = self
            .client
            .post(self.api_url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = resp.text().await?;
            anyhow::bail!("Telegram sendPhoto failed: {err}");
        }

        tracing::info!("Telegram photo sent to {chat_id}");
        Ok(())
    }

    async fn send_photo_batch(&self, chat_id: i64, photos: Vec<Vec<u8>>) -> anyhow::Result<()> {
        if photos.len() > crate::transform::MAX_BATCH {
            anyhow::bail!(
                "media group limited to {} photos, got {}",
                crate::transform::MAX_BATCH,
                photos.len()
            );
        }

        let count = photos.len();
        let media: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "type": "photo",
                    "media": format!("attach://tile{i}")
                })
            })
            .collect();

        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("media", serde_json::Value::Array(media).to_string());

        for (i, data) in photos.into_iter().enumerate() {
            let part = Part::bytes(data).file_name(format!("tile{i}.jpg"));
            form = form.part(format!("tile{i}"), part);
        }

        let resp = self
            .client
            .post(self.api_url("sendMediaGroup"))
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            let err = resp.text().await?;
            anyhow::bail!("Telegram sendMediaGroup failed: {err}");
        }

        tracing::info!("Telegram media group of {count} sent to {chat_id}");
        Ok(())
    }
}
