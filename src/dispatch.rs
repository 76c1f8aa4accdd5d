//! Event dispatch: the per-user command state machine.
//!
//! Routes each inbound event through the classifier and the transform
//! engine, updating the session store and emitting replies through the
//! [`Transport`]. Any mode-consuming text resets the mode before the outcome
//! is known — one attempt per prompt, success and failure alike.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::channels::{Event, EventKind, Transport};
use crate::error::BotError;
use crate::intent::{classify, Intent};
use crate::session::{Mode, SessionStore};
use crate::texts::{self, Locale, Msg};
use crate::{geometry, transform};

pub struct Dispatcher {
    store: SessionStore,
    transport: Arc<dyn Transport>,
    admin_chat_id: i64,
}

/// Localized reply for a recoverable error.
fn error_msg(err: &BotError) -> Msg {
    match err {
        BotError::NoImageOnFile => Msg::SendPhotoFirst,
        BotError::Format(_) | BotError::Image(_) => Msg::WrongFormat,
        BotError::DisallowedTileCount(_) => Msg::OnlyNums,
        BotError::CropTooLarge { .. } => Msg::CropTooBig,
        BotError::UnknownCommand => Msg::Unknown,
    }
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, admin_chat_id: i64) -> Self {
        Self {
            store: SessionStore::new(),
            transport,
            admin_chat_id,
        }
    }

    /// Drain the inbound event stream until the sender side closes.
    pub async fn run(&self, mut rx: mpsc::Receiver<Event>) {
        while let Some(event) = rx.recv().await {
            let event_id = event.id.clone();
            let user_id = event.user_id;
            if let Err(e) = self.handle_event(event).await {
                tracing::error!(event_id = %event_id, user_id, "event handling failed: {e}");
            }
        }
    }

    pub async fn handle_event(&self, event: Event) -> anyhow::Result<()> {
        match event.kind {
            EventKind::Photo(bytes) => {
                tracing::info!(
                    event_id = %event.id,
                    user_id = event.user_id,
                    size_bytes = bytes.len(),
                    "photo received"
                );
                self.store.put_image(event.user_id, bytes);
                let locale = self.store.locale(event.user_id);
                self.reply(event.chat_id, locale, &Msg::ImageSaved).await
            }
            EventKind::Text(text) => {
                tracing::info!(
                    event_id = %event.id,
                    user_id = event.user_id,
                    "text received"
                );
                self.handle_text(event.chat_id, event.user_id, &text).await
            }
        }
    }

    async fn handle_text(&self, chat_id: i64, user_id: i64, text: &str) -> anyhow::Result<()> {
        let locale = self.store.locale(user_id);
        let mode = self.store.mode(user_id);

        match classify(text, mode) {
            Ok(Intent::ShowStart) => {
                self.transport
                    .send_text_with_keyboard(
                        chat_id,
                        &texts::render(locale, &Msg::Start),
                        &texts::button_rows(locale),
                    )
                    .await
            }
            Ok(Intent::ShowHelp) => self.reply(chat_id, locale, &Msg::Help).await,
            Ok(Intent::ShowAbout) => self.reply(chat_id, locale, &Msg::About).await,
            Ok(Intent::ShowContact) => self.reply(chat_id, locale, &Msg::Contact).await,
            Ok(Intent::SwitchLanguage) => {
                let next = locale.next();
                self.store.set_locale(user_id, next);
                tracing::info!(user_id, locale = next.as_str(), "language switched");
                self.transport
                    .send_text_with_keyboard(
                        chat_id,
                        &texts::render(next, &Msg::LangSet),
                        &texts::button_rows(next),
                    )
                    .await
            }
            Ok(Intent::EnterSuggestionMode) => {
                self.store.set_mode(user_id, Mode::AwaitingSuggestion);
                self.reply(chat_id, locale, &Msg::SendSuggestion).await
            }
            Ok(Intent::EnterSplitMode) => {
                self.store.set_mode(user_id, Mode::AwaitingSplitSpec);
                self.reply(chat_id, locale, &Msg::EnterSplit).await
            }
            Ok(Intent::EnterCropMode) => self.enter_crop_mode(chat_id, user_id, locale).await,
            Ok(Intent::ApplyGrayscale) => self.run_grayscale(chat_id, user_id, locale).await,
            Ok(Intent::Feedback(feedback)) => {
                self.store.take_mode(user_id);
                self.transport
                    .send_text(self.admin_chat_id, &format!("Taklif ({user_id}):\n{feedback}"))
                    .await?;
                self.reply(chat_id, locale, &Msg::SuggestionThanks).await
            }
            Ok(Intent::Split(spec)) => {
                self.store.take_mode(user_id);
                self.run_split(chat_id, user_id, locale, spec).await
            }
            Ok(Intent::Crop(spec)) => {
                self.store.take_mode(user_id);
                self.run_crop(chat_id, user_id, locale, spec).await
            }
            Err(err) => {
                // A parse failure consumes the pending prompt too
                if mode != Mode::None {
                    self.store.take_mode(user_id);
                }
                tracing::debug!(user_id, "command rejected: {err}");
                self.reply(chat_id, locale, &error_msg(&err)).await
            }
        }
    }

    /// Arm the crop prompt, echoing the stored image's dimensions. Without a
    /// stored image the prompt is not armed and mode stays as-is.
    async fn enter_crop_mode(
        &self,
        chat_id: i64,
        user_id: i64,
        locale: Locale,
    ) -> anyhow::Result<()> {
        let Some(image) = self.store.image(user_id) else {
            return self.reply(chat_id, locale, &Msg::SendPhotoFirst).await;
        };
        match transform::dimensions(&image) {
            Ok((width, height)) => {
                self.store.set_mode(user_id, Mode::AwaitingCropSpec);
                self.reply(chat_id, locale, &Msg::EnterCropSize { width, height })
                    .await
            }
            Err(err) => {
                tracing::warn!(user_id, "stored image unreadable: {err}");
                self.reply(chat_id, locale, &error_msg(&err)).await
            }
        }
    }

    async fn run_split(
        &self,
        chat_id: i64,
        user_id: i64,
        locale: Locale,
        spec: geometry::PartitionSpec,
    ) -> anyhow::Result<()> {
        let Some(image) = self.store.image(user_id) else {
            return self.reply(chat_id, locale, &Msg::SendPhotoFirst).await;
        };

        let (rows, cols) = spec.resolve();
        match transform::split(&image, rows, cols) {
            Ok(tiles) => {
                let total = tiles.len() as u32;
                tracing::info!(user_id, rows, cols, total, "image split");
                self.reply(chat_id, locale, &Msg::SplitDone { rows, cols, total })
                    .await?;
                for batch in transform::batches(tiles) {
                    self.transport.send_photo_batch(chat_id, batch).await?;
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(user_id, rows, cols, "split failed: {err}");
                self.reply(chat_id, locale, &error_msg(&err)).await
            }
        }
    }

    async fn run_grayscale(
        &self,
        chat_id: i64,
        user_id: i64,
        locale: Locale,
    ) -> anyhow::Result<()> {
        let Some(image) = self.store.image(user_id) else {
            return self.reply(chat_id, locale, &Msg::SendPhotoFirst).await;
        };
        match transform::grayscale(&image) {
            Ok(data) => {
                tracing::info!(user_id, "grayscale produced");
                self.transport
                    .send_photo(
                        chat_id,
                        data,
                        Some(&texts::render(locale, &Msg::GrayscaleDone)),
                    )
                    .await
            }
            Err(err) => {
                tracing::warn!(user_id, "grayscale failed: {err}");
                self.reply(chat_id, locale, &error_msg(&err)).await
            }
        }
    }

    async fn run_crop(
        &self,
        chat_id: i64,
        user_id: i64,
        locale: Locale,
        spec: geometry::CropSpec,
    ) -> anyhow::Result<()> {
        let Some(image) = self.store.image(user_id) else {
            return self.reply(chat_id, locale, &Msg::SendPhotoFirst).await;
        };
        match transform::crop_centered(&image, spec.width, spec.height) {
            Ok(data) => {
                tracing::info!(user_id, spec.width, spec.height, "image cropped");
                let caption = texts::render(
                    locale,
                    &Msg::CropDone {
                        width: spec.width,
                        height: spec.height,
                    },
                );
                self.transport
                    .send_photo(chat_id, data, Some(&caption))
                    .await
            }
            Err(err) => {
                tracing::warn!(user_id, "crop failed: {err}");
                self.reply(chat_id, locale, &error_msg(&err)).await
            }
        }
    }

    async fn reply(&self, chat_id: i64, locale: Locale, msg: &Msg) -> anyhow::Result<()> {
        self.transport
            .send_text(chat_id, &texts::render(locale, msg))
            .await
    }
}
