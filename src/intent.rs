//! Free-text command classification.
//!
//! Pure function of `(text, mode)` — no transport or session dependency, so
//! the whole state machine's input side is testable in isolation. Matching is
//! against the union of all locales' command labels plus the slash-command
//! forms, so a user can always tap a button left over from a previous
//! language.

use crate::error::BotError;
use crate::geometry::{CropSpec, PartitionSpec};
use crate::session::Mode;

/// The classified meaning of one normalized text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ShowStart,
    ShowHelp,
    ShowAbout,
    ShowContact,
    EnterSuggestionMode,
    SwitchLanguage,
    EnterSplitMode,
    EnterCropMode,
    ApplyGrayscale,
    /// Free-form feedback text, forwarded untouched to the operator.
    Feedback(String),
    /// Parsed split specification (only in `AwaitingSplitSpec`).
    Split(PartitionSpec),
    /// Parsed crop specification (only in `AwaitingCropSpec`).
    Crop(CropSpec),
}

// Label sets per intent, all lowercase, union of the three locales plus the
// slash-command aliases. The `'` / `‘` pairs cover both apostrophe variants
// seen in the wild for the Uzbek labels.
const START_LABELS: &[&str] = &["/start", "🚀 start"];
const HELP_LABELS: &[&str] = &["/help", "🆘 help", "🆘 yordam", "🆘 помощь"];
const ABOUT_LABELS: &[&str] = &["/about", "ℹ️ about", "ℹ️ haqida", "ℹ️ о боте"];
const CONTACT_LABELS: &[&str] = &["/contact", "📞 contact"];
const SUGGEST_LABELS: &[&str] = &["/taklif", "💡 taklif", "💡 предложение", "💡 offer"];
const LANG_LABELS: &[&str] = &[
    "🌐 tilni o'zgartirish",
    "🌐 tilni o‘zgartirish",
    "🌐 сменить язык",
    "🌐 change language",
];
const SPLIT_LABELS: &[&str] = &[
    "📐 rasmni bo'lish",
    "📐 rasmni bo‘lish",
    "📐 split image",
    "📐 разделить изображение",
];
const GRAYSCALE_LABELS: &[&str] = &["🖤 oq-qora qilish", "🖤 grayscale", "🖤 чёрно-белое"];
const CROP_LABELS: &[&str] = &[
    "✂️ rasmni kesish",
    "✂️ crop image",
    "✂️ обрезать изображение",
];

/// Lower-case, trim, and canonicalize unicode hyphen/dash variants to `-`.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .replace(['\u{2011}', '\u{2013}', '\u{2014}'], "-")
}

fn global_intent(normalized: &str) -> Option<Intent> {
    let sets: &[(&[&str], Intent)] = &[
        (LANG_LABELS, Intent::SwitchLanguage),
        (SPLIT_LABELS, Intent::EnterSplitMode),
        (GRAYSCALE_LABELS, Intent::ApplyGrayscale),
        (CROP_LABELS, Intent::EnterCropMode),
        (START_LABELS, Intent::ShowStart),
        (HELP_LABELS, Intent::ShowHelp),
        (ABOUT_LABELS, Intent::ShowAbout),
        (CONTACT_LABELS, Intent::ShowContact),
        (SUGGEST_LABELS, Intent::EnterSuggestionMode),
    ];
    sets.iter()
        .find(|(labels, _)| labels.contains(&normalized))
        .map(|(_, intent)| intent.clone())
}

/// Classify one text message given the user's current mode.
///
/// Global intents win regardless of mode; otherwise the pending mode decides
/// how the text is parsed. With no mode and no match the command is unknown.
pub fn classify(text: &str, mode: Mode) -> Result<Intent, BotError> {
    let normalized = normalize(text);

    if let Some(intent) = global_intent(&normalized) {
        return Ok(intent);
    }

    match mode {
        Mode::AwaitingSuggestion => Ok(Intent::Feedback(text.to_string())),
        Mode::AwaitingSplitSpec => PartitionSpec::parse(&normalized).map(Intent::Split),
        Mode::AwaitingCropSpec => CropSpec::parse(&normalized).map(Intent::Crop),
        Mode::None => Err(BotError::UnknownCommand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize("  🚀 Start  "), "🚀 start");
    }

    #[test]
    fn normalize_canonicalizes_dashes() {
        assert_eq!(normalize("oq\u{2013}qora"), "oq-qora");
        assert_eq!(normalize("oq\u{2014}qora"), "oq-qora");
        assert_eq!(normalize("oq\u{2011}qora"), "oq-qora");
    }

    #[test]
    fn global_labels_match_in_any_locale() {
        for label in ["🌐 Change language", "🌐 Сменить язык", "🌐 Tilni o'zgartirish"] {
            assert_eq!(classify(label, Mode::None).unwrap(), Intent::SwitchLanguage);
        }
        assert_eq!(
            classify("📐 Split image", Mode::None).unwrap(),
            Intent::EnterSplitMode
        );
        assert_eq!(
            classify("🖤 Чёрно-белое", Mode::None).unwrap(),
            Intent::ApplyGrayscale
        );
        assert_eq!(
            classify("✂️ Rasmni kesish", Mode::None).unwrap(),
            Intent::EnterCropMode
        );
    }

    #[test]
    fn slash_commands_match() {
        assert_eq!(classify("/start", Mode::None).unwrap(), Intent::ShowStart);
        assert_eq!(classify("/help", Mode::None).unwrap(), Intent::ShowHelp);
        assert_eq!(classify("/about", Mode::None).unwrap(), Intent::ShowAbout);
        assert_eq!(
            classify("/contact", Mode::None).unwrap(),
            Intent::ShowContact
        );
        assert_eq!(
            classify("/taklif", Mode::None).unwrap(),
            Intent::EnterSuggestionMode
        );
    }

    #[test]
    fn global_intent_outranks_suggestion_mode() {
        // A navigation command typed while the bot waits for feedback must
        // not be swallowed as feedback text.
        assert_eq!(
            classify("/start", Mode::AwaitingSuggestion).unwrap(),
            Intent::ShowStart
        );
        assert_eq!(
            classify("🌐 Change language", Mode::AwaitingSplitSpec).unwrap(),
            Intent::SwitchLanguage
        );
    }

    #[test]
    fn suggestion_mode_keeps_raw_text() {
        let intent = classify("  Please add PNG output!  ", Mode::AwaitingSuggestion).unwrap();
        assert_eq!(
            intent,
            Intent::Feedback("  Please add PNG output!  ".to_string())
        );
    }

    #[test]
    fn split_mode_parses_spec() {
        assert_eq!(
            classify("3x5", Mode::AwaitingSplitSpec).unwrap(),
            Intent::Split(PartitionSpec::Explicit { rows: 3, cols: 5 })
        );
        assert_eq!(
            classify("9", Mode::AwaitingSplitSpec).unwrap(),
            Intent::Split(PartitionSpec::Count(9))
        );
        assert!(matches!(
            classify("11", Mode::AwaitingSplitSpec),
            Err(BotError::DisallowedTileCount(11))
        ));
        assert!(matches!(
            classify("lots", Mode::AwaitingSplitSpec),
            Err(BotError::Format(_))
        ));
    }

    #[test]
    fn crop_mode_parses_spec() {
        assert_eq!(
            classify("640 X 480", Mode::AwaitingCropSpec).unwrap(),
            Intent::Crop(CropSpec {
                width: 640,
                height: 480
            })
        );
        assert!(matches!(
            classify("wide", Mode::AwaitingCropSpec),
            Err(BotError::Format(_))
        ));
    }

    #[test]
    fn unmoded_unmatched_text_is_unknown() {
        assert!(matches!(
            classify("what can you do", Mode::None),
            Err(BotError::UnknownCommand)
        ));
        // Numbers with no pending prompt are not split specs
        assert!(matches!(
            classify("9", Mode::None),
            Err(BotError::UnknownCommand)
        ));
    }
}
