//! Localized text lookup.
//!
//! Three locales (uz/ru/en) with a fixed key set and the reply-keyboard
//! button layout. The classifier matches incoming text against the union of
//! all locales' button labels, so switching language never strands a user
//! behind a keyboard rendered in the previous locale.

use serde::{Deserialize, Serialize};

/// Supported interface locales, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Uz,
    Ru,
    En,
}

impl Locale {
    /// Locale code as used in config and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uz => "uz",
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// Next locale in the fixed cycle uz → ru → en → uz.
    pub const fn next(self) -> Self {
        match self {
            Self::Uz => Self::Ru,
            Self::Ru => Self::En,
            Self::En => Self::Uz,
        }
    }
}

/// A renderable message, with parameters where the text needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Start,
    Help,
    About,
    Contact,
    SendSuggestion,
    SuggestionThanks,
    ImageSaved,
    LangSet,
    EnterSplit,
    EnterCropSize { width: u32, height: u32 },
    SplitDone { rows: u32, cols: u32, total: u32 },
    GrayscaleDone,
    CropDone { width: u32, height: u32 },
    SendPhotoFirst,
    WrongFormat,
    OnlyNums,
    CropTooBig,
    Unknown,
}

/// Render a message in the given locale.
pub fn render(locale: Locale, msg: &Msg) -> String {
    match locale {
        Locale::Uz => render_uz(msg),
        Locale::Ru => render_ru(msg),
        Locale::En => render_en(msg),
    }
}

fn render_uz(msg: &Msg) -> String {
    match msg {
        Msg::Start => {
            "Assalomu alaykum! Menga rasm yuboring, keyin pastdagi tugmalar orqali \
             uni bo'lish, kesish yoki oq-qora qilishingiz mumkin."
                .into()
        }
        Msg::Help => {
            "Rasm yuboring, so'ng:\n\
             📐 bo'lish — \"3x5\" yoki 2, 4, 6, 8, 9, 10 sonlaridan birini kiriting\n\
             ✂️ kesish — \"600x400\" ko'rinishida o'lcham kiriting\n\
             🖤 oq-qora — rasmni oq-qora qiladi"
                .into()
        }
        Msg::About => "Bu bot rasmlarni bo'laklarga bo'lib beradi.".into(),
        Msg::Contact => "Aloqa: @pixsplit_admin".into(),
        Msg::SendSuggestion => "Taklifingizni yozib yuboring:".into(),
        Msg::SuggestionThanks => "Rahmat! Taklifingiz yuborildi.".into(),
        Msg::ImageSaved => "Rasm saqlandi. Endi tugmalardan birini tanlang.".into(),
        Msg::LangSet => "Til o'zgartirildi: o'zbekcha.".into(),
        Msg::EnterSplit => {
            "Nechta bo'lakka bo'lay? \"3x5\" (qator x ustun) yoki 2, 4, 6, 8, 9, 10 \
             sonlaridan birini kiriting."
                .into()
        }
        Msg::EnterCropSize { width, height } => {
            format!("Kesish o'lchamini kiriting, masalan \"600x400\" (maksimal {width}x{height}).")
        }
        Msg::SplitDone { rows, cols, total } => {
            format!("Tayyor! Rasm {rows}x{cols} qilib {total} bo'lakka bo'lindi.")
        }
        Msg::GrayscaleDone => "Oq-qora rasm tayyor.".into(),
        Msg::CropDone { width, height } => format!("Kesildi: {width}x{height}."),
        Msg::SendPhotoFirst => "Avval rasm yuboring.".into(),
        Msg::WrongFormat => "Noto'g'ri format. Masalan: \"3x5\" yoki \"600x400\".".into(),
        Msg::OnlyNums => "Faqat 2, 4, 6, 8, 9, 10 sonlarini kiritish mumkin.".into(),
        Msg::CropTooBig => "Kiritilgan o'lcham rasmdan katta.".into(),
        Msg::Unknown => "Tushunarsiz buyruq. Pastdagi tugmalardan foydalaning.".into(),
    }
}

fn render_ru(msg: &Msg) -> String {
    match msg {
        Msg::Start => {
            "Здравствуйте! Отправьте мне изображение, затем используйте кнопки ниже, \
             чтобы разделить, обрезать или сделать его чёрно-белым."
                .into()
        }
        Msg::Help => {
            "Отправьте изображение, затем:\n\
             📐 разделить — введите \"3x5\" или одно из чисел 2, 4, 6, 8, 9, 10\n\
             ✂️ обрезать — введите размер вида \"600x400\"\n\
             🖤 чёрно-белое — преобразует изображение"
                .into()
        }
        Msg::About => "Этот бот разрезает изображения на части.".into(),
        Msg::Contact => "Контакт: @pixsplit_admin".into(),
        Msg::SendSuggestion => "Напишите ваше предложение:".into(),
        Msg::SuggestionThanks => "Спасибо! Ваше предложение отправлено.".into(),
        Msg::ImageSaved => "Изображение сохранено. Теперь выберите действие.".into(),
        Msg::LangSet => "Язык изменён: русский.".into(),
        Msg::EnterSplit => {
            "На сколько частей разделить? Введите \"3x5\" (строки x столбцы) или одно \
             из чисел 2, 4, 6, 8, 9, 10."
                .into()
        }
        Msg::EnterCropSize { width, height } => {
            format!("Введите размер обрезки, например \"600x400\" (максимум {width}x{height}).")
        }
        Msg::SplitDone { rows, cols, total } => {
            format!("Готово! Изображение разделено {rows}x{cols} на {total} частей.")
        }
        Msg::GrayscaleDone => "Чёрно-белое изображение готово.".into(),
        Msg::CropDone { width, height } => format!("Обрезано: {width}x{height}."),
        Msg::SendPhotoFirst => "Сначала отправьте изображение.".into(),
        Msg::WrongFormat => "Неверный формат. Например: \"3x5\" или \"600x400\".".into(),
        Msg::OnlyNums => "Допустимы только числа 2, 4, 6, 8, 9, 10.".into(),
        Msg::CropTooBig => "Указанный размер больше изображения.".into(),
        Msg::Unknown => "Неизвестная команда. Используйте кнопки ниже.".into(),
    }
}

fn render_en(msg: &Msg) -> String {
    match msg {
        Msg::Start => {
            "Hello! Send me an image, then use the buttons below to split, crop, \
             or grayscale it."
                .into()
        }
        Msg::Help => {
            "Send an image, then:\n\
             📐 split — enter \"3x5\" or one of 2, 4, 6, 8, 9, 10\n\
             ✂️ crop — enter a size like \"600x400\"\n\
             🖤 grayscale — converts the image"
                .into()
        }
        Msg::About => "This bot slices images into pieces.".into(),
        Msg::Contact => "Contact: @pixsplit_admin".into(),
        Msg::SendSuggestion => "Write your suggestion:".into(),
        Msg::SuggestionThanks => "Thanks! Your suggestion has been forwarded.".into(),
        Msg::ImageSaved => "Image saved. Now pick an action below.".into(),
        Msg::LangSet => "Language set: English.".into(),
        Msg::EnterSplit => {
            "How many pieces? Enter \"3x5\" (rows x columns) or one of 2, 4, 6, 8, 9, 10."
                .into()
        }
        Msg::EnterCropSize { width, height } => {
            format!("Enter the crop size, e.g. \"600x400\" (up to {width}x{height}).")
        }
        Msg::SplitDone { rows, cols, total } => {
            format!("Done! The image was split {rows}x{cols} into {total} pieces.")
        }
        Msg::GrayscaleDone => "Grayscale image ready.".into(),
        Msg::CropDone { width, height } => format!("Cropped: {width}x{height}."),
        Msg::SendPhotoFirst => "Please send an image first.".into(),
        Msg::WrongFormat => "Wrong format. For example: \"3x5\" or \"600x400\".".into(),
        Msg::OnlyNums => "Only 2, 4, 6, 8, 9, 10 are accepted.".into(),
        Msg::CropTooBig => "The requested size exceeds the image.".into(),
        Msg::Unknown => "Unknown command. Use the buttons below.".into(),
    }
}

/// Reply-keyboard layout for a locale, rows of button labels.
pub fn button_rows(locale: Locale) -> Vec<Vec<String>> {
    let rows: &[&[&str]] = match locale {
        Locale::Uz => &[
            &["📐 Rasmni bo'lish", "✂️ Rasmni kesish"],
            &["🖤 Oq-qora qilish", "💡 Taklif"],
            &["🆘 Yordam", "ℹ️ Haqida"],
            &["🌐 Tilni o'zgartirish"],
        ],
        Locale::Ru => &[
            &["📐 Разделить изображение", "✂️ Обрезать изображение"],
            &["🖤 Чёрно-белое", "💡 Предложение"],
            &["🆘 Помощь", "ℹ️ О боте"],
            &["🌐 Сменить язык"],
        ],
        Locale::En => &[
            &["📐 Split image", "✂️ Crop image"],
            &["🖤 Grayscale", "💡 Offer"],
            &["🆘 Help", "ℹ️ About"],
            &["📞 Contact", "🌐 Change language"],
        ],
    };
    rows.iter()
        .map(|row| row.iter().map(|s| (*s).to_string()).collect())
        .collect()
}
