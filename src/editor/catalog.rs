//! Choices offered by the photo editor panels.

/// A sticker offered in the picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StickerChoice {
    /// Emoji drawn on the photo.
    pub emoji: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// A font offered in the text panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontChoice {
    /// Display name.
    pub name: &'static str,
    /// Family stack stored in [`crate::TextStyle::font_family`].
    pub family: &'static str,
}

const fn sticker(emoji: &'static str, name: &'static str) -> StickerChoice {
    StickerChoice { emoji, name }
}

const fn font(name: &'static str, family: &'static str) -> FontChoice {
    FontChoice { name, family }
}

/// Emoji stickers in picker order.
pub const STICKERS: [StickerChoice; 16] = [
    sticker("❤️", "Heart"),
    sticker("⭐", "Star"),
    sticker("😊", "Smile"),
    sticker("☀️", "Sun"),
    sticker("🌙", "Moon"),
    sticker("☁️", "Cloud"),
    sticker("⚡", "Zap"),
    sticker("🎁", "Gift"),
    sticker("🎵", "Music"),
    sticker("📸", "Camera"),
    sticker("✨", "Sparkles"),
    sticker("🎉", "Party"),
    sticker("🌈", "Rainbow"),
    sticker("🔥", "Fire"),
    sticker("💎", "Diamond"),
    sticker("🌸", "Flower"),
];

/// Text fonts; the first entry is the default.
pub const FONTS: [FontChoice; 6] = [
    font("Arial", "Arial, sans-serif"),
    font("Georgia", "Georgia, serif"),
    font("Impact", "Impact, sans-serif"),
    font("Comic Sans", "Comic Sans MS, cursive"),
    font("Times", "Times New Roman, serif"),
    font("Helvetica", "Helvetica, sans-serif"),
];

/// Text color swatches as `#RRGGBB`.
pub const TEXT_COLORS: [&str; 15] = [
    "#FFFFFF", "#000000", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#FFA500", "#800080", "#FFC0CB", "#A52A2A", "#808080", "#FFD700", "#C0C0C0",
];
