//! Theme definitions for the terminal client.
//!
//! Muted base colors with a single accent for focus and selection; status colors are
//! reserved for alerts and the similarity badge.

use ratatui::style::{Color, Modifier, Style};

use crate::model::types::SearchMethod;

pub mod colors {
    use ratatui::style::Color;

    // ═══════════════════════════════════════════════════════════════════════════
    // BASE COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Deep background - primary canvas color
    pub const BG_DEEP: Color = Color::Rgb(26, 27, 38); // #1a1b26

    /// Elevated surface - cards, modals, popups
    pub const BG_SURFACE: Color = Color::Rgb(36, 40, 59); // #24283b

    /// Selected card background
    pub const BG_HIGHLIGHT: Color = Color::Rgb(41, 46, 66); // #292e42

    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261

    pub const BORDER_FOCUS: Color = Color::Rgb(125, 145, 200); // #7d91c8

    // ═══════════════════════════════════════════════════════════════════════════
    // TEXT COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub const TEXT_PRIMARY: Color = Color::Rgb(192, 202, 245); // #c0caf5

    pub const TEXT_SECONDARY: Color = Color::Rgb(169, 177, 214); // #a9b1d6

    /// Hints, placeholders, `N/A` metrics
    pub const TEXT_MUTED: Color = Color::Rgb(105, 114, 158); // #69729e

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCENT COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub const ACCENT_PRIMARY: Color = Color::Rgb(122, 162, 247); // #7aa2f7

    pub const ACCENT_SECONDARY: Color = Color::Rgb(187, 154, 247); // #bb9af7

    pub const ACCENT_TERTIARY: Color = Color::Rgb(125, 207, 255); // #7dcfff

    // ═══════════════════════════════════════════════════════════════════════════
    // STATUS COLORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub const STATUS_SUCCESS: Color = Color::Rgb(115, 218, 202); // #73daca

    pub const STATUS_WARNING: Color = Color::Rgb(224, 175, 104); // #e0af68

    pub const STATUS_ERROR: Color = Color::Rgb(247, 118, 142); // #f7768e
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub accent: Color,
    pub accent_alt: Color,
    pub bg: Color,
    pub fg: Color,
    pub fg_secondary: Color,
    pub surface: Color,
    pub hint: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl ThemePalette {
    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(47, 107, 231),      // Rich blue
            accent_alt: Color::Rgb(124, 93, 198),  // Purple
            bg: Color::Rgb(250, 250, 252),         // Off-white
            fg: Color::Rgb(36, 41, 46),            // Near-black
            fg_secondary: Color::Rgb(68, 76, 86),  // Slate
            surface: Color::Rgb(240, 241, 245),    // Light gray
            hint: Color::Rgb(125, 134, 144),       // Medium gray
            border: Color::Rgb(216, 222, 228),     // Border gray
            success: Color::Rgb(45, 138, 72),      // Forest green
            warning: Color::Rgb(177, 133, 41),     // Amber
            error: Color::Rgb(200, 55, 70),        // Brick red
        }
    }

    pub fn dark() -> Self {
        Self {
            accent: colors::ACCENT_PRIMARY,
            accent_alt: colors::ACCENT_SECONDARY,
            bg: colors::BG_DEEP,
            fg: colors::TEXT_PRIMARY,
            fg_secondary: colors::TEXT_SECONDARY,
            surface: colors::BG_SURFACE,
            hint: colors::TEXT_MUTED,
            border: colors::BORDER,
            success: colors::STATUS_SUCCESS,
            warning: colors::STATUS_WARNING,
            error: colors::STATUS_ERROR,
        }
    }

    /// Title style - accent colored with bold modifier
    pub fn title(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_subtle(self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    pub fn hint_style(self) -> Style {
        Style::default().fg(self.hint)
    }

    pub fn body_style(self) -> Style {
        Style::default().fg(self.fg_secondary)
    }

    pub fn border_style(self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focus_style(self) -> Style {
        Style::default().fg(colors::BORDER_FOCUS)
    }

    pub fn selected_style(self) -> Style {
        Style::default()
            .bg(colors::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Active page button, active method chip.
    pub fn highlight_style(self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn alert_style(self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Each retrieval method gets its own accent so mixed screenshots stay readable.
    pub fn method_accent(self, method: SearchMethod) -> Color {
        match method {
            SearchMethod::Bow => self.accent_alt,
            SearchMethod::Tfidf => self.accent,
            SearchMethod::Word2vec => colors::ACCENT_TERTIARY,
        }
    }

    /// Badge color for a similarity score in `[0, 1]`.
    pub fn similarity_color(self, similarity: f64) -> Color {
        if similarity >= 0.5 {
            self.success
        } else if similarity >= 0.2 {
            self.warning
        } else {
            self.hint
        }
    }
}
