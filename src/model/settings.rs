//! Typed access to the handful of settings the renderer reads.

use super::{EditorModel, SettingValue, View};
use crate::grid::Modifiers;
use std::time::Duration;

/// Blink phase when `caret_blink_phase` is unset.
pub const DEFAULT_BLINK_PHASE: Duration = Duration::from_secs(1);

/// How the caret is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretStyle {
    /// Underline the character under the caret.
    #[default]
    Underline,
    /// Reverse video over the character under the caret.
    Block,
}

impl CaretStyle {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "underline" => Some(Self::Underline),
            "block" => Some(Self::Block),
            _ => None,
        }
    }

    const fn modifiers(self) -> Modifiers {
        match self {
            Self::Underline => Modifiers::UNDERLINE,
            Self::Block => Modifiers::REVERSED,
        }
    }

    const fn inverted(self) -> Self {
        match self {
            Self::Underline => Self::Block,
            Self::Block => Self::Underline,
        }
    }
}

/// Per-view rendering settings with their defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    /// Columns per tab stop (`tab_size`).
    pub tab_width: u16,
    /// Caret appearance (`caret_style`).
    pub caret_style: CaretStyle,
    /// Swap the caret appearance (`inverse_caret_state`).
    pub inverse_caret: bool,
    /// Whether the caret blinks (`caret_blink`).
    pub caret_blink: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            caret_style: CaretStyle::Underline,
            inverse_caret: false,
            caret_blink: true,
        }
    }
}

impl ViewSettings {
    /// Read settings from a view, falling back to defaults for missing or
    /// mistyped values.
    pub fn read(view: &dyn View) -> Self {
        let defaults = Self::default();
        let tab_width = match view.setting("tab_size") {
            None => defaults.tab_width,
            Some(value) => match &value {
                SettingValue::Int(n) => u16::try_from(*n).ok().filter(|&w| w > 0),
                _ => None,
            }
            .unwrap_or_else(|| mistyped("tab_size", &value, defaults.tab_width)),
        };
        let caret_style = match view.setting("caret_style") {
            None => defaults.caret_style,
            Some(value) => match &value {
                SettingValue::Str(name) => CaretStyle::parse(name),
                _ => None,
            }
            .unwrap_or_else(|| mistyped("caret_style", &value, defaults.caret_style)),
        };
        Self {
            tab_width,
            caret_style,
            inverse_caret: flag(view, "inverse_caret_state", defaults.inverse_caret),
            caret_blink: flag(view, "caret_blink", defaults.caret_blink),
        }
    }

    /// Modifiers applied to the character under a visible caret.
    pub const fn caret_modifiers(&self) -> Modifiers {
        if self.inverse_caret {
            self.caret_style.inverted().modifiers()
        } else {
            self.caret_style.modifiers()
        }
    }
}

/// Half of this is the blink timer period.
pub fn blink_phase(model: &dyn EditorModel) -> Duration {
    match model.setting("caret_blink_phase") {
        None => DEFAULT_BLINK_PHASE,
        Some(value @ SettingValue::Float(secs)) if secs > 0.0 => {
            Duration::try_from_secs_f64(secs)
                .unwrap_or_else(|_| mistyped("caret_blink_phase", &value, DEFAULT_BLINK_PHASE))
        }
        Some(SettingValue::Int(secs)) if secs > 0 => Duration::from_secs(secs.unsigned_abs()),
        Some(other) => mistyped("caret_blink_phase", &other, DEFAULT_BLINK_PHASE),
    }
}

fn flag(view: &dyn View, key: &str, default: bool) -> bool {
    match view.setting(key) {
        None => default,
        Some(SettingValue::Bool(b)) => b,
        Some(other) => mistyped(key, &other, default),
    }
}

fn mistyped<T: std::fmt::Debug>(key: &str, value: &SettingValue, default: T) -> T {
    tracing::warn!(
        key,
        found = value.type_name(),
        ?value,
        ?default,
        "unexpected setting value, using default"
    );
    default
}
