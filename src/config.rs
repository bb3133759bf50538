//! Frontend configuration.

use crate::style::ColorDepth;
use std::time::Duration;

/// Which palette strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthPreference {
    /// Ask the terminal how many colors it supports.
    #[default]
    Auto,
    /// Force the growable 256-entry palette.
    High,
    /// Force nearest-match against the 8 base colors.
    Low,
}

/// Configuration for the frontend and its scheduler.
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Minimum time between two unforced repaints.
    pub repaint_interval: Duration,
    /// How long the input actor waits on the terminal before checking for shutdown.
    pub input_poll_timeout: Duration,
    /// Palette strategy.
    pub color_depth: DepthPreference,
    /// Whether to use the alternate screen buffer.
    pub alternate_screen: bool,
    /// Rows reserved for the console view, when one is attached.
    pub console_height: u16,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            repaint_interval: Duration::from_millis(15),
            input_poll_timeout: Duration::from_millis(10),
            color_depth: DepthPreference::Auto,
            alternate_screen: true,
            console_height: 20,
        }
    }
}

impl FrontendConfig {
    /// Resolve the depth preference against the running terminal.
    ///
    /// Terminals reporting fewer than 256 colors degrade to low depth.
    pub fn resolve_depth(&self) -> ColorDepth {
        match self.color_depth {
            DepthPreference::High => ColorDepth::High,
            DepthPreference::Low => ColorDepth::Low,
            DepthPreference::Auto => {
                let count = crossterm::style::available_color_count();
                let depth = ColorDepth::for_color_count(count);
                if depth == ColorDepth::Low {
                    tracing::warn!(colors = count, "256 color mode unavailable, using base colors");
                } else {
                    tracing::debug!(colors = count, "using 256 color mode");
                }
                depth
            }
        }
    }
}
