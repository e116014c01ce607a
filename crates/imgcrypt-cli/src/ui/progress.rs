//! Busy indicator shown while a task is outstanding, using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar as IndicatifBar, ProgressDrawTarget, ProgressStyle};

use super::context::UiContext;

/// A spinner for indeterminate progress, drawn on stderr.
pub struct Spinner {
    bar: Option<IndicatifBar>,
}

impl Spinner {
    /// Create and start a spinner with the given message. Does nothing when
    /// animation is not allowed (no TTY, quiet, or JSON mode).
    pub fn start(ctx: &UiContext, message: &str) -> Self {
        let bar = if ctx.allows_animation() {
            let pb = IndicatifBar::with_draw_target(None, ProgressDrawTarget::stderr());
            let tick_strings: &[&str] = if ctx.unicode {
                &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]
            } else {
                &["|", "/", "-", "\\", ""]
            };
            let template = if ctx.color {
                "{spinner:.cyan} {msg}... {elapsed}"
            } else {
                "{spinner} {msg}... {elapsed}"
            };
            let style = ProgressStyle::default_spinner()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(tick_strings);
            pb.set_style(style);
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(80));
            Some(pb)
        } else {
            None
        };

        Self { bar }
    }

    /// Stop and erase the spinner.
    pub fn finish(self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            if !bar.is_finished() {
                bar.finish_and_clear();
            }
        }
    }
}
