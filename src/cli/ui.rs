use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::{CurrencyPair, Notification, Presenter};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Result,
    Success,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Success => style(text).green(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a spinner shown while a quote is on its way.
pub fn new_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Renders conversions on the terminal, one line per notification.
#[derive(Default)]
pub struct TerminalPresenter {
    spinner: Option<ProgressBar>,
    last: Option<Notification>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent notification, if it reported a failure.
    pub fn last_failure(&self) -> Option<Notification> {
        self.last.filter(Notification::is_failure)
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Presenter for TerminalPresenter {
    fn fetch_started(&mut self, pair: &CurrencyPair) {
        self.clear_spinner();
        self.spinner = Some(new_spinner(format!("Fetching rate for {pair}")));
    }

    fn notify(&mut self, notification: Notification) {
        self.clear_spinner();
        self.last = Some(notification);
        let text = notification.to_string();
        let line = match notification {
            Notification::ConvertedFromCache => style_text(&text, StyleType::Subtle),
            n if n.is_failure() => style_text(&text, StyleType::Error),
            _ => style_text(&text, StyleType::Success),
        };
        println!("{line}");
    }

    fn show_result(&mut self, text: &str) {
        self.clear_spinner();
        println!("{}", style_text(text, StyleType::Result));
    }
}
