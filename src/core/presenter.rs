//! Presentation boundary

use std::fmt::{self, Display};

use super::controller::{ConversionError, ConversionOutcome, RateOrigin};
use super::currency::CurrencyPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    ConvertedFromCache,
    ConvertedFromNetwork,
    MissingSelection,
    RateUnavailable,
    MalformedResponse,
}

impl Notification {
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            Notification::ConvertedFromCache | Notification::ConvertedFromNetwork
        )
    }
}

impl From<&ConversionOutcome> for Notification {
    fn from(outcome: &ConversionOutcome) -> Self {
        match outcome {
            ConversionOutcome::Converted {
                origin: RateOrigin::Cache,
                ..
            } => Notification::ConvertedFromCache,
            ConversionOutcome::Converted {
                origin: RateOrigin::Network,
                ..
            } => Notification::ConvertedFromNetwork,
            ConversionOutcome::Failed(ConversionError::Validation(_)) => {
                Notification::MissingSelection
            }
            ConversionOutcome::Failed(ConversionError::Fetch(_)) => Notification::RateUnavailable,
            ConversionOutcome::Failed(ConversionError::Parse(_)) => {
                Notification::MalformedResponse
            }
        }
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Notification::ConvertedFromCache => "Conversion done (without new API call)",
            Notification::ConvertedFromNetwork => "Conversion done",
            Notification::MissingSelection => "Please select both currencies",
            Notification::RateUnavailable => "An error occurred trying to get conversion rate",
            Notification::MalformedResponse => "Received a malformed conversion rate",
        })
    }
}

pub trait Presenter: Send {
    /// Called when a quote request leaves; the default does nothing.
    fn fetch_started(&mut self, _pair: &CurrencyPair) {}

    fn notify(&mut self, notification: Notification);

    fn show_result(&mut self, text: &str);
}

/// Hands an outcome to the presenter. A missing result leaves whatever is on
/// display untouched.
pub fn present(outcome: &ConversionOutcome, presenter: &mut dyn Presenter) {
    if let Some(result) = outcome.result() {
        presenter.show_result(&result.to_string());
    }
    presenter.notify(Notification::from(outcome));
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::controller::ValidationError;
    use crate::core::currency::ConversionRate;
    use crate::core::quotes::ParseError;

    /// Records everything it is asked to show.
    #[derive(Default)]
    pub(crate) struct RecordingPresenter {
        pub(crate) fetches: Vec<String>,
        pub(crate) notifications: Vec<Notification>,
        pub(crate) display: Option<String>,
    }

    impl Presenter for RecordingPresenter {
        fn fetch_started(&mut self, pair: &CurrencyPair) {
            self.fetches.push(pair.quote_key());
        }

        fn notify(&mut self, notification: Notification) {
            self.notifications.push(notification);
        }

        fn show_result(&mut self, text: &str) {
            self.display = Some(text.to_string());
        }
    }

    #[test]
    fn test_present_keeps_display_on_bad_amount() {
        let mut presenter = RecordingPresenter::default();
        let rate = ConversionRate::new(2.0).unwrap();

        present(
            &ConversionOutcome::Converted {
                origin: RateOrigin::Network,
                rate,
                result: Some(rate.apply(3.0)),
            },
            &mut presenter,
        );
        present(
            &ConversionOutcome::Converted {
                origin: RateOrigin::Cache,
                rate,
                result: None,
            },
            &mut presenter,
        );

        assert_eq!(presenter.display.as_deref(), Some("6.0"));
        assert_eq!(
            presenter.notifications,
            vec![
                Notification::ConvertedFromNetwork,
                Notification::ConvertedFromCache
            ]
        );
    }

    #[test]
    fn test_failures_map_to_notifications() {
        let mut presenter = RecordingPresenter::default();
        present(
            &ConversionOutcome::Failed(ValidationError::MissingSelection.into()),
            &mut presenter,
        );
        present(
            &ConversionOutcome::Failed(ParseError::UnexpectedShape.into()),
            &mut presenter,
        );

        assert_eq!(
            presenter.notifications,
            vec![
                Notification::MissingSelection,
                Notification::MalformedResponse
            ]
        );
        assert!(presenter.notifications.iter().all(Notification::is_failure));
        assert!(presenter.display.is_none());
    }
}
