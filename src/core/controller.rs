//! Conversion requests against a one-entry rate cache

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::currency::{
    ConversionRate, ConversionResult, CurrencyCode, CurrencyPair, parse_amount,
};
use super::fetcher::{FetchError, RateFetcher, RawResponse};
use super::quotes::{ParseError, parse_rate};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please select both currencies")]
    MissingSelection,
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("rate unavailable")]
    Fetch(#[from] FetchError),
    #[error("malformed rate response")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    Cache,
    Network,
}

#[derive(Debug)]
pub enum ConversionOutcome {
    /// The rate was applied. `result` is `None` when the amount text is not a
    /// number; that case is deliberately not an error.
    Converted {
        origin: RateOrigin,
        rate: ConversionRate,
        result: Option<ConversionResult>,
    },
    Failed(ConversionError),
}

impl ConversionOutcome {
    pub fn result(&self) -> Option<ConversionResult> {
        match self {
            ConversionOutcome::Converted { result, .. } => *result,
            ConversionOutcome::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Fetching(CurrencyPair),
}

/// A cache miss waiting for its quote.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub pair: CurrencyPair,
    pub amount_text: String,
}

#[derive(Debug)]
pub enum Step {
    Done(ConversionOutcome),
    Fetch(PendingFetch),
}

pub struct ConversionController {
    fetcher: Arc<dyn RateFetcher>,
    api_key: String,
    cached_pair: Option<CurrencyPair>,
    cached_rate: ConversionRate,
    state: ControllerState,
}

impl ConversionController {
    pub fn new(fetcher: Arc<dyn RateFetcher>, api_key: &str) -> Self {
        ConversionController {
            fetcher,
            api_key: api_key.to_string(),
            cached_pair: None,
            cached_rate: ConversionRate::IDENTITY,
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == ControllerState::Idle
    }

    pub fn cached_pair(&self) -> Option<&CurrencyPair> {
        self.cached_pair.as_ref()
    }

    pub fn cached_rate(&self) -> ConversionRate {
        self.cached_rate
    }

    /// Validates the selection and answers from the cache when the pair is
    /// unchanged. Otherwise records the new pair, enters `Fetching` and hands
    /// back the fetch to run.
    pub fn begin(&mut self, amount_text: &str, source: &str, target: &str) -> Step {
        let (Some(source), Some(target)) =
            (CurrencyCode::selected(source), CurrencyCode::selected(target))
        else {
            debug!("Conversion requested without both currencies selected");
            return Step::Done(ConversionOutcome::Failed(
                ValidationError::MissingSelection.into(),
            ));
        };
        let pair = CurrencyPair::new(source, target);

        if self.cached_pair.as_ref() == Some(&pair) {
            debug!(%pair, "Rate cache HIT");
            return Step::Done(self.convert(RateOrigin::Cache, amount_text));
        }

        if let ControllerState::Fetching(in_flight) = &self.state {
            warn!(%in_flight, "Starting a fetch while another one is in flight");
        }
        debug!(%pair, "Rate cache MISS");
        self.cached_pair = Some(pair.clone());
        self.state = ControllerState::Fetching(pair.clone());
        Step::Fetch(PendingFetch {
            pair,
            amount_text: amount_text.to_string(),
        })
    }

    /// A self-contained future for the quote request, so it can run away from
    /// the task that owns the controller.
    pub fn fetch_task(
        &self,
        pair: CurrencyPair,
    ) -> impl Future<Output = Result<RawResponse, FetchError>> + Send + use<> {
        let fetcher = Arc::clone(&self.fetcher);
        let api_key = self.api_key.clone();
        async move { fetcher.fetch(&pair, &api_key).await }
    }

    /// Applies the result of a fetch started by [`Self::begin`].
    pub fn complete(
        &mut self,
        pending: PendingFetch,
        response: Result<RawResponse, FetchError>,
    ) -> ConversionOutcome {
        self.state = ControllerState::Idle;

        let body = match response {
            Ok(RawResponse(body)) => body,
            Err(e) => {
                debug!(pair = %pending.pair, error = %e, "Rate fetch failed");
                return ConversionOutcome::Failed(e.into());
            }
        };

        match parse_rate(&body, &pending.pair) {
            Ok(rate) => {
                self.cached_rate = rate;
                self.convert(RateOrigin::Network, &pending.amount_text)
            }
            Err(e) => {
                debug!(pair = %pending.pair, error = %e, "Rate response rejected");
                ConversionOutcome::Failed(e.into())
            }
        }
    }

    #[instrument(name = "Conversion", skip(self, amount_text))]
    pub async fn request_conversion(
        &mut self,
        amount_text: &str,
        source: &str,
        target: &str,
    ) -> ConversionOutcome {
        match self.begin(amount_text, source, target) {
            Step::Done(outcome) => outcome,
            Step::Fetch(pending) => {
                let response = self.fetch_task(pending.pair.clone()).await;
                self.complete(pending, response)
            }
        }
    }

    fn convert(&self, origin: RateOrigin, amount_text: &str) -> ConversionOutcome {
        let result = parse_amount(amount_text).map(|amount| self.cached_rate.apply(amount));
        if result.is_none() {
            debug!(amount_text, "Amount is not a number, leaving result untouched");
        }
        ConversionOutcome::Converted {
            origin,
            rate: self.cached_rate,
            result,
        }
    }
}
