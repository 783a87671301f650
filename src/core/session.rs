//! Single-threaded interaction loop around one controller.
//!
//! Requests and fetch completions both arrive on this loop, and only the loop
//! touches the controller or the presenter. Quote requests run as separate
//! tasks in a `JoinSet` owned by the loop, so a fetch that panics still comes
//! back as a completion.

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::controller::{ConversionController, PendingFetch, Step};
use super::fetcher::{FetchError, RawResponse};
use super::presenter::{Presenter, present};

#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub amount: String,
    pub source: String,
    pub target: String,
}

impl ConversionRequest {
    pub fn new(amount: &str, source: &str, target: &str) -> Self {
        ConversionRequest {
            amount: amount.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

pub struct Session<P: Presenter> {
    controller: ConversionController,
    presenter: P,
    fetches: JoinSet<Result<RawResponse, FetchError>>,
    in_flight: Option<PendingFetch>,
}

impl<P: Presenter> Session<P> {
    pub fn new(controller: ConversionController, presenter: P) -> Self {
        Session {
            controller,
            presenter,
            fetches: JoinSet::new(),
            in_flight: None,
        }
    }

    /// Runs until `requests` is closed and nothing is in flight, then hands
    /// the presenter back.
    pub async fn run(mut self, mut requests: mpsc::Receiver<ConversionRequest>) -> P {
        loop {
            tokio::select! {
                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    let response = joined.unwrap_or_else(|e| {
                        warn!(error = %e, "Fetch task did not complete");
                        Err(FetchError::Task(e))
                    });
                    self.finish(response);
                }
                request = requests.recv(), if self.controller.is_idle() => {
                    let Some(request) = request else {
                        debug!("Request channel closed, ending session");
                        break;
                    };
                    self.handle(request);
                }
                else => break,
            }
        }

        self.presenter
    }

    fn handle(&mut self, request: ConversionRequest) {
        match self
            .controller
            .begin(&request.amount, &request.source, &request.target)
        {
            Step::Done(outcome) => present(&outcome, &mut self.presenter),
            Step::Fetch(pending) => {
                self.presenter.fetch_started(&pending.pair);
                self.fetches
                    .spawn(self.controller.fetch_task(pending.pair.clone()));
                self.in_flight = Some(pending);
            }
        }
    }

    fn finish(&mut self, response: Result<RawResponse, FetchError>) {
        let Some(pending) = self.in_flight.take() else {
            warn!("Fetch completed with no request waiting for it");
            return;
        };
        let outcome = self.controller.complete(pending, response);
        present(&outcome, &mut self.presenter);
    }
}
