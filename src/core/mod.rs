//! Core conversion logic and abstractions

pub mod config;
pub mod controller;
pub mod currency;
pub mod fetcher;
pub mod log;
pub mod presenter;
pub mod quotes;
pub mod session;

// Re-export main types for cleaner imports
pub use controller::{ConversionController, ConversionError, ConversionOutcome, RateOrigin};
pub use currency::{ConversionRate, ConversionResult, CurrencyCode, CurrencyPair};
pub use fetcher::{FetchError, RateFetcher, RawResponse};
pub use presenter::{Notification, Presenter};
pub use quotes::{ParseError, parse_rate};
pub use session::{ConversionRequest, Session};
