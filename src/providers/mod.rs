pub mod apilayer;

pub use apilayer::ApiLayerFetcher;
