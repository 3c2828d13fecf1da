//! Source adapters — external collaborators of the transformation core.

pub mod dataset;
pub mod marketstack;
pub mod provider;
pub mod tickers;

pub use dataset::CsvDatasetReader;
pub use marketstack::MarketstackProvider;
pub use provider::{DataError, DatasetSource, MarketSource, TickerSource};
pub use tickers::GistTickerSource;
