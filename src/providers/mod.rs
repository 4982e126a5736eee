pub mod binance;
pub mod debounce;

pub use binance::BinanceProvider;
pub use debounce::{DebouncedRateProvider, Debouncer};
