//! 도메인 모델.

pub mod deposit;
pub mod stock;

pub use deposit::{dedup_and_sort, parse_deposit_date, DepositRecord, DepositSeries};
pub use stock::{KrMarket, StockSeries, TickerInfo};
