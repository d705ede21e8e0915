//! 수급 오실레이터 분석.
//!
//! 종목별 외국인/기관 5일 누적 순매수와 시가총액으로 수급 오실레이터를 계산하고,
//! EMA/MACD 기반 매매 신호와 증시 자금 동향을 분석합니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use oscillator_analytics::{analyze_signal, calculate};
//!
//! let result = calculate(&series)?;
//! let analysis = analyze_signal(&result);
//! println!("{} ({:.0}점)", analysis.signal, analysis.score);
//! ```

pub mod error;
pub mod market;
pub mod oscillator;
pub mod signal;

pub use error::{AnalyticsError, AnalyticsResult};
pub use market::analyze_market_deposit;
pub use oscillator::{calculate, calculate_with, ema, OscillatorParams, OscillatorResult};
pub use signal::{analyze_signal, SignalAnalysis, TradeSignal};
