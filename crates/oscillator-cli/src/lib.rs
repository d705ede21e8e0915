//! 수급 오실레이터 데이터 계층의 JSON 파사드.
//!
//! 호스트 앱은 [`StockAnalyzer`]의 문자열 반환 메서드만 사용하며,
//! 모든 진단 로그는 stderr로, JSON 결과는 stdout으로 출력됩니다.

pub mod error;
pub mod facade;

pub use error::{AnalyzerError, InitError};
pub use facade::{
    error_envelope, DepositSummary, OscillatorReport, StockAnalyzer, DEFAULT_DAYS,
    DEFAULT_NUM_PAGES,
};
