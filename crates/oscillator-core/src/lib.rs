//! # Oscillator Core
//!
//! 수급 오실레이터 데이터 계층의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 데이터 수집/분석 크레이트 전반에서 사용되는 기본 타입을 제공합니다:
//! - 증시자금동향 레코드 및 컬럼형 시계열
//! - 종목 정보 및 종목 시계열
//! - 환경변수 기반 설정
//! - stderr 전용 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
