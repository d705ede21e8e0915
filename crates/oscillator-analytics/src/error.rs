//! 분석 오류 타입.

use thiserror::Error;

/// 오실레이터 계산 오류.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// 입력 컬럼 길이 불일치
    #[error("컬럼 길이 불일치: {column} (기대 {expected}개, 실제 {actual}개)")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 분석 결과 타입.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
