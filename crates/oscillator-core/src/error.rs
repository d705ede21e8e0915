//! 핵심 에러 타입.

use thiserror::Error;

/// 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 병렬 컬럼 길이 불일치
    #[error("컬럼 길이 불일치: {column} = {actual}, 기대값 {expected}")]
    ColumnMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
