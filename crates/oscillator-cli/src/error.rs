//! 초기화 및 조회 에러 타입.
//!
//! [`AnalyzerError`]의 메시지가 그대로 `{"error": "..."}` 응답이 됩니다.

use oscillator_analytics::AnalyticsError;
use oscillator_core::CoreError;
use oscillator_data::DataError;
use thiserror::Error;

/// 시작 시 HTTP 클라이언트 구성 실패.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("증시자금동향 크롤러 초기화 실패: {0}")]
    DepositScraper(#[source] DataError),

    #[error("시장 데이터 소스 초기화 실패: {0}")]
    MarketSource(#[source] DataError),
}

/// 조회 작업 에러.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("검색어를 입력해주세요")]
    EmptyQuery,

    #[error("종목을 찾을 수 없습니다")]
    StockNotFound,

    #[error("검색 중 오류 발생: {0}")]
    Search(#[source] DataError),

    #[error("종목 코드가 필요합니다")]
    EmptyTicker,

    #[error("유효하지 않은 기간입니다 (1-3650일)")]
    InvalidDays(i64),

    #[error("데이터를 가져올 수 없습니다")]
    NoStockData,

    #[error("분석 중 오류 발생: {0}")]
    Analysis(#[source] DataError),

    #[error("분석 중 오류 발생: {0}")]
    Oscillator(#[source] AnalyticsError),

    #[error("유효하지 않은 페이지 수입니다 (1-50)")]
    InvalidPages(i64),

    #[error("시장 데이터를 가져올 수 없습니다 (데이터 없음)")]
    NoMarketData,

    #[error("필수 키 누락: {0}")]
    MissingColumns(#[source] CoreError),

    #[error("수집된 데이터가 비어있습니다")]
    EmptyMarketData,

    #[error("최신 데이터를 가져올 수 없습니다")]
    NoLatestData,

    #[error("종목 리스트 수집 중 오류 발생: {0}")]
    StockList(#[source] DataError),

    #[error("JSON 변환 실패: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// 입력 검증 실패 여부 (외부 호출 전에 거부된 요청).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyQuery | Self::EmptyTicker | Self::InvalidDays(_) | Self::InvalidPages(_)
        )
    }

    /// 외부 서비스 또는 내부 처리 중 발생한 예기치 않은 에러 여부.
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            Self::Search(_)
                | Self::Analysis(_)
                | Self::Oscillator(_)
                | Self::StockList(_)
                | Self::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_envelope_text() {
        assert_eq!(AnalyzerError::EmptyQuery.to_string(), "검색어를 입력해주세요");
        assert_eq!(
            AnalyzerError::InvalidDays(0).to_string(),
            "유효하지 않은 기간입니다 (1-3650일)"
        );
        assert_eq!(
            AnalyzerError::Search(DataError::Timeout("KRX".into())).to_string(),
            "검색 중 오류 발생: Operation timeout: KRX"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(AnalyzerError::InvalidPages(51).is_validation());
        assert!(!AnalyzerError::NoMarketData.is_validation());
        assert!(AnalyzerError::StockList(DataError::NoData("x".into())).is_unexpected());
        assert!(!AnalyzerError::StockNotFound.is_unexpected());
    }
}
