//! 데이터 수집 및 정규화.
//!
//! 이 crate는 다음을 제공합니다:
//! - 네이버 금융 증시자금동향 스크래퍼 (페이지 단위 수집, 중복 제거, 정렬)
//! - KRX 정보데이터시스템 조회 (종목 목록, 종목명, 시가총액, 투자자별 거래대금)
//! - 종목 검색 및 5일 누적 수급 시계열을 만드는 시장 조회 클라이언트
//! - 한국어 숫자 표기 파서

pub mod error;
pub mod market;
pub mod parse;
pub mod provider;

pub use error::{DataError, Result};
pub use market::{
    rolling_sum, today_kst, InvestorFlowPoint, MarketCapPoint, MarketDataSource,
    MarketQueryClient, ROLLING_WINDOW,
};
pub use parse::parse_number;

// 데이터 소스 재내보내기
pub use provider::{parse_deposit_table, KrxMarketData, NaverDepositScraper};
