//! 데이터 Provider 모듈.
//!
//! ## 네이버 금융 증시자금동향
//! - `NaverDepositScraper`: 고객예탁금/신용잔고 페이지 크롤러 (EUC-KR HTML)
//!
//! ## KRX 정보데이터시스템
//! - `KrxMarketData`: 종목 목록, 종목명, 시가총액, 투자자별 거래대금 조회

pub mod krx;
pub mod naver_deposit;

pub use krx::KrxMarketData;
pub use naver_deposit::{parse_deposit_table, NaverDepositScraper};
