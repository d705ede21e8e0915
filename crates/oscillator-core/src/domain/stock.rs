//! 종목 정보 및 종목별 수급 시계열.

use serde::{Deserialize, Serialize};

/// 시장 구분 (종목 목록 조회 대상).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KrMarket {
    /// 유가증권시장 (코스피)
    Kospi,
    /// 코스닥
    Kosdaq,
}

impl KrMarket {
    /// 종목 전체 목록의 조회 순서 (코스피 → 코스닥).
    pub const ALL: [KrMarket; 2] = [KrMarket::Kospi, KrMarket::Kosdaq];

    /// KRX 정보데이터시스템 시장 코드 (`mktId`).
    pub fn krx_code(&self) -> &'static str {
        match self {
            Self::Kospi => "STK",
            Self::Kosdaq => "KSQ",
        }
    }
}

impl std::fmt::Display for KrMarket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kospi => write!(f, "KOSPI"),
            Self::Kosdaq => write!(f, "KOSDAQ"),
        }
    }
}

/// 종목 코드와 종목명.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerInfo {
    /// 단축코드 (예: "005930")
    pub ticker: String,
    /// 종목명 (예: "삼성전자")
    pub name: String,
}

impl TickerInfo {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
        }
    }

    /// 검색어와 종목명이 서로를 포함하는지 (대소문자 무시, 양방향).
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_uppercase();
        let name = self.name.to_uppercase();
        name.contains(&query) || query.contains(&name)
    }
}

/// 종목별 시가총액 및 외국인/기관 5일 누적 순매수 시계열.
///
/// 모든 컬럼은 날짜 오름차순이며 같은 길이를 가집니다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StockSeries {
    /// 거래일 ("%Y-%m-%d")
    pub dates: Vec<String>,
    /// 시가총액 (원)
    pub market_cap: Vec<f64>,
    /// 외국인 5일 누적 순매수 대금 (원)
    pub foreign_5d: Vec<f64>,
    /// 기관 5일 누적 순매수 대금 (원)
    pub institution_5d: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StockSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 종목 코드와 종목명을 붙입니다.
    pub fn with_identity(mut self, ticker: impl Into<String>, name: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self.name = Some(name.into());
        self
    }
}
