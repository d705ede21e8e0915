//! KRX(한국거래소) 정보데이터시스템 데이터 소스.
//!
//! `getJsonData.cmd` 엔드포인트에 bld 코드를 POST하여 다음을 조회합니다:
//! - 시장별 전종목 목록 (`MDCSTAT01501`)
//! - 종목 검색 파인더 (종목명, ISIN)
//! - 개별종목 시세 추이의 시가총액 (`MDCSTAT01701`)
//! - 투자자별 거래실적 개별종목 일별추이, 순매수 거래대금 (`MDCSTAT02303`)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use oscillator_data::provider::krx::KrxMarketData;
//!
//! let krx = KrxMarketData::new(&KrxSourceConfig::default())?;
//! let name = krx.ticker_name("005930").await?;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use oscillator_core::{KrMarket, KrxSourceConfig};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::market::{InvestorFlowPoint, MarketCapPoint, MarketDataSource};
use crate::parse::parse_krx_value;

/// JSON 데이터 엔드포인트 경로.
const JSON_DATA_PATH: &str = "/comm/bldAttendant/getJsonData.cmd";

/// 전종목 시세 조회 bld (종목 목록 용도).
const BLD_MARKET_TICKERS: &str = "dbms/MDC/STAT/standard/MDCSTAT01501";

/// 종목 검색 파인더 bld.
const BLD_STOCK_FINDER: &str = "dbms/comm/finder/finder_stkisu";

/// 개별종목 시세 추이 bld (시가총액 포함).
const BLD_STOCK_TREND: &str = "dbms/MDC/STAT/standard/MDCSTAT01701";

/// 투자자별 거래실적 개별종목 일별추이 bld.
const BLD_INVESTOR_TRADING: &str = "dbms/MDC/STAT/standard/MDCSTAT02303";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REFERER: &str = "http://data.krx.co.kr/contents/MDC/MDI/mdiLoader/index.cmd";

/// 전종목 목록 응답.
#[derive(Debug, Deserialize)]
struct TickerListResponse {
    #[serde(rename = "OutBlock_1", default)]
    out_block: Vec<TickerRecord>,
}

#[derive(Debug, Deserialize)]
struct TickerRecord {
    #[serde(rename = "ISU_SRT_CD")]
    ticker: String,
}

/// 파인더 응답.
#[derive(Debug, Deserialize)]
struct FinderResponse {
    #[serde(default)]
    block1: Vec<FinderRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct FinderRecord {
    /// 표준코드 (ISIN, 예: KR7005930003)
    full_code: String,
    /// 단축코드
    short_code: String,
    /// 종목명
    #[serde(rename = "codeName")]
    name: String,
}

/// 개별종목/투자자별 일별 응답 (정보데이터시스템은 "output" 키 사용).
#[derive(Debug, Deserialize)]
struct DailyResponse<T> {
    #[serde(default = "Vec::new")]
    output: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct MarketCapRecord {
    /// 거래일자 (YYYY/MM/DD)
    #[serde(rename = "TRD_DD")]
    trd_dd: String,
    /// 시가총액
    #[serde(rename = "MKTCAP", default)]
    market_cap: String,
}

#[derive(Debug, Deserialize)]
struct InvestorTradingRecord {
    #[serde(rename = "TRD_DD")]
    trd_dd: String,
    /// 기관합계 순매수 거래대금
    #[serde(rename = "TRDVAL1", default)]
    institution: String,
    /// 외국인합계 순매수 거래대금
    #[serde(rename = "TRDVAL4", default)]
    foreign: String,
}

/// KRX 정보데이터시스템 데이터 소스.
pub struct KrxMarketData {
    client: reqwest::Client,
    endpoint: String,
}

impl KrxMarketData {
    /// 설정으로 데이터 소스 생성.
    pub fn new(config: &KrxSourceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, HeaderValue::from_static(REFERER));

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), JSON_DATA_PATH),
        })
    }

    /// bld 요청 실행.
    async fn request<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let bld = params
            .iter()
            .find(|(k, _)| *k == "bld")
            .map(|(_, v)| *v)
            .unwrap_or_default();
        debug!(bld = bld, "KRX 요청");

        let response = self.client.post(&self.endpoint).form(params).send().await?;

        if !response.status().is_success() {
            return Err(DataError::HttpStatus {
                status: response.status().as_u16(),
                url: format!("{} ({})", self.endpoint, bld),
            });
        }

        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            DataError::ParseError(format!(
                "KRX 응답 JSON 파싱 실패 [{}]: {} - {}",
                bld,
                e,
                text.chars().take(200).collect::<String>()
            ))
        })
    }

    /// 단축코드로 파인더 항목 조회.
    async fn find(&self, ticker: &str) -> Result<FinderRecord> {
        let params = [
            ("bld", BLD_STOCK_FINDER),
            ("locale", "ko_KR"),
            ("mktsel", "ALL"),
            ("typeNo", "0"),
            ("searchText", ticker),
        ];

        let response: FinderResponse = self.request(&params).await?;

        response
            .block1
            .into_iter()
            .find(|r| r.short_code == ticker)
            .ok_or_else(|| DataError::NotFound(format!("종목코드 {}", ticker)))
    }
}

#[async_trait]
impl MarketDataSource for KrxMarketData {
    async fn ticker_list(&self, date: NaiveDate, market: KrMarket) -> Result<Vec<String>> {
        let trd_dd = date.format("%Y%m%d").to_string();
        let params = [
            ("bld", BLD_MARKET_TICKERS),
            ("mktId", market.krx_code()),
            ("trdDd", trd_dd.as_str()),
            ("share", "1"),
            ("money", "1"),
            ("csvxls_isNo", "false"),
        ];

        let response: TickerListResponse = self.request(&params).await?;
        let tickers: Vec<String> = response.out_block.into_iter().map(|r| r.ticker).collect();

        info!(market = %market, date = %trd_dd, count = tickers.len(), "KRX 종목 목록 조회");
        Ok(tickers)
    }

    /// 파인더 POST 1회. 전종목 목록 응답의 약칭(`ISU_ABBRV`)은 사용하지 않습니다.
    async fn ticker_name(&self, ticker: &str) -> Result<String> {
        Ok(self.find(ticker).await?.name)
    }

    async fn market_cap_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ticker: &str,
    ) -> Result<Vec<MarketCapPoint>> {
        let isin = self.find(ticker).await?.full_code;
        let strt_dd = start.format("%Y%m%d").to_string();
        let end_dd = end.format("%Y%m%d").to_string();

        let params = [
            ("bld", BLD_STOCK_TREND),
            ("isuCd", isin.as_str()),
            ("strtDd", strt_dd.as_str()),
            ("endDd", end_dd.as_str()),
            ("adjStkPrc", "1"),
            ("share", "1"),
            ("money", "1"),
            ("csvxls_isNo", "false"),
        ];

        let response: DailyResponse<MarketCapRecord> = self.request(&params).await?;

        let points = response
            .output
            .into_iter()
            .map(|r| {
                Ok(MarketCapPoint {
                    date: parse_krx_date(&r.trd_dd)?,
                    market_cap: parse_krx_value(&r.market_cap),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(ticker = ticker, count = points.len(), "KRX 시가총액 조회");
        Ok(points)
    }

    async fn trading_value_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ticker: &str,
    ) -> Result<Vec<InvestorFlowPoint>> {
        let isin = self.find(ticker).await?.full_code;
        let strt_dd = start.format("%Y%m%d").to_string();
        let end_dd = end.format("%Y%m%d").to_string();

        // inqTpCd=2: 일별추이, trdVolVal=2: 거래대금, askBid=3: 순매수
        let params = [
            ("bld", BLD_INVESTOR_TRADING),
            ("isuCd", isin.as_str()),
            ("strtDd", strt_dd.as_str()),
            ("endDd", end_dd.as_str()),
            ("inqTpCd", "2"),
            ("trdVolVal", "2"),
            ("askBid", "3"),
            ("share", "1"),
            ("money", "1"),
            ("csvxls_isNo", "false"),
        ];

        let response: DailyResponse<InvestorTradingRecord> = self.request(&params).await?;

        let points = response
            .output
            .into_iter()
            .map(|r| {
                Ok(InvestorFlowPoint {
                    date: parse_krx_date(&r.trd_dd)?,
                    foreign_net: parse_krx_value(&r.foreign),
                    institution_net: parse_krx_value(&r.institution),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(ticker = ticker, count = points.len(), "KRX 투자자별 거래대금 조회");
        Ok(points)
    }
}

/// KRX 날짜 문자열 파싱 (YYYY/MM/DD 또는 YYYYMMDD).
fn parse_krx_date(s: &str) -> Result<NaiveDate> {
    let format = if s.contains('/') { "%Y/%m/%d" } else { "%Y%m%d" };
    NaiveDate::parse_from_str(s.trim(), format)
        .map_err(|e| DataError::ParseError(format!("날짜 파싱 실패: {} - {}", s, e)))
}
