//! 호스트 앱용 JSON 파사드.
//!
//! 각 작업은 입력을 먼저 검증한 뒤 데이터 계층을 호출하고, 결과를 JSON 문자열로 반환합니다.
//! 실패하면 `{"error": "..."}` 형태이며, 성공/실패는 `error` 키 존재 여부로만 구분합니다.
//!
//! 작업마다 타입이 있는 메서드(`search`, `stock_analysis` 등)와
//! JSON 문자열을 반환하는 래퍼(`search_stock_wrapper` 등)를 함께 제공합니다.

use oscillator_analytics::{analyze_market_deposit, analyze_signal, calculate};
use oscillator_analytics::{OscillatorResult, SignalAnalysis};
use oscillator_core::{AppConfig, DepositSeries, StockSeries, TickerInfo};
use oscillator_data::market::DEFAULT_DAYS as DEFAULT_WINDOW_DAYS;
use oscillator_data::provider::naver_deposit::DEFAULT_PAGES;
use oscillator_data::{KrxMarketData, MarketDataSource, MarketQueryClient, NaverDepositScraper};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::error::{AnalyzerError, InitError};

/// 기본 분석 기간 (일).
pub const DEFAULT_DAYS: i64 = DEFAULT_WINDOW_DAYS as i64;

/// 분석 기간 상한 (약 10년).
const MAX_DAYS: i64 = 3650;

/// 수집 페이지 수 상한.
const MAX_PAGES: i64 = 50;

/// 기본 수집 페이지 수.
pub const DEFAULT_NUM_PAGES: i64 = DEFAULT_PAGES as i64;

/// 종목 오실레이터 분석 결과.
#[derive(Debug, Clone, Serialize)]
pub struct OscillatorReport {
    pub ticker: String,
    pub name: String,
    pub oscillator: OscillatorResult,
    pub analysis: SignalAnalysis,
}

/// 증시 자금 동향 요약.
#[derive(Debug, Clone, Serialize)]
pub struct DepositSummary {
    pub latest_date: String,
    /// 고객예탁금 (억원)
    pub deposit_amount: f64,
    /// 신용잔고 (억원)
    pub credit_amount: f64,
    pub trend: String,
}

/// 증시자금동향 크롤러와 시장 조회 클라이언트를 묶은 파사드.
pub struct StockAnalyzer<S = KrxMarketData> {
    scraper: NaverDepositScraper,
    market: MarketQueryClient<S>,
}

impl StockAnalyzer<KrxMarketData> {
    /// 설정으로 두 데이터 소스를 구성합니다.
    ///
    /// 프로세스를 종료하지 않고 [`InitError`]를 반환하므로 호출자가 처리 방법을 정합니다.
    pub fn initialize(config: &AppConfig) -> Result<Self, InitError> {
        let scraper = NaverDepositScraper::new(&config.deposit).map_err(InitError::DepositScraper)?;
        let source = KrxMarketData::new(&config.krx).map_err(InitError::MarketSource)?;
        let market =
            MarketQueryClient::new(source).with_lookback_days(config.krx.ticker_lookback_days);

        info!(
            deposit_url = %config.deposit.base_url,
            krx_url = %config.krx.base_url,
            "데이터 소스 초기화 완료"
        );

        Ok(Self::with_parts(scraper, market))
    }
}

impl<S: MarketDataSource> StockAnalyzer<S> {
    /// 이미 구성된 구성요소로 생성 (테스트용 데이터 소스 주입 등).
    pub fn with_parts(scraper: NaverDepositScraper, market: MarketQueryClient<S>) -> Self {
        Self { scraper, market }
    }

    /// 시장 조회 클라이언트 참조
    pub fn market(&self) -> &MarketQueryClient<S> {
        &self.market
    }

    /// 종목 검색. 목록 순서상 첫 번째 일치 종목을 반환합니다.
    pub async fn search(&self, query: &str) -> Result<TickerInfo, AnalyzerError> {
        if query.trim().is_empty() {
            return Err(AnalyzerError::EmptyQuery);
        }

        let matches = self
            .market
            .search_stock(query)
            .await
            .map_err(AnalyzerError::Search)?;

        matches.into_iter().next().ok_or(AnalyzerError::StockNotFound)
    }

    /// 종목 시가총액 및 외국인/기관 5일 누적 수급 시계열.
    ///
    /// 종목명 조회에 실패하면 종목 코드를 이름으로 사용합니다.
    pub async fn stock_analysis(&self, ticker: &str, days: i64) -> Result<StockSeries, AnalyzerError> {
        let (ticker, days) = validate_stock_request(ticker, days)?;
        info!(ticker = ticker, days = days, "종목 분석 시작");

        let series = self
            .market
            .get_stock_data(ticker, days)
            .await
            .map_err(AnalyzerError::Analysis)?
            .ok_or(AnalyzerError::NoStockData)?;

        let name = self.stock_name_or_ticker(ticker).await;
        info!(name = %name, rows = series.len(), "종목 분석 완료");

        Ok(series.with_identity(ticker, name))
    }

    /// 종목 수급 오실레이터와 매매 신호 분석.
    pub async fn oscillator_analysis(
        &self,
        ticker: &str,
        days: i64,
    ) -> Result<OscillatorReport, AnalyzerError> {
        let series = self.stock_analysis(ticker, days).await?;
        let oscillator = calculate(&series).map_err(AnalyzerError::Oscillator)?;
        let analysis = analyze_signal(&oscillator);

        info!(
            signal = %analysis.signal,
            score = analysis.score,
            "오실레이터 분석 완료"
        );

        Ok(OscillatorReport {
            ticker: series.ticker.unwrap_or_else(|| ticker.trim().to_string()),
            name: series.name.unwrap_or_default(),
            oscillator,
            analysis,
        })
    }

    /// 증시 자금 동향 (고객예탁금, 신용잔고).
    pub async fn market_deposit_data(&self, num_pages: i64) -> Result<DepositSeries, AnalyzerError> {
        let num_pages = validate_pages(num_pages)?;
        info!(num_pages = num_pages, "증시 자금 동향 수집 시작");

        let series = self
            .scraper
            .scrape_deposit_data(num_pages)
            .await
            .ok_or(AnalyzerError::NoMarketData)?;

        series.validate().map_err(AnalyzerError::MissingColumns)?;

        if series.is_empty() {
            return Err(AnalyzerError::EmptyMarketData);
        }

        info!(rows = series.len(), "증시 자금 동향 수집 성공");
        Ok(series)
    }

    /// 최신 증시 자금 동향 (1페이지).
    pub async fn latest_market_data(&self) -> Result<DepositSeries, AnalyzerError> {
        let series = self
            .scraper
            .get_latest_data()
            .await
            .filter(|s| !s.is_empty())
            .ok_or(AnalyzerError::NoLatestData)?;

        info!(rows = series.len(), "최신 데이터 수집 성공");
        Ok(series)
    }

    /// 전체 종목 목록 (자동완성용).
    pub async fn all_stocks(&self) -> Result<Vec<TickerInfo>, AnalyzerError> {
        let stocks = self
            .market
            .get_all_stocks()
            .await
            .map_err(AnalyzerError::StockList)?;

        info!(count = stocks.len(), "종목 리스트 수집 완료");
        Ok(stocks)
    }

    /// 최근 증시 자금 동향 요약.
    pub async fn market_deposit_summary(
        &self,
        num_pages: i64,
    ) -> Result<DepositSummary, AnalyzerError> {
        let series = self.market_deposit_data(num_pages).await?;
        let latest = series.latest().ok_or(AnalyzerError::EmptyMarketData)?;

        Ok(DepositSummary {
            latest_date: latest.date,
            deposit_amount: latest.deposit_amount,
            credit_amount: latest.credit_amount,
            trend: analyze_market_deposit(&series).to_string(),
        })
    }

    pub async fn search_stock_wrapper(&self, query: &str) -> String {
        respond("종목 검색", self.search(query).await)
    }

    pub async fn get_stock_analysis(&self, ticker: &str, days: i64) -> String {
        respond("종목 분석", self.stock_analysis(ticker, days).await)
    }

    pub async fn get_oscillator_analysis(&self, ticker: &str, days: i64) -> String {
        respond("오실레이터 분석", self.oscillator_analysis(ticker, days).await)
    }

    pub async fn get_market_deposit_data(&self, num_pages: i64) -> String {
        respond("증시 자금 동향", self.market_deposit_data(num_pages).await)
    }

    pub async fn get_latest_market_data(&self) -> String {
        respond("최신 증시 자금 동향", self.latest_market_data().await)
    }

    pub async fn get_all_stocks_list(&self) -> String {
        respond("전체 종목 리스트", self.all_stocks().await)
    }

    pub async fn get_market_deposit_summary(&self, num_pages: i64) -> String {
        respond("증시 자금 동향 요약", self.market_deposit_summary(num_pages).await)
    }

    async fn stock_name_or_ticker(&self, ticker: &str) -> String {
        self.market
            .get_stock_name(ticker)
            .await
            .unwrap_or_else(|| ticker.to_string())
    }
}

/// 종목 코드와 기간 검증. 공백을 제거한 종목 코드와 기간을 반환합니다.
fn validate_stock_request(ticker: &str, days: i64) -> Result<(&str, u32), AnalyzerError> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(AnalyzerError::EmptyTicker);
    }

    if !(1..=MAX_DAYS).contains(&days) {
        return Err(AnalyzerError::InvalidDays(days));
    }
    let days = u32::try_from(days).map_err(|_| AnalyzerError::InvalidDays(days))?;

    Ok((ticker, days))
}

fn validate_pages(num_pages: i64) -> Result<u32, AnalyzerError> {
    if !(1..=MAX_PAGES).contains(&num_pages) {
        return Err(AnalyzerError::InvalidPages(num_pages));
    }
    u32::try_from(num_pages).map_err(|_| AnalyzerError::InvalidPages(num_pages))
}

/// 결과를 JSON 문자열로 변환.
fn respond<T: Serialize>(operation: &str, result: Result<T, AnalyzerError>) -> String {
    let result = result.and_then(|value| serde_json::to_string(&value).map_err(AnalyzerError::from));

    match result {
        Ok(json) => json,
        Err(e) => {
            if e.is_unexpected() {
                error!(operation = operation, error = ?e, "{} 실패", operation);
            } else if e.is_validation() {
                debug!(operation = operation, error = %e, "{} 요청 거부", operation);
            } else {
                warn!(operation = operation, error = %e, "{} 실패", operation);
            }
            error_envelope(&e.to_string())
        }
    }
}

/// `{"error": message}` 응답.
pub fn error_envelope(message: &str) -> String {
    json!({ "error": message }).to_string()
}
