//! 시장 조회 클라이언트.
//!
//! 외부 시장 데이터 서비스를 [`MarketDataSource`] trait으로 추상화하고,
//! 그 위에서 종목 검색, 전체 종목 목록, 종목명 조회,
//! 외국인/기관 5일 누적 수급 시계열 계산을 제공합니다.
//!
//! 모든 작업은 상태가 없으며, 요청마다 처음부터 다시 조회합니다.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use oscillator_core::{KrMarket, StockSeries, TickerInfo};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};

/// 외국인/기관 누적 합계 기간 (거래일).
pub const ROLLING_WINDOW: usize = 5;

/// 기본 조회 기간 (일).
pub const DEFAULT_DAYS: u32 = 180;

/// 일별 시가총액.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketCapPoint {
    pub date: NaiveDate,
    /// 시가총액 (원), 결측이면 `None`
    pub market_cap: Option<f64>,
}

/// 일별 투자자별 순매수 거래대금.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorFlowPoint {
    pub date: NaiveDate,
    /// 외국인합계 순매수 (원)
    pub foreign_net: Option<f64>,
    /// 기관합계 순매수 (원)
    pub institution_net: Option<f64>,
}

/// 시장 데이터 서비스.
///
/// 종목 목록, 종목명, 시가총액 시계열, 투자자별 거래대금 시계열 네 가지만 사용합니다.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 기준일의 시장별 종목 코드 목록 (서비스 고유 순서).
    async fn ticker_list(&self, date: NaiveDate, market: KrMarket) -> Result<Vec<String>>;

    /// 종목 코드로 종목명 조회.
    ///
    /// 검색과 전체 목록은 종목마다 이 메서드를 순차 호출하므로, 종목당 요청이 발생하는
    /// 구현에서는 수천 건의 요청이 됩니다.
    async fn ticker_name(&self, ticker: &str) -> Result<String>;

    /// 기간 내 일별 시가총액.
    async fn market_cap_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ticker: &str,
    ) -> Result<Vec<MarketCapPoint>>;

    /// 기간 내 일별 투자자별 순매수 거래대금.
    async fn trading_value_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ticker: &str,
    ) -> Result<Vec<InvestorFlowPoint>>;
}

/// 한국 시간 기준 오늘 날짜.
pub fn today_kst() -> NaiveDate {
    Utc::now().with_timezone(&chrono_tz::Asia::Seoul).date_naive()
}

/// 후행 이동 합계.
///
/// `i`번째 값은 `i`를 포함한 직전 `window`개 값의 합이며,
/// 관측치가 `window`개 미만이거나 구간에 결측값이 있으면 `None`입니다.
pub fn rolling_sum(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            values[i + 1 - window..=i]
                .iter()
                .copied()
                .sum::<Option<f64>>()
        })
        .collect()
}

/// 시장 조회 클라이언트.
pub struct MarketQueryClient<S> {
    source: S,
    /// 종목 목록 조회 실패 시 거슬러 올라갈 최대 일수
    lookback_days: u32,
}

impl<S: MarketDataSource> MarketQueryClient<S> {
    /// 기본 설정 (전일까지 재시도)으로 생성
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookback_days: 1,
        }
    }

    /// 종목 목록 재시도 일수 변경
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    /// 데이터 소스 참조
    pub fn source(&self) -> &S {
        &self.source
    }

    /// 종목 검색 (오늘 기준).
    pub async fn search_stock(&self, query: &str) -> Result<Vec<TickerInfo>> {
        self.search_stock_on(query, today_kst()).await
    }

    /// 종목 검색.
    ///
    /// 검색어가 종목명에 포함되거나 종목명이 검색어에 포함되면 (대소문자 무시) 결과에 넣습니다.
    /// 순서는 종목 목록 순서 (코스피 → 코스닥) 그대로이며 관련도 정렬은 하지 않습니다.
    pub async fn search_stock_on(&self, query: &str, today: NaiveDate) -> Result<Vec<TickerInfo>> {
        let tickers = self.ticker_universe(today).await?;
        let mut matches = Vec::new();

        for ticker in tickers {
            let name = match self.source.ticker_name(&ticker).await {
                Ok(name) => name,
                Err(e) => {
                    debug!(ticker = %ticker, error = %e, "종목명 조회 실패, 건너뜀");
                    continue;
                }
            };

            let info = TickerInfo::new(ticker, name);
            if info.matches(query) {
                matches.push(info);
            }
        }

        info!(query = query, count = matches.len(), "종목 검색 완료");
        Ok(matches)
    }

    /// 전체 종목 목록 (오늘 기준).
    pub async fn get_all_stocks(&self) -> Result<Vec<TickerInfo>> {
        self.get_all_stocks_on(today_kst()).await
    }

    /// 전체 종목 목록.
    ///
    /// 종목명 조회에 실패한 종목은 결과에서 조용히 제외됩니다.
    pub async fn get_all_stocks_on(&self, today: NaiveDate) -> Result<Vec<TickerInfo>> {
        let tickers = self.ticker_universe(today).await?;
        let total = tickers.len();
        let mut stocks = Vec::with_capacity(total);

        for ticker in tickers {
            if let Ok(name) = self.source.ticker_name(&ticker).await {
                stocks.push(TickerInfo::new(ticker, name));
            }
        }

        info!(total = total, resolved = stocks.len(), "전체 종목 목록 조회 완료");
        Ok(stocks)
    }

    /// 종목명 조회. 실패하면 `None`.
    pub async fn get_stock_name(&self, ticker: &str) -> Option<String> {
        match self.source.ticker_name(ticker).await {
            Ok(name) => Some(name),
            Err(e) => {
                debug!(ticker = ticker, error = %e, "종목명 조회 실패");
                None
            }
        }
    }

    /// 종목 수급 시계열 (오늘 기준).
    pub async fn get_stock_data(&self, ticker: &str, days: u32) -> Result<Option<StockSeries>> {
        self.get_stock_data_on(ticker, days, today_kst()).await
    }

    /// 종목 수급 시계열.
    ///
    /// `[today - days, today]` 구간의 시가총액과 외국인/기관 순매수 거래대금을 조회하고,
    /// 순매수는 5거래일 후행 합계로 변환합니다. 세 값 중 하나라도 없는 날짜는 제외하므로
    /// 처음 4거래일은 항상 빠집니다. 어느 한쪽 시계열이라도 비어 있으면 `None`입니다.
    pub async fn get_stock_data_on(
        &self,
        ticker: &str,
        days: u32,
        today: NaiveDate,
    ) -> Result<Option<StockSeries>> {
        let start = today - Duration::days(i64::from(days));

        let market_caps = self.source.market_cap_by_date(start, today, ticker).await?;
        let flows = self.source.trading_value_by_date(start, today, ticker).await?;

        if market_caps.is_empty() || flows.is_empty() {
            warn!(
                ticker = ticker,
                market_cap_rows = market_caps.len(),
                flow_rows = flows.len(),
                "시계열 데이터 없음"
            );
            return Ok(None);
        }

        let series = join_flow_series(market_caps, flows);
        if series.is_empty() {
            info!(ticker = ticker, "누적 합계 이후 남은 데이터 없음");
            return Ok(None);
        }

        debug!(ticker = ticker, rows = series.len(), "종목 수급 시계열 생성");
        Ok(Some(series))
    }

    /// 오늘부터 `lookback_days`일 전까지 차례로 종목 목록을 조회합니다.
    ///
    /// 조회 오류나 빈 목록이면 하루 전으로 넘어갑니다.
    async fn ticker_universe(&self, today: NaiveDate) -> Result<Vec<String>> {
        let mut last_error = None;

        for offset in 0..=self.lookback_days {
            let date = today - Duration::days(i64::from(offset));

            match self.collect_tickers(date).await {
                Ok(tickers) if !tickers.is_empty() => return Ok(tickers),
                Ok(_) => {
                    warn!(date = %date, "종목 목록이 비어 있음, 이전 날짜로 재시도");
                }
                Err(e) => {
                    warn!(date = %date, error = %e, "종목 목록 조회 실패, 이전 날짜로 재시도");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DataError::NoData(format!("{} 기준 종목 목록", today.format("%Y-%m-%d")))
        }))
    }

    /// 코스피, 코스닥 순서로 종목 목록을 이어 붙입니다.
    async fn collect_tickers(&self, date: NaiveDate) -> Result<Vec<String>> {
        let mut tickers = Vec::new();
        for market in KrMarket::ALL {
            tickers.extend(self.source.ticker_list(date, market).await?);
        }
        Ok(tickers)
    }
}

/// 시가총액과 5일 누적 순매수를 날짜로 결합합니다.
fn join_flow_series(
    market_caps: Vec<MarketCapPoint>,
    mut flows: Vec<InvestorFlowPoint>,
) -> StockSeries {
    let caps: BTreeMap<NaiveDate, Option<f64>> = market_caps
        .into_iter()
        .map(|p| (p.date, p.market_cap))
        .collect();

    flows.sort_by_key(|p| p.date);
    flows.dedup_by_key(|p| p.date);

    let foreign: Vec<Option<f64>> = flows.iter().map(|p| p.foreign_net).collect();
    let institution: Vec<Option<f64>> = flows.iter().map(|p| p.institution_net).collect();
    let foreign_5d = rolling_sum(&foreign, ROLLING_WINDOW);
    let institution_5d = rolling_sum(&institution, ROLLING_WINDOW);

    let mut series = StockSeries::default();

    for (i, point) in flows.iter().enumerate() {
        let market_cap = caps.get(&point.date).copied().flatten();
        if let (Some(cap), Some(f5), Some(i5)) = (market_cap, foreign_5d[i], institution_5d[i]) {
            series.dates.push(point.date.format("%Y-%m-%d").to_string());
            series.market_cap.push(cap);
            series.foreign_5d.push(f5);
            series.institution_5d.push(i5);
        }
    }

    series
}
