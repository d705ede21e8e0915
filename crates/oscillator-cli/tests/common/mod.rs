//! 파사드 테스트 공용 헬퍼.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use mockito::ServerGuard;
use oscillator_cli::StockAnalyzer;
use oscillator_core::{DepositSourceConfig, KrMarket};
use oscillator_data::{
    DataError, InvestorFlowPoint, MarketCapPoint, MarketDataSource, MarketQueryClient,
    NaverDepositScraper, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const DEPOSIT_PATH: &str = "/sise/sise_deposit.naver";

/// 기준일과 무관하게 같은 데이터를 돌려주는 시장 데이터 소스.
#[derive(Default)]
pub struct StaticMarketSource {
    pub kospi: Vec<String>,
    pub kosdaq: Vec<String>,
    pub names: HashMap<String, String>,
    /// 연속 거래일 수 (2024-01-01부터)
    pub trading_days: usize,
    pub fail_listing: bool,
    calls: AtomicUsize,
}

impl StaticMarketSource {
    pub fn with_stocks(kospi: &[(&str, &str)], kosdaq: &[(&str, &str)]) -> Self {
        let mut source = Self::default();
        for (ticker, name) in kospi {
            source.kospi.push(ticker.to_string());
            source.names.insert(ticker.to_string(), name.to_string());
        }
        for (ticker, name) in kosdaq {
            source.kosdaq.push(ticker.to_string());
            source.names.insert(ticker.to_string(), name.to_string());
        }
        source
    }

    pub fn with_trading_days(mut self, days: usize) -> Self {
        self.trading_days = days;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn dates(&self) -> impl Iterator<Item = (usize, NaiveDate)> + '_ {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..self.trading_days).map(move |i| (i, start + chrono::Duration::days(i as i64)))
    }
}

#[async_trait]
impl MarketDataSource for StaticMarketSource {
    async fn ticker_list(&self, _date: NaiveDate, market: KrMarket) -> Result<Vec<String>> {
        self.hit();
        if self.fail_listing {
            return Err(DataError::FetchError("listing unavailable".into()));
        }
        Ok(match market {
            KrMarket::Kospi => self.kospi.clone(),
            KrMarket::Kosdaq => self.kosdaq.clone(),
        })
    }

    async fn ticker_name(&self, ticker: &str) -> Result<String> {
        self.hit();
        self.names
            .get(ticker)
            .cloned()
            .ok_or_else(|| DataError::NotFound(ticker.to_string()))
    }

    async fn market_cap_by_date(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
        _ticker: &str,
    ) -> Result<Vec<MarketCapPoint>> {
        self.hit();
        Ok(self
            .dates()
            .map(|(_, date)| MarketCapPoint {
                date,
                market_cap: Some(1_000_000.0),
            })
            .collect())
    }

    async fn trading_value_by_date(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
        _ticker: &str,
    ) -> Result<Vec<InvestorFlowPoint>> {
        self.hit();
        Ok(self
            .dates()
            .map(|(i, date)| InvestorFlowPoint {
                date,
                foreign_net: Some(1_000.0 * (i % 3) as f64),
                institution_net: Some(500.0),
            })
            .collect())
    }
}

/// mock 서버를 가리키는 크롤러 (페이지 딜레이 없음).
pub fn scraper_for(server: &ServerGuard) -> NaverDepositScraper {
    let config = DepositSourceConfig::default()
        .with_base_url(format!("{}{}", server.url(), DEPOSIT_PATH))
        .with_page_delay(Duration::ZERO);
    NaverDepositScraper::new(&config).unwrap()
}

pub fn analyzer(
    server: &ServerGuard,
    source: StaticMarketSource,
) -> StockAnalyzer<StaticMarketSource> {
    StockAnalyzer::with_parts(scraper_for(server), MarketQueryClient::new(source))
}

/// 증시자금동향 페이지 (EUC-KR).
pub fn deposit_page(rows: &[&str]) -> Vec<u8> {
    let html = format!(
        "<html><body><table class=\"type_1\">\
         <tr><th>날짜</th><th colspan=\"2\">고객예탁금</th><th colspan=\"2\">신용잔고</th></tr>\
         <tr><th>금액</th><th>증감</th><th>금액</th><th>증감</th></tr>\
         {}</table></body></html>",
        rows.concat()
    );
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(&html);
    bytes.into_owned()
}
