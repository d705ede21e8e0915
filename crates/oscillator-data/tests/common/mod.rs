//! 통합 테스트 공용 헬퍼.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use oscillator_core::KrMarket;
use oscillator_data::{DataError, InvestorFlowPoint, MarketCapPoint, MarketDataSource, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 증시자금동향 페이지 HTML 생성 (헤더 2행 + 데이터 행).
pub fn deposit_page(rows: &[[&str; 5]]) -> String {
    let mut html = String::from(
        "<html><head><meta charset=\"euc-kr\"><title>증시자금동향</title></head><body>\
         <table class=\"type_1\">\
         <tr><th>날짜</th><th colspan=\"2\">고객예탁금</th><th colspan=\"2\">신용잔고</th></tr>\
         <tr><th>금액</th><th>증감</th><th>금액</th><th>증감</th></tr>",
    );
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table></body></html>");
    html
}

/// EUC-KR로 인코딩된 응답 본문.
pub fn euc_kr(html: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(html);
    bytes.into_owned()
}

/// 메모리 기반 시장 데이터 소스.
#[derive(Default)]
pub struct FakeMarketSource {
    /// (날짜, 시장) → 종목 목록. 없으면 조회 실패.
    pub tickers: HashMap<(NaiveDate, KrMarket), Vec<String>>,
    /// 종목코드 → 종목명. 없으면 조회 실패.
    pub names: HashMap<String, String>,
    pub market_caps: Vec<MarketCapPoint>,
    pub flows: Vec<InvestorFlowPoint>,
    pub calls: AtomicUsize,
}

impl FakeMarketSource {
    pub fn with_listing(
        mut self,
        date: NaiveDate,
        kospi: &[(&str, &str)],
        kosdaq: &[(&str, &str)],
    ) -> Self {
        for (market, listing) in [(KrMarket::Kospi, kospi), (KrMarket::Kosdaq, kosdaq)] {
            self.tickers.insert(
                (date, market),
                listing.iter().map(|(t, _)| t.to_string()).collect(),
            );
            for (ticker, name) in listing {
                self.names.insert(ticker.to_string(), name.to_string());
            }
        }
        self
    }

    /// 연속된 거래일 시계열 설정 (시가총액은 일정, 순매수는 인덱스 기반).
    pub fn with_daily_series(mut self, start: NaiveDate, days: usize) -> Self {
        for i in 0..days {
            let date = start + chrono::Duration::days(i as i64);
            self.market_caps.push(MarketCapPoint {
                date,
                market_cap: Some(1_000_000.0),
            });
            self.flows.push(InvestorFlowPoint {
                date,
                foreign_net: Some((i + 1) as f64),
                institution_net: Some(-((i + 1) as f64)),
            });
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MarketDataSource for FakeMarketSource {
    async fn ticker_list(&self, date: NaiveDate, market: KrMarket) -> Result<Vec<String>> {
        self.hit();
        self.tickers
            .get(&(date, market))
            .cloned()
            .ok_or_else(|| DataError::FetchError(format!("{} {} 목록 없음", date, market)))
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
        start: NaiveDate,
        end: NaiveDate,
        _ticker: &str,
    ) -> Result<Vec<MarketCapPoint>> {
        self.hit();
        Ok(self
            .market_caps
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .cloned()
            .collect())
    }

    async fn trading_value_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        _ticker: &str,
    ) -> Result<Vec<InvestorFlowPoint>> {
        self.hit();
        Ok(self
            .flows
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .cloned()
            .collect())
    }
}
