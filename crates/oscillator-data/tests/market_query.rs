//! 메모리 기반 데이터 소스로 시장 조회 클라이언트 동작 검증.

mod common;

use chrono::NaiveDate;
use common::FakeMarketSource;
use oscillator_data::{InvestorFlowPoint, MarketCapPoint, MarketQueryClient};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const TODAY: (i32, u32, u32) = (2024, 3, 15);

fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

fn listing_source() -> FakeMarketSource {
    FakeMarketSource::default().with_listing(
        today(),
        &[("005930", "삼성전자"), ("005935", "삼성전자우"), ("000660", "SK하이닉스")],
        &[("035720", "카카오"), ("293490", "카카오게임즈")],
    )
}

#[tokio::test]
async fn test_search_matches_both_directions_in_listing_order() {
    let client = MarketQueryClient::new(listing_source());

    let results = client.search_stock_on("삼성전자", today()).await.unwrap();
    let tickers: Vec<&str> = results.iter().map(|t| t.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["005930", "005935"]);

    // 종목명이 검색어에 포함되는 경우도 매칭
    let results = client.search_stock_on("카카오 주가", today()).await.unwrap();
    let names: Vec<&str> = results.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["카카오"]);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let client = MarketQueryClient::new(listing_source());
    let results = client.search_stock_on("sk하이닉스", today()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].ticker, "000660");
}

#[tokio::test]
async fn test_search_without_match_is_empty() {
    let client = MarketQueryClient::new(listing_source());
    let results = client.search_stock_on("존재하지않는종목", today()).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_ticker_list_falls_back_to_yesterday() {
    let yesterday = date(2024, 3, 14);
    let source = FakeMarketSource::default().with_listing(
        yesterday,
        &[("005930", "삼성전자")],
        &[("035720", "카카오")],
    );
    let client = MarketQueryClient::new(source);

    let stocks = client.get_all_stocks_on(today()).await.unwrap();
    assert_eq!(stocks.len(), 2);
    assert_eq!(stocks[0].ticker, "005930");
    assert_eq!(stocks[1].name, "카카오");
}

#[tokio::test]
async fn test_ticker_list_fails_beyond_lookback() {
    let source = FakeMarketSource::default().with_listing(
        date(2024, 3, 12),
        &[("005930", "삼성전자")],
        &[],
    );

    let client = MarketQueryClient::new(source);
    assert!(client.get_all_stocks_on(today()).await.is_err());

    let source = FakeMarketSource::default().with_listing(
        date(2024, 3, 12),
        &[("005930", "삼성전자")],
        &[],
    );
    let client = MarketQueryClient::new(source).with_lookback_days(3);
    assert_eq!(client.get_all_stocks_on(today()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_listing_today_triggers_fallback() {
    let source = FakeMarketSource::default()
        .with_listing(today(), &[], &[])
        .with_listing(date(2024, 3, 14), &[("005930", "삼성전자")], &[]);
    let client = MarketQueryClient::new(source);

    let stocks = client.get_all_stocks_on(today()).await.unwrap();
    assert_eq!(stocks.len(), 1);
}

#[tokio::test]
async fn test_all_stocks_skips_unresolvable_names() {
    let mut source = listing_source();
    source.names.remove("000660");
    let client = MarketQueryClient::new(source);

    let stocks = client.get_all_stocks_on(today()).await.unwrap();
    assert_eq!(stocks.len(), 4);
    assert!(stocks.iter().all(|s| s.ticker != "000660"));
}

#[tokio::test]
async fn test_stock_name_lookup() {
    let client = MarketQueryClient::new(listing_source());
    assert_eq!(client.get_stock_name("005930").await.as_deref(), Some("삼성전자"));
    assert_eq!(client.get_stock_name("999999").await, None);
}

#[tokio::test]
async fn test_stock_data_rolls_and_formats_dates() {
    let source = FakeMarketSource::default().with_daily_series(date(2024, 3, 1), 7);
    let client = MarketQueryClient::new(source);

    let series = client
        .get_stock_data_on("005930", 30, date(2024, 3, 10))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(series.dates, vec!["2024-03-05", "2024-03-06", "2024-03-07"]);
    // 외국인 순매수 1..=7 → 5일 합계 15, 20, 25
    assert_eq!(series.foreign_5d, vec![15.0, 20.0, 25.0]);
    assert_eq!(series.institution_5d, vec![-15.0, -20.0, -25.0]);
    assert_eq!(series.market_cap, vec![1_000_000.0; 3]);
}

#[tokio::test]
async fn test_stock_data_with_fewer_than_five_days_is_none() {
    let source = FakeMarketSource::default().with_daily_series(date(2024, 3, 1), 4);
    let client = MarketQueryClient::new(source);

    let series = client
        .get_stock_data_on("005930", 30, date(2024, 3, 10))
        .await
        .unwrap();
    assert!(series.is_none());
}

#[tokio::test]
async fn test_stock_data_with_empty_side_is_none() {
    let mut source = FakeMarketSource::default().with_daily_series(date(2024, 3, 1), 7);
    source.market_caps.clear();
    let client = MarketQueryClient::new(source);

    let series = client
        .get_stock_data_on("005930", 30, date(2024, 3, 10))
        .await
        .unwrap();
    assert!(series.is_none());
}

#[tokio::test]
async fn test_stock_data_drops_dates_with_missing_market_cap() {
    let mut source = FakeMarketSource::default();
    for d in 1..=6 {
        source.flows.push(InvestorFlowPoint {
            date: date(2024, 3, d),
            foreign_net: Some(1.0),
            institution_net: Some(2.0),
        });
        source.market_caps.push(MarketCapPoint {
            date: date(2024, 3, d),
            market_cap: if d == 5 { None } else { Some(500.0) },
        });
    }
    let client = MarketQueryClient::new(source);

    let series = client
        .get_stock_data_on("005930", 30, date(2024, 3, 10))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(series.dates, vec!["2024-03-06"]);
    assert_eq!(series.foreign_5d, vec![5.0]);
    assert_eq!(series.institution_5d, vec![10.0]);
}

#[tokio::test]
async fn test_stock_data_respects_window_start() {
    let source = FakeMarketSource::default().with_daily_series(date(2024, 3, 1), 10);
    let client = MarketQueryClient::new(source);

    // 3/5 ~ 3/10 → 6거래일 → 누적 후 2개
    let series = client
        .get_stock_data_on("005930", 5, date(2024, 3, 10))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(series.dates, vec!["2024-03-09", "2024-03-10"]);
}
