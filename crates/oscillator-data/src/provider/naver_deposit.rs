//! 네이버 금융 증시자금동향 크롤러.
//!
//! `sise_deposit.naver` 페이지의 `table.type_1` 테이블에서
//! 고객예탁금/신용잔고 데이터를 페이지 단위로 수집합니다.
//!
//! ## 테이블 구조
//! ```html
//! <table class="type_1">
//!   <tr><th>날짜</th><th colspan="2">고객예탁금</th>...</tr>   <!-- 헤더 1 -->
//!   <tr><th>금액</th><th>증감</th>...</tr>                     <!-- 헤더 2 -->
//!   <tr><td>24.01.15</td><td>523,100</td><td>-1,021</td><td>180,200</td><td>312</td>...</tr>
//! </table>
//! ```
//!
//! ## 사용 예시
//! ```rust,ignore
//! let scraper = NaverDepositScraper::new(&DepositSourceConfig::default())?;
//! let series = scraper.scrape_deposit_data(5).await;
//! ```

use encoding_rs::EUC_KR;
use oscillator_core::{DepositRecord, DepositSeries, DepositSourceConfig};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::{DataError, Result};
use crate::parse::parse_number;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";
const REFERER: &str = "https://finance.naver.com/";

/// 테이블 상단 헤더 행 수.
const HEADER_ROWS: usize = 2;

/// 데이터 행의 최소 셀 수 (날짜 + 4개 수치).
const MIN_CELLS: usize = 5;

/// 최신 데이터 수집 페이지 수.
pub const LATEST_PAGES: u32 = 1;

/// 확장 데이터 수집 페이지 수.
pub const EXTENDED_PAGES: u32 = 10;

/// 기본 수집 페이지 수.
pub const DEFAULT_PAGES: u32 = 5;

/// 네이버 금융 증시자금동향 크롤러.
pub struct NaverDepositScraper {
    client: Client,
    base_url: String,
    /// 페이지 요청 간 딜레이 (기본: 500ms)
    page_delay: Duration,
}

impl NaverDepositScraper {
    /// 설정으로 크롤러 생성.
    ///
    /// HTTP 클라이언트를 만들 수 없으면 `ConfigError`를 반환합니다.
    pub fn new(config: &DepositSourceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        headers.insert(header::REFERER, HeaderValue::from_static(REFERER));

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            page_delay: config.page_delay(),
        })
    }

    /// 한 페이지 수집.
    ///
    /// 테이블이 없거나 네트워크 오류가 발생하면 `None`을 반환합니다.
    /// 오류는 로그로만 남기고 전파하지 않습니다.
    pub async fn fetch_page(&self, page: u32) -> Option<Vec<DepositRecord>> {
        match self.try_fetch_page(page).await {
            Ok(records) => records,
            Err(e) => {
                warn!(page = page, error = %e, "페이지 요청 실패");
                None
            }
        }
    }

    async fn try_fetch_page(&self, page: u32) -> Result<Option<Vec<DepositRecord>>> {
        debug!(url = %self.base_url, page = page, "증시자금동향 페이지 요청");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("page", page)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::HttpStatus {
                status: response.status().as_u16(),
                url: response.url().to_string(),
            });
        }

        let bytes = response.bytes().await?;

        // 네이버 금융은 EUC-KR로 응답함 (Content-Type 선언과 무관하게 강제 디코딩)
        let (html, _, had_errors) = EUC_KR.decode(&bytes);
        if had_errors {
            debug!(page = page, "EUC-KR 디코딩 중 잘못된 바이트 대체");
        }

        parse_deposit_table(&html, page)
    }

    /// 여러 페이지를 수집하여 컬럼형 시계열로 변환.
    ///
    /// 1페이지부터 순서대로 수집하며, 실패한 페이지는 건너뜁니다.
    /// 같은 날짜는 먼저 수집된 값이 우선합니다.
    /// 수집된 데이터가 하나도 없으면 `None`을 반환합니다.
    pub async fn scrape_deposit_data(&self, num_pages: u32) -> Option<DepositSeries> {
        info!(num_pages = num_pages, "증시자금동향 수집 시작");

        let mut all_records = Vec::new();

        for page in 1..=num_pages {
            match self.fetch_page(page).await {
                Some(records) if !records.is_empty() => {
                    debug!(page = page, count = records.len(), "페이지 수집 완료");
                    all_records.extend(records);
                }
                _ => {
                    info!(page = page, "페이지 데이터 없음");
                }
            }

            // 마지막 페이지가 아니면 딜레이 적용 (서버 부하 방지)
            if page < num_pages && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        if all_records.is_empty() {
            warn!(num_pages = num_pages, "수집된 데이터가 없습니다");
            return None;
        }

        let collected = all_records.len();
        let series = DepositSeries::from_records(all_records);

        if let Err(e) = series.validate() {
            error!(error = %e, "데이터 변환 실패");
            return None;
        }

        info!(
            collected = collected,
            unique = series.len(),
            "증시자금동향 수집 완료"
        );

        Some(series)
    }

    /// 최신 데이터 (1페이지) 수집
    pub async fn get_latest_data(&self) -> Option<DepositSeries> {
        self.scrape_deposit_data(LATEST_PAGES).await
    }

    /// 확장 데이터 (10페이지) 수집
    pub async fn get_extended_data(&self) -> Option<DepositSeries> {
        self.scrape_deposit_data(EXTENDED_PAGES).await
    }
}

/// 증시자금동향 HTML에서 레코드 추출.
///
/// `table.type_1`이 없으면 `Ok(None)`을 반환합니다.
/// 헤더 2행을 건너뛰고, 셀이 5개 미만이거나 날짜가 비어있는 행은 무시합니다.
pub fn parse_deposit_table(html: &str, page: u32) -> Result<Option<Vec<DepositRecord>>> {
    let table_selector = selector("table.type_1")?;
    let tr_selector = selector("tr")?;
    let td_selector = selector("td")?;

    let document = Html::parse_document(html);

    let Some(table) = document.select(&table_selector).next() else {
        info!(page = page, "테이블을 찾을 수 없습니다");
        return Ok(None);
    };

    let rows: Vec<ElementRef> = table.select(&tr_selector).collect();
    debug!(page = page, rows = rows.len(), "테이블 행 발견");

    let records: Vec<DepositRecord> = rows
        .iter()
        .enumerate()
        .skip(HEADER_ROWS)
        .filter_map(|(idx, row)| {
            let record = parse_row(row, &td_selector);
            if record.is_none() {
                debug!(page = page, row = idx, "데이터 행이 아님, 건너뜀");
            }
            record
        })
        .collect();

    debug!(page = page, count = records.len(), "페이지 데이터 추출");
    Ok(Some(records))
}

/// 데이터 행 하나를 레코드로 변환.
fn parse_row(row: &ElementRef, td_selector: &Selector) -> Option<DepositRecord> {
    let cells: Vec<String> = row.select(td_selector).map(|td| cell_text(&td)).collect();

    if cells.len() < MIN_CELLS {
        return None;
    }

    let date = cells[0].clone();
    if date.is_empty() {
        return None;
    }

    Some(DepositRecord {
        date,
        deposit_amount: parse_number(&cells[1]),
        deposit_change: parse_number(&cells[2]),
        credit_amount: parse_number(&cells[3]),
        credit_change: parse_number(&cells[4]),
    })
}

/// 셀의 텍스트 노드를 각각 trim한 뒤 이어 붙임.
fn cell_text(cell: &ElementRef) -> String {
    cell.text().map(str::trim).collect()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::ParseError(format!("셀렉터 오류 {}: {:?}", css, e)))
}
