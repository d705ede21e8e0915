//! 증시자금동향 (고객예탁금 / 신용잔고) 도메인 모델.
//!
//! 네이버 금융 `sise_deposit` 페이지의 한 행이 [`DepositRecord`] 하나가 되고,
//! 여러 페이지에서 모은 레코드는 중복 제거/정렬 후 컬럼형 [`DepositSeries`]로 변환됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};

/// 증시자금동향 테이블의 한 행 (단위: 억원).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// 원본 날짜 문자열 (예: "24.01.15")
    pub date: String,
    /// 고객예탁금
    pub deposit_amount: f64,
    /// 고객예탁금 증감
    pub deposit_change: f64,
    /// 신용잔고
    pub credit_amount: f64,
    /// 신용잔고 증감
    pub credit_change: f64,
}

impl DepositRecord {
    /// 원본 날짜 문자열을 실제 날짜로 해석합니다.
    pub fn trade_date(&self) -> Option<NaiveDate> {
        parse_deposit_date(&self.date)
    }
}

/// 컬럼형 증시자금동향 시계열.
///
/// 모든 컬럼은 같은 길이를 가지며 인덱스로 정렬되어 있습니다.
/// 직렬화 시 필드명이 그대로 JSON 키가 됩니다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DepositSeries {
    pub dates: Vec<String>,
    pub deposit_amounts: Vec<f64>,
    pub deposit_changes: Vec<f64>,
    pub credit_amounts: Vec<f64>,
    pub credit_changes: Vec<f64>,
}

impl DepositSeries {
    /// 레코드 묶음에서 시계열을 생성합니다.
    ///
    /// 같은 날짜가 여러 번 나오면 처음 나온 레코드만 남기고, 날짜 오름차순으로 정렬합니다.
    pub fn from_records(records: Vec<DepositRecord>) -> Self {
        let records = dedup_and_sort(records);
        let mut series = Self {
            dates: Vec::with_capacity(records.len()),
            deposit_amounts: Vec::with_capacity(records.len()),
            deposit_changes: Vec::with_capacity(records.len()),
            credit_amounts: Vec::with_capacity(records.len()),
            credit_changes: Vec::with_capacity(records.len()),
        };

        for record in records {
            series.dates.push(record.date);
            series.deposit_amounts.push(record.deposit_amount);
            series.deposit_changes.push(record.deposit_change);
            series.credit_amounts.push(record.credit_amount);
            series.credit_changes.push(record.credit_change);
        }

        series
    }

    /// 데이터 개수.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 비어있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 모든 컬럼의 길이가 `dates`와 같은지 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        let expected = self.dates.len();
        let columns: [(&'static str, usize); 4] = [
            ("deposit_amounts", self.deposit_amounts.len()),
            ("deposit_changes", self.deposit_changes.len()),
            ("credit_amounts", self.credit_amounts.len()),
            ("credit_changes", self.credit_changes.len()),
        ];

        for (column, actual) in columns {
            if actual != expected {
                return Err(CoreError::ColumnMismatch {
                    column,
                    expected,
                    actual,
                });
            }
        }

        Ok(())
    }

    /// 가장 최근 레코드.
    pub fn latest(&self) -> Option<DepositRecord> {
        let idx = self.len().checked_sub(1)?;
        Some(DepositRecord {
            date: self.dates.get(idx)?.clone(),
            deposit_amount: *self.deposit_amounts.get(idx)?,
            deposit_change: *self.deposit_changes.get(idx)?,
            credit_amount: *self.credit_amounts.get(idx)?,
            credit_change: *self.credit_changes.get(idx)?,
        })
    }
}

/// 날짜 기준 중복 제거 (첫 번째 우선) 후 날짜 오름차순 정렬.
///
/// 해석 가능한 날짜는 실제 날짜 순서로, 해석할 수 없는 날짜는 그보다 앞에 문자열 순서로 놓입니다.
pub fn dedup_and_sort(records: Vec<DepositRecord>) -> Vec<DepositRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut unique: Vec<DepositRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.date.clone()))
        .collect();

    unique.sort_by_cached_key(|r| (r.trade_date(), r.date.clone()));
    unique
}

/// 네이버 금융 날짜 문자열 파싱.
///
/// `yy.mm.dd`, `yyyy.mm.dd`, `yyyy-mm-dd`, `yyyy/mm/dd` 형식을 지원합니다.
/// 두 자리 연도는 69 이하면 2000년대, 70 이상이면 1900년대로 해석합니다.
pub fn parse_deposit_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.trim().split(['.', '-', '/']).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let year = match parts[0].len() {
        2 if year < 70 => 2000 + year,
        2 => 1900 + year,
        4 => year,
        _ => return None,
    };
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, deposit: f64) -> DepositRecord {
        DepositRecord {
            date: date.to_string(),
            deposit_amount: deposit,
            deposit_change: 0.0,
            credit_amount: 0.0,
            credit_change: 0.0,
        }
    }

    #[test]
    fn test_parse_deposit_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_deposit_date("24.01.15"), expected);
        assert_eq!(parse_deposit_date("2024.01.15"), expected);
        assert_eq!(parse_deposit_date("2024-01-15"), expected);
        assert_eq!(parse_deposit_date("2024/01/15"), expected);
        assert_eq!(
            parse_deposit_date("99.12.31"),
            NaiveDate::from_ymd_opt(1999, 12, 31)
        );
        assert_eq!(parse_deposit_date(""), None);
        assert_eq!(parse_deposit_date("2024.13.01"), None);
        assert_eq!(parse_deposit_date("합계"), None);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let records = vec![
            record("24.01.16", 100.0),
            record("24.01.15", 200.0),
            record("24.01.16", 999.0),
        ];

        let series = DepositSeries::from_records(records);

        assert_eq!(series.dates, vec!["24.01.15", "24.01.16"]);
        assert_eq!(series.deposit_amounts, vec![200.0, 100.0]);
    }

    #[test]
    fn test_sort_is_chronological_across_year_boundary() {
        let records = vec![
            record("24.01.02", 1.0),
            record("23.12.28", 2.0),
            record("23.12.29", 3.0),
        ];

        let series = DepositSeries::from_records(records);
        assert_eq!(series.dates, vec!["23.12.28", "23.12.29", "24.01.02"]);
    }

    #[test]
    fn test_unparseable_dates_sort_first() {
        let records = vec![record("24.01.02", 1.0), record("N/A", 2.0)];
        let series = DepositSeries::from_records(records);
        assert_eq!(series.dates, vec!["N/A", "24.01.02"]);
    }

    #[test]
    fn test_validate_detects_column_mismatch() {
        let mut series = DepositSeries::from_records(vec![record("24.01.02", 1.0)]);
        assert!(series.validate().is_ok());

        series.credit_changes.push(5.0);
        match series.validate() {
            Err(CoreError::ColumnMismatch { column, .. }) => assert_eq!(column, "credit_changes"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_latest_and_serialized_keys() {
        let series = DepositSeries::from_records(vec![
            record("24.01.02", 1.0),
            record("24.01.03", 2.0),
        ]);
        assert_eq!(series.latest().map(|r| r.date), Some("24.01.03".to_string()));
        assert!(DepositSeries::default().latest().is_none());

        let json = serde_json::to_value(&series).unwrap();
        for key in [
            "dates",
            "deposit_amounts",
            "deposit_changes",
            "credit_amounts",
            "credit_changes",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }
}
