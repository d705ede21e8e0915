//! 수급 오실레이터 및 MACD 계산.
//!
//! 오실레이터 = (외국인 5일 누적 + 기관 5일 누적) / 시가총액 × 100
//!
//! 오실레이터 시계열에 대해 다음을 계산합니다:
//! - EMA (기본 12일)
//! - MACD = EMA(12) - EMA(26)
//! - 시그널 = MACD의 EMA(9)
//! - 히스토그램 = MACD - 시그널

use oscillator_core::StockSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, AnalyticsResult};

/// 오실레이터 계산 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscillatorParams {
    /// 오실레이터 EMA 기간 (기본: 12).
    pub ema_period: usize,
    /// MACD 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// MACD 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            ema_period: 12,
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl OscillatorParams {
    fn validate(&self) -> AnalyticsResult<()> {
        let periods = [
            ("ema_period", self.ema_period),
            ("fast_period", self.fast_period),
            ("slow_period", self.slow_period),
            ("signal_period", self.signal_period),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "{}은 0보다 커야 합니다",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// 오실레이터 계산 결과.
///
/// 모든 컬럼은 입력 시계열과 같은 길이와 순서를 가집니다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OscillatorResult {
    /// 거래일 ("%Y-%m-%d")
    pub dates: Vec<String>,
    /// 시가총액 (원본)
    pub market_cap: Vec<f64>,
    /// 수급 오실레이터 (%)
    pub oscillator: Vec<f64>,
    /// 오실레이터 EMA
    pub ema: Vec<f64>,
    /// MACD 라인
    pub macd: Vec<f64>,
    /// 시그널 라인
    pub signal: Vec<f64>,
    /// 히스토그램
    pub histogram: Vec<f64>,
}

impl OscillatorResult {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// 기본 파라미터로 오실레이터 계산.
pub fn calculate(series: &StockSeries) -> AnalyticsResult<OscillatorResult> {
    calculate_with(series, OscillatorParams::default())
}

/// 오실레이터 계산.
///
/// 시가총액이 0 이하인 날의 오실레이터는 0입니다.
pub fn calculate_with(
    series: &StockSeries,
    params: OscillatorParams,
) -> AnalyticsResult<OscillatorResult> {
    params.validate()?;

    let expected = series.dates.len();
    for (column, actual) in [
        ("market_cap", series.market_cap.len()),
        ("foreign_5d", series.foreign_5d.len()),
        ("institution_5d", series.institution_5d.len()),
    ] {
        if actual != expected {
            return Err(AnalyticsError::LengthMismatch {
                column,
                expected,
                actual,
            });
        }
    }

    let oscillator: Vec<f64> = series
        .market_cap
        .iter()
        .zip(&series.foreign_5d)
        .zip(&series.institution_5d)
        .map(|((&mcap, &foreign), &institution)| {
            if mcap > 0.0 {
                (foreign + institution) / mcap * 100.0
            } else {
                0.0
            }
        })
        .collect();

    let ema_line = ema(&oscillator, params.ema_period);

    let fast = ema(&oscillator, params.fast_period);
    let slow = ema(&oscillator, params.slow_period);
    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

    let signal = ema(&macd, params.signal_period);
    let histogram: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    debug!(rows = expected, "오실레이터 계산 완료");

    Ok(OscillatorResult {
        dates: series.dates.clone(),
        market_cap: series.market_cap.clone(),
        oscillator,
        ema: ema_line,
        macd,
        signal,
        histogram,
    })
}

/// 지수 이동평균 (EMA).
///
/// EMA = (현재값 - 이전 EMA) × k + 이전 EMA, k = 2 / (period + 1)
///
/// 처음 `period - 1`개는 0이고, `period - 1`번째 값은 처음 `period`개의 단순 평균입니다.
/// 데이터가 `period`개보다 적거나 `period`가 0이면 전부 0을 반환합니다.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return vec![0.0; values.len()];
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut result = vec![0.0; period - 1];
    result.reserve(values.len() + 1 - period);

    // 첫 EMA는 SMA로 시작
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    result.push(prev);

    for value in &values[period..] {
        prev = (value - prev) * multiplier + prev;
        result.push(prev);
    }

    result
}
