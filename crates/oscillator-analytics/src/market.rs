//! 증시 자금 동향 분석.

use oscillator_core::DepositSeries;

/// 추세 판단 구간.
const TREND_POINTS: usize = 5;

/// 최근 5개 구간의 고객예탁금/신용잔고 변화로 시장 자금 흐름을 설명합니다.
///
/// 두 값 중 하나라도 변화가 없으면 "보합"입니다.
pub fn analyze_market_deposit(series: &DepositSeries) -> &'static str {
    if series.dates.is_empty() {
        return "데이터 없음";
    }

    let deposit_trend = window_change(&series.deposit_amounts);
    let credit_trend = window_change(&series.credit_amounts);

    match (deposit_trend, credit_trend) {
        (d, c) if d > 0.0 && c > 0.0 => "자금 유입 & 신용 증가 - 시장 긍정적",
        (d, c) if d > 0.0 && c < 0.0 => "자금 유입 & 신용 감소 - 안정적",
        (d, c) if d < 0.0 && c > 0.0 => "자금 유출 & 신용 증가 - 주의",
        (d, c) if d < 0.0 && c < 0.0 => "자금 유출 & 신용 감소 - 시장 부정적",
        _ => "보합",
    }
}

/// 최근 구간의 마지막 값 - 첫 값.
fn window_change(values: &[f64]) -> f64 {
    let recent = &values[values.len().saturating_sub(TREND_POINTS)..];
    match (recent.first(), recent.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    }
}
