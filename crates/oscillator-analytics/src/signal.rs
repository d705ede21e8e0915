//! 매매 신호 분석.
//!
//! 최근 오실레이터 평균, MACD 교차, 히스토그램 추세를 점수(-100 ~ +100)로 합산하여
//! 5단계 매매 신호로 변환합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::oscillator::OscillatorResult;

/// 점수 계산에 사용하는 최근 데이터 개수.
const RECENT_POINTS: usize = 5;

/// 히스토그램 추세 판단 구간.
const HISTOGRAM_TREND_POINTS: usize = 3;

/// 매매 신호.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSignal {
    /// 강력 매수
    StrongBuy,
    /// 매수
    Buy,
    /// 중립
    Neutral,
    /// 매도
    Sell,
    /// 강력 매도
    StrongSell,
}

impl TradeSignal {
    /// 점수(-100 ~ +100)를 신호로 변환.
    pub fn from_score(score: f64) -> Self {
        if score >= 60.0 {
            Self::StrongBuy
        } else if score >= 20.0 {
            Self::Buy
        } else if score <= -60.0 {
            Self::StrongSell
        } else if score <= -20.0 {
            Self::Sell
        } else {
            Self::Neutral
        }
    }

    /// 투자 권고 문구.
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::StrongBuy => "적극 매수 검토",
            Self::Buy => "매수 관심",
            Self::Neutral => "관망",
            Self::Sell => "매도 검토",
            Self::StrongSell => "적극 매도 검토",
        }
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StrongBuy => "강력 매수",
            Self::Buy => "매수",
            Self::Neutral => "중립",
            Self::Sell => "매도",
            Self::StrongSell => "강력 매도",
        };
        write!(f, "{}", label)
    }
}

/// 매매 신호 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalAnalysis {
    pub signal: TradeSignal,
    /// -100 ~ +100
    pub score: f64,
    /// 추세 설명
    pub trend: String,
    /// 외국인 동향
    pub foreign_trend: String,
    /// 기관 동향
    pub institution_trend: String,
    /// 투자 권고
    pub recommendation: String,
}

impl SignalAnalysis {
    fn no_data() -> Self {
        Self {
            signal: TradeSignal::Neutral,
            score: 0.0,
            trend: "데이터 없음".to_string(),
            foreign_trend: "알 수 없음".to_string(),
            institution_trend: "알 수 없음".to_string(),
            recommendation: "데이터를 확인해주세요".to_string(),
        }
    }
}

/// 오실레이터 결과로 매매 신호 분석.
///
/// - 최근 5개 오실레이터 평균: ±40 (|평균| > 0.5), ±20 (|평균| > 0.2)
/// - MACD 골든/데드 크로스: ±30, 교차 없이 MACD가 시그널 위/아래면 ±15
/// - 최근 3개 히스토그램이 모두 양수이며 상승: +30, 모두 음수이며 하락: -30
pub fn analyze_signal(result: &OscillatorResult) -> SignalAnalysis {
    if result.is_empty() || result.oscillator.is_empty() {
        return SignalAnalysis::no_data();
    }

    let avg_osc = mean(tail(&result.oscillator, RECENT_POINTS));

    let mut score = if avg_osc > 0.5 {
        40.0
    } else if avg_osc > 0.2 {
        20.0
    } else if avg_osc < -0.5 {
        -40.0
    } else if avg_osc < -0.2 {
        -20.0
    } else {
        0.0
    };

    score += macd_cross_score(&result.macd, &result.signal);
    score += histogram_trend_score(&result.histogram);

    let score = score.clamp(-100.0, 100.0);
    let signal = TradeSignal::from_score(score);

    let trend = if avg_osc > 0.3 {
        "강한 매수세"
    } else if avg_osc > 0.0 {
        "매수 우위"
    } else if avg_osc < -0.3 {
        "강한 매도세"
    } else if avg_osc < 0.0 {
        "매도 우위"
    } else {
        "균형"
    };

    // 외국인/기관을 따로 나누지 않고 합산 오실레이터 방향을 사용
    let flow_trend = if avg_osc > 0.0 { "순매수" } else { "순매도" };

    SignalAnalysis {
        signal,
        score,
        trend: trend.to_string(),
        foreign_trend: flow_trend.to_string(),
        institution_trend: flow_trend.to_string(),
        recommendation: signal.recommendation().to_string(),
    }
}

/// MACD - 시그널 부호 변화로 교차 판단. 데이터가 2개 미만이면 0점.
fn macd_cross_score(macd: &[f64], signal: &[f64]) -> f64 {
    let len = macd.len().min(signal.len());
    if len < 2 {
        return 0.0;
    }

    let cross = macd[len - 1] - signal[len - 1];
    let prev_cross = macd[len - 2] - signal[len - 2];

    if cross > 0.0 && prev_cross <= 0.0 {
        30.0 // 골든크로스
    } else if cross < 0.0 && prev_cross >= 0.0 {
        -30.0 // 데드크로스
    } else if cross > 0.0 {
        15.0
    } else {
        -15.0
    }
}

/// 최근 히스토그램 추세. 데이터가 3개 미만이면 0점.
fn histogram_trend_score(histogram: &[f64]) -> f64 {
    if histogram.len() < HISTOGRAM_TREND_POINTS {
        return 0.0;
    }

    let recent = tail(histogram, HISTOGRAM_TREND_POINTS);
    let (first, last) = (recent[0], recent[HISTOGRAM_TREND_POINTS - 1]);

    if recent.iter().all(|h| *h > 0.0) && last > first {
        30.0
    } else if recent.iter().all(|h| *h < 0.0) && last < first {
        -30.0
    } else {
        0.0
    }
}

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
