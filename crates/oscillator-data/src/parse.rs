//! 한국어 숫자 표기 파싱 유틸리티.

use tracing::warn;

/// 증시자금동향 셀 텍스트를 숫자로 변환합니다.
///
/// 쉼표와 `억원`/`억` 단위를 제거한 뒤 `f64`로 파싱합니다.
/// 빈 문자열이나 `-` 하나는 0으로 취급하고, 파싱에 실패해도 에러 대신 경고 로그 후 0을 반환합니다.
///
/// - "1,234" -> 1234.0
/// - "52,310억원" -> 52310.0
/// - "-1,021억" -> -1021.0
pub fn parse_number(text: &str) -> f64 {
    let cleaned = text.replace(',', "").replace("억원", "").replace('억', "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "-" {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) => value,
        Err(e) => {
            warn!(text = text, error = %e, "숫자 변환 실패, 0으로 대체");
            0.0
        }
    }
}

/// KRX 숫자 문자열 파싱 (쉼표 제거).
///
/// 빈 값이나 `-`는 결측값(`None`)입니다.
pub fn parse_krx_value(s: &str) -> Option<f64> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}
