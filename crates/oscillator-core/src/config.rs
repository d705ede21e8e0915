//! 환경변수 기반 설정 모듈.
//!
//! `.env` 파일이 있으면 먼저 읽고, 각 값은 환경변수가 없거나 파싱에 실패하면 기본값을 사용합니다.

use std::time::Duration;

use crate::logging::{LogConfig, LogFormat};

/// 네이버 금융 증시자금동향 페이지 기본 URL.
pub const DEFAULT_DEPOSIT_BASE_URL: &str = "https://finance.naver.com/sise/sise_deposit.naver";

/// KRX 정보데이터시스템 기본 URL.
pub const DEFAULT_KRX_BASE_URL: &str = "http://data.krx.co.kr";

/// 데이터 계층 전체 설정.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// 증시자금동향 스크래퍼 설정
    pub deposit: DepositSourceConfig,
    /// KRX 조회 설정
    pub krx: KrxSourceConfig,
    /// 로깅 설정
    pub logging: LogConfig,
}

/// 증시자금동향 스크래퍼 설정.
#[derive(Debug, Clone)]
pub struct DepositSourceConfig {
    /// 페이지 URL (`?page=N`이 붙음)
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 페이지 요청 간 딜레이 (밀리초)
    pub page_delay_ms: u64,
}

/// KRX 정보데이터시스템 조회 설정.
#[derive(Debug, Clone)]
pub struct KrxSourceConfig {
    /// 호스트 URL (`/comm/bldAttendant/getJsonData.cmd`가 붙음)
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 종목 목록 조회 실패 시 거슬러 올라갈 최대 일수
    pub ticker_lookback_days: u32,
}

impl Default for DepositSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DEPOSIT_BASE_URL.to_string(),
            timeout_secs: 15,
            page_delay_ms: 500,
        }
    }
}

impl Default for KrxSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_KRX_BASE_URL.to_string(),
            timeout_secs: 30,
            ticker_lookback_days: 1,
        }
    }
}

impl AppConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let deposit_defaults = DepositSourceConfig::default();
        let krx_defaults = KrxSourceConfig::default();

        let logging = LogConfig {
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            format: env_var_parse("LOG_FORMAT", LogFormat::Compact),
            ..LogConfig::default()
        };

        Self {
            deposit: DepositSourceConfig {
                base_url: std::env::var("DEPOSIT_BASE_URL").unwrap_or(deposit_defaults.base_url),
                timeout_secs: env_var_parse("DEPOSIT_TIMEOUT_SECS", deposit_defaults.timeout_secs),
                page_delay_ms: env_var_parse("DEPOSIT_PAGE_DELAY_MS", deposit_defaults.page_delay_ms),
            },
            krx: KrxSourceConfig {
                base_url: std::env::var("KRX_BASE_URL").unwrap_or(krx_defaults.base_url),
                timeout_secs: env_var_parse("KRX_TIMEOUT_SECS", krx_defaults.timeout_secs),
                ticker_lookback_days: env_var_parse(
                    "KRX_TICKER_LOOKBACK_DAYS",
                    krx_defaults.ticker_lookback_days,
                ),
            },
            logging,
        }
    }
}

impl DepositSourceConfig {
    /// 페이지 URL 변경 (테스트용 mock 서버 등)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 페이지 간 딜레이 변경
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay_ms = delay.as_millis() as u64;
        self
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 페이지 간 딜레이를 Duration으로 반환
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl KrxSourceConfig {
    /// 호스트 URL 변경 (테스트용 mock 서버 등)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
