//! 수급 오실레이터 데이터 조회 CLI.
//!
//! 결과 JSON은 stdout으로만 출력하고, 로그는 stderr로 출력합니다.

use clap::{Parser, Subcommand};
use oscillator_cli::{StockAnalyzer, DEFAULT_DAYS, DEFAULT_NUM_PAGES};
use oscillator_core::{init_logging, AppConfig, LogFormat};
use serde_json::json;

#[derive(Parser)]
#[command(name = "oscillator")]
#[command(about = "Stock supply/demand oscillator data layer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (RUST_LOG가 없을 때 사용, 예: info, debug)
    #[arg(long)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// 종목 검색 (종목명 또는 일부)
    Search {
        /// 검색어
        query: String,
    },

    /// 종목 시가총액 및 외국인/기관 5일 누적 수급
    Analyze {
        /// 종목 코드 (예: 005930)
        ticker: String,

        /// 조회 기간 (일, 1-3650)
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: i64,
    },

    /// 수급 오실레이터 및 매매 신호 분석
    Oscillator {
        /// 종목 코드 (예: 005930)
        ticker: String,

        /// 조회 기간 (일, 1-3650)
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: i64,
    },

    /// 증시 자금 동향 (고객예탁금, 신용잔고)
    Deposit {
        /// 수집 페이지 수 (1-50)
        #[arg(long, default_value_t = DEFAULT_NUM_PAGES)]
        pages: i64,
    },

    /// 최신 증시 자금 동향 (1페이지)
    Latest,

    /// 전체 종목 목록 (코스피 → 코스닥)
    Stocks,

    /// 증시 자금 동향 요약
    Summary {
        /// 수집 페이지 수 (1-50)
        #[arg(long, default_value_t = DEFAULT_NUM_PAGES)]
        pages: i64,
    },

    /// 초기화 점검
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    init_logging(config.logging.clone())
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let analyzer = match StockAnalyzer::initialize(&config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            tracing::error!(error = %e, "초기화 실패");
            println!(
                "{}",
                json!({ "error": "초기화 실패", "details": e.to_string() })
            );
            std::process::exit(1);
        }
    };

    let output = match cli.command {
        Commands::Search { query } => analyzer.search_stock_wrapper(&query).await,
        Commands::Analyze { ticker, days } => analyzer.get_stock_analysis(&ticker, days).await,
        Commands::Oscillator { ticker, days } => {
            analyzer.get_oscillator_analysis(&ticker, days).await
        }
        Commands::Deposit { pages } => analyzer.get_market_deposit_data(pages).await,
        Commands::Latest => analyzer.get_latest_market_data().await,
        Commands::Stocks => analyzer.get_all_stocks_list().await,
        Commands::Summary { pages } => analyzer.get_market_deposit_summary(pages).await,
        Commands::Health => json!({
            "status": "ok",
            "deposit_url": config.deposit.base_url,
            "krx_url": config.krx.base_url,
        })
        .to_string(),
    };

    println!("{}", output);
    Ok(())
}
