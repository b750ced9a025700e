use clap::Parser;
use review_responder::utils::logger;
use review_responder::{
    BusinessProfileClient, CliArgs, ResponderError, ReviewLedger, ReviewResponder, RunMode,
    Settings,
};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger();

    tracing::info!("Starting review-responder");

    let mode = RunMode::from_dry_run(args.dry_run);
    if let Err(e) = run(mode).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("   {}", e);
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(mode: RunMode) -> Result<(), ResponderError> {
    // 載入並驗證配置，失敗時不會發出任何遠端請求
    let settings = Settings::load()?;
    tracing::debug!("Settings: {:?}", settings);
    tracing::info!("✅ Configuration loaded for account {}", settings.account_id);

    let client = BusinessProfileClient::from_settings(&settings)?;
    let ledger = ReviewLedger::open(&settings.database_path).await?;
    match ledger.len().await {
        Ok(count) => tracing::info!("📒 Ledger holds {} answered review(s)", count),
        Err(e) => tracing::warn!("Could not count ledger entries: {}", e),
    }

    let responder = ReviewResponder::new(settings, client.clone(), client);
    let result = responder.run(&ledger, mode).await;

    // 無論成功與否都關閉 ledger
    ledger.close().await;

    let report = result?;
    if !report.mode.is_simulate() {
        tracing::info!(
            "✅ Sent {} replies, {} new ledger entries",
            report.sent_count(),
            report.recorded
        );
    }
    println!("{}", report);
    Ok(())
}
