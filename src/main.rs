use clap::Parser;
use elis_search::core::events::UiEvent;
use elis_search::domain::ports::ResultsView;
use elis_search::utils::logger;
use elis_search::{CliConfig, ElisApp, EventResult, HtmlFileView, SearchOutcome, SubmitStatus, WriterView};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

// 單執行緒事件迴圈，與瀏覽器的 UI thread 相同
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let view: Box<dyn ResultsView> = match &cli.output {
        Some(path) => Box::new(HtmlFileView::new(path)),
        None => Box::new(WriterView::new(std::io::stdout())),
    };

    // 驗證配置
    let app = match cli.app_config().and_then(|config| ElisApp::new(config, view)) {
        Ok(app) => app.with_form(cli.initial_form()),
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if cli.interactive {
        run_interactive(Arc::new(app)).await?;
        return Ok(());
    }

    match app.controller().submit_search().await {
        Ok(SubmitStatus::Completed(SearchOutcome::Failed(message))) => {
            eprintln!("❌ Search failed: {}", message);
            std::process::exit(2);
        }
        Ok(SubmitStatus::Completed(SearchOutcome::Found(records))) => {
            if let Some(path) = &cli.output {
                eprintln!("📁 {} results written to {}", records.len(), path.display());
            }
        }
        Ok(SubmitStatus::Skipped | SubmitStatus::NotTriggered) => {}
        Err(e) => {
            // 搜尋完成但結果無法輸出
            tracing::error!("❌ Could not display results: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run_interactive<D>(app: Arc<ElisApp<D>>) -> anyhow::Result<()>
where
    D: elis_search::DirectoryClient + 'static,
{
    eprintln!("Connected to {}", app.config().api_base_url);
    eprintln!("Commands: district <v> | method <v> | experience <v> | submit | ctrl+enter | escape | quit");

    let mut pending = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(event) = UiEvent::parse(&line) else {
            eprintln!("⚠️ Unknown command: {}", line.trim());
            continue;
        };

        if event == UiEvent::Quit {
            break;
        }

        // 事件不等待前一次搜尋完成；進行中的搜尋會讓新的觸發被丟棄
        let app = Arc::clone(&app);
        pending.push(tokio::spawn(async move {
            match app.handle_event(event).await {
                Ok(EventResult::Search(SubmitStatus::Skipped)) => {
                    eprintln!("⏳ Search in progress, trigger ignored");
                }
                Ok(result) => tracing::debug!("Event handled: {:?}", result),
                Err(e) => {
                    tracing::warn!("⚠️ {}", e);
                    eprintln!("❌ {}", e.user_friendly_message());
                }
            }
        }));
        pending.retain(|handle| !handle.is_finished());
    }

    // 已送出的請求一律跑完，不取消
    for handle in pending {
        handle.await?;
    }

    tracing::info!("👋 ELIS search closed");
    Ok(())
}
