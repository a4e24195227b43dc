use advisor_scribe::adapters::services::llm::create_service;
use advisor_scribe::adapters::sources::{
    CsvClientSource, CsvProductSource, FileTranscriptSource, TextCatalogSource,
};
use advisor_scribe::adapters::storage::FileReportWriter;
use advisor_scribe::cli::{Cli, Commands};
use advisor_scribe::ports::sources::ProductSourcePort;
use advisor_scribe::utils::{KeychainManager, KeychainPort};
use advisor_scribe::{AppConfig, Orchestrator, PipelineInputs};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

const PREVIEW_LINES: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let keychain = KeychainManager::new();

    match cli.command() {
        Commands::Run => run(&keychain).await,
        Commands::StoreKey { provider, key } => {
            keychain.save_api_key(&provider, &key)?;
            println!("Stored API key for {}", provider);
            Ok(())
        }
    }
}

async fn run(keychain: &dyn KeychainPort) -> anyhow::Result<()> {
    let config = AppConfig::from_env(keychain).context("failed to load configuration")?;
    let llm = create_service(&config)?;
    let writer = Arc::new(FileReportWriter::new(&config.output_dir));

    let transcript = FileTranscriptSource::new(&config.transcript_path);
    let clients = CsvClientSource::new(&config.client_data_path);
    let products = product_source(&config.product_catalog_path);

    let orchestrator = Orchestrator::new(llm, config.llm.clone(), config.pipeline.clone(), writer);
    let run = orchestrator
        .run(&PipelineInputs {
            transcript: &transcript,
            clients: Some(&clients),
            products: Some(&*products),
        })
        .await
        .context("meeting analysis failed")?;

    println!("Analysis complete. Preview of the report:\n");
    for line in run.report.render_text().lines().take(PREVIEW_LINES) {
        println!("{}", line);
    }
    println!("...\n");
    println!("JSON report: {}", run.written.json_path.display());
    println!("Text report: {}", run.written.text_path.display());

    let gaps = run.report.recommendation.gaps();
    if !gaps.is_empty() {
        println!("{} need(s) had no matching product in the catalog", gaps.len());
    }
    Ok(())
}

/// CSV catalogs by extension, anything else is read as the text format
fn product_source(path: &Path) -> Box<dyn ProductSourcePort> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvProductSource::new(path))
    } else {
        Box::new(TextCatalogSource::new(path))
    }
}
