// src/main.rs
use clap::Parser;
use gemini_news_feed::{
    cache::{CacheStore, FileCacheStore, MemoryCacheStore},
    config,
    feed::{FeedService, FeedSnapshot},
    remote::{GeminiClient, NewsProvider},
    utils::{setup_logging, Language},
};
use log::info;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "news-feed", about = "Fetch and cache Hong Kong news summaries")]
struct Args {
    /// Feed language: en or zh
    #[arg(long, default_value = "en")]
    language: Language,

    /// Number of additional load-more batches after the initial refresh
    #[arg(long, default_value_t = 0)]
    load_more: u32,

    /// Probe the news provider and exit
    #[arg(long)]
    health_check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging().expect("Failed to initialize logging");
    info!("🚀 News feed orchestrator starting...");

    let args = Args::parse();
    let app_config = config::load_config()?;

    let provider = Arc::new(GeminiClient::new(&app_config)?);

    if args.health_check {
        let health = provider.health_check().await;
        println!(
            "{} ({}ms): {}",
            if health.is_healthy { "healthy" } else { "unhealthy" },
            health.response_time_ms.unwrap_or(0),
            health.status_message
        );
        return Ok(());
    }

    let store: Arc<dyn CacheStore> = match &app_config.cache_file_path {
        Some(path) => Arc::new(FileCacheStore::new(path)),
        None => Arc::new(MemoryCacheStore::new()),
    };
    let service = FeedService::new(provider, store, &app_config);

    service.refresh(args.language).await;
    print_snapshot(&service.snapshot().await);

    for batch in 0..args.load_more {
        info!("Loading more articles (batch {})...", batch + 1);
        service.load_more(args.language).await;
        print_snapshot(&service.snapshot().await);
    }

    Ok(())
}

fn print_snapshot(snapshot: &FeedSnapshot) {
    if let Some(error) = &snapshot.error {
        println!("! {}", error);
    }
    for article in &snapshot.articles {
        println!("[{}] {}", article.category, article.title);
        println!("    {}", article.summary);
        println!("    {}", article.source_url);
    }
    println!("({} articles)", snapshot.articles.len());
}
