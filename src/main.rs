use std::sync::Arc;

use futures::StreamExt;
use secrecy::SecretString;

use jobscout::approvals::{ApprovalQueue, CommandHandler};
use jobscout::channels::{Messenger, TelegramChannel};
use jobscout::classify::CategoryClassifier;
use jobscout::config::BotConfig;
use jobscout::pipeline::processor::IngestProcessor;
use jobscout::pipeline::scheduler::spawn_ingest_poller;
use jobscout::publish::Publisher;
use jobscout::sources::RedditSource;
use jobscout::translate::{HttpTranslator, TranslationAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env()?;

    let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_else(|_| {
        eprintln!("Error: TELEGRAM_BOT_TOKEN not set");
        eprintln!("  export TELEGRAM_BOT_TOKEN=123456:ABC...");
        std::process::exit(1);
    });

    let translate_url = std::env::var("TRANSLATE_API_URL")
        .unwrap_or_else(|_| "https://libretranslate.com".to_string());
    let translate_key = std::env::var("TRANSLATE_API_KEY")
        .ok()
        .map(SecretString::from);

    eprintln!("🧭 JobScout v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Sources: {}", config.sources.join(", "));
    eprintln!("   Keywords: {}", config.keywords.join(", "));
    eprintln!("   Poll interval: {}s", config.poll_interval.as_secs());
    eprintln!("   Feed channel: {}", config.feed_channel);
    eprintln!(
        "   Translation: {} ({} to {})\n",
        translate_url, config.source_lang, config.dest_lang
    );

    // ── Collaborators ───────────────────────────────────────────────
    let telegram = Arc::new(TelegramChannel::new(SecretString::from(bot_token)));
    let messenger: Arc<dyn Messenger> = telegram.clone();

    let classifier = Arc::new(CategoryClassifier::pretrained());
    let translator = TranslationAdapter::new(
        Arc::new(HttpTranslator::new(translate_url, translate_key)),
        &config.source_lang,
        &config.dest_lang,
    );
    let queue = ApprovalQueue::new();

    // ── Ingest pipeline ─────────────────────────────────────────────
    let processor = Arc::new(IngestProcessor::new(
        Arc::new(RedditSource::new()),
        Arc::clone(&messenger),
        Arc::clone(&queue),
        classifier,
        translator,
        &config,
    ));
    let (_poller, _poller_shutdown) = spawn_ingest_poller(processor, config.poll_interval);

    // ── Command dispatch loop ───────────────────────────────────────
    let publisher = Publisher::new(Arc::clone(&messenger), &config.feed_channel);
    let handler = CommandHandler::new(Arc::clone(&queue), publisher, &config.admin_user);

    let mut commands = telegram.listen_commands();
    while let Some(invocation) = commands.next().await {
        let reply = match handler
            .dispatch(&invocation.caller, &invocation.command)
            .await
        {
            Ok(ack) => ack,
            Err(e) => {
                tracing::warn!(
                    caller = %invocation.caller,
                    item_id = invocation.command.item_id(),
                    error = %e,
                    "command rejected"
                );
                format!("❌ {e}")
            }
        };

        if let Err(e) = messenger.send_direct(&invocation.reply_to, &reply).await {
            tracing::warn!(error = %e, "failed to acknowledge command");
        }
    }

    Ok(())
}
