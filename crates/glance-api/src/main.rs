use std::sync::Arc;

use chrono::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glance_api::{
    build_router,
    config::{Config, StorageBackend},
    state::AppState,
};
use glance_core::{FollowUpAnswerer, SummaryService};
use glance_llm::{OpenAIClient, OpenAIConfig, OpenAISummarizer, Summarizer};
use glance_persist::{CacheStore, InMemoryCacheStore, MongoCacheStore};
use glance_source::{PostSource, XClient, XConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Glance API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let store = build_store(&config).await?;
    let source = build_post_source(&config)?;
    let summarizer = build_summarizer(&config)?;

    let mut service = SummaryService::builder()
        .store(store.clone())
        .freshness(Duration::hours(config.storage.freshness));
    let mut answerer = FollowUpAnswerer::new(store);

    if let Some(source) = source {
        service = service.post_source(source);
    }
    if let Some(summarizer) = summarizer {
        service = service.summarizer(summarizer.clone());
        answerer = answerer.with_summarizer(summarizer);
    }

    let state = Arc::new(AppState::new(config.clone(), service.build()?, answerer));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn CacheStore>> {
    let uri = config.mongodb_uri.as_deref();

    match (config.storage.backend, uri) {
        (StorageBackend::Memory, _) | (StorageBackend::Auto, None) => {
            tracing::warn!("Using in-memory cache; summaries are lost on restart");
            Ok(Arc::new(InMemoryCacheStore::new()))
        }
        (StorageBackend::Mongodb, None) => {
            anyhow::bail!("storage.backend is mongodb but MONGODB_URI is not set")
        }
        (_, Some(uri)) => {
            tracing::info!("Connecting to MongoDB");
            let store = MongoCacheStore::connect(uri, &config.storage.database).await?;
            Ok(Arc::new(store))
        }
    }
}

fn build_post_source(config: &Config) -> anyhow::Result<Option<Arc<dyn PostSource>>> {
    let Some(token) = config.x_bearer_token.clone() else {
        tracing::warn!("X_BEARER_TOKEN not set; summaries can only be served from cache");
        return Ok(None);
    };

    let mut x_config = XConfig::new(token);
    if let Some(endpoint) = &config.x.endpoint {
        x_config = x_config.with_base_url(endpoint.clone());
    }
    Ok(Some(Arc::new(XClient::from_config(&x_config)?)))
}

fn build_summarizer(config: &Config) -> anyhow::Result<Option<Arc<dyn Summarizer>>> {
    let Some(api_key) = config.openai_api_key.clone() else {
        tracing::warn!("OPENAI_API_KEY not set; summaries and chat need a cached record");
        return Ok(None);
    };

    let mut llm_config = OpenAIConfig::new(api_key);
    if let Some(endpoint) = &config.llm.endpoint {
        llm_config = llm_config.with_base_url(endpoint.clone());
    }
    let client = Arc::new(OpenAIClient::from_config(&llm_config)?);
    let summarizer = OpenAISummarizer::new(client).with_model(config.llm.model.clone());

    tracing::info!(model = %summarizer.model(), "OpenAI summarizer ready");
    Ok(Some(Arc::new(summarizer)))
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
