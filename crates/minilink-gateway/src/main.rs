use clap::Parser;
use minilink_cache::MemoCache;
use minilink_core::{DigestCodeGenerator, LinkStore, UserStore};
use minilink_gateway::cli::{Cli, StorageBackendArg};
use minilink_gateway::{App, AppState};
use minilink_service::{ServiceConfig, ShortenerService};
use minilink_store::{FileLinkStore, FileUserStore, InMemoryLinkStore, InMemoryUserStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(
        listen_addr = %cli.listen_addr,
        storage = %cli.storage,
        require_auth = cli.require_auth,
        "starting minilink gateway"
    );

    let config = ServiceConfig::builder()
        .require_auth(cli.require_auth)
        .resolve_ttl(Duration::from_secs(cli.resolve_ttl_secs))
        .record_ttl(Duration::from_secs(cli.record_ttl_secs))
        .build();

    match cli.storage {
        StorageBackendArg::InMemory => {
            serve(
                cli.listen_addr,
                InMemoryLinkStore::new(),
                InMemoryUserStore::new(),
                config,
            )
            .await
        }
        StorageBackendArg::File => {
            let links = FileLinkStore::open(&cli.link_db).await?;
            let users = FileUserStore::open(&cli.user_db).await?;
            serve(cli.listen_addr, links, users, config).await
        }
    }
}

async fn serve<L: LinkStore, U: UserStore>(
    listen_addr: SocketAddr,
    links: L,
    users: U,
    config: ServiceConfig,
) -> anyhow::Result<()> {
    let service = ShortenerService::new(
        links,
        users,
        DigestCodeGenerator::new(),
        MemoCache::new(),
        config,
    )
    .await?;

    let state = AppState::new(Arc::new(service));
    let app = App::router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
