use std::sync::Arc;

use auth::Authenticator;
use credential_service::config::Config;
use credential_service::domain::identity::service::CredentialService;
use credential_service::inbound::http::router::create_router;
use credential_service::outbound::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credential_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "credential-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    // Resolve everything the request path depends on before touching the network
    let signing_secret = config.signing_secret().map_err(|e| {
        tracing::error!(error = %e, "Signing secret is not configured");
        e
    })?;
    if signing_secret.is_weak() {
        tracing::warn!(
            min_bytes = auth::jwt::secret::RECOMMENDED_SECRET_LEN,
            "Signing secret is shorter than recommended for HS256"
        );
    }
    let token_validity = config.token_validity()?;
    let password_hasher = config.password_hasher()?;
    let cost = password_hasher.cost();

    tracing::info!(
        http_port = config.server.http_port,
        request_timeout_secs = config.server.request_timeout_secs,
        token_validity_hours = config.jwt.expiration_hours,
        hashing_memory_kib = cost.memory_kib,
        hashing_iterations = cost.iterations,
        hashing_parallelism = cost.parallelism,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(
        Authenticator::new(&signing_secret, token_validity).with_password_hasher(password_hasher),
    );
    drop(signing_secret);

    let identity_repository = Arc::new(PostgresIdentityRepository::new(pg_pool));
    let credential_service = Arc::new(CredentialService::new(identity_repository, authenticator));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service, config.request_timeout());

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
