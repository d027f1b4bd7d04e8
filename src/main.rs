//! Portal BFF server binary.
//!
//! Loads configuration from the environment, wires the coordinator to its
//! collaborators and serves the auth endpoints.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use portal_bff::adapters::http::{router, AuthHandlers};
use portal_bff::adapters::{
    InMemoryIdentityProvider, InMemoryPortalDirectory, InMemorySessionAuthority,
};
use portal_bff::application::{RedirectSessionBridge, SessionLifecycleCoordinator};
use portal_bff::config::AppConfig;
use portal_bff::domain::foundation::UserId;
use portal_bff::domain::identity::{EmployeeLink, IdentityRecord};
use portal_bff::domain::portal::Portal;
use portal_bff::domain::session::User;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    init_tracing(&config);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    info!(
        environment = ?config.server.environment,
        %addr,
        app_name = %config.auth.app_name,
        "starting portal-bff"
    );

    let portals = demo_portals();
    let identity = Arc::new(
        InMemoryIdentityProvider::new()
            .with_client_id(config.auth.app_name.clone())
            .with_identity(demo_identity(&portals)?),
    );
    let authority = Arc::new(InMemorySessionAuthority::new().with_portals(portals.clone()));
    let directory = Arc::new(
        portals
            .into_iter()
            .fold(InMemoryPortalDirectory::new(), |dir, portal| dir.with_portal(portal)),
    );
    tracing::warn!("collaborators are in-memory; sessions do not survive a restart");

    let coordinator = Arc::new(SessionLifecycleCoordinator::new(
        identity,
        authority.clone(),
        directory,
        config.auth.coordinator_settings()?,
    ));
    let bridge = Arc::new(RedirectSessionBridge::new(
        authority,
        config.auth.auth_link_path.clone(),
    ));

    let app = router(AuthHandlers::new(coordinator, bridge), &config.server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

fn demo_portals() -> Vec<Portal> {
    vec![
        Portal::new(1, "Head Office", "https://hq.portal.example.com"),
        Portal::new(2, "Northern Branch", "https://north.portal.example.com"),
    ]
}

fn demo_identity(portals: &[Portal]) -> Result<IdentityRecord, Box<dyn std::error::Error>> {
    Ok(IdentityRecord {
        user: Some(User {
            id: UserId::new("demo-cloud-id")?,
            login: "demo".to_string(),
            email: "demo@portal.example.com".to_string(),
            full_name: "Demo User".to_string(),
            portal_ids: portals.iter().map(|p| p.id).collect(),
        }),
        portals: portals.to_vec(),
        employees: portals
            .iter()
            .map(|p| EmployeeLink {
                employee_id: format!("emp-{}", p.id),
                portal_id: p.id,
            })
            .collect(),
    })
}
