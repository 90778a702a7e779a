mod frontmatter;
mod handlers;
mod hot_reload;
mod markdown;
mod middleware;
mod models;
mod posts;
mod settings;
mod state;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, get_service};
use axum::{Router, ServiceExt};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::Layer;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::{list_page, post_page};
use crate::markdown::CmarkRenderer;
use crate::posts::PostService;
use crate::settings::Settings;
use crate::state::{AppState, RouterState};
use crate::templates::HandlebarsRenderer;

#[tokio::main]
async fn main() {
    // logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().expect("failed to load settings");
    info!(environment = %settings.environment, "starting blog server");

    let posts = PostService::new(settings.content_dir.clone(), Box::new(CmarkRenderer::new()));
    let renderer =
        HandlebarsRenderer::from_dir(&settings.templates_dir).expect("failed to load templates");

    let (tx, _rx) = broadcast::channel(16);
    if settings.is_development() {
        info!("hot reload enabled, watching content and templates");
        hot_reload::start_content_watcher(
            tx.clone(),
            vec![settings.content_dir.clone(), settings.templates_dir.clone()],
        );
    }

    let static_dir = get_service(ServeDir::new(settings.content_dir.join("static")));
    let port = settings.port;

    let router_state = RouterState {
        app: Arc::new(AppState {
            posts,
            renderer: Box::new(renderer),
            settings,
        }),
        broadcaster: tx,
    };

    let router = Router::new()
        .route("/", get(list_page))
        .route("/{post}", get(post_page))
        .nest_service("/static", static_dir)
        .route("/ws", get(hot_reload::ws_handler))
        .with_state(router_state);

    // Wrapped around the router (not layered onto it) so normalization runs
    // before route matching.
    let app = axum::middleware::from_fn(middleware::normalize_trailing_slash).layer(router);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "listening");
    let listener = TcpListener::bind(addr).await.expect("failed to bind listener");
    axum::serve(
        listener,
        ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .await
    .expect("server error");
}
