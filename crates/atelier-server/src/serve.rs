use axum::{
    extract::Request,
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::signal;
use tracing::{debug, info, warn, Level};

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

use atelier::{ContentStore, Locale, LogMailer, Mailer, RateLimiter};

use crate::config::SiteConfig;
use crate::server_utils::{find_open_port, log_server_start, new_socket, CustomOnResponse};

mod api;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentStore>,
    pub limiter: Arc<RateLimiter>,
    pub mailer: Arc<dyn Mailer>,
}

pub async fn run(config: SiteConfig, port_override: Option<u16>, host: bool) -> std::io::Result<()> {
    let start_time = std::time::Instant::now();

    let store = ContentStore::load(&config.content.dir);
    for issue in store.issues() {
        warn!(name: "content", "{}", issue);
    }

    let projects: usize = Locale::ALL.iter().map(|l| store.projects(*l).len()).sum();
    let posts: usize = Locale::ALL.iter().map(|l| store.posts(*l).len()).sum();
    info!(
        name: "content",
        "Loaded {} projects and {} posts from {}",
        projects,
        posts,
        config.content.dir.display()
    );

    let state = AppState {
        content: Arc::new(store),
        limiter: Arc::new(RateLimiter::new(
            config.contact.rate_limit,
            Duration::from_secs(config.contact.rate_window_secs),
        )),
        mailer: Arc::new(LogMailer),
    };

    let addr = if host {
        IpAddr::from([0, 0, 0, 0])
    } else {
        config.server.address
    };
    let port = find_open_port(&addr, port_override.unwrap_or(config.server.port)).await?;

    let socket = new_socket(&addr)?;
    let socket_addr = SocketAddr::new(addr, port);
    socket.bind(socket_addr)?;

    let listener = socket.listen(1024)?;

    debug!("listening on {}", listener.local_addr()?);

    let router = router(state, &config.server.static_dir);

    log_server_start(start_time, &config.site.name, host, socket_addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

fn router(state: AppState, static_dir: &Path) -> Router {
    async fn handle_404() -> (StatusCode, &'static str) {
        (StatusCode::NOT_FOUND, "Not found")
    }

    let service = handle_404.into_service();
    let serve_dir = ServeDir::new(static_dir).not_found_service(service);

    Router::new()
        .route(
            "/api/contact",
            get(api::contact_status).post(api::submit_contact),
        )
        .route("/api/{locale}/portfolio", get(api::list_projects))
        .route("/api/{locale}/portfolio/{slug}", get(api::get_project))
        .route(
            "/api/{locale}/portfolio/{slug}/related",
            get(api::related_projects),
        )
        .route("/api/{locale}/news", get(api::list_posts))
        .route("/api/{locale}/news/{slug}", get(api::get_post))
        .route("/api/{locale}/tags", get(api::list_service_tags))
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(record_uri))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(CustomOnResponse),
        )
        .with_state(state)
}

// The response logger reads the URI back out of the response extensions.
async fn record_uri(req: Request, next: Next) -> Response {
    let uri = req.uri().clone();
    let mut res = next.run(req).await;
    res.extensions_mut().insert(uri);
    res
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
