use axum::{
    body::Bytes,
    http::{HeaderMap, Request, Uri},
    Router,
};
use http_body_util::{BodyExt, Full};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use tower::{Service, ServiceBuilder, ServiceExt};
use tower_header_inject::{rule::BYPASS_TUNNEL_REMINDER, InjectLayer};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Upstream echoing the request target and the header injected by the proxy.
async fn echo(uri: Uri, headers: HeaderMap) -> String {
    let reminder = headers
        .get(BYPASS_TUNNEL_REMINDER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("<missing>");
    format!("{uri} {BYPASS_TUNNEL_REMINDER}={reminder}")
}

#[tokio::main]
async fn main() {
    let fmt = tracing_subscriber::fmt::layer().with_level(true);

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(Level::DEBUG))
        .with(fmt)
        .init();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(echo);
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let mut client = ServiceBuilder::new()
        .layer(InjectLayer::bypass_tunnel_reminder())
        .service(Client::builder(TokioExecutor::new()).build_http::<Full<Bytes>>());

    for path in ["/api/v1/proxy/forward-to", "/api/v1/proxy/forward-to/", "/health"] {
        let req = Request::get(format!("http://{addr}{path}"))
            .body(Full::default())
            .unwrap();
        let res = client.ready().await.unwrap().call(req).await.unwrap();
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let body = std::str::from_utf8(&body).unwrap();
        tracing::info!("received '{}'", body);
    }
}
