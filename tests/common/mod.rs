//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use trek_backoffice::config::SiteConfig;

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the zero-based request index and returns status and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);
    let counter = Arc::new(AtomicU32::new(0));

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let index = counter.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        // Drain the request head; bodies are never sent to this backend.
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f(index).await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Settings row as the hosted backend returns it.
pub fn settings_body(logo_url: &str) -> String {
    format!(r#"[{{"id":1,"logo_url":"{logo_url}","favicon_url":"https://cdn.example/favicon.ico","site_name":"Summit Treks"}}]"#)
}

/// Config pointing at `backend` with fast retries.
pub fn test_config(backend: SocketAddr) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.backend.url = format!("http://{backend}");
    config.backend.anon_key = "test-anon-key".to_string();
    config.backend.request_timeout_secs = 5;
    config.retry.max_retries = 3;
    config.retry.base_delay_ms = 1;
    config
}
