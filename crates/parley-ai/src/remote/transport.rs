//! HTTP transport for chat-completion requests.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::config::RemoteConfig;
use crate::{AiError, TransportError};

/// One POST of a JSON body, returning the parsed JSON response.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post(&self, body: &serde_json::Value) -> Result<serde_json::Value, TransportError>;
}

/// `reqwest`-backed transport. The client holds a connection pool that
/// is reused across calls.
pub struct HttpTransport {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build the client.
    ///
    /// Certificate verification is disabled so the client keeps working
    /// behind intercepting proxies. Do not point it at endpoints where
    /// that matters. Proxies come from the config only; environment
    /// proxy variables are ignored.
    pub fn new(config: &RemoteConfig) -> Result<Self, AiError> {
        let mut builder = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .danger_accept_invalid_certs(true);

        for (scheme, url) in &config.proxies {
            let proxy = match scheme.as_str() {
                "http" => reqwest::Proxy::http(url),
                "https" => reqwest::Proxy::https(url),
                "all" => reqwest::Proxy::all(url),
                other => {
                    return Err(AiError::ClientSetup(format!(
                        "unsupported proxy scheme '{other}'"
                    )))
                }
            }
            .map_err(|e| AiError::ClientSetup(format!("invalid proxy '{url}': {e}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| AiError::ClientSetup(e.to_string()))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

fn classify_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut
    } else {
        TransportError::ConnectionFailed(err.to_string())
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post(&self, body: &serde_json::Value) -> Result<serde_json::Value, TransportError> {
        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "chat completion response");
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited);
        }
        if !status.is_success() {
            return Err(TransportError::BadStatus(status.as_u16()));
        }

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::TimedOut
            } else {
                TransportError::Malformed(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Read one request: headers, then `content-length` bytes of body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Accept one connection, answer with `response` after `delay`, and
    /// hand back the raw request.
    async fn serve_once(response: String, delay: Duration) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            request
        });
        (url, handle)
    }

    fn transport(url: &str) -> HttpTransport {
        let config = RemoteConfig::new("sk-test")
            .with_api_url(url)
            .with_timeout(Duration::from_secs(5));
        HttpTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn success_returns_json_and_sends_bearer() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "hi"}}]});
        let response = http_response("200 OK", &body.to_string());
        let (url, server) = serve_once(response, Duration::ZERO).await;

        let reply = transport(&url).post(&json!({"model": "m"})).await.unwrap();
        assert_eq!(reply, body);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.contains("Bearer sk-test"));
        assert!(request.ends_with(r#"{"model":"m"}"#));
    }

    #[tokio::test]
    async fn status_429_is_rate_limited() {
        let (url, _server) =
            serve_once(http_response("429 Too Many Requests", ""), Duration::ZERO).await;
        let err = transport(&url).post(&json!({})).await.unwrap_err();
        assert_eq!(err, TransportError::RateLimited);
    }

    #[tokio::test]
    async fn server_error_is_bad_status() {
        let (url, _server) =
            serve_once(http_response("500 Internal Server Error", "{}"), Duration::ZERO).await;
        let err = transport(&url).post(&json!({})).await.unwrap_err();
        assert_eq!(err, TransportError::BadStatus(500));
        assert_eq!(err.to_string(), "Request failed with code 500");
    }

    #[tokio::test]
    async fn unparseable_success_body_is_malformed() {
        let (url, _server) =
            serve_once(http_response("200 OK", "not json"), Duration::ZERO).await;
        let err = transport(&url).post(&json!({})).await.unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)), "{err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let err = transport(&url).post(&json!({})).await.unwrap_err();
        assert!(matches!(err, TransportError::ConnectionFailed(_)), "{err:?}");
        assert_eq!(err.to_string(), "Connection error");
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let (url, _server) =
            serve_once(http_response("200 OK", "{}"), Duration::from_secs(3)).await;
        let config = RemoteConfig::new("sk-test")
            .with_api_url(&url)
            .with_timeout(Duration::from_millis(200));

        let err = HttpTransport::new(&config)
            .unwrap()
            .post(&json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::TimedOut);
        assert_eq!(err.to_string(), "Connection timeout");
    }

    #[test]
    fn builds_with_proxies() {
        let config = RemoteConfig::new("key")
            .with_proxy("http", "http://127.0.0.1:7890")
            .with_proxy("https", "http://127.0.0.1:7890");
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[test]
    fn rejects_unknown_proxy_scheme() {
        let config = RemoteConfig::new("key").with_proxy("socks9", "socks9://x");
        let err = HttpTransport::new(&config).err().unwrap();
        assert!(err.to_string().contains("socks9"));
    }
}
