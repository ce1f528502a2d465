//! Google consent flow via local callback capture.
//!
//! The browser handles the interactive consent; this side only opens the
//! consent URL and runs a short-lived localhost listener that receives the
//! redirect carrying the authorization code. The code is then forwarded to
//! the backend exchange endpoint by the caller; no token work happens here.

use crate::error::SessionError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// Default callback port.
pub const DEFAULT_CALLBACK_PORT: u16 = 9131;

/// Default consent timeout in seconds.
pub const DEFAULT_CONSENT_TIMEOUT_SECS: u64 = 120;

const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_SCOPE: &str = "openid profile email";

/// Lifecycle of the consent capability.
///
/// `Uninitialized` until the configuration is checked, `Ready` when a
/// consent round may start, `InFlight` while the listener waits for the
/// redirect, `Done` after a code was delivered. A failed round returns to
/// `Ready` so the user can retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsentPhase {
    #[default]
    Uninitialized,
    Ready,
    InFlight,
    Done,
}

/// Captures a Google authorization code through a localhost redirect.
pub struct GoogleConsent {
    client_id: String,
    port: u16,
    timeout_secs: u64,
    phase: ConsentPhase,
}

impl GoogleConsent {
    /// Create a consent flow. Starts `Uninitialized`.
    pub fn new(client_id: impl Into<String>, port: u16, timeout_secs: u64) -> Self {
        Self {
            client_id: client_id.into(),
            port,
            timeout_secs,
            phase: ConsentPhase::Uninitialized,
        }
    }

    /// Create with default port and timeout.
    pub fn with_defaults(client_id: impl Into<String>) -> Self {
        Self::new(client_id, DEFAULT_CALLBACK_PORT, DEFAULT_CONSENT_TIMEOUT_SECS)
    }

    /// Current phase.
    pub fn phase(&self) -> ConsentPhase {
        self.phase
    }

    /// Whether a consent round may start.
    pub fn is_ready(&self) -> bool {
        self.phase == ConsentPhase::Ready
    }

    /// Validate the configuration and arm the flow.
    pub fn initialize(&mut self) -> Result<(), SessionError> {
        if self.client_id.is_empty() {
            return Err(SessionError::Consent(
                "no Google client id configured".to_string(),
            ));
        }
        self.phase = ConsentPhase::Ready;
        Ok(())
    }

    /// The local redirect target.
    pub fn callback_url(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }

    /// The provider consent URL to open in the browser.
    pub fn consent_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&prompt=consent",
            GOOGLE_AUTH_ENDPOINT,
            percent_encode(&self.client_id),
            percent_encode(&self.callback_url()),
            percent_encode(GOOGLE_SCOPE),
        )
    }

    /// Run one consent round: listen for the redirect and return the
    /// authorization code.
    ///
    /// The caller is responsible for opening the browser at
    /// [`consent_url`](Self::consent_url). Fails if the flow is not `Ready`,
    /// the port cannot be bound, the timeout elapses, or the provider
    /// reported an error; all failures re-arm the flow for a retry.
    pub async fn request_code(&mut self) -> Result<String, SessionError> {
        if self.phase != ConsentPhase::Ready {
            return Err(SessionError::Consent(
                "consent flow is not ready".to_string(),
            ));
        }
        self.phase = ConsentPhase::InFlight;

        let outcome = self.wait_for_redirect().await;
        match &outcome {
            Ok(_) => self.phase = ConsentPhase::Done,
            Err(_) => self.phase = ConsentPhase::Ready,
        }
        outcome
    }

    async fn wait_for_redirect(&self) -> Result<String, SessionError> {
        let addr = format!("127.0.0.1:{}", self.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            SessionError::Consent(format!("failed to bind to {}: {}", addr, e))
        })?;

        info!(port = self.port, "consent callback listener started");

        let (tx, rx) = oneshot::channel::<Result<String, String>>();
        let tx = Arc::new(tokio::sync::Mutex::new(Some(tx)));

        let server_handle = tokio::spawn({
            let tx = tx.clone();
            async move {
                loop {
                    match listener.accept().await {
                        Ok((mut socket, _)) => {
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(&mut socket, tx).await {
                                    error!("error handling consent callback: {}", e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("accept error: {}", e);
                            break;
                        }
                    }
                }
            }
        });

        let timeout = tokio::time::Duration::from_secs(self.timeout_secs);
        let outcome = match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(Ok(code))) => Ok(code),
            Ok(Ok(Err(denied))) => Err(SessionError::Consent(denied)),
            Ok(Err(_)) => Err(SessionError::Consent("internal error: channel closed".into())),
            Err(_) => Err(SessionError::Consent("consent timed out".into())),
        };

        server_handle.abort();

        outcome
    }
}

/// Handle one incoming HTTP connection on the callback listener.
async fn handle_connection(
    socket: &mut tokio::net::TcpStream,
    tx: Arc<tokio::sync::Mutex<Option<oneshot::Sender<Result<String, String>>>>>,
) -> std::io::Result<()> {
    let (reader, mut writer) = socket.split();
    let mut reader = BufReader::new(reader);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    debug!(request = %request_line.trim(), "received consent callback request");

    if !request_line.starts_with("GET ") {
        send_response(&mut writer, 405, "Method Not Allowed", "Method Not Allowed").await?;
        return Ok(());
    }

    let path_end = request_line.find(" HTTP/").unwrap_or(request_line.len());
    let path = &request_line[4..path_end];

    if !path.starts_with("/callback") {
        send_response(&mut writer, 404, "Not Found", "Not Found").await?;
        return Ok(());
    }

    let query = match path.find('?') {
        Some(idx) => &path[idx + 1..],
        None => "",
    };
    let params = parse_query(query);

    let outcome = if let Some(err) = params.get("error") {
        send_response(&mut writer, 200, "OK", &error_page(err)).await?;
        Err(err.clone())
    } else if let Some(code) = params.get("code") {
        send_response(&mut writer, 200, "OK", &success_page()).await?;
        Ok(code.clone())
    } else {
        send_response(&mut writer, 200, "OK", &error_page("missing authorization code")).await?;
        Err("missing authorization code".to_string())
    };

    if let Some(tx) = tx.lock().await.take() {
        let _ = tx.send(outcome);
    }

    Ok(())
}

/// Parse a query string into a map, percent-decoding values.
fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?.to_string();
            let value = parts.next().unwrap_or("").to_string();
            Some((key, percent_decode(&value)))
        })
        .collect()
}

/// Send a minimal HTTP response.
async fn send_response(
    writer: &mut tokio::net::tcp::WriteHalf<'_>,
    status_code: u16,
    status_text: &str,
    body: &str,
) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_code,
        status_text,
        body.len(),
        body
    );
    writer.write_all(response.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

fn success_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>HiLi - Sign-in Complete</title></head>
<body style="font-family: system-ui; text-align: center; padding: 50px; background: #f5f5f5;">
<div style="max-width: 400px; margin: 0 auto; background: white; padding: 40px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
<h1 style="color: #0b6356; margin-bottom: 20px;">Sign-in Complete</h1>
<p style="color: #666;">You can close this window and return to the terminal.</p>
</div>
<script>setTimeout(() => window.close(), 2000);</script>
</body>
</html>"#
        .to_string()
}

fn error_page(error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>HiLi - Sign-in Failed</title></head>
<body style="font-family: system-ui; text-align: center; padding: 50px; background: #f5f5f5;">
<div style="max-width: 400px; margin: 0 auto; background: white; padding: 40px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
<h1 style="color: #c0392b; margin-bottom: 20px;">Sign-in Failed</h1>
<p style="color: #666;">Error: {}</p>
<p style="color: #888; font-size: 14px;">You can close this window and try again.</p>
</div>
</body>
</html>"#,
        error
    )
}

/// Minimal percent encoding.
fn percent_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            _ => {
                for byte in c.to_string().as_bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

/// Minimal percent decoding.
fn percent_decode(s: &str) -> String {
    let mut result = Vec::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte);
            }
        } else if c == '+' {
            result.push(b' ');
        } else {
            result.push(c as u8);
        }
    }

    String::from_utf8_lossy(&result).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener as StdTcpListener;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpStream;

    fn can_bind_localhost() -> bool {
        StdTcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn test_callback_url() {
        let flow = GoogleConsent::new("client-id", 9131, 120);
        assert_eq!(flow.callback_url(), "http://localhost:9131/callback");
    }

    #[test]
    fn test_consent_url_encodes_redirect() {
        let flow = GoogleConsent::new("client-id", 9131, 120);
        let url = flow.consent_url();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?client_id=client-id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A9131%2Fcallback"));
        assert!(url.contains("scope=openid%20profile%20email"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_initialize_requires_client_id() {
        let mut flow = GoogleConsent::with_defaults("");
        assert!(flow.initialize().is_err());
        assert_eq!(flow.phase(), ConsentPhase::Uninitialized);

        let mut flow = GoogleConsent::with_defaults("client-id");
        flow.initialize().unwrap();
        assert_eq!(flow.phase(), ConsentPhase::Ready);
        assert!(flow.is_ready());
    }

    #[test]
    fn test_percent_roundtrip() {
        let encoded = percent_encode("http://localhost:9131/callback");
        assert_eq!(encoded, "http%3A%2F%2Flocalhost%3A9131%2Fcallback");

        let decoded = percent_decode("http%3A%2F%2Flocalhost%3A9131%2Fcallback");
        assert_eq!(decoded, "http://localhost:9131/callback");

        assert_eq!(percent_decode("hello+world"), "hello world");
    }

    #[test]
    fn test_parse_query() {
        let params = parse_query("code=abc%2F123&state=xyz");
        assert_eq!(params.get("code").unwrap(), "abc/123");
        assert_eq!(params.get("state").unwrap(), "xyz");
    }

    #[tokio::test]
    async fn request_code_requires_ready_phase() {
        let mut flow = GoogleConsent::with_defaults("client-id");
        let err = flow.request_code().await.unwrap_err();
        assert!(matches!(err, SessionError::Consent(_)));
    }

    #[tokio::test]
    async fn request_code_captures_redirect() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }

        let port = 19131;
        let mut flow = GoogleConsent::new("client-id", port, 5);
        flow.initialize().unwrap();

        let handle = tokio::spawn(async move {
            let code = flow.request_code().await;
            (code, flow.phase())
        });

        // Wait for the listener, then play the browser redirect
        let mut attempts = 0;
        let mut stream = loop {
            match TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => break stream,
                Err(e) if attempts >= 100 => panic!("listener never came up: {e}"),
                Err(_) => {
                    attempts += 1;
                    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
                }
            }
        };
        stream
            .write_all(b"GET /callback?code=test-auth-code HTTP/1.1\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        let _ = stream.read_to_string(&mut response).await;
        assert!(response.contains("Sign-in Complete"));

        let (code, phase) = handle.await.unwrap();
        assert_eq!(code.unwrap(), "test-auth-code");
        assert_eq!(phase, ConsentPhase::Done);
    }

    #[tokio::test]
    async fn denied_consent_reports_error_and_rearms() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }

        let port = 19132;
        let mut flow = GoogleConsent::new("client-id", port, 5);
        flow.initialize().unwrap();

        let handle = tokio::spawn(async move {
            let code = flow.request_code().await;
            (code, flow.phase())
        });

        let mut attempts = 0;
        let mut stream = loop {
            match TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => break stream,
                Err(e) if attempts >= 100 => panic!("listener never came up: {e}"),
                Err(_) => {
                    attempts += 1;
                    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
                }
            }
        };
        stream
            .write_all(b"GET /callback?error=access_denied HTTP/1.1\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        let _ = stream.read_to_string(&mut response).await;

        let (code, phase) = handle.await.unwrap();
        match code.unwrap_err() {
            SessionError::Consent(message) => assert_eq!(message, "access_denied"),
            other => panic!("unexpected error: {other:?}"),
        }
        // A failed round re-arms for retry
        assert_eq!(phase, ConsentPhase::Ready);
    }
}
