//! Local HTTP listener that captures the OAuth redirect.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::error::AuthError;

/// How often [`CallbackServer::wait_for_code`] re-checks the code slot.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

type CodeSlot = Arc<Mutex<Option<String>>>;

/// One-route HTTP listener for the provider's redirect back to
/// `http://localhost:{port}/callback`.
///
/// The authorization code is handed off through a single mutex-guarded slot;
/// the first captured code wins and later redirects are acknowledged but
/// ignored. The server keeps serving (harmlessly) until [`shutdown`] is
/// called.
///
/// [`shutdown`]: CallbackServer::shutdown
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use instagraph::auth::CallbackServer;
///
/// # async fn example() -> Result<(), instagraph::auth::AuthError> {
/// let server = CallbackServer::bind(8000).await?;
/// let code = server.wait_for_code(Duration::from_secs(120)).await?;
/// server.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct CallbackServer {
    addr: SocketAddr,
    code: CodeSlot,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CallbackServer {
    /// Bind the listener on `127.0.0.1:{port}` and start serving in the
    /// background. Pass port 0 to let the OS pick one.
    pub async fn bind(port: u16) -> Result<Self, AuthError> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let addr = listener.local_addr()?;
        let code: CodeSlot = Arc::new(Mutex::new(None));

        let app = Router::new()
            .route("/callback", get(capture_code))
            .fallback(not_found)
            .with_state(code.clone());

        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = signal.await;
            });
            if let Err(err) = serve.await {
                tracing::error!(error = %err, "callback server failed");
            }
        });

        info!(%addr, "callback server listening");
        Ok(Self {
            addr,
            code,
            shutdown,
            task,
        })
    }

    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// The captured authorization code, if the redirect has arrived.
    pub fn code(&self) -> Option<String> {
        self.code.lock().ok().and_then(|guard| guard.clone())
    }

    /// Poll the code slot once per second until the code arrives or
    /// `timeout` elapses.
    pub async fn wait_for_code(&self, timeout: Duration) -> Result<String, AuthError> {
        let started = Instant::now();
        loop {
            if let Some(code) = self.code() {
                return Ok(code);
            }
            if started.elapsed() >= timeout {
                return Err(AuthError::Timeout {
                    waited_secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Stop the listener and wait for it to wind down.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
        debug!("callback server stopped");
    }
}

async fn capture_code(
    State(slot): State<CodeSlot>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<&'static str>) {
    match params.get("code") {
        Some(code) => {
            if let Ok(mut guard) = slot.lock() {
                // First capture wins.
                if guard.is_none() {
                    debug!("authorization code captured");
                    *guard = Some(code.clone());
                }
            }
            (
                StatusCode::OK,
                Html("<html><body><h1>Authentication successful!</h1><p>You can close this window now.</p></body></html>"),
            )
        }
        None => (
            StatusCode::BAD_REQUEST,
            Html("<html><body><h1>Authentication failed!</h1><p>No authorization code received.</p></body></html>"),
        ),
    }
}

async fn not_found() -> (StatusCode, Html<&'static str>) {
    (
        StatusCode::NOT_FOUND,
        Html("<html><body><h1>Not Found</h1><p>This is not the callback URL.</p></body></html>"),
    )
}
