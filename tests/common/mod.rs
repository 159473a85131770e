//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{address, Address, TxHash};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use eduseal::blockchain::{BlockchainError, BlockchainResult, ContractCall, ReceiptStatus};
use eduseal::config::ProofCredentials;
use eduseal::proof::{ProofError, ProofResult, ProofSdk, SessionHandle, SessionOutcome};
use eduseal::session::WalletSession;
use eduseal::workflow::{VerificationLauncher, WorkflowSettings};

pub const REGISTRY: Address = address!("0x5f5f5f5f5f5f5f5f5f5f5f5f5f5f5f5f5f5f5f5f");

pub fn credentials() -> ProofCredentials {
    ProofCredentials {
        app_id: "app-1".to_string(),
        app_secret: "secret-1".to_string(),
        provider_id: "provider-1".to_string(),
    }
}

pub fn settings() -> WorkflowSettings {
    WorkflowSettings {
        credentials: Some(credentials()),
        registry: REGISTRY,
        verification_timeout: Duration::from_secs(5),
    }
}

pub fn physics_context() -> String {
    r#"{"degreeName":"BSc Physics"}"#.to_string()
}

// ---------------------------------------------------------------------------
// Wallet session
// ---------------------------------------------------------------------------

pub struct MockSession {
    connected: bool,
    account: Address,
    fail_writes: AtomicBool,
    receipt: Mutex<ReceiptStatus>,
    writes: Mutex<Vec<ContractCall>>,
    watches: AtomicUsize,
}

impl MockSession {
    pub fn connected() -> Self {
        Self {
            connected: true,
            account: Address::repeat_byte(0xaa),
            fail_writes: AtomicBool::new(false),
            receipt: Mutex::new(ReceiptStatus::Confirmed { block_number: 7 }),
            writes: Mutex::new(Vec::new()),
            watches: AtomicUsize::new(0),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::connected()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_receipt(&self, status: ReceiptStatus) {
        *self.receipt.lock().unwrap() = status;
    }

    pub fn writes(&self) -> Vec<ContractCall> {
        self.writes.lock().unwrap().clone()
    }

    pub fn watch_count(&self) -> usize {
        self.watches.load(Ordering::SeqCst)
    }
}

impl WalletSession for MockSession {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn account(&self) -> Option<Address> {
        self.connected.then_some(self.account)
    }

    async fn write_contract(&self, call: &ContractCall) -> BlockchainResult<TxHash> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("user rejected the request".to_string()));
        }
        let mut writes = self.writes.lock().unwrap();
        writes.push(call.clone());
        Ok(TxHash::repeat_byte(writes.len() as u8))
    }

    async fn watch_receipt(&self, _tx_hash: TxHash) -> BlockchainResult<ReceiptStatus> {
        self.watches.fetch_add(1, Ordering::SeqCst);
        Ok(self.receipt.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Proof SDK
// ---------------------------------------------------------------------------

pub struct MockSdk {
    init_error: Option<String>,
    outcome: Option<SessionOutcome>,
    init_calls: AtomicUsize,
}

impl MockSdk {
    /// Session succeeds with `payload`.
    pub fn succeeding(payload: Value) -> Self {
        Self {
            init_error: None,
            outcome: Some(SessionOutcome::Success(payload)),
            init_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Some(SessionOutcome::Failure(reason.to_string())),
            ..Self::succeeding(Value::Null)
        }
    }

    pub fn failing_init(reason: &str) -> Self {
        Self {
            init_error: Some(reason.to_string()),
            ..Self::succeeding(Value::Null)
        }
    }

    /// The holder never finishes.
    pub fn hanging() -> Self {
        Self {
            outcome: None,
            ..Self::succeeding(Value::Null)
        }
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }
}

impl ProofSdk for MockSdk {
    async fn init(&self, credentials: &ProofCredentials) -> ProofResult<SessionHandle> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        match &self.init_error {
            Some(reason) => Err(ProofError::Session(reason.clone())),
            None => Ok(SessionHandle {
                session_id: "session-1".to_string(),
                request_url: format!("https://verify.test/{}", credentials.provider_id),
            }),
        }
    }

    async fn await_outcome(&self, _session: &SessionHandle) -> SessionOutcome {
        match &self.outcome {
            Some(outcome) => outcome.clone(),
            None => std::future::pending().await,
        }
    }
}

// ---------------------------------------------------------------------------
// Launcher
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl VerificationLauncher for RecordingLauncher {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HTTP backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Start a programmable mock HTTP backend on an ephemeral port.
///
/// `handler` maps (method, path) to (status, body). Every request is
/// recorded in the returned list.
pub async fn start_programmable_backend<F>(
    handler: F,
) -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        let _ = serve_one(socket, handler, recorded).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, requests)
}

async fn serve_one<F>(
    mut socket: TcpStream,
    handler: Arc<F>,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()>
where
    F: Fn(&str, &str) -> (u16, String),
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    recorded.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization,
        body,
    });

    let (status, body) = handler(&method, &path);
    let status_text = match status {
        200 => "200 OK",
        201 => "201 Created",
        401 => "401 Unauthorized",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    Ok(())
}
