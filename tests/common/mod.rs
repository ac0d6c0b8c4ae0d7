//! Shared fixtures for integration tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use pwd_strength_client::{
    AnalysisResult, Composition, CrackTimes, EntropyMetrics, GeneratedCandidate,
    GenerationParameters, HealthInfo, PassphraseParameters, PasswordService, ServiceError,
    StrengthLabel,
};
use secrecy::SecretString;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-memory service with queued outcomes.
///
/// An operation whose queue is empty never completes, like a hung
/// network call.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeService {
    health: Mutex<VecDeque<Result<HealthInfo, ServiceError>>>,
    analyses: Mutex<VecDeque<Result<AnalysisResult, ServiceError>>>,
    passwords: Mutex<VecDeque<Result<Vec<GeneratedCandidate>, ServiceError>>>,
    passphrases: Mutex<VecDeque<Result<Vec<GeneratedCandidate>, ServiceError>>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn healthy(models: &[&str]) -> Self {
        let service = Self::new();
        service.push_health(Ok(health_info(true, models)));
        service
    }

    pub fn push_health(&self, outcome: Result<HealthInfo, ServiceError>) {
        self.health.lock().unwrap().push_back(outcome);
    }

    pub fn push_analysis(&self, outcome: Result<AnalysisResult, ServiceError>) {
        self.analyses.lock().unwrap().push_back(outcome);
    }

    pub fn push_passwords(&self, outcome: Result<Vec<GeneratedCandidate>, ServiceError>) {
        self.passwords.lock().unwrap().push_back(outcome);
    }

    pub fn push_passphrases(&self, outcome: Result<Vec<GeneratedCandidate>, ServiceError>) {
        self.passphrases.lock().unwrap().push_back(outcome);
    }

    /// Number of service calls made so far, all operations included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[allow(dead_code)]
async fn next_or_hang<T>(queue: &Mutex<VecDeque<T>>, calls: &AtomicUsize) -> T {
    calls.fetch_add(1, Ordering::SeqCst);
    let next = queue.lock().unwrap().pop_front();
    match next {
        Some(outcome) => outcome,
        None => std::future::pending().await,
    }
}

impl PasswordService for FakeService {
    async fn probe_health(&self) -> Result<HealthInfo, ServiceError> {
        next_or_hang(&self.health, &self.calls).await
    }

    async fn analyze(&self, _password: &SecretString) -> Result<AnalysisResult, ServiceError> {
        next_or_hang(&self.analyses, &self.calls).await
    }

    async fn generate_passwords(
        &self,
        _params: &GenerationParameters,
    ) -> Result<Vec<GeneratedCandidate>, ServiceError> {
        next_or_hang(&self.passwords, &self.calls).await
    }

    async fn generate_passphrases(
        &self,
        _params: &PassphraseParameters,
    ) -> Result<Vec<GeneratedCandidate>, ServiceError> {
        next_or_hang(&self.passphrases, &self.calls).await
    }
}

#[allow(dead_code)]
pub fn secret(s: &str) -> SecretString {
    SecretString::new(s.to_string().into())
}

#[allow(dead_code)]
pub fn health_info(models_loaded: bool, models: &[&str]) -> HealthInfo {
    HealthInfo {
        status: if models_loaded { "healthy" } else { "degraded" }.to_string(),
        models_loaded,
        available_models: models.iter().map(|m| m.to_string()).collect(),
        breach_database_size: 1_000,
    }
}

/// Analysis fixture with the given predictions and breach flag.
#[allow(dead_code)]
pub fn analysis(predictions: &[(&str, StrengthLabel)], is_breached: bool) -> AnalysisResult {
    AnalysisResult {
        password: secret("P@ssw0rd2024"),
        length: 12,
        predictions: predictions
            .iter()
            .map(|(name, label)| (name.to_string(), *label))
            .collect::<BTreeMap<_, _>>(),
        consensus: StrengthLabel::Weak,
        agreement_percentage: 100.0,
        metrics: EntropyMetrics {
            shannon_entropy: 3.4,
            practical_entropy: 18.0,
        },
        composition: Composition {
            lowercase: 5,
            uppercase: 1,
            digits: 5,
            symbols: 1,
            spaces: 0,
            unique: 10,
        },
        crack_time: CrackTimes {
            online_throttled: "2 months".to_string(),
            online_fast: "1 hour".to_string(),
            offline_gpu: "instant".to_string(),
            offline_super: "instant".to_string(),
        },
        patterns: vec!["year suffix".to_string()],
        dictionary_words: vec!["password".to_string()],
        suggestions: vec!["Avoid common words".to_string()],
        is_breached,
        breach_count: if is_breached { 52_000 } else { 0 },
    }
}

/// Minimal HTTP/1.1 server answering a single request with a canned response.
///
/// Returns the base URL and a handle resolving to the raw request text.
#[allow(dead_code)]
pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub server");
    let addr = listener.local_addr().expect("stub server address");
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept connection");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.expect("read body");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.expect("write response");
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&buf).to_string()
    });

    (format!("http://{}", addr), handle)
}

#[allow(dead_code)]
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
