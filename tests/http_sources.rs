use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use wellscan::analysis::Analyzer;
use wellscan::config::{Config, HttpMethod, SourceEndpoint};
use wellscan::inference::{create_client, HttpSource, Reading, ScoreSource, SourceError};
use wellscan::scoring::{Category, WeightMap};

/// Canned HTTP responder. Records the request line of every request it sees.
struct MockService {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    async fn start(status: u16, body: &'static str, delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let seen = seen.clone();
                tokio::spawn(async move {
                    serve_one(stream, status, body, delay, seen).await;
                });
            }
        });

        Self { port, requests }
    }

    fn endpoint(&self, path: &str, method: HttpMethod) -> SourceEndpoint {
        SourceEndpoint {
            port: self.port,
            path: path.to_string(),
            method,
        }
    }

    fn request_lines(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }
}

async fn serve_one(
    mut stream: TcpStream,
    status: u16,
    body: &'static str,
    delay: Duration,
    seen: Arc<Mutex<Vec<String>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    // Read headers, then as much body as Content-Length announces
    let header_end = loop {
        let Ok(n) = stream.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    if let Some(request_line) = head.lines().next() {
        seen.lock().expect("lock").push(request_line.to_string());
    }

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Port that nothing listens on
fn closed_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("reserve port");
    listener.local_addr().expect("local addr").port()
}

fn source(category: Category, endpoint: &SourceEndpoint) -> HttpSource {
    retrying_source(category, endpoint, 0)
}

fn retrying_source(category: Category, endpoint: &SourceEndpoint, retries: u32) -> HttpSource {
    let client = create_client(&Config::default()).expect("client");
    HttpSource::new(client, category, "http://127.0.0.1", endpoint, retries)
}

#[tokio::test]
async fn live_analysis_posts_and_reads_score() {
    let mock = MockService::start(200, r#"{"success": true, "score": 82.5}"#, Duration::ZERO).await;
    let src = source(Category::Skin, &mock.endpoint("/analyze-live", HttpMethod::Post));

    let reading = src.read().await.expect("reading");

    assert_eq!(reading, Reading::Score(82.5));
    assert_eq!(mock.request_lines(), vec!["POST /analyze-live HTTP/1.1"]);
}

#[tokio::test]
async fn thermal_ghost_response_is_disabled() {
    let mock = MockService::start(200, r#"{"score": null, "enabled": false}"#, Duration::ZERO).await;
    let src = source(Category::Thermal, &mock.endpoint("/read", HttpMethod::Get));

    let reading = src.read().await.expect("reading");

    assert_eq!(reading, Reading::Disabled);
    assert_eq!(mock.request_lines(), vec!["GET /read HTTP/1.1"]);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let mock = MockService::start(503, r#"{"detail": "camera busy"}"#, Duration::ZERO).await;
    let src = source(Category::Posture, &mock.endpoint("/analyze-live", HttpMethod::Post));

    let err = src.read().await.expect_err("should fail");

    assert!(matches!(err, SourceError::Status { status: 503, .. }));
}

#[tokio::test]
async fn source_reported_failure() {
    let mock = MockService::start(
        200,
        r#"{"success": false, "error": "no face detected"}"#,
        Duration::ZERO,
    )
    .await;
    let src = source(Category::Eyes, &mock.endpoint("/analyze-live", HttpMethod::Post));

    let err = src.read().await.expect_err("should fail");

    assert_eq!(err.to_string(), "source reported failure: no face detected");
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let mock = MockService::start(200, "not json", Duration::ZERO).await;
    let src = source(Category::Skin, &mock.endpoint("/analyze-live", HttpMethod::Post));

    let err = src.read().await.expect_err("should fail");

    assert!(matches!(err, SourceError::InvalidResponse(_)));
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    let endpoint = SourceEndpoint {
        port: closed_port(),
        path: "/analyze-live".to_string(),
        method: HttpMethod::Post,
    };
    let src = source(Category::Skin, &endpoint);

    let err = src.read().await.expect_err("should fail");

    assert!(matches!(err, SourceError::Unreachable { .. }));
}

#[tokio::test]
async fn analyzer_scores_partial_results_end_to_end() {
    let skin = MockService::start(200, r#"{"score": 70}"#, Duration::ZERO).await;
    let posture = MockService::start(500, r#"{"detail": "pose model crashed"}"#, Duration::ZERO).await;
    let eyes = MockService::start(200, r#"{"score": 90}"#, Duration::ZERO).await;
    let thermal = MockService::start(200, r#"{"score": 99}"#, Duration::ZERO).await;

    let mut config = Config::default();
    config.inference.sources.skin = skin.endpoint("/analyze-live", HttpMethod::Post);
    config.inference.sources.posture = posture.endpoint("/analyze-live", HttpMethod::Post);
    config.inference.sources.eyes = eyes.endpoint("/analyze-live", HttpMethod::Post);
    config.inference.sources.thermal = thermal.endpoint("/read", HttpMethod::Get);
    config.inference.timeout = "2s".to_string();

    let client = create_client(&config).expect("client");
    let analyzer = Analyzer::from_config(&config, &client).expect("analyzer");
    let outcome = analyzer.run().await;

    assert_eq!(outcome.overall_score, 77.69);
    assert_eq!(outcome.weights_used, WeightMap::THERMAL_DISABLED);
    assert_eq!(outcome.per_category.skin, Some(70.0));
    assert_eq!(outcome.per_category.eyes, Some(90.0));
    assert!(outcome.per_category.posture.is_none());
    assert!(outcome.per_category.thermal.is_none());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].starts_with("Posture: HTTP error from"));
    // Thermal hardware is disabled, so its service is never contacted
    assert!(thermal.request_lines().is_empty());
}

#[tokio::test]
async fn slow_service_times_out_without_blocking_others() {
    let skin = MockService::start(200, r#"{"score": 80}"#, Duration::from_secs(5)).await;
    let posture = MockService::start(200, r#"{"score": 60}"#, Duration::ZERO).await;
    let eyes = MockService::start(200, r#"{"score": 60}"#, Duration::ZERO).await;

    let mut config = Config::default();
    config.inference.sources.skin = skin.endpoint("/analyze-live", HttpMethod::Post);
    config.inference.sources.posture = posture.endpoint("/analyze-live", HttpMethod::Post);
    config.inference.sources.eyes = eyes.endpoint("/analyze-live", HttpMethod::Post);
    config.inference.timeout = "300ms".to_string();

    let client = create_client(&config).expect("client");
    let analyzer = Analyzer::from_config(&config, &client).expect("analyzer");

    let started = std::time::Instant::now();
    let outcome = analyzer.run().await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(outcome.errors, vec!["Skin: timeout after 300ms"]);
    assert_eq!(outcome.per_category.available_count(), 2);
    assert_eq!(outcome.overall_score, 60.0);
}

#[tokio::test]
async fn error_status_is_not_retried() {
    let mock = MockService::start(503, r#"{"detail": "camera busy"}"#, Duration::ZERO).await;
    let src = retrying_source(Category::Skin, &mock.endpoint("/analyze-live", HttpMethod::Post), 2);

    let err = src.read().await.expect_err("should fail");

    assert!(matches!(err, SourceError::Status { status: 503, .. }));
    assert_eq!(mock.request_lines().len(), 1);
}

#[tokio::test]
async fn reported_failure_is_not_retried() {
    let mock = MockService::start(200, r#"{"success": false}"#, Duration::ZERO).await;
    let src = retrying_source(Category::Eyes, &mock.endpoint("/analyze-live", HttpMethod::Post), 2);

    let err = src.read().await.expect_err("should fail");

    assert!(matches!(err, SourceError::Reported(_)));
    assert_eq!(mock.request_lines().len(), 1);
}

#[tokio::test]
async fn connection_failure_is_retried_with_backoff() {
    let endpoint = SourceEndpoint {
        port: closed_port(),
        path: "/analyze-live".to_string(),
        method: HttpMethod::Post,
    };
    let src = retrying_source(Category::Skin, &endpoint, 2);

    let started = std::time::Instant::now();
    let err = src.read().await.expect_err("should fail");

    // 100ms then 200ms between the three attempts
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(matches!(err, SourceError::Unreachable { .. }));
}

#[tokio::test]
async fn retries_stay_inside_source_timeout() {
    let posture = MockService::start(200, r#"{"score": 60}"#, Duration::ZERO).await;
    let eyes = MockService::start(200, r#"{"score": 60}"#, Duration::ZERO).await;

    let mut config = Config::default();
    config.inference.sources.skin = SourceEndpoint {
        port: closed_port(),
        path: "/analyze-live".to_string(),
        method: HttpMethod::Post,
    };
    config.inference.sources.posture = posture.endpoint("/analyze-live", HttpMethod::Post);
    config.inference.sources.eyes = eyes.endpoint("/analyze-live", HttpMethod::Post);
    config.inference.timeout = "250ms".to_string();
    // 100 + 200 + 400ms of backoff alone exceeds the timeout
    config.inference.retries = 3;

    let client = create_client(&config).expect("client");
    let analyzer = Analyzer::from_config(&config, &client).expect("analyzer");

    let started = std::time::Instant::now();
    let outcome = analyzer.run().await;

    assert!(started.elapsed() < Duration::from_millis(700));
    assert_eq!(outcome.errors, vec!["Skin: timeout after 250ms"]);
    assert_eq!(outcome.overall_score, 60.0);
}
