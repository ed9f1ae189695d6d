//! 监控流程集成测试
//!
//! 使用本地 mockito 服务器驱动真实的 HTTP 探测器和轮次调度器

use endpoint_vitals::config::load_endpoints;
use endpoint_vitals::core::{CycleOutcome, CycleRunner, RunnerState, ShutdownSignal};
use endpoint_vitals::health::HttpProber;
use std::io::Write;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_cycle_against_local_servers() {
    let mut healthy = mockito::Server::new_async().await;
    let mut failing = mockito::Server::new_async().await;

    let healthy_mock = healthy
        .mock("GET", "/")
        .with_status(200)
        .create_async()
        .await;
    let failing_mock = failing
        .mock("POST", "/submit")
        .match_body(r#"{"foo":"bar"}"#)
        .with_status(500)
        .create_async()
        .await;

    let config = write_config(&format!(
        r#"
- name: fetch index page
  url: {}/
- name: fetch submit
  url: {}/submit
  method: POST
  headers:
    content-type: application/json
  body: '{{"foo":"bar"}}'
"#,
        healthy.url(),
        failing.url()
    ));

    let endpoints = load_endpoints(config.path()).await.unwrap();
    let healthy_domain = endpoints[0].domain().to_string();
    let failing_domain = endpoints[1].domain().to_string();
    assert_ne!(healthy_domain, failing_domain);

    let prober = Arc::new(HttpProber::with_defaults().unwrap());
    let mut runner = CycleRunner::new(endpoints, prober, Vec::new());
    let (_tx, mut shutdown) = ShutdownSignal::channel();

    let outcome = runner.run_cycle(&mut shutdown).await.unwrap();
    assert_eq!(outcome, CycleOutcome::Completed);

    healthy_mock.assert_async().await;
    failing_mock.assert_async().await;

    assert_eq!(runner.tracker().percentage(&healthy_domain), 100);
    assert_eq!(runner.tracker().percentage(&failing_domain), 0);

    let text = String::from_utf8(runner.output().clone()).unwrap();
    assert!(text.contains(&format!(
        "{healthy_domain} has 100% availability percentage"
    )));
    assert!(text.contains(&format!("{failing_domain} has 0% availability percentage")));
    assert!(text.contains("index page has HTTP response code 200"));
    assert!(text.contains("submit has HTTP response code 500"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_recorded_as_down() {
    let config = write_config("- name: fetch nowhere\n  url: http://127.0.0.1:1/\n");
    let endpoints = load_endpoints(config.path()).await.unwrap();

    let prober =
        Arc::new(HttpProber::new(Duration::from_secs(2), Duration::from_millis(500)).unwrap());
    let mut runner = CycleRunner::new(endpoints, prober, Vec::new());
    let (_tx, mut shutdown) = ShutdownSignal::channel();

    runner.run_cycle(&mut shutdown).await.unwrap();

    let stats = runner.tracker().stats("127.0.0.1:1").unwrap();
    assert_eq!((stats.up, stats.total), (0, 1));

    let text = String::from_utf8(runner.output().clone()).unwrap();
    assert!(text.contains("Endpoint with name 127.0.0.1:1 nowhere has HTTP response code N/A"));
    assert!(text.contains("=> DOWN"));
}

#[tokio::test]
async fn test_interrupt_stops_run_loop() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .expect_at_least(1)
        .create_async()
        .await;

    let config = write_config(&format!("- name: fetch index page\n  url: {}/\n", server.url()));
    let endpoints = load_endpoints(config.path()).await.unwrap();

    let prober = Arc::new(HttpProber::with_defaults().unwrap());
    let mut runner = CycleRunner::new(endpoints, prober, Vec::new());
    let (tx, shutdown) = ShutdownSignal::channel();

    let stopper = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        tx.send(()).unwrap();
    };
    let (state, ()) = tokio::join!(
        tokio::time::timeout(Duration::from_secs(10), runner.run(shutdown)),
        stopper
    );

    let state = tokio_test::assert_ok!(state);
    assert_eq!(state.unwrap(), RunnerState::Terminated);

    assert_eq!(runner.cycle(), 1);
    let text = String::from_utf8(runner.output().clone()).unwrap();
    assert!(text.ends_with("Exit\n"));
}

#[test]
fn test_missing_config_exits_with_failure() {
    let output = Command::new(env!("CARGO_BIN_EXE_endpoint-vitals"))
        .arg("/nonexistent/endpoint-vitals/config.yaml")
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Test cycle"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config.yaml"));
}

#[test]
fn test_malformed_config_exits_with_failure() {
    let config = write_config("- name: [unterminated\n");

    let output = Command::new(env!("CARGO_BIN_EXE_endpoint-vitals"))
        .arg(config.path())
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Test cycle"));
}

#[cfg(unix)]
#[test]
fn test_sigint_exits_cleanly() {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use std::io::{BufRead, BufReader};
    use std::process::Stdio;

    let config = write_config("- name: fetch nowhere\n  url: http://127.0.0.1:1/\n");
    let mut child = Command::new(env!("CARGO_BIN_EXE_endpoint-vitals"))
        .arg(config.path())
        .env("RUST_LOG", "off")
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let mut lines = BufReader::new(stdout).lines();
    let mut seen = Vec::new();

    // 第一轮汇总输出时信号处理已注册
    for line in lines.by_ref() {
        let line = line.unwrap();
        let summary = line.contains("availability percentage");
        seen.push(line);
        if summary {
            break;
        }
    }

    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();

    seen.extend(lines.map(|line| line.unwrap()));
    let status = child.wait().unwrap();

    assert_eq!(status.code(), Some(0));
    assert!(seen.iter().any(|line| line == "Test cycle #1 ends."));
    assert_eq!(seen.last().map(String::as_str), Some("Exit"));
}
