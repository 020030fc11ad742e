// SPDX-License-Identifier: PMPL-1.0-or-later

//! Scripted detection runs, config files and exported reports

use embed_shell::config::AppConfig;
use embed_shell::i18n::{Catalog, Lang};
use embed_shell::report;
use embed_shell::simulate::{self, SimulationConfig};
use embed_shell::template::localize_html;
use embed_shell::types::{EmbedState, FailureReason, FrameRect, ScriptedSignal, SignalKind};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn load_at(at_ms: u64) -> ScriptedSignal {
    ScriptedSignal {
        kind: SignalKind::Load,
        at_ms,
    }
}

fn error_at(at_ms: u64) -> ScriptedSignal {
    ScriptedSignal {
        kind: SignalKind::Error,
        at_ms,
    }
}

fn scenario(signals: Vec<ScriptedSignal>, frame: Option<FrameRect>) -> SimulationConfig {
    SimulationConfig {
        config_path: None,
        locales_dir: None,
        lang: Lang::En,
        signals,
        frame,
        until: None,
        realtime: false,
    }
}

fn visible() -> Option<FrameRect> {
    Some(FrameRect::new(1280.0, 720.0))
}

#[test]
fn test_zero_size_frame_is_reported_blocked() {
    let session = simulate::run(&scenario(vec![], Some(FrameRect::new(0.0, 0.0))))
        .expect("simulation should run");

    assert_eq!(session.final_state, EmbedState::Failed);
    assert_eq!(session.failure, Some(FailureReason::LoadBlocked));
    assert_eq!(session.transitions.len(), 1);
    assert_eq!(session.transitions[0].at_ms, 2000);
}

#[test]
fn test_missing_frame_box_is_reported_blocked() {
    let session = simulate::run(&scenario(vec![], None)).expect("simulation should run");
    assert_eq!(session.failure, Some(FailureReason::LoadBlocked));
}

#[test]
fn test_early_load_beats_the_blocking_heuristic() {
    // settles at 1800, before the size check at 2000
    let session = simulate::run(&scenario(vec![load_at(300)], Some(FrameRect::new(0.0, 0.0))))
        .expect("simulation should run");

    assert_eq!(session.final_state, EmbedState::Connected);
    assert_eq!(session.failure, None);
    assert_eq!(session.transitions[0].at_ms, 1800);
    assert_eq!(session.status_text, "Connected");
}

#[test]
fn test_late_load_on_collapsed_frame_still_fails() {
    let session = simulate::run(&scenario(vec![load_at(1000)], Some(FrameRect::new(0.0, 0.0))))
        .expect("simulation should run");

    assert_eq!(session.final_state, EmbedState::Failed);
    assert_eq!(session.transitions.len(), 1);
    assert_eq!(session.transitions[0].at_ms, 2000);
}

#[test]
fn test_error_wins_over_a_later_load() {
    let session = simulate::run(&scenario(vec![load_at(400), error_at(300)], visible()))
        .expect("simulation should run");

    assert_eq!(session.final_state, EmbedState::Failed);
    assert_eq!(session.failure, Some(FailureReason::LoadBlocked));
    assert_eq!(session.transitions.len(), 1);
    assert_eq!(session.transitions[0].at_ms, 300);
    assert_eq!(session.status_text, "Connection failed");
    // signals come back in time order
    assert_eq!(session.signals[0].kind, SignalKind::Error);
}

#[test]
fn test_until_leaves_pending_settle_unfired() {
    let mut config = scenario(vec![load_at(100)], visible());
    config.until = Some(Duration::from_millis(1000));

    let session = simulate::run(&config).expect("simulation should run");
    assert_eq!(session.final_state, EmbedState::Connecting);
    assert_eq!(session.elapsed_ms, 1000);
    assert!(session.transitions.is_empty());
}

#[test]
fn test_chinese_run_uses_chinese_endpoints_and_labels() {
    let mut config = scenario(vec![load_at(0)], visible());
    config.lang = Lang::Zh;

    let session = simulate::run(&config).expect("simulation should run");
    assert_eq!(session.final_state, EmbedState::Connected);
    assert_eq!(session.status_text, "已连接");
    assert!(session.endpoints.embed_url.ends_with("lang=zh"));
}

#[test]
fn test_yaml_config_changes_timings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.yaml");
    fs::write(
        &path,
        "streamlit:\n  url: http://localhost:8501/\n  embedUrl: http://localhost:8501/?embed=true\n  loadTimeout: 3000\n  detectionTimeout: 1000\n",
    )
    .unwrap();

    let config = AppConfig::load(&path).expect("yaml config should load");
    assert_eq!(config.streamlit.load_timeout, 3000);
    assert_eq!(config.streamlit.settle_delay, 1500);

    let mut run = scenario(vec![], visible());
    run.config_path = Some(path);
    let session = simulate::run(&run).expect("simulation should run");
    assert_eq!(session.failure, Some(FailureReason::LoadTimedOut));
    assert_eq!(session.transitions[0].at_ms, 3000);
    assert_eq!(session.endpoints.load_timeout_ms, 3000);
}

#[test]
fn test_inconsistent_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.json");
    fs::write(
        &path,
        r#"{"streamlit": {"url": "http://localhost/", "embedUrl": "http://localhost/?embed=true", "loadTimeout": 1000, "detectionTimeout": 4000}}"#,
    )
    .unwrap();

    let err = AppConfig::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("detectionTimeout"));
}

#[test]
fn test_report_exports_follow_extension() {
    let dir = TempDir::new().unwrap();
    let session = simulate::run(&scenario(vec![error_at(50)], visible())).unwrap();

    let json_path = dir.path().join("session.json");
    report::save_report(&session, &json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["final_state"], "failed");
    assert_eq!(value["failure"], "load_blocked");
    assert_eq!(value["transitions"][0]["at_ms"], 50);

    let text_path = dir.path().join("session.txt");
    report::save_report(&session, &text_path).unwrap();
    let text = fs::read_to_string(&text_path).unwrap();
    assert!(text.contains("signal error@50ms"));
    assert!(text.contains("final: failed"));
}

#[test]
fn test_template_localises_both_languages() {
    let template = r#"<!DOCTYPE html>
<html lang="en">
<head><title>placeholder</title></head>
<body>
  <span data-i18n="status.connecting">Connecting...</span>
  <input type="text" data-i18n="search.placeholder" placeholder="x">
  <p data-i18n-html="info.body">old</p>
</body>
</html>"#;
    let catalog = Catalog::builtin().unwrap();

    let zh = localize_html(template, &catalog, Lang::Zh).unwrap();
    assert!(zh.contains(r#"<html lang="zh">"#));
    assert!(zh.contains("<title>CBDB 智能检索问答</title>"));
    assert!(zh.contains(">连接中...</span>"));

    let en = localize_html(template, &catalog, Lang::En).unwrap();
    assert!(en.contains(r#"placeholder="Search the database...""#));
    assert!(en.contains("<strong>China Biographical Database</strong>"));
}

#[test]
fn test_edited_locale_tables_replace_the_builtin_ones() {
    let dir = TempDir::new().unwrap();
    let builtin = Catalog::builtin().unwrap();
    for lang in Lang::all() {
        let mut table = builtin.table(*lang).clone();
        table["status"]["connected"] = serde_json::json!(format!("{} up", lang));
        table["config"]["embedUrl"] =
            serde_json::json!(format!("https://mirror.example/{}?embed=true", lang));
        fs::write(
            dir.path().join(format!("{}.json", lang.code())),
            serde_json::to_string(&table).unwrap(),
        )
        .unwrap();
    }

    let catalog = Catalog::load_or_builtin(Some(dir.path())).unwrap();
    assert_eq!(catalog.t(Lang::Zh, "status.connected"), "zh up");
    assert_eq!(catalog.t(Lang::En, "app.title"), "CBDB Agentic RAG Chat");

    let mut run = scenario(vec![load_at(0)], visible());
    run.locales_dir = Some(dir.path().to_path_buf());
    let session = simulate::run(&run).expect("simulation should run");
    assert_eq!(session.status_text, "en up");
    assert_eq!(session.endpoints.embed_url, "https://mirror.example/en?embed=true");
}
