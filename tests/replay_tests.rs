mod common;

use common::*;
use fanrelay::app::config::RelayConfig;
use fanrelay::cli::replay::{ReplayOutput, replay};
use fanrelay::download::messages::OutcomeKind;
use fanrelay::download::service::ConflictAction;
use fanrelay::download::task::{ServiceId, TabId};
use pretty_assertions::assert_eq;
use tokio::io::BufReader;

const SESSION: &str = r#"
# two files from tab 1, the first one requested twice
{"type":"request","tabId":1,"message":{"kind":"send_download","id":"f1","batchNumber":1,"fileUrl":"https://downloads.example.com/f1.png","fileName":"fanbox/f1.png"},"criteria":{"ext":"png","fee":0}}
{"type":"request","tabId":1,"message":{"kind":"send_download","id":"f1","batchNumber":1,"fileUrl":"https://downloads.example.com/f1.png","fileName":"fanbox/f1.png"}}
{"type":"request","tabId":1,"message":{"kind":"send_download","id":"f2","batchNumber":1,"fileUrl":"https://downloads.example.com/f2.psd","fileName":"fanbox/f2.psd"},"criteria":{"ext":"psd","fee":500}}
{"type":"changed","serviceId":1,"filename":"/dl/fanbox/0f8fad5b-d9cb-469f-a165-70867728950e","state":"in_progress"}
{"type":"changed","serviceId":2,"error":"NETWORK_FAILED","state":"interrupted"}
{"type":"changed","serviceId":1,"state":"complete"}
"#;

async fn run_replay(input: &str) -> (Vec<ReplayOutput>, fanrelay::cli::replay::ReplaySummary) {
    let reader = BufReader::new(input.as_bytes());
    replay(reader, &RelayConfig::default(), None).await.unwrap()
}

#[tokio::test]
async fn test_replay_session() {
    init_logging();
    let (outputs, summary) = run_replay(SESSION).await;

    assert_eq!(summary.events, 6);
    assert_eq!(summary.submitted, 2);
    assert_eq!(summary.outcomes, 2);
    assert_eq!(summary.pending, 0);
    assert_eq!(summary.skipped, 0);

    let outcomes: Vec<(TabId, String, OutcomeKind, bool)> = outputs
        .iter()
        .filter_map(|o| match o {
            ReplayOutput::Outcome { tab_id, message } => Some((
                *tab_id,
                message.task.logical_id.clone(),
                message.kind,
                message.task.renamed_to_opaque_id,
            )),
            ReplayOutput::Submit(_) => None,
        })
        .collect();
    assert_eq!(
        outcomes,
        vec![
            (TabId(1), "f2".to_string(), OutcomeKind::DownloadErr, false),
            (TabId(1), "f1".to_string(), OutcomeKind::Downloaded, true),
        ]
    );
}

#[tokio::test]
async fn test_replay_submits_use_relay_options() {
    let config = RelayConfig {
        conflict_action: ConflictAction::Uniquify,
        save_as: true,
        ..RelayConfig::default()
    };
    let reader = BufReader::new(SESSION.as_bytes());
    let (outputs, _) = replay(reader, &config, None).await.unwrap();

    let ReplayOutput::Submit(entry) = &outputs[0] else {
        panic!("expected a submit first, got {:?}", outputs[0]);
    };
    assert_eq!(entry.service_id, ServiceId(1));
    assert_eq!(entry.request.url, "https://downloads.example.com/f1.png");
    assert_eq!(entry.request.filename, "fanbox/f1.png");
    assert_eq!(entry.request.conflict_action, ConflictAction::Uniquify);
    assert!(entry.request.save_as);
}

#[tokio::test]
async fn test_replay_applies_filter_to_criteria() {
    let filter = create_test_filter(|c| c.fee_types.pay = false);
    let reader = BufReader::new(SESSION.as_bytes());
    let (outputs, summary) = replay(reader, &RelayConfig::default(), Some(&filter))
        .await
        .unwrap();

    // f2 is paid and never reaches the relay; its error notification is foreign
    assert_eq!(summary.filtered, 1);
    assert_eq!(summary.events, 5);
    assert_eq!(summary.submitted, 1);
    assert_eq!(summary.outcomes, 1);
    assert!(matches!(
        outputs.last(),
        Some(ReplayOutput::Outcome { message, .. }) if message.kind == OutcomeKind::Downloaded
    ));
}

#[tokio::test]
async fn test_replay_skips_bad_lines_and_reports_pending() {
    let input = r#"
not json at all
{"type":"request","tabId":4,"message":{"kind":"send_download","id":"x","batchNumber":2,"fileUrl":"https://downloads.example.com/x.zip","fileName":"x.zip"}}
{"type":"unknown"}
{"type":"changed","serviceId":1,"state":"interrupted"}
"#;
    let (outputs, summary) = run_replay(input).await;

    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.submitted, 1);
    assert_eq!(summary.outcomes, 0);
    assert_eq!(summary.pending, 1);
    assert_eq!(outputs.len(), 1);
}

#[tokio::test]
async fn test_replay_empty_input() {
    let (outputs, summary) = run_replay("").await;
    assert!(outputs.is_empty());
    assert_eq!(summary, Default::default());
}
