use lingua_core::{HandoffStore, WordIndexBuilder};
use lingua_types::{BoundingBox, CaptureImage, CaptureSnapshot, DetailRecord, RawFragment};

use super::fakes::*;
use crate::{AnalysisSession, NO_DATA_MESSAGE};

fn snapshot(texts: &[&str]) -> CaptureSnapshot {
    let fragments = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let left = i as i32 * 20;
            RawFragment::new(*text, Some(BoundingBox::new(left, 0, left + 15, 10)))
        })
        .collect();
    CaptureSnapshot::new(
        CaptureImage {
            width: 100,
            height: 10,
            data: vec![0; 4],
        },
        fragments,
    )
}

fn session(script: StreamScript) -> AnalysisSession {
    let llm = FakeLlm::new(script, r#"{"formality": 0.6}"#);
    AnalysisSession::new(orchestrator(
        FakeDictionary::found("door", "/dɔː/"),
        llm,
        settings("m", true),
    ))
}

#[tokio::test]
async fn test_empty_handoff_reports_no_data() {
    let session = session(StreamScript::Live);
    assert!(session.words().borrow().is_loading);

    let loaded = session
        .load(&HandoffStore::new(), &WordIndexBuilder::new())
        .await;

    assert!(!loaded);
    let words = session.words().borrow().clone();
    assert!(!words.is_loading);
    assert!(words.data.is_none());
    assert_eq!(words.error.as_deref(), Some(NO_DATA_MESSAGE));
}

#[tokio::test]
async fn test_load_then_select() {
    let session = session(StreamScript::Live);
    let handoff = HandoffStore::new();
    handoff.set(snapshot(&["Open", "  ", "the", "Door"])).await;

    assert!(session.load(&handoff, &WordIndexBuilder::new()).await);

    let list = session.word_list();
    let ids: Vec<_> = list.iter().map(|w| (w.id, w.text.as_str())).collect();
    assert_eq!(ids, vec![(0, "Open"), (1, "the"), (2, "Door")]);
    assert_eq!(
        session.words().borrow().data.as_ref().unwrap().background.width,
        100
    );

    assert_eq!(session.select_text("door"), Some(2));
    let selected: Vec<_> = session.word_list().iter().map(|w| w.selected).collect();
    assert_eq!(selected, vec![false, false, true]);

    session.select_word(Some(0));
    session.select_word(Some(0));
    let selected: Vec<_> = session.word_list().iter().map(|w| w.selected).collect();
    assert_eq!(selected, vec![true, false, false]);

    session.select_word(None);
    assert!(session.word_list().iter().all(|w| !w.selected));
    assert!(!session.request_analysis());
}

#[tokio::test]
async fn test_request_analysis_uses_current_selection() {
    let session = session(StreamScript::Body(stream_body(&["Дверь"])));
    let handoff = HandoffStore::new();
    handoff.set(snapshot(&["Open", "the", "Door"])).await;
    session.load(&handoff, &WordIndexBuilder::new()).await;

    session.select_text("Door");
    let mut rx = session.details();
    assert!(session.request_analysis());

    let state = wait_for(&mut rx, |s| !s.is_loading).await;
    assert_eq!(state.detail_data.len(), 3);
    assert!(matches!(
        &state.detail_data[0],
        DetailRecord::WordMeaning(meaning) if meaning.word == "door"
    ));
}

#[tokio::test]
async fn test_skip_thinking_restarts_running_job() {
    let llm = FakeLlm::new(StreamScript::Live, r#"{"formality": 0.6}"#);
    let session = AnalysisSession::new(orchestrator(
        FakeDictionary::failing(),
        llm.clone(),
        settings("m", false),
    ));
    let handoff = HandoffStore::new();
    handoff.set(snapshot(&["Open", "the", "Door"])).await;
    session.load(&handoff, &WordIndexBuilder::new()).await;
    session.select_word(Some(1));

    session.request_analysis();
    let _first = llm.writer().await;
    assert!(session.skip_thinking());
    let _second = llm.writer().await;

    let prompts: Vec<_> = llm.requests().into_iter().map(|r| r.prompt).collect();
    assert!(!prompts[0].starts_with("/no_think"));
    assert!(prompts[1].starts_with("/no_think"));

    session.stop_analysis();
    assert!(!session.orchestrator().settings().effective().suppress_reasoning);
}
