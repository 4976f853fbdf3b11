use std::sync::Arc;

use lingua_analysis::{DetailsState, WordsState};
use lingua_types::{
    AppEvent, BoundingBox, CaptureImage, DetailRecord, Explanation, Formality, IndexedWord,
    WordMeaning, WordsContainer,
};

use crate::io::{DetailPrinter, parse_command, render_words};

#[test]
fn test_parse_commands() {
    assert_eq!(parse_command("words"), Ok(AppEvent::ShowWords));
    assert_eq!(parse_command("  3 "), Ok(AppEvent::SelectWord(Some(3))));
    assert_eq!(parse_command("select 12"), Ok(AppEvent::SelectWord(Some(12))));
    assert_eq!(parse_command("clear"), Ok(AppEvent::SelectWord(None)));
    assert_eq!(
        parse_command("pick  Door "),
        Ok(AppEvent::SelectText("Door".into()))
    );
    assert_eq!(parse_command("analyze"), Ok(AppEvent::RequestAnalysis));
    assert_eq!(parse_command("stop"), Ok(AppEvent::StopAnalysis));
    assert_eq!(parse_command("skip"), Ok(AppEvent::SkipThinking));
    assert_eq!(
        parse_command("model llama3.1:8b"),
        Ok(AppEvent::SaveModelName("llama3.1:8b".into()))
    );
    assert_eq!(
        parse_command("endpoint 10.0.0.2:11434"),
        Ok(AppEvent::SaveEndpointAddress("10.0.0.2:11434".into()))
    );
    assert_eq!(
        parse_command("reasoning off"),
        Ok(AppEvent::SaveSuppressReasoning(true))
    );
    assert_eq!(parse_command("quit"), Ok(AppEvent::Shutdown));
}

#[test]
fn test_parse_rejects_bad_input() {
    assert!(parse_command("select x").is_err());
    assert!(parse_command("reasoning maybe").is_err());
    assert!(parse_command("pick").is_err());
    assert!(parse_command("dance").is_err());
    assert!(parse_command("-1").is_err());
}

fn word(id: u32, text: &str, selected: bool) -> IndexedWord {
    IndexedWord {
        id,
        text: text.into(),
        bbox: BoundingBox::new(0, 0, 1, 1),
        selected,
    }
}

#[test]
fn test_render_words_marks_selection() {
    let state = WordsState {
        data: Some(WordsContainer {
            background: Arc::new(CaptureImage::default()),
            words: vec![word(0, "open", false), word(1, "door", true)],
        }),
        is_loading: false,
        error: None,
    };
    assert_eq!(render_words(&state), "   0  open\n*  1  door\n");

    let failed = WordsState {
        error: Some("Service provided no data".into()),
        ..WordsState::default()
    };
    assert_eq!(render_words(&failed), "error: Service provided no data\n");
}

fn explanation(thinking: &str, answer: &str) -> DetailRecord {
    DetailRecord::Explanation(Explanation {
        thinking_text: thinking.into(),
        answer_text: answer.into(),
        elapsed_nanos: 0,
        is_thinking: answer.is_empty(),
    })
}

fn job(generation: u64, detail_data: Vec<DetailRecord>) -> DetailsState {
    DetailsState {
        generation,
        detail_data,
        is_loading: true,
        error: None,
    }
}

fn meaning(word: &str) -> DetailRecord {
    DetailRecord::WordMeaning(WordMeaning {
        word: word.into(),
        phonetic: Some("/dɔː/".into()),
    })
}

#[test]
fn test_printer_emits_only_new_text() {
    let mut printer = DetailPrinter::default();

    assert_eq!(printer.render(&job(1, Vec::new())), "");

    let mut state = job(1, vec![meaning("door"), explanation("<think>hm", "")]);
    assert_eq!(printer.render(&state), "== door /dɔː/\n<think>hm");

    state.detail_data[1] = explanation("<think>hm</think>", "Дверь");
    assert_eq!(printer.render(&state), "</think>Дверь");

    state.detail_data.push(DetailRecord::Formality(Formality { score: 0.25 }));
    state.is_loading = false;
    assert_eq!(printer.render(&state), "\nformality: 0.25\n\n--\n");

    // Fresh job resets the printer
    assert_eq!(printer.render(&job(2, Vec::new())), "");
    assert_eq!(printer.render(&job(2, vec![meaning("door")])), "== door /dɔː/\n");
}

#[test]
fn test_printer_resets_when_empty_state_was_skipped() {
    let mut printer = DetailPrinter::default();
    printer.render(&job(1, Vec::new()));
    let mut finished = job(
        1,
        vec![meaning("door"), explanation("", "a long first answer")],
    );
    finished.is_loading = false;
    printer.render(&finished);

    // The next job's first visible state already carries records
    let next = job(2, vec![meaning("door"), explanation("", "short")]);
    assert_eq!(printer.render(&next), "== door /dɔː/\nshort");
}

#[test]
fn test_printer_reports_error_once() {
    let mut printer = DetailPrinter::default();
    printer.render(&job(1, Vec::new()));

    let failed = DetailsState {
        generation: 1,
        detail_data: Vec::new(),
        is_loading: false,
        error: Some("No model name provided".into()),
    };
    assert_eq!(printer.render(&failed), "\nerror: No model name provided\n");
    assert_eq!(printer.render(&failed), "");
}
