use std::sync::Arc;

use kanal::AsyncReceiver;
use lingua_analysis::JobState;
use lingua_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::io::{print_out, render_words};
use crate::state::AppState;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    input_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = input_rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] Event received: {:?}", event);
        if !handle_event(&state, event).await? {
            tracing::info!("[EVENT_LOOP] Shutdown requested");
            cancel.cancel();
            break;
        }
    }

    state.session.stop_analysis();
    Ok(())
}

/// Apply one event; `false` once the app should exit
pub async fn handle_event(state: &AppState, event: AppEvent) -> anyhow::Result<bool> {
    let session = &state.session;

    match event {
        AppEvent::ShowWords => {
            let text = render_words(&session.words().borrow());
            print_out(&text).await;
        }
        AppEvent::SelectWord(id) => {
            session.select_word(id);
            let text = render_words(&session.words().borrow());
            print_out(&text).await;
        }
        AppEvent::SelectText(text) => match session.select_text(&text) {
            Some(id) => print_out(&format!("selected {id}\n")).await,
            None => print_out(&format!("no word matches '{text}'\n")).await,
        },
        AppEvent::RequestAnalysis => {
            if !session.request_analysis() {
                print_out("nothing to analyze: select a word or stop the running analysis\n")
                    .await;
            }
        }
        AppEvent::StopAnalysis => {
            if session.stop_analysis() == JobState::Cancelled {
                print_out("\nstopped\n").await;
            }
        }
        AppEvent::SkipThinking => {
            if !session.skip_thinking() {
                print_out("nothing to restart: no word selected\n").await;
            }
        }
        AppEvent::SaveModelName(name) => {
            state.settings.save_model_name(name);
            persist(state).await;
        }
        AppEvent::SaveEndpointAddress(address) => {
            state.settings.save_endpoint_address(address);
            persist(state).await;
        }
        AppEvent::SaveSuppressReasoning(suppress) => {
            state.settings.save_suppress_reasoning(suppress);
            persist(state).await;
        }
        AppEvent::Shutdown => return Ok(false),
    }

    Ok(true)
}

async fn persist(state: &AppState) {
    if let Err(e) = state.persist_settings().await {
        tracing::warn!("[PROFILE] Failed to save settings: {:#}", e);
        return;
    }
    let settings = state.settings.base();
    print_out(&format!(
        "saved: model={} endpoint={} suppress_reasoning={}\n",
        settings.model_name, settings.endpoint_address, settings.suppress_reasoning
    ))
    .await;
}
