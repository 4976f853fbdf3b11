use kanal::AsyncSender;
use lingua_analysis::{AnalysisSession, DetailsState, WordsState};
use lingua_types::{AppEvent, DetailRecord};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

pub const HELP: &str = "\
commands:
  words                 list captured words
  <id> | select <id>    select a word by id
  pick <text>           select the first word matching text
  clear                 clear the selection
  analyze               analyze the selected word
  stop                  stop the running analysis
  skip                  restart without reasoning
  model <name>          save the model name
  endpoint <host:port>  save the LLM address
  reasoning on|off      save whether the model may reason
  quit";

/// Map one line of user input to an event
pub fn parse_command(line: &str) -> Result<AppEvent, String> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    let event = match command {
        "words" | "ls" => AppEvent::ShowWords,
        "select" if arg.is_empty() => AppEvent::SelectWord(None),
        "select" => AppEvent::SelectWord(Some(parse_id(arg)?)),
        "clear" => AppEvent::SelectWord(None),
        "pick" if !arg.is_empty() => AppEvent::SelectText(arg.to_string()),
        "analyze" | "go" => AppEvent::RequestAnalysis,
        "stop" => AppEvent::StopAnalysis,
        "skip" => AppEvent::SkipThinking,
        "model" if !arg.is_empty() => AppEvent::SaveModelName(arg.to_string()),
        "endpoint" if !arg.is_empty() => AppEvent::SaveEndpointAddress(arg.to_string()),
        "reasoning" => match arg {
            "on" => AppEvent::SaveSuppressReasoning(false),
            "off" => AppEvent::SaveSuppressReasoning(true),
            _ => return Err("usage: reasoning on|off".into()),
        },
        "quit" | "exit" => AppEvent::Shutdown,
        _ if arg.is_empty() && command.chars().all(|c| c.is_ascii_digit()) && !command.is_empty() => {
            AppEvent::SelectWord(Some(parse_id(command)?))
        }
        _ => return Err(format!("unknown command '{line}', try 'help'")),
    };

    Ok(event)
}

fn parse_id(arg: &str) -> Result<u32, String> {
    arg.parse().map_err(|_| format!("'{arg}' is not a word id"))
}

/// Read commands from stdin until EOF, `quit` or cancellation
pub async fn input_loop(tx: AsyncSender<AppEvent>, cancel: CancellationToken) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let interactive = atty::is(atty::Stream::Stdin);

    loop {
        if interactive {
            print_out("> ").await;
        }

        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            tracing::debug!("[INPUT] stdin closed");
            tx.send(AppEvent::Shutdown).await?;
            break;
        };

        if line.trim().is_empty() {
            continue;
        }
        if line.trim() == "help" {
            print_out(&format!("{HELP}\n")).await;
            continue;
        }

        match parse_command(&line) {
            Ok(event) => {
                let shutdown = event == AppEvent::Shutdown;
                tx.send(event).await?;
                if shutdown {
                    break;
                }
            }
            Err(message) => print_out(&format!("{message}\n")).await,
        }
    }

    Ok(())
}

/// Print analysis progress as it streams in
pub async fn render_loop(session: AnalysisSession, cancel: CancellationToken) -> anyhow::Result<()> {
    let mut details = session.details();
    let mut printer = DetailPrinter::default();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = details.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let text = printer.render(&details.borrow_and_update());
        if !text.is_empty() {
            print_out(&text).await;
        }
    }

    Ok(())
}

pub async fn print_out(text: &str) {
    let mut stdout = tokio::io::stdout();
    if let Err(e) = stdout.write_all(text.as_bytes()).await {
        tracing::warn!("[OUTPUT] stdout write failed: {}", e);
        return;
    }
    let _ = stdout.flush().await;
}

pub fn render_words(state: &WordsState) -> String {
    if let Some(error) = &state.error {
        return format!("error: {error}\n");
    }
    let Some(container) = &state.data else {
        return if state.is_loading {
            "loading words...\n".into()
        } else {
            "no words\n".into()
        };
    };
    if container.words.is_empty() {
        return "no words recognized\n".into();
    }

    container
        .words
        .iter()
        .map(|word| {
            let marker = if word.selected { '*' } else { ' ' };
            format!("{marker}{:>3}  {}\n", word.id, word.text)
        })
        .collect()
}

/// Turns successive DetailsState snapshots into the text that is new since the last one
#[derive(Debug, Default)]
pub struct DetailPrinter {
    generation: u64,
    records: usize,
    thinking_len: usize,
    answer_len: usize,
    was_loading: bool,
}

impl DetailPrinter {
    pub fn render(&mut self, state: &DetailsState) -> String {
        let mut out = String::new();

        if state.generation != self.generation {
            *self = Self {
                generation: state.generation,
                ..Self::default()
            };
        }

        for (index, record) in state.detail_data.iter().enumerate() {
            let is_new = index >= self.records;
            match record {
                DetailRecord::WordMeaning(meaning) if is_new => {
                    match &meaning.phonetic {
                        Some(phonetic) => out.push_str(&format!("== {} {}\n", meaning.word, phonetic)),
                        None => out.push_str(&format!("== {}\n", meaning.word)),
                    }
                }
                DetailRecord::Explanation(explanation) => {
                    if let Some(delta) = explanation.thinking_text.get(self.thinking_len..) {
                        out.push_str(delta);
                        self.thinking_len = explanation.thinking_text.len();
                    }
                    if let Some(delta) = explanation.answer_text.get(self.answer_len..) {
                        out.push_str(delta);
                        self.answer_len = explanation.answer_text.len();
                    }
                }
                DetailRecord::Formality(formality) if is_new => {
                    out.push_str(&format!("\nformality: {:.2}\n", formality.score));
                }
                _ => {}
            }
        }
        self.records = state.detail_data.len();

        if let Some(error) = state.error.as_ref().filter(|_| self.was_loading) {
            out.push_str(&format!("\nerror: {error}\n"));
        }
        if self.was_loading && !state.is_loading && state.error.is_none() {
            out.push_str("\n--\n");
        }
        self.was_loading = state.is_loading;

        out
    }
}
