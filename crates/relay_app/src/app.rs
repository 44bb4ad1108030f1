use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use relay_core::{update, AppState, AppViewModel, LineKind, Msg};
use relay_logging::relay_info;

use crate::effects::EffectRunner;
use crate::logging::{self, LogDestination};

pub fn run_app() {
    logging::initialize(LogDestination::File);

    let base_url = std::env::args().nth(1);
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(msg_tx.clone(), base_url);
    let quit = Arc::new(AtomicBool::new(false));

    spawn_stdin_loop(msg_tx, quit.clone());
    print_banner();

    let mut state = AppState::new();
    let mut printed = 0;
    while let Ok(msg) = msg_rx.recv() {
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);
        if state.consume_dirty() {
            printed = render(&state.view(), printed);
        }
        if quit.load(Ordering::SeqCst) {
            break;
        }
    }
    relay_info!("session closed");
}

enum Input {
    Core(Msg),
    Quit,
}

fn spawn_stdin_loop(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Input::Quit => break,
                Input::Core(msg) => {
                    if msg_tx.send(msg).is_err() {
                        return;
                    }
                }
            }
        }
        quit.store(true, Ordering::SeqCst);
        // Wake the main loop so it notices the quit flag.
        let _ = msg_tx.send(Msg::NoOp);
    });
}

fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
        return Input::Quit;
    }
    if trimmed.eq_ignore_ascii_case("cancel") {
        return Input::Core(Msg::CancelRequested);
    }
    if let Some(path) = trimmed.strip_prefix("upload ") {
        return Input::Core(Msg::UploadRequested(path.to_string()));
    }
    Input::Core(Msg::ChatSubmitted(trimmed.to_string()))
}

fn print_banner() {
    println!("Video chat relay.");
    println!("  upload <path>   submit an .mp4 (max 100 MB) for processing");
    println!("  <text>          chat about the current video");
    println!("  cancel          stop waiting for the current video");
    println!("  quit            leave");
}

/// Prints transcript lines added since the last render and returns the new
/// high-water mark.
fn render(view: &AppViewModel, printed: usize) -> usize {
    let mut stdout = io::stdout();
    for line in &view.transcript[printed..] {
        let prefix = match line.kind {
            LineKind::User => "you>",
            LineKind::Agent => "agent>",
            LineKind::Notice => "*",
            LineKind::Error => "!",
        };
        let _ = writeln!(stdout, "{prefix} {}", line.text);
    }
    if view.transcript.len() == printed {
        if let Some(status) = &view.status_line {
            let _ = writeln!(stdout, "* status: {status}");
        }
    }
    let _ = stdout.flush();
    view.transcript.len()
}
