use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use practice_tutor::config::Config;
use practice_tutor::core::{ChannelEventSink, EventSink};
use practice_tutor::logging;
use practice_tutor::services::{ProgressTracker, WordLists};
use practice_tutor::tutor::{AnswerEvent, AnswerKind, Mode, Question, TutorConfig, TutorEngine};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config);

    let tutor_config = match config.tutor_config_path.as_deref() {
        Some(path) => TutorConfig::from_json_file(path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, path = %path.display(), "tutor config not loaded, using env");
            TutorConfig::from_env()
        }),
        None => TutorConfig::from_env(),
    };

    let lists = match config.lists_path.as_deref() {
        Some(path) => WordLists::load(path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, path = %path.display(), "word lists not loaded, using defaults");
            WordLists::default()
        }),
        None => WordLists::default(),
    };

    let history = config
        .history_path
        .as_deref()
        .map(load_history)
        .unwrap_or_default();

    let tracker = Arc::new(ProgressTracker::from_history(&history));
    let (sink, mut receiver) = ChannelEventSink::with_default_capacity();
    let drain_tracker = Arc::clone(&tracker);
    let drain = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            tracing::debug!(item_id = %event.item_id, correct = event.correct, "answer event drained");
            if let Err(err) = drain_tracker.record(event) {
                tracing::warn!(error = %err, "progress update failed");
            }
        }
    });

    let catalog = Arc::new(lists);
    let sink = Arc::new(sink);
    let engine = match config.seed {
        Some(seed) => TutorEngine::with_seed(tutor_config, catalog, sink, seed),
        None => TutorEngine::new(tutor_config, catalog, sink),
    };
    let engine = match engine {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Tutor config rejected: {err}");
            return;
        }
    };

    let plan = engine.compute_recommendation(config.mode, &history);
    println!("{}", plan.mission_text());
    if !plan.rationale.is_empty() {
        println!("Why: {}", plan.rationale);
    }

    let start = match engine.start_session(plan) {
        Ok(start) => start,
        Err(err) => {
            eprintln!("No tasks ready: {err}");
            return;
        }
    };

    let handle = start.session_handle;
    let total = start.total_questions;
    let mut question = start.first_question;
    let mut position = 0usize;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_question(&question, position, total);
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                engine.abandon(handle);
                break;
            }
            Err(err) => {
                tracing::error!(error = %err, "stdin read failed");
                engine.abandon(handle);
                break;
            }
        };

        let answer = resolve_answer(&question, line.trim());
        if answer.is_empty() {
            continue;
        }

        match engine.submit_answer_at(handle, position, &answer) {
            Ok(outcome) => {
                if outcome.correct {
                    println!("Correct!");
                } else {
                    println!("Not this time. The answer is: {}", outcome.solution_text);
                }
                if let Some(summary) = outcome.summary {
                    println!(
                        "Great job! You earned {} XP. Correct {}/{}.",
                        summary.xp_gained, summary.total_correct, summary.total
                    );
                    break;
                }
                match outcome.next_question {
                    Some(next) => {
                        question = next;
                        position += 1;
                    }
                    None => break,
                }
            }
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        }
    }

    drop(engine);
    if let Err(err) = drain.await {
        tracing::error!(error = %err, "event drain task failed");
    }

    let progress = tracker.snapshot();
    for mode in Mode::ALL {
        let stats = progress.mode(mode);
        println!(
            "{}: {:.0}% ({:?}), streak {}",
            mode.display_name(),
            stats.mastery() * 100.0,
            stats.mastery_band(),
            stats.streak
        );
    }
}

fn load_history(path: &Path) -> Vec<AnswerEvent> {
    let parsed = std::fs::read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|raw| serde_json::from_str::<Vec<AnswerEvent>>(&raw).map_err(|err| err.to_string()));
    match parsed {
        Ok(events) => events,
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "answer history not loaded");
            Vec::new()
        }
    }
}

fn print_question(question: &Question, position: usize, total: usize) {
    println!();
    println!("[{} / {}] {}", position + 1, total, question.prompt_text);
    if question.answer_kind == AnswerKind::MultipleChoice {
        for (idx, option) in question.options.iter().enumerate() {
            println!("  {}) {}", idx + 1, option);
        }
    }
}

/// An exact option wins; otherwise a 1-based option number picks that option.
fn resolve_answer(question: &Question, input: &str) -> String {
    if question.answer_kind == AnswerKind::FreeText || question.options.iter().any(|o| o == input) {
        return input.to_string();
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| question.options.get(idx))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}
