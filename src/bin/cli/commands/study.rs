use flashdeck::study::{
    AccessError, LearnedToggle, Outcome, ProgressStore, QueueLoader, SessionState, StudyError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::client::FlashdeckClient;
use crate::output::{self, OutputConfig};

type ToggleResult = (LearnedToggle, Result<(), AccessError>);

fn report_toggle(result: &ToggleResult, config: &OutputConfig) {
    match result {
        (toggle, Ok(())) => output::print_success(
            if toggle.is_learned { "Marked as learned." } else { "Marked as not learned." },
            config,
        ),
        (_, Err(e)) => eprintln!("Error: {}", StudyError::Write(e.clone())),
    }
}

/// Runs an interactive review of a collection on stdin/stdout
///
/// Learned-status writes run in the background; the session only changes
/// once the server acknowledges them.
pub async fn execute(
    client: &FlashdeckClient,
    collection_id: String,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut loader = QueueLoader::new();
    let Some(mut session) = loader.start_session(client, &collection_id, &mut rand::rng()).await else {
        return Ok(());
    };

    match session.state() {
        SessionState::LoadFailed { reason } => return Err(reason.clone().into()),
        SessionState::Empty => {
            output::print_success("No cards left to study in this collection.", config);
            return Ok(());
        }
        _ => {}
    }

    output::print_study_help(config);
    output::print_study_card(&session, config);

    let (tx, mut rx) = mpsc::unbounded_channel::<ToggleResult>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                let outcome = match line.trim() {
                    "f" => session.flip(),
                    "n" => session.next(),
                    "p" => session.previous(),
                    "l" => {
                        if let Some(toggle) = session.begin_toggle() {
                            let client = client.clone();
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let result = client
                                    .write_learned_status(&toggle.collection_id, &toggle.card_id, toggle.is_learned)
                                    .await;
                                let _ = tx.send((toggle, result));
                            });
                        }
                        continue;
                    }
                    "q" => break,
                    "" => continue,
                    other => {
                        eprintln!("Unknown key '{}'", other);
                        output::print_study_help(config);
                        continue;
                    }
                };

                match outcome {
                    Outcome::Completed => {
                        output::print_success("Session complete!", config);
                        break;
                    }
                    Outcome::Continue => output::print_study_card(&session, config),
                    Outcome::Ignored => {}
                }
            }
            Some(result) = rx.recv() => {
                if result.1.is_ok() {
                    session.apply_toggle(&result.0);
                }
                report_toggle(&result, config);
                output::print_study_card(&session, config);
            }
        }
    }

    // Let in-flight writes finish before exiting
    drop(tx);
    while let Some(result) = rx.recv().await {
        report_toggle(&result, config);
    }

    Ok(())
}
