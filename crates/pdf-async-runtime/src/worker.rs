use crate::{RepageCommand, RepageUpdate};
use pdf_repage::{BookletOptions, LopdfBackend, Progress, RepageError, Session};
use tokio::sync::mpsc;

type WorkSession = Session<LopdfBackend>;

/// Async worker task that owns the editing session and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<RepageCommand>,
    update_tx: mpsc::UnboundedSender<RepageUpdate>,
) {
    let mut session = Session::new(LopdfBackend::new());

    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut session, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: RepageCommand,
    session: &mut WorkSession,
    command_rx: &mut mpsc::UnboundedReceiver<RepageCommand>,
    update_tx: &mpsc::UnboundedSender<RepageUpdate>,
) {
    match cmd {
        RepageCommand::Open { paths, cancel } => {
            let result = run_blocking(session, update_tx, move |s, progress| {
                s.open(&paths, progress, &cancel)
            })
            .await;
            match result {
                Ok(page_count) => {
                    let _ = update_tx.send(RepageUpdate::Loaded {
                        page_count,
                        added: page_count,
                    });
                    send_document(session, update_tx);
                }
                Err(e) => send_error("Failed to open files", e, update_tx),
            }
        }
        RepageCommand::Add { paths, cancel } => {
            let result = run_blocking(session, update_tx, move |s, progress| {
                s.add(&paths, progress, &cancel)
            })
            .await;
            match result {
                Ok(added) => {
                    let _ = update_tx.send(RepageUpdate::Loaded {
                        page_count: session.sequence().len(),
                        added,
                    });
                    send_document(session, update_tx);
                }
                Err(e) => send_error("Failed to add files", e, update_tx),
            }
        }
        RepageCommand::SelectSingle { position } => {
            let result = session.selection_mut().select_single(position);
            selection_result(result, session, update_tx);
        }
        RepageCommand::Toggle { position } => {
            let result = session.selection_mut().toggle(position).map(|_| ());
            selection_result(result, session, update_tx);
        }
        RepageCommand::ExtendRange { position, additive } => {
            let result = session.selection_mut().extend_range(position, additive);
            selection_result(result, session, update_tx);
        }
        RepageCommand::SelectAll => {
            session.select_all();
            send_selection(session, update_tx);
        }
        RepageCommand::ClearSelection => {
            session.selection_mut().clear();
            send_selection(session, update_tx);
        }
        RepageCommand::DeleteSelected => {
            let result = session.delete_selected().map(|_| ());
            edit_result("Failed to delete pages", result, session, update_tx);
        }
        RepageCommand::RotateSelected { delta } => {
            let result = session.rotate_selected(delta);
            edit_result("Failed to rotate pages", result, session, update_tx);
        }
        RepageCommand::NudgeSelected { direction } => {
            let result = session.nudge_selected(direction).map(|_| ());
            edit_result("Failed to move pages", result, session, update_tx);
        }
        RepageCommand::MoveSelected { target } => {
            let result = session.move_selected_to(target).map(|_| ());
            edit_result("Failed to move pages", result, session, update_tx);
        }
        RepageCommand::CreateBooklet {
            options,
            parts_path,
            save,
            cancel,
        } => {
            let result = run_blocking(session, update_tx, move |s, progress| {
                s.create_booklet(&options, parts_path.as_deref(), &save, progress, &cancel)
            })
            .await;
            match result {
                Ok(report) => {
                    let _ = update_tx.send(RepageUpdate::BookletCreated {
                        stats: report.statistics,
                        parts: report.parts,
                    });
                    send_document(session, update_tx);
                }
                Err(e) => send_error("Failed to create booklet", e, update_tx),
            }
        }
        RepageCommand::Export {
            path,
            options,
            cancel,
        } => {
            let target = path.clone();
            let result = run_blocking(session, update_tx, move |s, progress| {
                s.export_flat(&target, &options, progress, &cancel)
            })
            .await;
            match result {
                Ok(page_count) => {
                    let _ = update_tx.send(RepageUpdate::Exported { path, page_count });
                }
                Err(e) => send_error("Failed to export PDF", e, update_tx),
            }
        }
        RepageCommand::CalculateStats { mut options } => {
            // Drain any queued stats requests, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let RepageCommand::CalculateStats {
                    options: new_options,
                } = next_cmd
                {
                    log::debug!("Discarding queued statistics request, using newer request");
                    options = new_options;
                } else {
                    // Since we can't put it back, process it now before the stats
                    Box::pin(process_command(next_cmd, session, command_rx, update_tx)).await;
                }
            }
            handle_calculate_stats(session, options, update_tx);
        }
        RepageCommand::LoadConfig { path } => match BookletOptions::load(&path).await {
            Ok(options) => {
                let _ = update_tx.send(RepageUpdate::ConfigLoaded { options });
            }
            Err(e) => send_error("Failed to load config", e, update_tx),
        },
    }
}

/// Run a session job on the blocking pool, handing the session in and
/// back out again. Progress is forwarded as it happens.
async fn run_blocking<T, F>(
    session: &mut WorkSession,
    update_tx: &mpsc::UnboundedSender<RepageUpdate>,
    job: F,
) -> pdf_repage::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut WorkSession, &mut dyn FnMut(Progress)) -> pdf_repage::Result<T>
        + Send
        + 'static,
{
    let mut owned = std::mem::replace(session, Session::new(LopdfBackend::new()));
    let progress_tx = update_tx.clone();

    let handle = tokio::task::spawn_blocking(move || {
        let mut forward = |p: Progress| {
            let _ = progress_tx.send(RepageUpdate::Progress {
                operation: p.operation,
                current: p.current,
                total: p.total,
            });
        };
        let result = job(&mut owned, &mut forward);
        (owned, result)
    });

    match handle.await {
        Ok((owned, result)) => {
            *session = owned;
            result
        }
        Err(e) => {
            log::error!("Session task failed, starting with an empty document: {}", e);
            send_document(session, update_tx);
            Err(e.into())
        }
    }
}

fn handle_calculate_stats(
    session: &WorkSession,
    options: BookletOptions,
    update_tx: &mpsc::UnboundedSender<RepageUpdate>,
) {
    match session.statistics(&options) {
        Ok(stats) => {
            let _ = update_tx.send(RepageUpdate::StatsCalculated { stats });
        }
        Err(e) => send_error("Failed to calculate statistics", e, update_tx),
    }
}

fn selection_result(
    result: pdf_repage::Result<()>,
    session: &WorkSession,
    update_tx: &mpsc::UnboundedSender<RepageUpdate>,
) {
    match result {
        Ok(()) => send_selection(session, update_tx),
        Err(e) => send_error("Invalid selection", e, update_tx),
    }
}

fn edit_result(
    context: &str,
    result: pdf_repage::Result<()>,
    session: &WorkSession,
    update_tx: &mpsc::UnboundedSender<RepageUpdate>,
) {
    match result {
        Ok(()) => send_document(session, update_tx),
        Err(e) => send_error(context, e, update_tx),
    }
}

fn send_document(session: &WorkSession, update_tx: &mpsc::UnboundedSender<RepageUpdate>) {
    let _ = update_tx.send(RepageUpdate::SequenceChanged {
        pages: session.sequence().snapshot(),
    });
    send_selection(session, update_tx);
}

fn send_selection(session: &WorkSession, update_tx: &mpsc::UnboundedSender<RepageUpdate>) {
    let selection = session.selection();
    let _ = update_tx.send(RepageUpdate::SelectionChanged {
        positions: selection.positions().iter().copied().collect(),
        anchor: selection.anchor(),
    });
}

fn send_error(context: &str, error: RepageError, update_tx: &mpsc::UnboundedSender<RepageUpdate>) {
    if matches!(error, RepageError::Cancelled) {
        log::info!("{}: cancelled", context);
        let _ = update_tx.send(RepageUpdate::Cancelled);
        return;
    }
    log::error!("{}: {}", context, error);
    let _ = update_tx.send(RepageUpdate::Error {
        message: format!("{}: {}", context, error),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicked_job_resets_to_empty_document() {
        let (update_tx, mut update_rx) = mpsc::unbounded_channel();
        let mut session = Session::new(LopdfBackend::new());

        let result: pdf_repage::Result<()> =
            run_blocking(&mut session, &update_tx, |_, _| panic!("renderer crashed")).await;

        assert!(matches!(result, Err(RepageError::TaskJoin(_))));
        assert!(session.sequence().is_empty());

        match update_rx.try_recv().unwrap() {
            RepageUpdate::SequenceChanged { pages } => assert!(pages.is_empty()),
            other => panic!("Expected sequence update, got {:?}", other),
        }
        match update_rx.try_recv().unwrap() {
            RepageUpdate::SelectionChanged { positions, anchor } => {
                assert!(positions.is_empty());
                assert_eq!(anchor, None);
            }
            other => panic!("Expected selection update, got {:?}", other),
        }
    }
}
