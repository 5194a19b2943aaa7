use lopdf::{Dictionary, Document, Object, Stream};
use pdf_async_runtime::*;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::sync::mpsc;

fn write_test_pdf(dir: &TempDir, name: &str, num_pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(num_pages as i64)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let path = dir.path().join(name);
    doc.save(&path).unwrap();
    path
}

/// Receive updates until one matches, skipping progress and the rest
async fn wait_for<F>(rx: &mut mpsc::UnboundedReceiver<RepageUpdate>, mut pred: F) -> RepageUpdate
where
    F: FnMut(&RepageUpdate) -> bool,
{
    while let Some(update) = rx.recv().await {
        if let RepageUpdate::Error { message } = &update {
            panic!("Worker reported error: {}", message);
        }
        if pred(&update) {
            return update;
        }
    }
    panic!("Worker closed the update channel");
}

fn spawn_worker() -> (
    mpsc::UnboundedSender<RepageCommand>,
    mpsc::UnboundedReceiver<RepageUpdate>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    tokio::spawn(worker_task(command_rx, update_tx));
    (command_tx, update_rx)
}

#[tokio::test]
async fn test_open_edit_and_export() {
    let dir = TempDir::new().unwrap();
    let input = write_test_pdf(&dir, "in.pdf", 5);
    let (tx, mut rx) = spawn_worker();

    tx.send(RepageCommand::Open {
        paths: vec![input],
        cancel: CancelToken::new(),
    })
    .unwrap();
    let loaded = wait_for(&mut rx, |u| matches!(u, RepageUpdate::Loaded { .. })).await;
    assert!(matches!(loaded, RepageUpdate::Loaded { page_count: 5, added: 5 }));

    tx.send(RepageCommand::SelectSingle { position: 0 }).unwrap();
    tx.send(RepageCommand::ExtendRange {
        position: 1,
        additive: false,
    })
    .unwrap();
    tx.send(RepageCommand::MoveSelected { target: 5 }).unwrap();

    let update = wait_for(&mut rx, |u| {
        matches!(u, RepageUpdate::SelectionChanged { positions, .. } if positions == &vec![3, 4])
    })
    .await;
    assert!(matches!(update, RepageUpdate::SelectionChanged { anchor: Some(3), .. }));

    tx.send(RepageCommand::DeleteSelected).unwrap();
    let update = wait_for(&mut rx, |u| matches!(u, RepageUpdate::SequenceChanged { .. })).await;
    match update {
        RepageUpdate::SequenceChanged { pages } => assert_eq!(pages.len(), 3),
        other => panic!("Unexpected update {:?}", other),
    }

    let output = dir.path().join("out.pdf");
    tx.send(RepageCommand::Export {
        path: output.clone(),
        options: SaveOptions::default(),
        cancel: CancelToken::new(),
    })
    .unwrap();
    let update = wait_for(&mut rx, |u| matches!(u, RepageUpdate::Exported { .. })).await;
    assert!(matches!(update, RepageUpdate::Exported { page_count: 3, .. }));
    assert_eq!(Document::load(&output).unwrap().get_pages().len(), 3);
}

#[tokio::test]
async fn test_booklet_replaces_document() {
    let dir = TempDir::new().unwrap();
    let input = write_test_pdf(&dir, "in.pdf", 6);
    let (tx, mut rx) = spawn_worker();

    tx.send(RepageCommand::Open {
        paths: vec![input],
        cancel: CancelToken::new(),
    })
    .unwrap();
    tx.send(RepageCommand::CreateBooklet {
        options: BookletOptions::default(),
        parts_path: None,
        save: SaveOptions::default(),
        cancel: CancelToken::new(),
    })
    .unwrap();

    let update = wait_for(&mut rx, |u| matches!(u, RepageUpdate::BookletCreated { .. })).await;
    match update {
        RepageUpdate::BookletCreated { stats, parts } => {
            assert_eq!(stats.output_sheets, 2);
            assert!(parts.is_empty());
        }
        other => panic!("Unexpected update {:?}", other),
    }
    let update = wait_for(&mut rx, |u| matches!(u, RepageUpdate::SequenceChanged { .. })).await;
    assert!(matches!(update, RepageUpdate::SequenceChanged { pages } if pages.len() == 4));
}

#[tokio::test]
async fn test_cancelled_open_reports_cancelled() {
    let dir = TempDir::new().unwrap();
    let input = write_test_pdf(&dir, "in.pdf", 2);
    let (tx, mut rx) = spawn_worker();

    let cancel = CancelToken::new();
    cancel.cancel();
    tx.send(RepageCommand::Open {
        paths: vec![input],
        cancel,
    })
    .unwrap();

    let update = rx.recv().await.unwrap();
    assert!(matches!(update, RepageUpdate::Cancelled));
}

#[tokio::test]
async fn test_bad_file_reports_error() {
    let dir = TempDir::new().unwrap();
    let (tx, mut rx) = spawn_worker();

    tx.send(RepageCommand::Open {
        paths: vec![dir.path().join("missing.pdf")],
        cancel: CancelToken::new(),
    })
    .unwrap();

    match rx.recv().await.unwrap() {
        RepageUpdate::Error { message } => assert!(message.contains("missing.pdf")),
        other => panic!("Expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stats_requests_coalesce() {
    let dir = TempDir::new().unwrap();
    let input = write_test_pdf(&dir, "in.pdf", 9);
    let (tx, mut rx) = spawn_worker();

    tx.send(RepageCommand::Open {
        paths: vec![input],
        cancel: CancelToken::new(),
    })
    .unwrap();
    wait_for(&mut rx, |u| matches!(u, RepageUpdate::Loaded { .. })).await;

    let split = BookletOptions {
        split: pdf_repage::SplitMode::BySheets(1),
        ..BookletOptions::default()
    };
    tx.send(RepageCommand::CalculateStats {
        options: BookletOptions::default(),
    })
    .unwrap();
    tx.send(RepageCommand::CalculateStats { options: split }).unwrap();

    let update = wait_for(&mut rx, |u| matches!(u, RepageUpdate::StatsCalculated { .. })).await;
    match update {
        RepageUpdate::StatsCalculated { stats } => assert_eq!(stats.signatures, 3),
        other => panic!("Unexpected update {:?}", other),
    }
}
