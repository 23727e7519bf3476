use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use gallery_core::{CatalogSource, fetch_ahead, fetch_page_or_empty};

use crate::tui_event::{BackendCommand, BackendEvent};

/// Serve backend commands until the command channel closes or `shutdown`
/// fires.
///
/// Page loads run as separate tasks so commands keep flowing while a page is
/// in flight. Starting a page load cancels the previous one; the app also
/// tags every load with a generation and ignores results that are not the
/// latest, so a slow page can never overwrite a newer one.
pub async fn run(
    source: Arc<dyn CatalogSource>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    shutdown: CancellationToken,
) {
    let mut page_cancel = shutdown.child_token();
    let mut bulk_cancel = shutdown.child_token();

    loop {
        let cmd = tokio::select! {
            _ = shutdown.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        match cmd {
            BackendCommand::LoadPage { page, generation } => {
                page_cancel.cancel();
                page_cancel = shutdown.child_token();

                let token = page_cancel.clone();
                let source = Arc::clone(&source);
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            tracing::debug!(page, generation, "page load superseded");
                        }
                        loaded = fetch_page_or_empty(source.as_ref(), page) => {
                            let _ = tx.send(BackendEvent::PageLoaded { generation, page: loaded });
                        }
                    }
                });
            }
            BackendCommand::BulkSelect { count, known } => {
                bulk_cancel.cancel();
                bulk_cancel = shutdown.child_token();

                let token = bulk_cancel.clone();
                let source = Arc::clone(&source);
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    let outcome = fetch_ahead(source.as_ref(), count, &known, &token).await;
                    let _ = tx.send(BackendEvent::BulkSelected { count, outcome });
                });
            }
            BackendCommand::CancelBulk => {
                bulk_cancel.cancel();
            }
        }
    }

    page_cancel.cancel();
    bulk_cancel.cancel();
}
