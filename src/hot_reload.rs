//! Development-mode browser reload. There is no content cache to
//! invalidate (every request re-reads the content root), so the watcher
//! only nudges connected browsers to refresh.

use std::path::PathBuf;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use notify_debouncer_full::{
    new_debouncer, DebouncedEvent,
    notify::{Error as NotifyError, RecursiveMode, Watcher},
};
use tracing::{debug, error, info};

use crate::state::RefreshBroadcaster;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(tx): State<RefreshBroadcaster>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, tx))
}

async fn handle_socket(mut socket: WebSocket, tx: RefreshBroadcaster) {
    let mut rx = tx.subscribe();

    // Wait for a reload signal, then let the socket close.
    if rx.recv().await.is_ok() {
        if socket.send(Message::Text("reload".to_string().into())).await.is_err() {
            debug!("client disconnected before reload message could be sent");
        }
    }
}

pub fn start_content_watcher(tx: RefreshBroadcaster, watch_dirs: Vec<PathBuf>) {
    info!("starting content watcher for hot-reload");
    tokio::spawn(async move {
        let (watcher_tx, mut watcher_rx) = tokio::sync::mpsc::channel(1);

        let mut debouncer = new_debouncer(
            Duration::from_millis(200),
            None,
            move |res: Result<Vec<DebouncedEvent>, Vec<NotifyError>>| match res {
                Ok(events) => {
                    let relevant = events.iter().any(|event| {
                        let kind_ok = event.kind.is_modify()
                            || event.kind.is_create()
                            || event.kind.is_remove();

                        // Skip editor temp files (Emacs: .#*, ~ backups)
                        let temp_file = event.event.paths.iter().any(|path| {
                            path.file_name()
                                .and_then(|name| name.to_str())
                                .map_or(false, |s| s.starts_with(".#") || s.ends_with('~'))
                        });

                        kind_ok && !temp_file
                    });

                    if relevant {
                        if let Err(e) = watcher_tx.blocking_send(()) {
                            error!("failed to send watcher event: {}", e);
                        }
                    }
                }
                Err(errors) => {
                    for e in errors {
                        error!("watcher error: {}", e);
                    }
                }
            },
        )
        .expect("failed to create debouncer");

        for dir in &watch_dirs {
            debouncer
                .watcher()
                .watch(dir, RecursiveMode::Recursive)
                .expect("failed to watch directory");
        }

        while watcher_rx.recv().await.is_some() {
            info!("content change detected, notifying clients");
            if let Err(e) = tx.send(()) {
                debug!("no live-reload clients connected: {}", e);
            }
        }
    });
}
