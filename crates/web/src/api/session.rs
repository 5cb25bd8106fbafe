//! One WebSocket connection: a viewer of the live session and, at the same
//! time, a source of inbound positions.

use std::{future::ready, time::Duration};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::time::timeout;
use tracking::{
    database::Database,
    ingest::{self, ConnectionEnd},
    viewer::ViewerInbox,
    Tracker,
};

use crate::WebState;

pub(crate) async fn websocket<D: Database>(
    ws: WebSocketUpgrade,
    State(WebState {
        tracker,
        write_timeout,
    }): State<WebState<D>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| session(socket, tracker, write_timeout))
}

async fn session<D: Database>(socket: WebSocket, tracker: Tracker<D>, write_timeout: Duration) {
    let inbox = tracker.connect_viewer();
    let id = inbox.id();
    let (sink, stream) = socket.split();

    let writer = tokio::spawn(write_loop(tracker.clone(), inbox, sink, write_timeout));

    let inbound = stream
        .take_while(|message| ready(!matches!(message, Ok(Message::Close(_)))))
        .filter_map(|message| {
            ready(match message {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(_) => None,
                Err(why) => Some(Err(why)),
            })
        });

    match ingest::run(&tracker, Box::pin(inbound), Some(id)).await {
        ConnectionEnd::Closed => log::debug!("viewer {} closed its connection", id),
        ConnectionEnd::Errored(why) => log::warn!("viewer {} read failed: {}", id, why),
    }
    writer.abort();
}

/// Forwards queued messages to the socket until the queue closes or a write
/// fails, then unregisters the viewer.
async fn write_loop<D: Database>(
    tracker: Tracker<D>,
    mut inbox: ViewerInbox,
    mut sink: SplitSink<WebSocket, Message>,
    write_timeout: Duration,
) {
    let id = inbox.id();
    while let Some(payload) = inbox.recv().await {
        match timeout(write_timeout, sink.send(Message::Text(payload.to_string()))).await {
            Ok(Ok(())) => {}
            Ok(Err(why)) => {
                log::warn!("write to viewer {} failed: {}", id, why);
                break;
            }
            Err(_) => {
                log::warn!(
                    "write to viewer {} timed out after {:?}",
                    id,
                    write_timeout
                );
                break;
            }
        }
    }

    tracker.disconnect_viewer(id);
    let _ = timeout(write_timeout, sink.close()).await;
}
