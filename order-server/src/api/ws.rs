//! Realtime WebSocket endpoint - 订单/打包事件推送
//!
//! GET /ws
//!
//! 协议 (服务端 → 客户端，单向):
//! - `{"event": "<name>", "data": <payload>}` 每个 [`RealtimeEvent`] 一条文本消息
//! - `{"event": "resync"}` 客户端落后于广播缓冲区时发送，客户端应重新拉取
//!
//! 客户端发来的文本消息被忽略。

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use shared::message::RealtimeEvent;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::core::ServerState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(handle_ws))
}

/// GET /ws
pub async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state))
}

async fn ws_session(socket: WebSocket, state: ServerState) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.events.subscribe();

    tracing::info!(subscribers = state.events.subscriber_count(), "Realtime WS connected");

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "Realtime subscriber lagged, asking client to resync");
                        // 从当前位置重新订阅，丢弃积压
                        events = state.events.subscribe();
                        if send_event(&mut sink, &RealtimeEvent::Resync).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    tracing::info!("Realtime WS disconnected");
}

fn encode_event(event: &RealtimeEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!(event = event.name(), error = %e, "Failed to encode realtime event");
            None
        }
    }
}

async fn send_event<S>(sink: &mut S, event: &RealtimeEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let Some(json) = encode_event(event) else {
        return Ok(());
    };
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderDeleted;

    #[test]
    fn events_encode_as_named_envelopes() {
        let json = encode_event(&RealtimeEvent::OrderDeleted(OrderDeleted { id: 7 })).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "orderDeleted");
        assert_eq!(value["data"]["id"], 7);

        let resync = encode_event(&RealtimeEvent::Resync).unwrap();
        assert_eq!(resync, r#"{"event":"resync"}"#);
    }
}
