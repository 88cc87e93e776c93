//! End-to-end room chat over real WebSocket connections

use std::collections::HashMap;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use room_chat::{serve, ChatServer, HubSnapshot, RoomId, ServerCommand};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> (String, mpsc::Sender<ServerCommand>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (cmd_tx, cmd_rx) = mpsc::channel(64);

    tokio::spawn(ChatServer::new(cmd_rx).run());
    tokio::spawn(serve(listener, cmd_tx.clone(), 32));

    (format!("ws://{}", addr), cmd_tx)
}

async fn connect(url: &str) -> Client {
    let (ws, _) = connect_async(url).await.unwrap();
    ws
}

async fn send_text(ws: &mut Client, json: &str) {
    ws.send(Message::Text(json.into())).await.unwrap();
}

async fn snapshot(cmd_tx: &mpsc::Sender<ServerCommand>) -> HubSnapshot {
    let (reply, rx) = oneshot::channel();
    cmd_tx.send(ServerCommand::Snapshot { reply }).await.unwrap();
    rx.await.unwrap()
}

/// Poll hub state until `done` holds, failing after a few seconds
async fn wait_for(
    cmd_tx: &mpsc::Sender<ServerCommand>,
    done: impl Fn(&HubSnapshot) -> bool,
) -> HubSnapshot {
    for _ in 0..500 {
        let state = snapshot(cmd_tx).await;
        if done(&state) {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("hub never reached expected state: {:?}", snapshot(cmd_tx).await);
}

fn rooms(entries: &[(&str, usize)]) -> HashMap<RoomId, usize> {
    entries
        .iter()
        .map(|(room, count)| (RoomId::from(*room), *count))
        .collect()
}

async fn next_message(ws: &mut Client) -> Message {
    tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for message")
        .expect("stream ended")
        .expect("websocket error")
}

async fn assert_silent(ws: &mut Client) {
    let result = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(result.is_err(), "unexpected frame: {:?}", result);
}

#[tokio::test]
async fn test_message_reaches_other_member_only() {
    let (url, cmd_tx) = start_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;

    send_text(&mut a, r#"{"type":"join","payload":"r1"}"#).await;
    send_text(&mut b, r#"{"type":"join","payload":"r1"}"#).await;
    wait_for(&cmd_tx, |s| s.rooms == rooms(&[("r1", 2)])).await;

    send_text(&mut a, r#"{"type":"message","payload":"hi"}"#).await;

    let msg = next_message(&mut b).await;
    assert!(msg.is_text());
    assert_eq!(msg.into_text().unwrap(), r#"{"type":"message","payload":"hi"}"#);
    assert_silent(&mut a).await;
}

#[tokio::test]
async fn test_binary_frames_stay_binary() {
    let (url, cmd_tx) = start_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;

    send_text(&mut a, r#"{"type":"join","payload":"r1"}"#).await;
    send_text(&mut b, r#"{"type":"join","payload":"r1"}"#).await;
    wait_for(&cmd_tx, |s| s.rooms == rooms(&[("r1", 2)])).await;

    a.send(Message::Binary(br#"{"type":"message","payload":"bin"}"#.to_vec().into()))
        .await
        .unwrap();

    let msg = next_message(&mut b).await;
    assert!(msg.is_binary());
    assert_eq!(
        msg.into_data(),
        br#"{"type":"message","payload":"bin"}"#.to_vec()
    );
}

#[tokio::test]
async fn test_disconnects_empty_the_room() {
    let (url, cmd_tx) = start_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;

    send_text(&mut a, r#"{"type":"join","payload":"r1"}"#).await;
    send_text(&mut b, r#"{"type":"join","payload":"r1"}"#).await;
    wait_for(&cmd_tx, |s| s.rooms == rooms(&[("r1", 2)])).await;

    b.close(None).await.unwrap();
    wait_for(&cmd_tx, |s| s.connections == 1 && s.rooms == rooms(&[("r1", 1)])).await;

    drop(a);
    let state = wait_for(&cmd_tx, |s| s.connections == 0).await;
    assert!(state.rooms.is_empty());
}

#[tokio::test]
async fn test_switching_rooms() {
    let (url, cmd_tx) = start_server().await;
    let mut a = connect(&url).await;

    send_text(&mut a, r#"{"type":"join","payload":"r1"}"#).await;
    wait_for(&cmd_tx, |s| s.rooms == rooms(&[("r1", 1)])).await;

    send_text(&mut a, r#"{"type":"join","payload":"r2"}"#).await;
    wait_for(&cmd_tx, |s| s.rooms == rooms(&[("r2", 1)])).await;
}

#[tokio::test]
async fn test_bad_frames_keep_connection_alive() {
    let (url, cmd_tx) = start_server().await;
    let mut a = connect(&url).await;
    let mut b = connect(&url).await;

    send_text(&mut b, r#"{"type":"join","payload":"r1"}"#).await;
    wait_for(&cmd_tx, |s| s.rooms == rooms(&[("r1", 1)])).await;

    send_text(&mut a, "definitely not json").await;
    send_text(&mut a, r#"{"type":"message","payload":"too early"}"#).await;
    send_text(&mut a, r#"{"type":"typing","payload":"x"}"#).await;
    send_text(&mut a, r#"{"type":"join","payload":"r1"}"#).await;

    let state = wait_for(&cmd_tx, |s| s.rooms == rooms(&[("r1", 2)])).await;
    assert_eq!(state.connections, 2);

    // The early message was never relayed
    send_text(&mut a, r#"{"type":"message","payload":"now"}"#).await;
    let msg = next_message(&mut b).await;
    assert_eq!(msg.into_text().unwrap(), r#"{"type":"message","payload":"now"}"#);
}
