use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use vita_mahjong::adapter::protocol::{create_ack, create_hello};
use vita_mahjong::adapter::server::{build_observation, run_server, ServerConfig};
use vita_mahjong::adapter::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use vita_mahjong::core::GameState;
use vita_mahjong::types::{Difficulty, GameAction, PaidAction, TileId};

type Lines = tokio::io::Lines<BufReader<OwnedReadHalf>>;

fn config(max_pending_commands: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        protocol_version: "1.0.0".to_string(),
        max_pending_commands,
    }
}

async fn start(
    max_pending: usize,
) -> (
    tokio::task::JoinHandle<()>,
    std::net::SocketAddr,
    mpsc::Receiver<InboundCommand>,
    mpsc::UnboundedSender<OutboundMessage>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(config(max_pending), cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    (server_handle, addr, cmd_rx, out_tx)
}

async fn connect(addr: std::net::SocketAddr) -> (Lines, OwnedWriteHalf) {
    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, write_half) = stream.into_split();
    (BufReader::new(read_half).lines(), write_half)
}

async fn send_line(w: &mut OwnedWriteHalf, line: &str) {
    w.write_all(line.as_bytes()).await.unwrap();
    w.write_all(b"\n").await.unwrap();
    w.flush().await.unwrap();
}

async fn read_json(lines: &mut Lines) -> serde_json::Value {
    let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("timeout waiting for line")
        .expect("io error")
        .expect("expected line");
    serde_json::from_str(&line).unwrap()
}

async fn hello(lines: &mut Lines, w: &mut OwnedWriteHalf, stream_observations: bool) {
    let mut hello = create_hello(1, "e2e-test", "1.0.0");
    hello.requested.stream_observations = stream_observations;
    send_line(w, &serde_json::to_string(&hello).unwrap()).await;

    let welcome = read_json(lines).await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["game_id"], "vita-mahjong");
}

#[tokio::test]
async fn adapter_hello_command_ack_and_observation() {
    let (server_handle, addr, mut cmd_rx, out_tx) = start(8).await;
    let (mut lines, mut w) = connect(addr).await;

    hello(&mut lines, &mut w, true).await;

    // Streaming clients get an initial snapshot request queued for them.
    let inbound = tokio::time::timeout(Duration::from_secs(2), cmd_rx.recv())
        .await
        .unwrap()
        .expect("expected snapshot request");
    assert!(matches!(inbound.payload, InboundPayload::SnapshotRequest));

    send_line(
        &mut w,
        r#"{"type":"command","seq":2,"ts":1,"action":"select","tile":"tile-4"}"#,
    )
    .await;

    let inbound = tokio::time::timeout(Duration::from_secs(2), cmd_rx.recv())
        .await
        .unwrap()
        .expect("expected inbound command");
    assert_eq!(inbound.seq, 2);
    match inbound.payload {
        InboundPayload::Command(ClientCommand::Action(GameAction::Select(id))) => {
            assert_eq!(id, TileId(4));
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    // ack after apply
    out_tx
        .send(OutboundMessage::ToClient {
            client_id: inbound.client_id,
            line: serde_json::to_string(&create_ack(2, true)).unwrap(),
        })
        .unwrap();

    let ack = read_json(&mut lines).await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["applied"], true);

    // broadcast observation
    let game = GameState::new(1, Difficulty::Easy);
    let obs = build_observation(&game, 10);
    out_tx
        .send(OutboundMessage::Broadcast {
            line: serde_json::to_string(&obs).unwrap(),
        })
        .unwrap();

    let obs = read_json(&mut lines).await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["seq"], 10);
    assert_eq!(obs["tiles"].as_array().unwrap().len(), 12);
    assert_eq!(obs["coins"], 10_000);

    server_handle.abort();
}

#[tokio::test]
async fn adapter_paid_and_settings_commands_are_mapped() {
    let (server_handle, addr, mut cmd_rx, _out_tx) = start(8).await;
    let (mut lines, mut w) = connect(addr).await;
    hello(&mut lines, &mut w, false).await;

    send_line(&mut w, r#"{"type":"command","seq":2,"action":"hint"}"#).await;
    send_line(&mut w, r#"{"type":"command","seq":3,"action":"Confirm"}"#).await;
    send_line(&mut w, r#"{"type":"command","seq":4,"action":"language","language":"uz"}"#).await;
    send_line(&mut w, r#"{"type":"command","seq":5,"action":"advice"}"#).await;

    let mut payloads = Vec::new();
    for _ in 0..4 {
        let inbound = tokio::time::timeout(Duration::from_secs(2), cmd_rx.recv())
            .await
            .unwrap()
            .unwrap();
        match inbound.payload {
            InboundPayload::Command(cmd) => payloads.push(cmd),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    assert_eq!(
        payloads,
        vec![
            ClientCommand::Action(GameAction::Request(PaidAction::Hint)),
            ClientCommand::Action(GameAction::Confirm),
            ClientCommand::Action(GameAction::SetLanguage(vita_mahjong::types::Language::Uz)),
            ClientCommand::Advice,
        ]
    );

    server_handle.abort();
}

#[tokio::test]
async fn adapter_backpressure_returns_error() {
    let (server_handle, addr, mut cmd_rx, _out_tx) = start(1).await;
    let (mut lines, mut w) = connect(addr).await;
    hello(&mut lines, &mut w, false).await;

    // Send two commands without draining cmd_rx; second should backpressure.
    send_line(&mut w, r#"{"type":"command","seq":2,"action":"pause"}"#).await;
    send_line(&mut w, r#"{"type":"command","seq":3,"action":"pause"}"#).await;

    // First should be queued.
    let _first = tokio::time::timeout(Duration::from_secs(2), cmd_rx.recv())
        .await
        .unwrap()
        .unwrap();

    let err = read_json(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["seq"], 3);
    assert_eq!(err["code"], "backpressure");

    server_handle.abort();
}

#[tokio::test]
async fn adapter_rejects_command_before_hello() {
    let (server_handle, addr, _cmd_rx, _out_tx) = start(8).await;
    let (mut lines, mut w) = connect(addr).await;

    send_line(&mut w, r#"{"type":"command","seq":1,"action":"undo"}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "handshake_required");

    server_handle.abort();
}

#[tokio::test]
async fn adapter_enforces_increasing_seq() {
    let (server_handle, addr, _cmd_rx, _out_tx) = start(8).await;
    let (mut lines, mut w) = connect(addr).await;
    hello(&mut lines, &mut w, false).await;

    send_line(&mut w, r#"{"type":"command","seq":1,"action":"pause"}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "out_of_order");
    assert_eq!(err["seq"], 1);

    server_handle.abort();
}

#[tokio::test]
async fn adapter_reports_invalid_input() {
    let (server_handle, addr, _cmd_rx, _out_tx) = start(8).await;
    let (mut lines, mut w) = connect(addr).await;
    hello(&mut lines, &mut w, false).await;

    send_line(&mut w, r#"{"type":"command","seq":2,"action":"select"}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 2);

    send_line(&mut w, r#"{"type":"command","seq":3,"action":"fly"}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 3);

    send_line(&mut w, r#"{"type":"telemetry","seq":4}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 4);

    send_line(&mut w, "not json").await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");

    server_handle.abort();
}

#[tokio::test]
async fn adapter_protocol_mismatch_closes_connection() {
    let (server_handle, addr, _cmd_rx, _out_tx) = start(8).await;
    let (mut lines, mut w) = connect(addr).await;

    let hello = create_hello(1, "old-client", "2.0.0");
    send_line(&mut w, &serde_json::to_string(&hello).unwrap()).await;

    let err = read_json(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "protocol_mismatch");

    let eof = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .unwrap()
        .unwrap();
    assert!(eof.is_none());

    server_handle.abort();
}
