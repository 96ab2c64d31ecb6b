//! End-to-end session flow over a real WebSocket, plus the HTTP liveness
//! route.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use connect_four_server::game::{Cell, Player};
use connect_four_server::protocol::{ClientEvent, MovePayload, ServerEvent, OPPONENT_LEFT};
use connect_four_server::server::{self, event_loop, LIVENESS_BODY};
use connect_four_server::session::{Gateway, Role, RoomCode, RoomRegistry};

const ORIGIN: &str = "http://localhost:5173";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> String {
    let listener = server::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::run(listener, ORIGIN));
    format!("ws://{addr}/ws")
}

async fn connect(url: &str) -> Socket {
    let (socket, _response) = connect_async(url).await.unwrap();
    socket
}

async fn send(socket: &mut Socket, event: ClientEvent) {
    let text = event.to_json().unwrap();
    socket.send(Message::Text(text.into())).await.unwrap();
}

async fn recv(socket: &mut Socket) -> ServerEvent {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for server event")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return ServerEvent::from_json(text.as_str()).unwrap();
        }
    }
}

async fn recv_update(socket: &mut Socket) -> connect_four_server::protocol::GameSnapshot {
    match recv(socket).await {
        ServerEvent::GameUpdate(snapshot) => snapshot,
        other => panic!("expected game_update, got {other:?}"),
    }
}

fn mv(column: usize, code: &RoomCode) -> ClientEvent {
    ClientEvent::MakeMove(MovePayload {
        column,
        room: code.to_string(),
    })
}

#[tokio::test]
async fn full_game_over_websocket() {
    let url = start_server().await;
    let mut host = connect(&url).await;
    let mut guest = connect(&url).await;

    send(&mut host, ClientEvent::CreateRoom).await;
    let code = match recv(&mut host).await {
        ServerEvent::RoomCreated(code) => code,
        other => panic!("expected room_created, got {other:?}"),
    };
    assert_eq!(recv(&mut host).await, ServerEvent::PlayerAssigned(Role::X));

    // Lowercase code still finds the room
    send(&mut guest, ClientEvent::JoinRoom(code.as_str().to_lowercase())).await;
    assert_eq!(recv(&mut guest).await, ServerEvent::RoomJoined(code.clone()));
    assert_eq!(recv(&mut guest).await, ServerEvent::PlayerAssigned(Role::O));
    assert_eq!(recv_update(&mut guest).await.current_player, Player::X);
    assert_eq!(recv_update(&mut host).await.current_player, Player::X);

    send(&mut guest, ClientEvent::ClientReady(code.to_string())).await;
    assert_eq!(recv(&mut guest).await, ServerEvent::PlayerAssigned(Role::O));

    // X fills row 5 columns 0-3 while O stacks on top
    for (i, column) in [0, 0, 1, 1, 2, 2, 3].into_iter().enumerate() {
        let mover = if i % 2 == 0 { &mut host } else { &mut guest };
        send(mover, mv(column, &code)).await;
        let seen_by_host = recv_update(&mut host).await;
        let seen_by_guest = recv_update(&mut guest).await;
        assert_eq!(seen_by_host, seen_by_guest);
    }

    // Game is over: this move is dropped, so the next frame the host sees
    // is the reset broadcast.
    send(&mut guest, mv(6, &code)).await;
    send(&mut guest, ClientEvent::ResetGame(code.to_string())).await;
    let fresh = recv_update(&mut host).await;
    assert_eq!(fresh.winner, None);
    assert_eq!(fresh.board.get(5, 0), Cell::Empty);
    recv_update(&mut guest).await;

    guest.close(None).await.unwrap();
    assert_eq!(
        recv(&mut host).await,
        ServerEvent::OpponentLeft(OPPONENT_LEFT.to_string())
    );
}

#[tokio::test]
async fn join_unknown_room_reports_error() {
    let url = start_server().await;
    let mut client = connect(&url).await;

    send(&mut client, ClientEvent::JoinRoom("NOPE00".into())).await;
    assert!(matches!(recv(&mut client).await, ServerEvent::JoinError(_)));

    // Garbage frames are ignored; the connection stays usable
    client
        .send(Message::Text("{\"event\":\"launch\"}".into()))
        .await
        .unwrap();
    send(&mut client, ClientEvent::CreateRoom).await;
    assert!(matches!(recv(&mut client).await, ServerEvent::RoomCreated(_)));
}

#[tokio::test]
async fn liveness_route_answers_with_cors_header() {
    let events = event_loop::spawn(Gateway::new(RoomRegistry::new()));
    let app = server::router(events, ORIGIN).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        ORIGIN
    );
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], LIVENESS_BODY.as_bytes());
}
