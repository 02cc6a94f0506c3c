// Host-side tests for the status schema and the socket/poll merge.

use dash_core::error::FetchError;
use dash_core::status::Status;
use dash_core::sync::{resolve_authoritative, ChannelState, SocketState, StatusSynchronizer};
use std::rc::Rc;

fn status(message: &str) -> Status {
    Status {
        success: true,
        message: message.to_string(),
        ..Default::default()
    }
}

fn frame(message: &str) -> String {
    format!(r#"{{"success":true,"message":"{message}"}}"#)
}

fn current_message(sync: &StatusSynchronizer) -> Option<String> {
    sync.current().map(|s| s.message.clone())
}

#[test]
fn parses_a_full_status_document() {
    let text = r##"{
        "success": true,
        "message": "Track found",
        "recorded_at": "2024-05-01T12:00:00Z",
        "rms": 0.42,
        "track": {
            "track_name": "Windowlicker",
            "artist_name": "Aphex Twin",
            "album_name": "Windowlicker",
            "track_guid": "abc-123"
        },
        "last_fm_artist": {
            "name": "Aphex Twin",
            "url": "https://last.fm/music/Aphex+Twin",
            "image": [{ "#text": "https://img/a.png", "size": "large" }]
        },
        "unknown_field": 1
    }"##;
    let s = Status::from_json(text).expect("valid status");
    assert_eq!(s.headline(), "Windowlicker - Aphex Twin");
    assert_eq!(s.track_key(), Some("abc-123"));
    assert_eq!(s.rms, Some(0.42));
    let artist = s.last_fm_artist.expect("artist");
    assert_eq!(artist.image[0].url, "https://img/a.png");
}

#[test]
fn rejects_empty_and_malformed_documents() {
    assert!(Status::from_json("   ").is_err());
    assert!(Status::from_json("{not json").is_err());
    assert!(Status::from_json(r#"{"message":"no success flag"}"#).is_err());
    assert!(Status::from_json(r#"{"success":true,"message":"x","track":{"artist_name":"a"}}"#).is_err());
}

#[test]
fn headline_falls_back_to_message() {
    assert_eq!(status("Listening...").headline(), "Listening...");
}

#[test]
fn socket_drop_then_poll_makes_poll_authoritative() {
    let mut sync = StatusSynchronizer::new(2500);
    sync.on_socket_state(SocketState::Open);
    sync.on_socket_message(&frame("A"));
    assert_eq!(current_message(&sync).as_deref(), Some("A"));
    assert!(sync.authoritative().is_some_and(|a| a.is_live()));

    sync.on_socket_state(SocketState::Closed);
    sync.on_poll_result(Ok(status("B")));
    assert_eq!(current_message(&sync).as_deref(), Some("B"));
    assert!(!sync.authoritative().is_some_and(|a| a.is_live()));
}

#[test]
fn live_socket_outranks_later_polls() {
    let mut sync = StatusSynchronizer::new(2500);
    sync.on_poll_result(Ok(status("P1")));
    sync.on_socket_state(SocketState::Open);
    // open but silent: the poll still stands
    assert_eq!(current_message(&sync).as_deref(), Some("P1"));

    sync.on_socket_message(&frame("S1"));
    sync.on_poll_result(Ok(status("P2")));
    assert_eq!(current_message(&sync).as_deref(), Some("S1"));

    sync.on_socket_message(&frame("S2"));
    assert_eq!(current_message(&sync).as_deref(), Some("S2"));
}

#[test]
fn invalid_socket_message_keeps_previous_authority() {
    let mut sync = StatusSynchronizer::new(2500);
    sync.on_socket_state(SocketState::Open);
    sync.on_socket_message(&frame("A"));
    let version = sync.version();

    assert!(!sync.on_socket_message("{\"success\": tru"));
    assert!(!sync.on_socket_message(""));
    assert_eq!(current_message(&sync).as_deref(), Some("A"));
    assert_eq!(sync.version(), version);
    assert_eq!(sync.discarded_messages(), 2);
}

#[test]
fn failed_poll_keeps_previous_poll() {
    let mut sync = StatusSynchronizer::new(2500);
    sync.on_poll_result(Ok(status("P1")));
    let changed = sync.on_poll_result(Err(FetchError::Http {
        status: 502,
        path: "/api/status".into(),
    }));
    assert!(!changed);
    assert_eq!(current_message(&sync).as_deref(), Some("P1"));
}

#[test]
fn reconnect_must_deliver_before_it_is_trusted() {
    let mut sync = StatusSynchronizer::new(2500);
    sync.on_poll_result(Ok(status("P")));
    sync.on_socket_state(SocketState::Open);
    sync.on_socket_message(&frame("old"));
    sync.on_socket_state(SocketState::Closed);
    sync.on_socket_state(SocketState::Connecting);
    sync.on_socket_state(SocketState::Open);
    assert_eq!(current_message(&sync).as_deref(), Some("P"));
}

#[test]
fn messages_outside_open_are_ignored() {
    let mut sync = StatusSynchronizer::new(2500);
    assert!(!sync.on_socket_message(&frame("early")));
    assert!(sync.current().is_none());
}

#[test]
fn polling_runs_only_while_socket_is_not_open() {
    let mut sync = StatusSynchronizer::new(2500);
    assert_eq!(sync.poll_interval_ms(), Some(2500));
    assert!(!sync.socket_open());
    sync.on_socket_state(SocketState::Open);
    assert_eq!(sync.poll_interval_ms(), None);
    assert!(sync.socket_open());
    sync.on_socket_state(SocketState::Closing);
    assert_eq!(sync.poll_interval_ms(), Some(2500));
    assert!(sync.refetch_on_focus());
}

#[test]
fn open_socket_is_not_live_until_it_delivers() {
    let mut sync = StatusSynchronizer::new(2500);
    sync.on_poll_result(Ok(status("P")));
    sync.on_socket_state(SocketState::Open);
    assert!(sync.socket_open());
    assert!(!sync.is_live());
    assert!(sync.authoritative().is_some_and(|a| !a.is_live()));

    // the first frame flips authority, and with it the live flag
    assert!(sync.on_socket_message(&frame("S")));
    assert!(sync.is_live());

    // dropping the socket flips back to the poll in the same step
    assert!(sync.on_socket_state(SocketState::Closed));
    assert!(!sync.is_live());
    assert_eq!(current_message(&sync).as_deref(), Some("P"));
}

#[test]
fn version_bumps_only_on_change() {
    let mut sync = StatusSynchronizer::new(2500);
    assert_eq!(sync.version(), 0);
    assert!(sync.on_poll_result(Ok(status("P"))));
    assert_eq!(sync.version(), 1);
    // opening without a message does not change authority
    assert!(!sync.on_socket_state(SocketState::Open));
    assert_eq!(sync.version(), 1);
}

#[test]
fn resolver_is_a_pure_function_of_channels() {
    let poll = Rc::new(status("P"));
    let live = Rc::new(status("L"));
    let mut ch = ChannelState {
        socket: SocketState::Closed,
        socket_status: Some(live.clone()),
        polled_status: Some(poll.clone()),
    };
    assert_eq!(resolve_authoritative(&ch).map(|a| a.status().message.clone()).as_deref(), Some("P"));
    ch.socket = SocketState::Open;
    assert_eq!(resolve_authoritative(&ch).map(|a| a.status().message.clone()).as_deref(), Some("L"));
    ch.socket_status = None;
    ch.polled_status = None;
    assert!(resolve_authoritative(&ch).is_none());
}

#[test]
fn ready_state_mapping() {
    assert_eq!(SocketState::from_ready_state(0), SocketState::Connecting);
    assert_eq!(SocketState::from_ready_state(1), SocketState::Open);
    assert_eq!(SocketState::from_ready_state(2), SocketState::Closing);
    assert_eq!(SocketState::from_ready_state(3), SocketState::Closed);
}
