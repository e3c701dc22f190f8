// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chore_core::ScanTrigger;
use chore_engine::TickReport;

#[test]
fn run_request_survives_the_wire() {
    let request = Request::Run {
        operation: Operation::Approve {
            chore: "dishes".into(),
            assignee: "ada".into(),
            approver: "Mum".to_string(),
            points: Some(3.5),
        },
    };

    let decoded: Request = decode(&encode(&request).unwrap()).unwrap();

    assert_eq!(decoded, request);
}

#[test]
fn applied_response_carries_outcome_and_events() {
    let response = Response::Applied {
        outcome: Outcome::Tick {
            report: TickReport {
                trigger: ScanTrigger::Midnight,
                reset_pairs: 1,
                auto_approved: 0,
                overdue: 0,
                missed: 0,
                due_notices: 0,
            },
        },
        events: vec![ChoreEvent::StatusReset {
            assignee_id: "ada".into(),
            chore_id: "dishes".into(),
        }],
    };

    let decoded: Response = decode(&encode(&response).unwrap()).unwrap();

    match decoded {
        Response::Applied { outcome, events } => {
            assert!(matches!(outcome, Outcome::Tick { .. }));
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].name(), "chore:status_reset");
        }
        other => panic!("expected Applied, got {other:?}"),
    }
}

#[test]
fn encode_is_bare_json() {
    let encoded = encode(&Request::Ping).unwrap();

    assert_eq!(std::str::from_utf8(&encoded).unwrap(), r#"{"type":"Ping"}"#);
}

#[tokio::test]
async fn messages_are_length_prefixed() {
    let mut buffer = Vec::new();
    write_message(&mut buffer, b"chores").await.unwrap();

    assert_eq!(&buffer[..4], &6u32.to_be_bytes());
    let mut cursor = std::io::Cursor::new(buffer);
    assert_eq!(read_message(&mut cursor).await.unwrap(), b"chores");
}

#[tokio::test]
async fn empty_stream_reads_as_closed() {
    let mut cursor = std::io::Cursor::new(Vec::new());

    let result = read_request(&mut cursor, DEFAULT_TIMEOUT).await;

    assert!(matches!(result, Err(ProtocolError::ConnectionClosed)));
}

#[tokio::test]
async fn oversized_prefix_is_refused_before_reading() {
    let too_big = (MAX_MESSAGE_SIZE as u32) + 1;
    let mut cursor = std::io::Cursor::new(too_big.to_be_bytes().to_vec());

    let result = read_message(&mut cursor).await;

    assert!(matches!(result, Err(ProtocolError::MessageTooLarge { .. })));
}
