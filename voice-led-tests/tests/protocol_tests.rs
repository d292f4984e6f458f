//! Integration Tests für das Kommando-Protokoll
//!
//! Buffer-Layout, Validierung und Zusammenspiel mit dem Geräte-Zustand

use std::sync::Mutex;

use voice_led_core::protocol::MAX_RESPONSE_SIZE;
use voice_led_core::{
    ColorValue, CommandHandler, EffectEngine, EffectRequest, Error, Opcode, ResultCode,
    SharedState,
};

#[derive(Default)]
struct RecordingEngine {
    requests: Mutex<Vec<EffectRequest>>,
}

impl RecordingEngine {
    fn requests(&self) -> Vec<EffectRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl EffectEngine for RecordingEngine {
    fn request_effect(&self, request: EffectRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

const SET: u8 = Opcode::SetColor as u8;
const GET: u8 = Opcode::GetColor as u8;
const OK: u8 = ResultCode::Ok as u8;

// ============================================================================
// Tests: SetColor / GetColor
// ============================================================================

#[test]
fn test_set_color_response_and_effect() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    let mut buffer = [SET, 0x11, 0x22, 0x33, 0xee, 0xee];
    let len = handler.handle_request(&mut buffer, 0, 4).unwrap();

    assert_eq!(len, 2);
    assert_eq!(&buffer[..len], &[SET, OK]);
    assert_eq!(
        engine.requests(),
        vec![EffectRequest::gradient(ColorValue::from_rgb(0x11, 0x22, 0x33))]
    );
}

#[test]
fn test_set_then_get_round_trip() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    let mut buffer = [SET, 0xab, 0xcd, 0xef, 0x00];
    handler.handle_request(&mut buffer, 0, 4).unwrap();

    let mut buffer = [GET, 0, 0, 0, 0];
    let len = handler.handle_request(&mut buffer, 0, 1).unwrap();

    assert_eq!(len, 5);
    assert_eq!(buffer, [GET, OK, 0xab, 0xcd, 0xef]);
}

#[test]
fn test_get_color_on_fresh_device_is_black() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    let mut buffer = [GET, 0xff, 0xff, 0xff, 0xff];
    let len = handler.handle_request(&mut buffer, 0, 1).unwrap();

    assert_eq!(&buffer[..len], &[GET, OK, 0, 0, 0]);
    assert!(engine.requests().is_empty());
}

#[test]
fn test_set_color_inverts_on_flag() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    let mut buffer = [SET, 1, 2, 3, 0];
    handler.handle_request(&mut buffer, 0, 4).unwrap();
    assert!(!state.snapshot().is_on());

    let mut buffer = [SET, 0, 0, 0, 0];
    handler.handle_request(&mut buffer, 0, 4).unwrap();
    assert!(state.snapshot().is_on());
    assert_eq!(state.snapshot().last_color(), ColorValue::OFF);
}

#[test]
fn test_request_at_offset_leaves_prefix_untouched() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);
    state.with(|s| s.record_color(ColorValue::from_rgb(7, 8, 9)));

    let mut buffer = [0x55, 0x55, 0x55, GET, 0, 0, 0, 0];
    let len = handler.handle_request(&mut buffer, 3, 1).unwrap();

    assert_eq!(len, 5);
    assert_eq!(buffer, [0x55, 0x55, 0x55, GET, OK, 7, 8, 9]);
}

// ============================================================================
// Tests: Validierung
// ============================================================================

#[test]
fn test_empty_request_is_malformed() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    let mut buffer = [0u8; 8];
    assert_eq!(
        handler.handle_request(&mut buffer, 0, 0),
        Err(Error::MalformedRequest)
    );
}

#[test]
fn test_buffer_below_floor_is_rejected_untouched() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    // GetColor passt in 1 Byte, die Antwort aber nicht
    let mut buffer = [GET, 0xaa, 0xaa, 0xaa];
    assert_eq!(
        handler.handle_request(&mut buffer, 0, 1),
        Err(Error::InsufficientBuffer)
    );
    assert_eq!(buffer, [GET, 0xaa, 0xaa, 0xaa]);

    // Offset frisst den Platz
    let mut buffer = [0u8; MAX_RESPONSE_SIZE + 1];
    buffer[2] = GET;
    assert_eq!(
        handler.handle_request(&mut buffer, 2, 1),
        Err(Error::InsufficientBuffer)
    );

    // Offset hinter dem Buffer-Ende
    let mut buffer = [0u8; MAX_RESPONSE_SIZE];
    assert_eq!(
        handler.handle_request(&mut buffer, 10, 1),
        Err(Error::InsufficientBuffer)
    );
}

#[test]
fn test_unknown_opcode_is_rejected() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    let mut buffer = [0x7f, 0, 0, 0, 0];
    assert_eq!(
        handler.handle_request(&mut buffer, 0, 1),
        Err(Error::UnknownOrMalformedCommand)
    );
    assert_eq!(buffer, [0x7f, 0, 0, 0, 0]);
}

#[test]
fn test_wrong_payload_length_changes_nothing() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    // SetColor mit nur zwei Farbbytes
    let mut buffer = [SET, 0x10, 0x20, 0, 0];
    assert_eq!(
        handler.handle_request(&mut buffer, 0, 3),
        Err(Error::UnknownOrMalformedCommand)
    );

    // GetColor mit Payload
    let mut buffer = [GET, 0x01, 0, 0, 0];
    assert_eq!(
        handler.handle_request(&mut buffer, 0, 2),
        Err(Error::UnknownOrMalformedCommand)
    );

    assert_eq!(state.snapshot(), SharedState::new().snapshot());
    assert!(engine.requests().is_empty());
}

#[test]
fn test_valid_size_beyond_buffer_is_rejected() {
    let state = SharedState::new();
    let engine = RecordingEngine::default();
    let handler = CommandHandler::new(&state, &engine);

    let mut buffer = [SET, 1, 2, 3, 0];
    assert_eq!(
        handler.handle_request(&mut buffer, 0, 9),
        Err(Error::UnknownOrMalformedCommand)
    );
    assert!(engine.requests().is_empty());
}
