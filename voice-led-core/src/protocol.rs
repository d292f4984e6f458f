//! Binäres Kommando-Protokoll (Farbe setzen / abfragen)
//!
//! Anfrage ab `offset`:
//!
//! | Byte | Bedeutung |
//! |---|---|
//! | 0 | Opcode: `0x00` SetColor, `0x01` GetColor |
//! | 1..3 | nur SetColor: rot, grün, blau |
//!
//! Die Antwort wird in denselben Buffer ab `offset + 1` geschrieben. Die
//! zurückgegebene Länge zählt ab `offset`, der Opcode bleibt als Echo stehen:
//!
//! - SetColor: `[opcode, status]` → 2
//! - GetColor: `[opcode, status, r, g, b]` → 5

use crate::error::{Error, Result};
use crate::state::SharedState;
use crate::traits::EffectEngine;
use crate::types::{ColorValue, EffectRequest};

/// Platz, der ab `offset` immer frei sein muss (größte Antwort)
pub const MAX_RESPONSE_SIZE: usize = 5;

/// Länge der SetColor-Anfrage inkl. Opcode
pub const SET_COLOR_REQUEST_SIZE: usize = 4;

/// Länge der GetColor-Anfrage inkl. Opcode
pub const GET_COLOR_REQUEST_SIZE: usize = 1;

pub const SET_COLOR_RESPONSE_SIZE: usize = 2;
pub const GET_COLOR_RESPONSE_SIZE: usize = 5;

/// Opcodes des Protokolls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    SetColor = 0x00,
    GetColor = 0x01,
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Opcode::SetColor),
            0x01 => Ok(Opcode::GetColor),
            _ => Err(Error::UnknownOrMalformedCommand),
        }
    }
}

/// Status-Byte der Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ResultCode {
    Ok = 0x00,
    Fail = 0x01,
}

/// Dekodiertes Kommando
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetColor(ColorValue),
    GetColor,
}

impl Command {
    /// Dekodiert `request` (beginnt mit dem Opcode, genau `validSize` Bytes)
    pub fn decode(request: &[u8]) -> Result<Self> {
        let (&opcode, payload) = request.split_first().ok_or(Error::MalformedRequest)?;

        match (Opcode::try_from(opcode)?, request.len()) {
            (Opcode::SetColor, SET_COLOR_REQUEST_SIZE) => Ok(Command::SetColor(
                ColorValue::from_bytes([payload[0], payload[1], payload[2]]),
            )),
            (Opcode::GetColor, GET_COLOR_REQUEST_SIZE) => Ok(Command::GetColor),
            _ => Err(Error::UnknownOrMalformedCommand),
        }
    }

    pub const fn opcode(&self) -> Opcode {
        match self {
            Command::SetColor(_) => Opcode::SetColor,
            Command::GetColor => Opcode::GetColor,
        }
    }
}

/// Bearbeitet eingehende Kommandos vom Netzwerk-Kanal
///
/// Wird direkt vom Netzwerk-Kanal aufgerufen (nicht über den Bus).
/// Blockiert nie: nur Buffer-Arbeit, ein kurzer kritischer Abschnitt
/// und höchstens eine Effekt-Anfrage.
pub struct CommandHandler<'a, E: EffectEngine> {
    state: &'a SharedState,
    effects: &'a E,
}

impl<'a, E: EffectEngine> CommandHandler<'a, E> {
    pub const fn new(state: &'a SharedState, effects: &'a E) -> Self {
        Self { state, effects }
    }

    /// Bearbeitet die Anfrage in `buffer[offset..offset + valid_size]`
    ///
    /// `buffer.len()` ist die Kapazität. Im Fehlerfall wird nichts
    /// geschrieben und der Aufrufer darf keine Antwort senden.
    pub fn handle_request(
        &self,
        buffer: &mut [u8],
        offset: usize,
        valid_size: usize,
    ) -> Result<usize> {
        if valid_size < 1 {
            error!("Command: request is too short");
            return Err(Error::MalformedRequest);
        }

        let room = buffer.len().saturating_sub(offset);
        if room < MAX_RESPONSE_SIZE {
            error!("Command: not enough buffer space ({} bytes)", room);
            return Err(Error::InsufficientBuffer);
        }

        let command = buffer
            .get(offset..offset.saturating_add(valid_size))
            .ok_or(Error::UnknownOrMalformedCommand)
            .and_then(Command::decode)
            .inspect_err(|_| error!("Command: illegal command"))?;

        let response = &mut buffer[offset..offset + MAX_RESPONSE_SIZE];
        match command {
            Command::SetColor(color) => {
                info!("Command: set color {}", color);
                self.state.with(|s| s.apply_remote_color(color));
                self.effects.request_effect(EffectRequest::gradient(color));
                response[1] = ResultCode::Ok as u8;
                Ok(SET_COLOR_RESPONSE_SIZE)
            }
            Command::GetColor => {
                let color = self.state.snapshot().last_color();
                info!("Command: get color {}", color);
                response[1] = ResultCode::Ok as u8;
                response[2..5].copy_from_slice(&color.to_bytes());
                Ok(GET_COLOR_RESPONSE_SIZE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_set_color() {
        let command = Command::decode(&[0x00, 0x10, 0x20, 0x30]).unwrap();
        assert_eq!(command, Command::SetColor(ColorValue::from_rgb(0x10, 0x20, 0x30)));
        assert_eq!(command.opcode(), Opcode::SetColor);
    }

    #[test]
    fn test_decode_get_color() {
        assert_eq!(Command::decode(&[0x01]), Ok(Command::GetColor));
    }

    #[test]
    fn test_decode_rejects_wrong_sizes() {
        assert_eq!(
            Command::decode(&[0x00, 0x10, 0x20]),
            Err(Error::UnknownOrMalformedCommand)
        );
        assert_eq!(
            Command::decode(&[0x01, 0x00]),
            Err(Error::UnknownOrMalformedCommand)
        );
        assert_eq!(
            Command::decode(&[0x02]),
            Err(Error::UnknownOrMalformedCommand)
        );
        assert_eq!(Command::decode(&[]), Err(Error::MalformedRequest));
    }

    #[test]
    fn test_opcode_try_from() {
        assert_eq!(Opcode::try_from(0x00), Ok(Opcode::SetColor));
        assert_eq!(Opcode::try_from(0x01), Ok(Opcode::GetColor));
        assert!(Opcode::try_from(0xff).is_err());
    }
}
