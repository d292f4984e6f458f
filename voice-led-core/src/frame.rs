//! Framing des TCP-Kontrollkanals
//!
//! `[kind: u8][len: u8][payload; len]`. Der Payload eines Request-Frames
//! ist genau eine Anfrage für den [`CommandHandler`](crate::CommandHandler).

use crate::error::{Error, Result};

/// Header-Länge (kind + len)
pub const HEADER_SIZE: usize = 2;

/// Größter Frame, den ein Peer schicken kann
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + u8::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FrameKind {
    /// Peer → Gerät
    Request = 0x01,
    /// Gerät → Peer, Antwort auf einen Request
    Response = 0x02,
    /// Gerät → Peer, Farbe hat sich geändert (`[r, g, b]`)
    Notify = 0x03,
    /// Gerät → Peer, direkt nach dem Verbindungsaufbau
    Hello = 0x04,
}

impl TryFrom<u8> for FrameKind {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(FrameKind::Request),
            0x02 => Ok(FrameKind::Response),
            0x03 => Ok(FrameKind::Notify),
            0x04 => Ok(FrameKind::Hello),
            _ => Err(Error::InvalidFrame),
        }
    }
}

/// Ein dekodierter Frame, der Payload zeigt in den Empfangs-Buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub kind: FrameKind,
    pub payload: &'a [u8],
}

impl Frame<'_> {
    /// Länge inkl. Header
    pub const fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Schreibt `[kind][len][payload]` nach `out` und gibt die Länge zurück
pub fn encode(kind: FrameKind, payload: &[u8], out: &mut [u8]) -> Result<usize> {
    let len = u8::try_from(payload.len()).map_err(|_| Error::InvalidFrame)?;
    let total = HEADER_SIZE + payload.len();
    let out = out.get_mut(..total).ok_or(Error::InvalidFrame)?;
    out[0] = kind as u8;
    out[1] = len;
    out[HEADER_SIZE..].copy_from_slice(payload);
    Ok(total)
}

/// Liest den ersten vollständigen Frame aus `input`
///
/// `Ok(None)` heißt: noch nicht genug Bytes, später erneut versuchen.
pub fn decode(input: &[u8]) -> Result<Option<Frame<'_>>> {
    let [kind, len, rest @ ..] = input else {
        return Ok(None);
    };
    let kind = FrameKind::try_from(*kind)?;
    Ok(rest
        .get(..*len as usize)
        .map(|payload| Frame { kind, payload }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_notify() {
        let mut out = [0u8; 8];
        let len = encode(FrameKind::Notify, &[1, 2, 3], &mut out).unwrap();
        assert_eq!(&out[..len], &[0x03, 3, 1, 2, 3]);
    }

    #[test]
    fn test_encode_rejects_small_buffer() {
        let mut out = [0u8; 3];
        assert_eq!(
            encode(FrameKind::Response, &[0, 0], &mut out),
            Err(Error::InvalidFrame)
        );
    }

    #[test]
    fn test_decode_waits_for_complete_frame() {
        assert_eq!(decode(&[]), Ok(None));
        assert_eq!(decode(&[0x01]), Ok(None));
        assert_eq!(decode(&[0x01, 4, 0x00, 1]), Ok(None));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let frame = decode(&[0x01, 1, 0x01, 0x01, 4]).unwrap().unwrap();
        assert_eq!(frame.kind, FrameKind::Request);
        assert_eq!(frame.payload, &[0x01]);
        assert_eq!(frame.encoded_len(), 3);
    }

    #[test]
    fn test_decode_unknown_kind() {
        assert_eq!(decode(&[0x7f, 0]), Err(Error::InvalidFrame));
    }

    #[test]
    fn test_empty_payload() {
        let frame = decode(&[0x04, 0]).unwrap().unwrap();
        assert_eq!(frame.kind, FrameKind::Hello);
        assert!(frame.payload.is_empty());
    }
}
