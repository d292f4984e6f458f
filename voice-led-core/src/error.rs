//! Fehler-Typen der Core-Crate

use core::fmt;

/// Result-Alias für die Core-Crate
pub type Result<T> = core::result::Result<T, Error>;

/// Alle Fehler, die im Core auftreten können
///
/// Keiner davon ist fatal: der Aufrufer (Netzwerk-Kanal bzw. Bootstrap)
/// loggt den Fehler und macht weiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Anfrage zu kurz, um überhaupt einen Opcode zu enthalten
    MalformedRequest,
    /// Buffer hat ab `offset` weniger Platz als die größte Antwort (5 Bytes)
    InsufficientBuffer,
    /// Unbekannter Opcode oder falsche Payload-Länge für einen bekannten Opcode
    UnknownOrMalformedCommand,
    /// Handler-Tabelle des Event-Bus ist voll
    CapacityExceeded,
    /// Unbekannter Frame-Typ oder Payload passt nicht in den Ausgabe-Buffer
    InvalidFrame,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedRequest => write!(f, "Malformed request"),
            Error::InsufficientBuffer => write!(f, "Insufficient buffer space"),
            Error::UnknownOrMalformedCommand => write!(f, "Unknown or malformed command"),
            Error::CapacityExceeded => write!(f, "Event bus handler capacity exceeded"),
            Error::InvalidFrame => write!(f, "Invalid frame"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::MalformedRequest => defmt::write!(fmt, "Malformed request"),
            Error::InsufficientBuffer => defmt::write!(fmt, "Insufficient buffer space"),
            Error::UnknownOrMalformedCommand => defmt::write!(fmt, "Unknown or malformed command"),
            Error::CapacityExceeded => defmt::write!(fmt, "Event bus handler capacity exceeded"),
            Error::InvalidFrame => defmt::write!(fmt, "Invalid frame"),
        }
    }
}
