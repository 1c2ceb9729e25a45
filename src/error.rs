use std::{error, fmt, io};

use wire;
use wire::handshake::HandshakeType;
use wire::ContentType;

/// Everything that can go wrong on a connection. Apart from `Timeout`, every
/// error raised while decoding or handshaking is fatal: the connection moves
/// to a terminal state and later calls return `Closed`.
#[derive(Debug)]
pub enum Error {
    /// A codec-level decoding failure.
    Wire(wire::Error),
    /// A record arrived whose MAC does not cover its content.
    BadMac,
    /// CBC padding of a received record is inconsistent.
    BadPadding,
    /// A handshake fragment disagrees with earlier fragments of the same
    /// message about type, length or sequence number.
    FragmentMismatch,
    /// No cipher suite is acceptable to both peers.
    CipherSuiteMismatch,
    /// No compression method is acceptable to both peers.
    CompressionMismatch,
    /// Key agreement could not be carried out.
    KeyAgreementFailure(&'static str),
    /// The peer's Finished message does not match the transcript.
    VerifyDataMismatch,
    /// A handshake message arrived that the current state does not allow.
    UnexpectedMessage(HandshakeType),
    /// A record arrived whose content type the current state does not allow.
    UnexpectedRecord(ContentType),
    Io(io::Error),
    /// The read deadline expired. Recoverable; the connection state is
    /// unchanged and the call may simply be retried.
    Timeout,
    /// The connection is closed, either deliberately or after a fatal error.
    Closed,
}

impl Error {
    /// `Timeout` leaves the connection usable, everything else poisons it.
    pub fn is_fatal(&self) -> bool {
        match self {
            &Error::Timeout => false,
            _ => true,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Error::*;

        match self {
            &Wire(ref e) => write!(f, "wire error: {}", e),
            &BadMac => write!(f, "record has bad MAC"),
            &BadPadding => write!(f, "record has bad padding"),
            &FragmentMismatch => {
                write!(f, "handshake fragment is incompatible with previous fragments")
            }
            &CipherSuiteMismatch => write!(f, "no cipher suite in common"),
            &CompressionMismatch => write!(f, "no compression method in common"),
            &KeyAgreementFailure(msg) => write!(f, "key agreement failed: {}", msg),
            &VerifyDataMismatch => write!(f, "peer sent incorrect verify data"),
            &UnexpectedMessage(t) => write!(f, "unexpected handshake message: {}", t),
            &UnexpectedRecord(t) => write!(f, "unexpected record: {}", t),
            &Io(ref e) => write!(f, "io error: {}", e),
            &Timeout => write!(f, "read deadline expired"),
            &Closed => write!(f, "connection is closed"),
        }
    }
}

impl error::Error for Error {
    fn cause(&self) -> Option<&dyn error::Error> {
        use self::Error::*;

        match self {
            &Wire(ref e) => Some(e),
            &Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::Error> for Error {
    fn from(e: wire::Error) -> Self {
        match e {
            // A truncated buffer below the framing layer means the message
            // that carried it was malformed.
            wire::Error::Truncated => Error::Wire(wire::Error::MalformedHandshake),
            other => Error::Wire(other),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::Timeout,
            _ => Error::Io(e),
        }
    }
}
