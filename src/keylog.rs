//! Optional logging of session secrets for wire-trace decoding.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::{fmt, io};

use hex;

/// Sink for per-session secrets. Implementations must tolerate being called
/// from several connections at once.
pub trait KeyLog: Send + Sync {
    /// Called once per handshake with the client random and the derived
    /// master secret.
    fn log(&self, client_random: &[u8], master_secret: &[u8]);
}

/// Writes `CLIENT_RANDOM <hex> <hex>` lines, the format packet analyzers
/// understand. The caller picks the path; nothing is written anywhere by
/// default.
pub struct KeyLogFile {
    file: Mutex<File>,
}

impl KeyLogFile {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(KeyLogFile {
            file: Mutex::new(file),
        })
    }
}

impl KeyLog for KeyLogFile {
    fn log(&self, client_random: &[u8], master_secret: &[u8]) {
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(_) => return,
        };
        let line = format!(
            "CLIENT_RANDOM {} {}\n",
            hex::encode(client_random),
            hex::encode(master_secret)
        );
        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!("failed to write key log entry: {}", e);
        }
    }
}

impl fmt::Debug for KeyLogFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KeyLogFile")
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyLog, KeyLogFile};
    use std::env;
    use std::fs;

    #[test]
    fn writes_nss_format() {
        let path = env::temp_dir().join("dtls-keylog-test");
        let _ = fs::remove_file(&path);

        let keylog = KeyLogFile::create(&path).unwrap();
        keylog.log(&[0xab; 32], &[0xcd; 48]);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("CLIENT_RANDOM abab"));
        assert!(contents.trim_right().ends_with("cdcd"));
        let _ = fs::remove_file(&path);
    }
}
