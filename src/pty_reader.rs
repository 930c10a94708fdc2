use std::io::Read;
use std::thread;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::trace;

/// Spawns a background thread that reads the PTY and forwards each chunk.
///
/// The channel closes when the game's side of the PTY reaches EOF, so a
/// `recv()` returning `None` means the game is gone.
pub fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> UnboundedReceiver<Vec<u8>> {
    let (tx, rx) = unbounded_channel();

    thread::spawn(move || {
        let mut buffer = [0u8; 4096];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buffer[..n].to_vec()).is_err() {
                        break; // Receiver dropped
                    }
                }
                // Linux reports EIO on the master once the slave side closes.
                Err(e) => {
                    trace!("pty read ended: {e}");
                    break;
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_forwards_chunks_then_closes() {
        let mut rx = spawn_reader(Cursor::new(b"input your choice? ".to_vec()));
        let mut collected = Vec::new();
        while let Some(chunk) = rx.recv().await {
            collected.extend(chunk);
        }
        assert_eq!(collected, b"input your choice? ");
    }
}
