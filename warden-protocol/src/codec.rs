//! Length-prefixed framing over async byte streams.
//!
//! Each frame is a 4-byte big-endian length followed by that many bytes of
//! JSON produced by [`PacketRegistry::serialize`].

use crate::error::{ProtocolError, ProtocolResult};
use crate::packet::Packet;
use crate::registry::PacketRegistry;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum frame body size (1 MiB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Reads one frame body.
///
/// Returns `Ok(None)` when the stream ends cleanly at a frame boundary. A
/// stream that ends inside a length prefix or body is an
/// [`io::ErrorKind::UnexpectedEof`] error.
pub async fn read_frame<T: AsyncRead + Unpin>(io: &mut T) -> ProtocolResult<Option<Vec<u8>>> {
    let mut len_bytes = [0u8; 4];
    let mut filled = 0;
    while filled < len_bytes.len() {
        let n = io.read(&mut len_bytes[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended inside a frame length",
            )
            .into());
        }
        filled += n;
    }

    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(len));
    }

    let mut buf = vec![0u8; len];
    io.read_exact(&mut buf).await?;
    Ok(Some(buf))
}

/// Writes one frame and flushes the stream.
pub async fn write_frame<T: AsyncWrite + Unpin>(io: &mut T, data: &[u8]) -> ProtocolResult<()> {
    if data.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(data.len()));
    }

    let len_bytes = (data.len() as u32).to_be_bytes();
    io.write_all(&len_bytes).await?;
    io.write_all(data).await?;
    io.flush().await?;
    Ok(())
}

/// Reads and decodes one packet. `Ok(None)` means the peer closed the stream.
pub async fn read_packet<T: AsyncRead + Unpin>(
    io: &mut T,
    registry: &PacketRegistry,
) -> ProtocolResult<Option<Packet>> {
    match read_frame(io).await? {
        Some(frame) => registry.deserialize(&frame).map(Some),
        None => Ok(None),
    }
}

/// Encodes and writes one packet.
pub async fn write_packet<T: AsyncWrite + Unpin>(
    io: &mut T,
    registry: &PacketRegistry,
    packet: &Packet,
) -> ProtocolResult<()> {
    let json = registry.serialize(packet)?;
    write_frame(io, json.as_bytes()).await
}
