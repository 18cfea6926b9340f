// messaging.rs — Length-prefixed JSON framing over stdin/stdout.
//
// Each frame is a 32-bit little-endian byte length followed by a UTF-8 JSON payload.

use std::io::{ErrorKind, Read, Write};

use anyhow::{bail, Context};

use crate::{config, protocol::Request};

/// Read one request. `Ok(None)` means the peer closed the stream cleanly between frames.
pub fn read_message(stdin: &mut dyn Read) -> anyhow::Result<Option<Request>> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match stdin.read(&mut len_buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("failed reading message length"),
        }
    }
    if filled == 0 {
        return Ok(None);
    }
    if filled < len_buf.len() {
        bail!("incomplete length prefix (expected 4 bytes, got {filled})");
    }

    let msg_len = u32::from_le_bytes(len_buf);
    if msg_len > config::messaging::MAX_MESSAGE_SIZE_BYTES {
        bail!("message too large: {msg_len} bytes");
    }

    let mut payload = vec![0u8; msg_len as usize];
    stdin
        .read_exact(&mut payload)
        .with_context(|| format!("failed reading message payload ({msg_len} bytes)"))?;

    let req: Request = serde_json::from_slice(&payload).context("invalid JSON request")?;
    Ok(Some(req))
}

pub fn write_json(stdout: &mut dyn Write, v: &serde_json::Value) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec(v).context("failed serializing JSON response")?;
    let len: u32 = bytes
        .len()
        .try_into()
        .context("response too large for u32 length")?;
    stdout.write_all(&len.to_le_bytes())?;
    stdout.write_all(&bytes)?;
    stdout.flush().context("failed flushing stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn test_reads_consecutive_requests_then_eof() {
        let mut bytes = frame(br#"{"id":"1","method":"hello"}"#);
        bytes.extend(frame(br#"{"id":"2","method":"searchItems","params":{"query":"cable","limit":2}}"#));
        let mut cur = Cursor::new(bytes);

        let a = read_message(&mut cur).unwrap().unwrap();
        assert_eq!(a.id, "1");
        assert_eq!(a.method, "hello");
        assert!(a.params.is_null());

        let b = read_message(&mut cur).unwrap().unwrap();
        assert_eq!(b.method, "searchItems");
        assert_eq!(b.params["limit"], 2);

        assert!(read_message(&mut cur).unwrap().is_none());
    }

    #[test]
    fn test_rejects_truncated_prefix_and_payload() {
        let mut cur = Cursor::new(vec![5u8, 0]);
        assert!(read_message(&mut cur).is_err());

        let mut bytes = 50u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"{\"id\"");
        let mut cur = Cursor::new(bytes);
        assert!(read_message(&mut cur).is_err());
    }

    #[test]
    fn test_rejects_oversized_frame() {
        let len = config::messaging::MAX_MESSAGE_SIZE_BYTES + 1;
        let mut cur = Cursor::new(len.to_le_bytes().to_vec());
        let err = read_message(&mut cur).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_write_json_frames_payload() {
        let mut out = Vec::new();
        let v = serde_json::json!({ "id": "9", "result": { "success": true } });
        write_json(&mut out, &v).unwrap();
        let len = u32::from_le_bytes([out[0], out[1], out[2], out[3]]) as usize;
        assert_eq!(len, out.len() - 4);
        let back: serde_json::Value = serde_json::from_slice(&out[4..]).unwrap();
        assert_eq!(back, v);
    }
}
