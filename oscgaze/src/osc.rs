//! Open Sound Control wire codec
//!
//! Minimal OSC 1.0 codec covering what the gaze wire protocol uses: messages
//! with an address pattern and a typed argument list, plus `#bundle`
//! traversal so senders that batch their parameter updates are still heard.
//!
//! ```text
//! ┌───────────────────┬──────────────────┬──────────────────────┐
//! │ Address pattern   │ Type tag string  │ Arguments            │
//! │ "/..." NUL-padded │ ",ff.." padded   │ big-endian, 4-aligned│
//! └───────────────────┴──────────────────┴──────────────────────┘
//! ```
//!
//! All fields are padded to 4-byte boundaries with NUL bytes. Bundles carry
//! an 8-byte time tag followed by size-prefixed elements, each of which is
//! itself a message or a nested bundle.
//!
//! ## Error Handling
//!
//! - **Malformed packet**: `Error::Protocol` returned to the caller; the
//!   receive loop logs and discards, the datagram is never fatal
//! - **Unknown type tags**: decode error (the argument layout past an
//!   unknown tag cannot be recovered)

use crate::error::{Error, Result};

/// Leading bytes of an OSC bundle element
const BUNDLE_TAG: &[u8] = b"#bundle\0";

/// A single decoded OSC argument
#[derive(Debug, Clone, PartialEq)]
pub enum OscArg {
    /// 32-bit big-endian IEEE 754 float (`f`)
    Float(f32),
    /// 32-bit big-endian two's complement integer (`i`)
    Int(i32),
    /// NUL-terminated, 4-byte-padded ASCII string (`s`)
    Str(String),
    /// Size-prefixed, 4-byte-padded byte blob (`b`)
    Blob(Vec<u8>),
}

impl OscArg {
    /// Type tag character for this argument
    fn tag(&self) -> u8 {
        match self {
            OscArg::Float(_) => b'f',
            OscArg::Int(_) => b'i',
            OscArg::Str(_) => b's',
            OscArg::Blob(_) => b'b',
        }
    }
}

/// A decoded OSC message: address pattern plus argument list
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub args: Vec<OscArg>,
}

/// Decode one UDP datagram into the OSC messages it carries.
///
/// A plain message decodes to a single-element vec; a bundle is traversed
/// depth-first and contributes every message it contains, in order.
pub fn decode_packet(buf: &[u8]) -> Result<Vec<OscMessage>> {
    let mut messages = Vec::new();
    decode_element(buf, &mut messages)?;
    Ok(messages)
}

fn decode_element(buf: &[u8], out: &mut Vec<OscMessage>) -> Result<()> {
    if buf.starts_with(BUNDLE_TAG) {
        decode_bundle(&buf[BUNDLE_TAG.len()..], out)
    } else {
        out.push(decode_message(buf)?);
        Ok(())
    }
}

fn decode_bundle(mut buf: &[u8], out: &mut Vec<OscMessage>) -> Result<()> {
    // 8-byte time tag; immediate-or-scheduled delivery is not distinguished,
    // every element is processed on receipt
    if buf.len() < 8 {
        return Err(Error::Protocol("bundle truncated before time tag".into()));
    }
    buf = &buf[8..];

    while !buf.is_empty() {
        let (size, rest) = read_u32(buf, "bundle element size")?;
        let size = size as usize;
        if size % 4 != 0 {
            return Err(Error::Protocol(format!(
                "bundle element size {} not 4-aligned",
                size
            )));
        }
        if rest.len() < size {
            return Err(Error::Protocol("bundle element truncated".into()));
        }
        decode_element(&rest[..size], out)?;
        buf = &rest[size..];
    }
    Ok(())
}

/// Decode a single (non-bundle) OSC message.
pub fn decode_message(buf: &[u8]) -> Result<OscMessage> {
    let (address, rest) = read_padded_str(buf, "address pattern")?;
    if !address.starts_with('/') {
        return Err(Error::Protocol(format!(
            "address pattern does not start with '/': {:?}",
            address
        )));
    }

    let (tags, mut rest) = read_padded_str(rest, "type tag string")?;
    let tags = tags
        .strip_prefix(',')
        .ok_or_else(|| Error::Protocol("type tag string missing ',' prefix".into()))?;

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.bytes() {
        let arg = match tag {
            b'f' => {
                let (bits, r) = read_u32(rest, "float argument")?;
                rest = r;
                OscArg::Float(f32::from_bits(bits))
            }
            b'i' => {
                let (bits, r) = read_u32(rest, "int argument")?;
                rest = r;
                OscArg::Int(bits as i32)
            }
            b's' => {
                let (s, r) = read_padded_str(rest, "string argument")?;
                rest = r;
                OscArg::Str(s.to_string())
            }
            b'b' => {
                let (len, r) = read_u32(rest, "blob size")?;
                let len = len as usize;
                let padded = pad4(len);
                if r.len() < padded {
                    return Err(Error::Protocol("blob argument truncated".into()));
                }
                let blob = r[..len].to_vec();
                rest = &r[padded..];
                OscArg::Blob(blob)
            }
            other => {
                return Err(Error::Protocol(format!(
                    "unsupported type tag '{}'",
                    other as char
                )))
            }
        };
        args.push(arg);
    }

    if !rest.is_empty() {
        return Err(Error::Protocol(format!(
            "{} trailing bytes after argument list",
            rest.len()
        )));
    }

    Ok(OscMessage { address, args })
}

/// Encode an OSC message for transmission.
pub fn encode_message(address: &str, args: &[OscArg]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(pad4(address.len() + 1) + 4 + args.len() * 4);
    write_padded_str(&mut buf, address);

    let mut tags = Vec::with_capacity(args.len() + 1);
    tags.push(b',');
    tags.extend(args.iter().map(OscArg::tag));
    write_padded_bytes(&mut buf, &tags);

    for arg in args {
        match arg {
            OscArg::Float(v) => buf.extend_from_slice(&v.to_be_bytes()),
            OscArg::Int(v) => buf.extend_from_slice(&v.to_be_bytes()),
            OscArg::Str(s) => write_padded_str(&mut buf, s),
            OscArg::Blob(b) => {
                buf.extend_from_slice(&(b.len() as u32).to_be_bytes());
                buf.extend_from_slice(b);
                for _ in b.len()..pad4(b.len()) {
                    buf.push(0);
                }
            }
        }
    }
    buf
}

/// Encode the common single-float message form.
pub fn encode_float_message(address: &str, value: f32) -> Vec<u8> {
    encode_message(address, &[OscArg::Float(value)])
}

/// Round up to the next 4-byte boundary.
fn pad4(len: usize) -> usize {
    (len + 3) & !3
}

/// Read a NUL-terminated, 4-byte-padded string field.
fn read_padded_str<'a>(buf: &'a [u8], what: &str) -> Result<(String, &'a [u8])> {
    let nul = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::Protocol(format!("{} not NUL-terminated", what)))?;
    let s = std::str::from_utf8(&buf[..nul])
        .map_err(|_| Error::Protocol(format!("{} is not valid UTF-8", what)))?;
    let consumed = pad4(nul + 1);
    if buf.len() < consumed {
        return Err(Error::Protocol(format!("{} padding truncated", what)));
    }
    Ok((s.to_string(), &buf[consumed..]))
}

/// Read a big-endian u32 field.
fn read_u32<'a>(buf: &'a [u8], what: &str) -> Result<(u32, &'a [u8])> {
    if buf.len() < 4 {
        return Err(Error::Protocol(format!("{} truncated", what)));
    }
    let (head, rest) = buf.split_at(4);
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(head);
    Ok((u32::from_be_bytes(bytes), rest))
}

/// Append a string field with NUL terminator and 4-byte padding.
fn write_padded_str(buf: &mut Vec<u8>, s: &str) {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    write_padded_bytes_raw(buf, &bytes);
}

/// Append bytes plus NUL terminator, padded to 4 bytes.
fn write_padded_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    let mut with_nul = bytes.to_vec();
    with_nul.push(0);
    write_padded_bytes_raw(buf, &with_nul);
}

fn write_padded_bytes_raw(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(bytes);
    for _ in bytes.len()..pad4(bytes.len()) {
        buf.push(0);
    }
}
