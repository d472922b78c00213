// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RFC 2397 data URIs: the transport format for file payloads handed between
// front ends and the processing functions.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Result, ToolhubError};

/// Default media type when a data URI omits one.
const DEFAULT_MIME: &str = "text/plain";

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl DataUri {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Parse `data:[<mime>][;param]*[;base64],<payload>`.
    ///
    /// Parameters other than `base64` (e.g. `charset=utf-8`) are accepted
    /// and discarded.
    pub fn parse(input: &str) -> Result<Self> {
        let rest = input
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| ToolhubError::InvalidInput("data URI must start with 'data:'".into()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ToolhubError::InvalidInput("data URI has no ',' separator".into()))?;

        let mut params = header.split(';');
        let mime_type = match params.next().map(str::trim) {
            Some(mime) if !mime.is_empty() => mime.to_ascii_lowercase(),
            _ => DEFAULT_MIME.to_owned(),
        };
        let is_base64 = params.any(|param| param.trim().eq_ignore_ascii_case("base64"));

        let data = if is_base64 {
            let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
            STANDARD.decode(compact.as_bytes()).map_err(|err| {
                ToolhubError::InvalidInput(format!("data URI payload is not valid base64: {err}"))
            })?
        } else {
            percent_decode(payload)?
        };

        Ok(Self { mime_type, data })
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl FromStr for DataUri {
    type Err = ToolhubError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

fn percent_decode(payload: &str) -> Result<Vec<u8>> {
    let bytes = payload.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .filter(|pair| pair.iter().all(u8::is_ascii_hexdigit))
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| {
                    ToolhubError::InvalidInput(format!("bad percent escape at offset {i}"))
                })?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let uri = DataUri::parse("data:application/pdf;base64,JVBERi0xLjc=").unwrap();
        assert_eq!(uri.mime_type, "application/pdf");
        assert_eq!(uri.data, b"%PDF-1.7");
    }

    #[test]
    fn ignores_extra_parameters_and_whitespace() {
        let uri = DataUri::parse("data:Text/Plain;charset=utf-8;base64,aGVs\nbG8=").unwrap();
        assert_eq!(uri.mime_type, "text/plain");
        assert_eq!(uri.data, b"hello");
    }

    #[test]
    fn percent_decodes_plain_payload() {
        let uri = DataUri::parse("data:,a%20b%2Cc").unwrap();
        assert_eq!(uri.mime_type, "text/plain");
        assert_eq!(uri.data, b"a b,c");
    }

    #[test]
    fn percent_escape_needs_two_hex_digits() {
        for input in ["data:,%+1", "data:,%-1", "data:,%1", "data:,%zz"] {
            assert!(DataUri::parse(input).is_err(), "accepted {input:?}");
        }
        assert_eq!(DataUri::parse("data:,%0a%FF").unwrap().data, vec![0x0a, 0xff]);
    }

    #[test]
    fn display_emits_base64() {
        let uri = DataUri::new("image/png", vec![0x89, b'P', b'N', b'G']);
        assert_eq!(uri.to_string(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(DataUri::parse("image/png;base64,AAAA").is_err());
        assert!(DataUri::parse("data:image/png;base64").is_err());
        assert!(DataUri::parse("data:image/png;base64,!!!").is_err());
        assert!(DataUri::parse("data:,100%").is_err());
    }
}
