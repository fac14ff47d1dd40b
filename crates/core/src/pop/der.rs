//! Conversion of DER ECDSA signatures into the fixed-width JOSE form
//!
//! Signers hand back `SEQUENCE { r INTEGER, s INTEGER }`. Tokens need
//! `r || s`, each big-endian and left-padded with zeros to the curve size.

use horizon_domain::SigningError;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;

/// Decode a DER ECDSA signature and re-encode it as `r || s`.
///
/// The output is exactly `2 * byte_len` bytes. Any deviation from strict
/// DER (wrong tags, non-minimal lengths or integers, negative values,
/// trailing bytes, integers wider than `byte_len`) is rejected.
pub fn der_to_fixed_width(der: &[u8], byte_len: usize) -> Result<Vec<u8>, SigningError> {
    let mut outer = DerReader::new(der);
    let mut inner = DerReader::new(outer.read(TAG_SEQUENCE)?);
    if !outer.is_empty() {
        return Err(invalid("trailing bytes after signature sequence"));
    }

    let r = inner.read_unsigned_integer()?;
    let s = inner.read_unsigned_integer()?;
    if !inner.is_empty() {
        return Err(invalid("trailing bytes inside signature sequence"));
    }

    let mut out = vec![0u8; 2 * byte_len];
    let (r_out, s_out) = out.split_at_mut(byte_len);
    fill_right_aligned(r_out, r, "r")?;
    fill_right_aligned(s_out, s, "s")?;
    Ok(out)
}

fn invalid(reason: impl Into<String>) -> SigningError {
    SigningError::InvalidSignatureEncoding(reason.into())
}

fn fill_right_aligned(dst: &mut [u8], value: &[u8], name: &str) -> Result<(), SigningError> {
    if value.len() > dst.len() {
        return Err(invalid(format!(
            "{name} is {} bytes, wider than the {}-byte curve size",
            value.len(),
            dst.len()
        )));
    }
    let offset = dst.len() - value.len();
    dst[offset..].copy_from_slice(value);
    Ok(())
}

struct DerReader<'a> {
    input: &'a [u8],
}

impl<'a> DerReader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], SigningError> {
        if self.input.len() < n {
            return Err(invalid(format!(
                "truncated input: need {n} bytes, have {}",
                self.input.len()
            )));
        }
        let (head, rest) = self.input.split_at(n);
        self.input = rest;
        Ok(head)
    }

    /// Read one TLV with the expected tag and return its contents.
    fn read(&mut self, tag: u8) -> Result<&'a [u8], SigningError> {
        let found = self.take(1)?[0];
        if found != tag {
            return Err(invalid(format!("expected tag {tag:#04x}, found {found:#04x}")));
        }
        let len = self.read_length()?;
        self.take(len)
    }

    fn read_length(&mut self) -> Result<usize, SigningError> {
        let first = self.take(1)?[0];
        if first & 0x80 == 0 {
            return Ok(usize::from(first));
        }

        let count = usize::from(first & 0x7f);
        if count == 0 {
            return Err(invalid("indefinite length is not DER"));
        }
        if count > 4 {
            return Err(invalid(format!("length uses {count} bytes")));
        }
        let bytes = self.take(count)?;
        if bytes[0] == 0 {
            return Err(invalid("non-minimal length encoding"));
        }
        let len = bytes.iter().fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
        if len < 0x80 {
            return Err(invalid("long form used for short length"));
        }
        Ok(len)
    }

    /// Read a non-negative INTEGER and return its magnitude without sign padding.
    fn read_unsigned_integer(&mut self) -> Result<&'a [u8], SigningError> {
        let bytes = self.read(TAG_INTEGER)?;
        match bytes {
            [] => Err(invalid("empty integer")),
            [first, ..] if first & 0x80 != 0 => Err(invalid("negative integer")),
            [0, second, ..] if second & 0x80 == 0 => Err(invalid("non-minimal integer encoding")),
            [0, rest @ ..] => Ok(rest),
            _ => Ok(bytes),
        }
    }
}
