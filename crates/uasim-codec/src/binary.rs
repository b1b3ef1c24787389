//! Primitive binary encoding.
//!
//! All integers and floats are little-endian and fixed width. Strings and
//! byte strings carry an Int32 length prefix where `-1` means null. Booleans
//! are one byte. DateTime is an Int64 count of 100-nanosecond ticks since
//! 1601-01-01 UTC. Guids use the mixed-endian 16-byte layout (Data1..Data3
//! little-endian, Data4 as raw bytes). There is no padding and no tagging.

use bytes::{Buf, BufMut, BytesMut};
use uasim_types::DateTime;
use uuid::Uuid;

use crate::error::{CodecError, CodecResult};

/// Ticks between 1601-01-01 and the Unix epoch.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Appends primitive values to a growable buffer.
#[derive(Debug, Default)]
pub struct BinaryEncoder {
    buf: BytesMut,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf.to_vec()
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.put_i8(value);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16_le(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16_le(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64_le(value);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.put_u64_le(value);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.put_f32_le(value);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.put_f64_le(value);
    }

    /// Write a length-prefixed byte sequence; `None` encodes as null.
    pub fn write_bytes(&mut self, value: Option<&[u8]>) -> CodecResult<()> {
        match value {
            None => self.write_i32(-1),
            Some(bytes) => {
                let len = i32::try_from(bytes.len())
                    .map_err(|_| CodecError::OutOfRange(format!("{} byte payload", bytes.len())))?;
                self.write_i32(len);
                self.buf.put_slice(bytes);
            }
        }
        Ok(())
    }

    pub fn write_string(&mut self, value: Option<&str>) -> CodecResult<()> {
        self.write_bytes(value.map(str::as_bytes))
    }

    /// Write a DateTime as 100-nanosecond ticks. Values the tick count cannot
    /// carry exactly (sub-tick precision, leap seconds, overflow) are
    /// rejected rather than rounded.
    pub fn write_date_time(&mut self, value: &DateTime) -> CodecResult<()> {
        let out_of_range = || CodecError::OutOfRange(value.to_rfc3339());
        let nanos = value.timestamp_subsec_nanos();
        if nanos % 100 != 0 || nanos >= 1_000_000_000 {
            return Err(out_of_range());
        }
        let ticks = value
            .timestamp()
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(i64::from(nanos / 100)))
            .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
            .ok_or_else(out_of_range)?;
        self.write_i64(ticks);
        Ok(())
    }

    pub fn write_guid(&mut self, value: &Uuid) {
        let (d1, d2, d3, d4) = value.as_fields();
        self.buf.put_u32_le(d1);
        self.buf.put_u16_le(d2);
        self.buf.put_u16_le(d3);
        self.buf.put_slice(d4);
    }
}

/// Reads primitive values from a byte slice, failing on truncation.
#[derive(Debug)]
pub struct BinaryDecoder<'a> {
    buf: &'a [u8],
}

impl<'a> BinaryDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(self) -> CodecResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }

    fn need(&self, needed: usize) -> CodecResult<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(CodecError::Truncated { needed, remaining });
        }
        Ok(())
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        self.need(1)?;
        Ok(self.buf.get_u8() != 0)
    }

    pub fn read_i8(&mut self) -> CodecResult<i8> {
        self.need(1)?;
        Ok(self.buf.get_i8())
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_i16(&mut self) -> CodecResult<i16> {
        self.need(2)?;
        Ok(self.buf.get_i16_le())
    }

    pub fn read_u16(&mut self) -> CodecResult<u16> {
        self.need(2)?;
        Ok(self.buf.get_u16_le())
    }

    pub fn read_i32(&mut self) -> CodecResult<i32> {
        self.need(4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_i64(&mut self) -> CodecResult<i64> {
        self.need(8)?;
        Ok(self.buf.get_i64_le())
    }

    pub fn read_u64(&mut self) -> CodecResult<u64> {
        self.need(8)?;
        Ok(self.buf.get_u64_le())
    }

    pub fn read_f32(&mut self) -> CodecResult<f32> {
        self.need(4)?;
        Ok(self.buf.get_f32_le())
    }

    pub fn read_f64(&mut self) -> CodecResult<f64> {
        self.need(8)?;
        Ok(self.buf.get_f64_le())
    }

    pub fn read_bytes(&mut self) -> CodecResult<Option<Vec<u8>>> {
        let len = self.read_i32()?;
        if len == -1 {
            return Ok(None);
        }
        let len = usize::try_from(len).map_err(|_| CodecError::InvalidLength(len))?;
        self.need(len)?;
        let bytes = self.buf[..len].to_vec();
        self.buf.advance(len);
        Ok(Some(bytes))
    }

    pub fn read_string(&mut self) -> CodecResult<Option<String>> {
        match self.read_bytes()? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| CodecError::InvalidUtf8),
        }
    }

    pub fn read_date_time(&mut self) -> CodecResult<DateTime> {
        let ticks = self.read_i64()?;
        let unix_ticks = ticks
            .checked_sub(UNIX_EPOCH_TICKS)
            .ok_or_else(|| CodecError::OutOfRange(format!("{ticks} ticks")))?;
        let secs = unix_ticks.div_euclid(TICKS_PER_SECOND);
        // rem_euclid is in 0..TICKS_PER_SECOND, so the cast cannot truncate.
        let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        DateTime::from_timestamp(secs, nanos)
            .ok_or_else(|| CodecError::OutOfRange(format!("{ticks} ticks")))
    }

    pub fn read_guid(&mut self) -> CodecResult<Uuid> {
        self.need(16)?;
        let d1 = self.buf.get_u32_le();
        let d2 = self.buf.get_u16_le();
        let d3 = self.buf.get_u16_le();
        let mut d4 = [0u8; 8];
        self.buf.copy_to_slice(&mut d4);
        Ok(Uuid::from_fields(d1, d2, d3, &d4))
    }
}
