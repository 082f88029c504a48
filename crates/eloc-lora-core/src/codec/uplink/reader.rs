use std::ops::Range;

use super::error::UplinkError;
use super::layout;
use crate::codec::common::text::latin1_string;

pub struct UplinkReader<'a> {
    payload: &'a [u8],
}

impl<'a> UplinkReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn require_len(&self, needed: usize) -> Result<(), UplinkError> {
        if self.payload.len() < needed {
            return Err(UplinkError::MalformedBuffer {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, UplinkError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(UplinkError::MalformedBuffer {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, range: Range<usize>) -> Result<u16, UplinkError> {
        let bytes: [u8; 2] = self.read_array(range)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn read_u64_be(&self, range: Range<usize>) -> Result<u64, UplinkError> {
        let bytes: [u8; 8] = self.read_array(range)?;
        Ok(u64::from_be_bytes(bytes))
    }

    pub fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], UplinkError> {
        self.payload
            .get(range.clone())
            .ok_or(UplinkError::MalformedBuffer {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    pub fn read_latin1(&self, range: Range<usize>) -> Result<String, UplinkError> {
        self.read_slice(range).map(latin1_string)
    }

    /// Split the header byte into `(tag, version)`.
    pub fn read_header(&self) -> Result<(u8, u8), UplinkError> {
        self.read_u8(layout::HEADER_OFFSET).map(layout::split_header)
    }

    fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], UplinkError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| UplinkError::MalformedBuffer {
            needed: N,
            actual: bytes.len(),
        })
    }
}
