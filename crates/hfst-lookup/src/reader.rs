// Sequential little-endian byte decoder.

use std::io::{self, Read};

use crate::HfstError;

/// Reads unsigned little-endian values from a byte stream.
///
/// Every read names the file section it belongs to, so a stream that ends
/// early surfaces as [`HfstError::Truncated`] for that section.
pub struct ByteReader<R> {
    inner: R,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Fill `buf` completely.
    pub fn read_exact(&mut self, buf: &mut [u8], section: &'static str) -> Result<(), HfstError> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => HfstError::Truncated { section },
            _ => HfstError::Io(e),
        })
    }

    /// Read `len` bytes into a fresh buffer.
    ///
    /// The buffer grows with the data actually read, so a corrupt length
    /// field cannot force a huge allocation up front.
    pub fn read_bytes(&mut self, len: usize, section: &'static str) -> Result<Vec<u8>, HfstError> {
        let mut buf = Vec::new();
        (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            return Err(HfstError::Truncated { section });
        }
        Ok(buf)
    }

    pub fn read_u8(&mut self, section: &'static str) -> Result<u8, HfstError> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf, section)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self, section: &'static str) -> Result<u16, HfstError> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf, section)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn read_u32(&mut self, section: &'static str) -> Result<u32, HfstError> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf, section)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read bytes up to and including a NUL terminator; the terminator is
    /// consumed but not returned.
    pub fn read_until_nul(&mut self, section: &'static str) -> Result<Vec<u8>, HfstError> {
        let mut bytes = Vec::new();
        loop {
            match self.read_u8(section)? {
                0 => return Ok(bytes),
                b => bytes.push(b),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_values() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut r = ByteReader::new(&data[..]);
        assert_eq!(r.read_u8("test").unwrap(), 1);
        assert_eq!(r.read_u16("test").unwrap(), 0x1234);
        assert_eq!(r.read_u32("test").unwrap(), 0x1234_5678);
    }

    #[test]
    fn short_read_reports_section() {
        let data = [0x01];
        let mut r = ByteReader::new(&data[..]);
        let err = r.read_u32("index table").unwrap_err();
        assert!(matches!(
            err,
            HfstError::Truncated {
                section: "index table"
            }
        ));
    }

    #[test]
    fn read_bytes_exact_and_short() {
        let data = [1u8, 2, 3];
        let mut r = ByteReader::new(&data[..]);
        assert_eq!(r.read_bytes(2, "test").unwrap(), [1, 2]);
        let err = r.read_bytes(usize::MAX / 2, "transition table").unwrap_err();
        assert!(matches!(
            err,
            HfstError::Truncated {
                section: "transition table"
            }
        ));
    }

    #[test]
    fn nul_terminated_strings() {
        let data = b"ab\0\0c\0";
        let mut r = ByteReader::new(&data[..]);
        assert_eq!(r.read_until_nul("alphabet").unwrap(), b"ab");
        assert_eq!(r.read_until_nul("alphabet").unwrap(), b"");
        assert_eq!(r.read_until_nul("alphabet").unwrap(), b"c");
        assert!(r.read_until_nul("alphabet").is_err());
    }
}
