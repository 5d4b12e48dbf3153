//! The byte-oriented serialization carrier.
//!
//! [`InArchive`] accumulates typed values into a flat little-endian byte
//! buffer; [`OutArchive`] extracts them back in FIFO order. The
//! communication layer moves archives between ranks as opaque byte
//! ranges.

use byteorder::{ByteOrder, LittleEndian};
use derive_more::Display;

#[derive(Debug, Display, PartialEq)]
pub enum ArchiveError {
    #[display(fmt = "archive exhausted: needed {} bytes, {} left", _0, _1)]
    Eof(usize, usize),
    #[display(fmt = "archived string is not valid utf-8")]
    InvalidUtf8,
}

impl std::error::Error for ArchiveError {}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// An append-only buffer of serialized values.
#[derive(Debug, Default, Clone)]
pub struct InArchive {
    buf: Vec<u8>,
}

impl InArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T: Archivable>(&mut self, value: &T) {
        value.write_to(self);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

/// A FIFO extraction cursor over a serialized byte buffer.
#[derive(Debug, Default)]
pub struct OutArchive {
    buf: Vec<u8>,
    pos: usize,
}

impl OutArchive {
    pub fn get<T: Archivable>(&mut self) -> Result<T> {
        T::read_from(self)
    }

    /// Bytes not yet extracted.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        if self.remaining() < n {
            return Err(ArchiveError::Eof(n, self.remaining()));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

impl From<Vec<u8>> for OutArchive {
    fn from(buf: Vec<u8>) -> Self {
        Self { buf, pos: 0 }
    }
}

impl From<InArchive> for OutArchive {
    fn from(arc: InArchive) -> Self {
        Self::from(arc.into_bytes())
    }
}

/// A value with a fixed little-endian archive encoding.
pub trait Archivable: Sized {
    fn write_to(&self, archive: &mut InArchive);

    fn read_from(archive: &mut OutArchive) -> Result<Self>;
}

macro_rules! impl_archivable_num {
    ($ty:ty, $size:expr, $write:ident, $read:ident) => {
        impl Archivable for $ty {
            fn write_to(&self, archive: &mut InArchive) {
                let mut tmp = [0u8; $size];
                LittleEndian::$write(&mut tmp, *self);
                archive.push_bytes(&tmp);
            }

            fn read_from(archive: &mut OutArchive) -> Result<Self> {
                Ok(LittleEndian::$read(archive.take($size)?))
            }
        }
    };
}

impl_archivable_num!(u16, 2, write_u16, read_u16);
impl_archivable_num!(u32, 4, write_u32, read_u32);
impl_archivable_num!(u64, 8, write_u64, read_u64);
impl_archivable_num!(i16, 2, write_i16, read_i16);
impl_archivable_num!(i32, 4, write_i32, read_i32);
impl_archivable_num!(i64, 8, write_i64, read_i64);
impl_archivable_num!(f32, 4, write_f32, read_f32);
impl_archivable_num!(f64, 8, write_f64, read_f64);

impl Archivable for u8 {
    fn write_to(&self, archive: &mut InArchive) {
        archive.push_bytes(&[*self]);
    }

    fn read_from(archive: &mut OutArchive) -> Result<Self> {
        Ok(archive.take(1)?[0])
    }
}

impl Archivable for i8 {
    fn write_to(&self, archive: &mut InArchive) {
        archive.push_bytes(&[*self as u8]);
    }

    fn read_from(archive: &mut OutArchive) -> Result<Self> {
        Ok(archive.take(1)?[0] as i8)
    }
}

impl Archivable for bool {
    fn write_to(&self, archive: &mut InArchive) {
        archive.push_bytes(&[*self as u8]);
    }

    fn read_from(archive: &mut OutArchive) -> Result<Self> {
        Ok(archive.take(1)?[0] != 0)
    }
}

// usize/isize travel as 64-bit so archives are portable across ranks.
impl Archivable for usize {
    fn write_to(&self, archive: &mut InArchive) {
        (*self as u64).write_to(archive);
    }

    fn read_from(archive: &mut OutArchive) -> Result<Self> {
        Ok(u64::read_from(archive)? as usize)
    }
}

impl Archivable for isize {
    fn write_to(&self, archive: &mut InArchive) {
        (*self as i64).write_to(archive);
    }

    fn read_from(archive: &mut OutArchive) -> Result<Self> {
        Ok(i64::read_from(archive)? as isize)
    }
}

impl Archivable for String {
    fn write_to(&self, archive: &mut InArchive) {
        (self.len() as u64).write_to(archive);
        archive.push_bytes(self.as_bytes());
    }

    fn read_from(archive: &mut OutArchive) -> Result<Self> {
        let len = u64::read_from(archive)? as usize;
        let bytes = archive.take(len)?.to_vec();
        String::from_utf8(bytes).map_err(|_| ArchiveError::InvalidUtf8)
    }
}

impl<T: Archivable> Archivable for Vec<T> {
    fn write_to(&self, archive: &mut InArchive) {
        (self.len() as u64).write_to(archive);
        for item in self {
            item.write_to(archive);
        }
    }

    fn read_from(archive: &mut OutArchive) -> Result<Self> {
        let len = u64::read_from(archive)? as usize;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::read_from(archive)?);
        }
        Ok(items)
    }
}

impl<A: Archivable, B: Archivable> Archivable for (A, B) {
    fn write_to(&self, archive: &mut InArchive) {
        self.0.write_to(archive);
        self.1.write_to(archive);
    }

    fn read_from(archive: &mut OutArchive) -> Result<Self> {
        let a = A::read_from(archive)?;
        let b = B::read_from(archive)?;
        Ok((a, b))
    }
}
