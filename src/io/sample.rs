//! Big-endian sample codec for FITS data blocks
//!
//! FITS stores every data sample big-endian. Each supported sample type
//! implements [`Sample`], tying the Rust type to its BITPIX code and to the
//! `byteorder` read/write calls that decode it.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{Read, Result, Write};

/// A pixel sample type that can live in a FITS data block
pub trait Sample: Copy + Default + PartialEq + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// FITS BITPIX code of this type
    const BITPIX: i64;

    /// NumPy descriptor of the big-endian representation
    const NPY_DESCR: &'static str;

    /// Read one big-endian sample
    fn read_be<R: Read + ?Sized>(reader: &mut R) -> Result<Self>;

    /// Write one big-endian sample
    fn write_be<W: Write + ?Sized>(self, writer: &mut W) -> Result<()>;

    /// Widen the sample to f64
    fn to_f64(self) -> f64;

    /// Number of bytes per sample
    fn byte_size() -> usize {
        (Self::BITPIX.unsigned_abs() / 8) as usize
    }
}

impl Sample for u8 {
    const BITPIX: i64 = 8;
    const NPY_DESCR: &'static str = "|u1";

    fn read_be<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        reader.read_u8()
    }

    fn write_be<W: Write + ?Sized>(self, writer: &mut W) -> Result<()> {
        writer.write_u8(self)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

macro_rules! impl_sample {
    ($ty:ty, $bitpix:expr, $descr:expr, $read:ident, $write:ident) => {
        impl Sample for $ty {
            const BITPIX: i64 = $bitpix;
            const NPY_DESCR: &'static str = $descr;

            fn read_be<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
                reader.$read::<BigEndian>()
            }

            fn write_be<W: Write + ?Sized>(self, writer: &mut W) -> Result<()> {
                writer.$write::<BigEndian>(self)
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_sample!(i16, 16, ">i2", read_i16, write_i16);
impl_sample!(i32, 32, ">i4", read_i32, write_i32);
impl_sample!(i64, 64, ">i8", read_i64, write_i64);
impl_sample!(f32, -32, ">f4", read_f32, write_f32);
impl_sample!(f64, -64, ">f8", read_f64, write_f64);
