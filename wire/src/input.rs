use crate::error::WireError;

/// A big-endian reader over a borrowed byte slice, mirroring the data input
/// interface used by the legacy network classes.
///
/// ```
/// let mut input = scriptgen_wire::DataInput::new(&[0, 5, 0x80, 0x01]);
/// assert_eq!(input.read_unsigned_short(), Ok(5));
/// assert_eq!(input.read_var_uh_int(), Ok(128));
/// assert_eq!(input.remaining(), 0);
/// ```
pub struct DataInput<'a> {
    data:  &'a [u8],
    index: usize,
}

impl<'a> DataInput<'a> {
    pub fn new(data: &'a [u8]) -> DataInput<'a> {
        DataInput { data, index: 0 }
    }

    /// Current read position. Starts at 0 and ends at `data.len()` once
    /// everything has been consumed.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        if len > self.remaining() {
            return Err(WireError::UnexpectedEof {
                needed:    len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.index..self.index + len];
        self.index += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        self.take(len)
    }

    pub fn read_boolean(&mut self) -> Result<bool, WireError> {
        Ok(self.read_unsigned_byte()? != 0)
    }

    pub fn read_byte(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_be_bytes(self.take_array()?))
    }

    pub fn read_unsigned_byte(&mut self) -> Result<u8, WireError> {
        Ok(u8::from_be_bytes(self.take_array()?))
    }

    pub fn read_short(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    pub fn read_unsigned_short(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    pub fn read_int(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_unsigned_int(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_float(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_be_bytes(self.take_array()?))
    }

    pub fn read_double(&mut self) -> Result<f64, WireError> {
        Ok(f64::from_be_bytes(self.take_array()?))
    }

    /// Reads a string prefixed with its unsigned 16-bit byte length.
    pub fn read_utf(&mut self) -> Result<String, WireError> {
        let len = self.read_unsigned_short()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8)
    }

    /// Reads 7-bit groups, least significant first, until a byte without the
    /// continuation bit. Fails when the value would exceed `bits`.
    fn read_var(&mut self, bits: u32) -> Result<u64, WireError> {
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        while shift < bits {
            let byte = self.read_unsigned_byte()?;
            result |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        Err(WireError::VarIntTooLong { bits })
    }

    pub fn read_var_int(&mut self) -> Result<i32, WireError> {
        Ok(self.read_var(32)? as u32 as i32)
    }

    pub fn read_var_uh_int(&mut self) -> Result<u32, WireError> {
        Ok(self.read_var(32)? as u32)
    }

    pub fn read_var_short(&mut self) -> Result<i16, WireError> {
        Ok(self.read_var(16)? as u16 as i16)
    }

    pub fn read_var_uh_short(&mut self) -> Result<u16, WireError> {
        Ok(self.read_var(16)? as u16)
    }

    pub fn read_var_long(&mut self) -> Result<i64, WireError> {
        Ok(self.read_var(64)? as i64)
    }

    pub fn read_var_uh_long(&mut self) -> Result<u64, WireError> {
        self.read_var(64)
    }
}

#[test]
fn read_fixed_width() {
    let mut input = DataInput::new(&[0xFF, 0xFF, 0xFE, 0x00, 0x00, 0x01, 0x00, 0x3F, 0x80, 0x00, 0x00]);
    assert_eq!(input.read_byte(), Ok(-1));
    assert_eq!(input.read_short(), Ok(-2));
    assert_eq!(input.read_int(), Ok(256));
    assert_eq!(input.read_float(), Ok(1.0));
    assert_eq!(
        input.read_byte(),
        Err(WireError::UnexpectedEof { needed: 1, remaining: 0 })
    );
}

#[test]
fn read_var_int() {
    let read = |bytes: &[u8]| DataInput::new(bytes).read_var_int();
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[127]), Ok(127));
    assert_eq!(read(&[128, 1]), Ok(128));
    assert_eq!(read(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]), Ok(-1));
    assert_eq!(read(&[128]), Err(WireError::UnexpectedEof { needed: 1, remaining: 0 }));
    assert_eq!(
        read(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]),
        Err(WireError::VarIntTooLong { bits: 32 })
    );
}

#[test]
fn read_var_short() {
    let read = |bytes: &[u8]| DataInput::new(bytes).read_var_short();
    assert_eq!(read(&[0xFF, 0xFF, 0x03]), Ok(-1));
    assert_eq!(read(&[0xFF, 0xFF, 0x01]), Ok(32767));
    assert_eq!(DataInput::new(&[0xFF, 0xFF, 0x03]).read_var_uh_short(), Ok(65535));
}

#[test]
fn read_utf() {
    assert_eq!(DataInput::new(&[0, 3, 97, 98, 99]).read_utf(), Ok("abc".to_string()));
    assert_eq!(DataInput::new(&[0, 0]).read_utf(), Ok(String::new()));
    assert_eq!(DataInput::new(&[0, 2, 0xC3, 0x28]).read_utf(), Err(WireError::InvalidUtf8));
    assert_eq!(
        DataInput::new(&[0, 4, 97]).read_utf(),
        Err(WireError::UnexpectedEof { needed: 4, remaining: 1 })
    );
}
