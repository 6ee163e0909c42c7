use crate::error::WireError;

/// A growable big-endian writer, the counterpart of [DataInput](crate::DataInput).
///
/// ```
/// let mut output = scriptgen_wire::DataOutput::new();
/// output.write_short(-2);
/// output.write_var_uh_int(128);
/// assert_eq!(output.data(), [0xFF, 0xFE, 0x80, 0x01]);
/// ```
#[derive(Debug, Default)]
pub struct DataOutput {
    data: Vec<u8>,
}

impl DataOutput {
    pub fn new() -> DataOutput {
        DataOutput { data: vec![] }
    }

    /// Consumes the writer and returns everything written so far.
    pub fn data(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
    }

    pub fn write_boolean(&mut self, value: bool) {
        self.data.push(u8::from(value));
    }

    pub fn write_byte(&mut self, value: i8) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_unsigned_byte(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_short(&mut self, value: i16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_unsigned_short(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_int(&mut self, value: i32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_unsigned_int(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_float(&mut self, value: f32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_double(&mut self, value: f64) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_utf(&mut self, value: &str) -> Result<(), WireError> {
        let len = u16::try_from(value.len()).map_err(|_| WireError::StringTooLong(value.len()))?;
        self.write_unsigned_short(len);
        self.write_bytes(value.as_bytes());
        Ok(())
    }

    fn write_var(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.data.push(byte);
                return;
            }
            self.data.push(byte | 0x80);
        }
    }

    pub fn write_var_int(&mut self, value: i32) {
        self.write_var(u64::from(value as u32));
    }

    pub fn write_var_uh_int(&mut self, value: u32) {
        self.write_var(u64::from(value));
    }

    pub fn write_var_short(&mut self, value: i16) {
        self.write_var(u64::from(value as u16));
    }

    pub fn write_var_uh_short(&mut self, value: u16) {
        self.write_var(u64::from(value));
    }

    pub fn write_var_long(&mut self, value: i64) {
        self.write_var(value as u64);
    }

    pub fn write_var_uh_long(&mut self, value: u64) {
        self.write_var(value);
    }
}

#[cfg(test)]
fn write_once(cb: fn(&mut DataOutput)) -> Vec<u8> {
    let mut output = DataOutput::new();
    cb(&mut output);
    output.data()
}

#[test]
fn write_var_int() {
    assert_eq!(write_once(|o| o.write_var_int(0)), [0]);
    assert_eq!(write_once(|o| o.write_var_int(127)), [127]);
    assert_eq!(write_once(|o| o.write_var_int(128)), [128, 1]);
    assert_eq!(write_once(|o| o.write_var_int(-1)), [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
}

#[test]
fn write_var_short() {
    assert_eq!(write_once(|o| o.write_var_short(-1)), [0xFF, 0xFF, 0x03]);
    assert_eq!(write_once(|o| o.write_var_uh_short(300)), [172, 2]);
}

#[test]
fn write_var_long() {
    assert_eq!(write_once(|o| o.write_var_uh_long(1 << 35)), [128, 128, 128, 128, 128, 1]);
    assert_eq!(write_once(|o| o.write_var_long(-1)).len(), 10);
}

#[test]
fn write_utf() {
    assert_eq!(write_once(|o| o.write_utf("abc").unwrap()), [0, 3, 97, 98, 99]);
    let long = "x".repeat(70_000);
    assert_eq!(DataOutput::new().write_utf(&long), Err(WireError::StringTooLong(70_000)));
}

#[test]
fn var_values_read_back() {
    use crate::input::DataInput;

    let mut output = DataOutput::new();
    output.write_var_long(-5_000_000_000);
    output.write_var_uh_long(u64::MAX);
    output.write_var_int(i32::MIN);
    let bytes = output.data();

    let mut input = DataInput::new(&bytes);
    assert_eq!(input.read_var_long(), Ok(-5_000_000_000));
    assert_eq!(input.read_var_uh_long(), Ok(u64::MAX));
    assert_eq!(input.read_var_int(), Ok(i32::MIN));
    assert_eq!(input.remaining(), 0);
}
