use crate::error::WireError;

/// Returns `byte` with the bit at `offset` set to `value`.
pub fn set_flag(byte: u8, offset: u8, value: bool) -> Result<u8, WireError> {
    if offset >= 8 {
        return Err(WireError::FlagOffset(offset));
    }
    let mask = 1u8 << offset;
    Ok(if value { byte | mask } else { byte & !mask })
}

/// Reads the bit at `offset` of `byte`.
pub fn get_flag(byte: u8, offset: u8) -> Result<bool, WireError> {
    if offset >= 8 {
        return Err(WireError::FlagOffset(offset));
    }
    Ok(byte & (1u8 << offset) != 0)
}

#[test]
fn set_and_get_flags() {
    let mut byte = 0;
    byte = set_flag(byte, 0, true).unwrap();
    byte = set_flag(byte, 3, true).unwrap();
    byte = set_flag(byte, 7, true).unwrap();
    assert_eq!(byte, 0b1000_1001);
    byte = set_flag(byte, 3, false).unwrap();
    assert_eq!(byte, 0b1000_0001);

    assert_eq!(get_flag(byte, 0), Ok(true));
    assert_eq!(get_flag(byte, 1), Ok(false));
    assert_eq!(get_flag(byte, 7), Ok(true));
}

#[test]
fn flag_offset_out_of_range() {
    assert_eq!(set_flag(0, 8, true), Err(WireError::FlagOffset(8)));
    assert_eq!(get_flag(0, 9), Err(WireError::FlagOffset(9)));
}
