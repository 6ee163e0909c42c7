use crate::{error::WireError, input::DataInput, output::DataOutput, value::Value};

/// Every scalar encoding the legacy data input/output interfaces know about.
/// The reader method decides the kind: writers only exist in a signed flavour
/// for the variable-length encodings (`writeVarInt` serves both `readVarInt`
/// and `readVarUhInt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
    Double,
    Utf,
    VarInt,
    VarUhInt,
    VarShort,
    VarUhShort,
    VarLong,
    VarUhLong,
}

pub const ALL_KINDS: [PrimitiveKind; 16] = [
    PrimitiveKind::Boolean,
    PrimitiveKind::Byte,
    PrimitiveKind::UnsignedByte,
    PrimitiveKind::Short,
    PrimitiveKind::UnsignedShort,
    PrimitiveKind::Int,
    PrimitiveKind::UnsignedInt,
    PrimitiveKind::Float,
    PrimitiveKind::Double,
    PrimitiveKind::Utf,
    PrimitiveKind::VarInt,
    PrimitiveKind::VarUhInt,
    PrimitiveKind::VarShort,
    PrimitiveKind::VarUhShort,
    PrimitiveKind::VarLong,
    PrimitiveKind::VarUhLong,
];

impl PrimitiveKind {
    /// Name of the reader method in the source dialect, e.g. `readVarUhInt`.
    pub fn read_method(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean       => "readBoolean",
            PrimitiveKind::Byte          => "readByte",
            PrimitiveKind::UnsignedByte  => "readUnsignedByte",
            PrimitiveKind::Short         => "readShort",
            PrimitiveKind::UnsignedShort => "readUnsignedShort",
            PrimitiveKind::Int           => "readInt",
            PrimitiveKind::UnsignedInt   => "readUnsignedInt",
            PrimitiveKind::Float         => "readFloat",
            PrimitiveKind::Double        => "readDouble",
            PrimitiveKind::Utf           => "readUTF",
            PrimitiveKind::VarInt        => "readVarInt",
            PrimitiveKind::VarUhInt      => "readVarUhInt",
            PrimitiveKind::VarShort      => "readVarShort",
            PrimitiveKind::VarUhShort    => "readVarUhShort",
            PrimitiveKind::VarLong       => "readVarLong",
            PrimitiveKind::VarUhLong     => "readVarUhLong",
        }
    }

    /// Name of the writer method the source dialect pairs with this kind.
    pub fn write_method(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean                                => "writeBoolean",
            PrimitiveKind::Byte | PrimitiveKind::UnsignedByte     => "writeByte",
            PrimitiveKind::Short | PrimitiveKind::UnsignedShort   => "writeShort",
            PrimitiveKind::Int                                    => "writeInt",
            PrimitiveKind::UnsignedInt                            => "writeUnsignedInt",
            PrimitiveKind::Float                                  => "writeFloat",
            PrimitiveKind::Double                                 => "writeDouble",
            PrimitiveKind::Utf                                    => "writeUTF",
            PrimitiveKind::VarInt | PrimitiveKind::VarUhInt       => "writeVarInt",
            PrimitiveKind::VarShort | PrimitiveKind::VarUhShort   => "writeVarShort",
            PrimitiveKind::VarLong | PrimitiveKind::VarUhLong     => "writeVarLong",
        }
    }

    pub fn from_read_method(name: &str) -> Option<PrimitiveKind> {
        ALL_KINDS.iter().copied().find(|kind| kind.read_method() == name)
    }

    /// Writers are ambiguous between signed and unsigned kinds; the signed
    /// one is returned since both share the same bytes on the wire.
    pub fn from_write_method(name: &str) -> Option<PrimitiveKind> {
        ALL_KINDS.iter().copied().find(|kind| kind.write_method() == name)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            PrimitiveKind::UnsignedByte
                | PrimitiveKind::UnsignedShort
                | PrimitiveKind::UnsignedInt
                | PrimitiveKind::VarUhInt
                | PrimitiveKind::VarUhShort
                | PrimitiveKind::VarUhLong
        )
    }

    pub fn read_value(self, input: &mut DataInput) -> Result<Value, WireError> {
        Ok(match self {
            PrimitiveKind::Boolean       => Value::Bool(input.read_boolean()?),
            PrimitiveKind::Byte          => Value::Int(input.read_byte()?.into()),
            PrimitiveKind::UnsignedByte  => Value::UInt(input.read_unsigned_byte()?.into()),
            PrimitiveKind::Short         => Value::Int(input.read_short()?.into()),
            PrimitiveKind::UnsignedShort => Value::UInt(input.read_unsigned_short()?.into()),
            PrimitiveKind::Int           => Value::Int(input.read_int()?.into()),
            PrimitiveKind::UnsignedInt   => Value::UInt(input.read_unsigned_int()?.into()),
            PrimitiveKind::Float         => Value::Float(input.read_float()?.into()),
            PrimitiveKind::Double        => Value::Float(input.read_double()?),
            PrimitiveKind::Utf           => Value::String(input.read_utf()?),
            PrimitiveKind::VarInt        => Value::Int(input.read_var_int()?.into()),
            PrimitiveKind::VarUhInt      => Value::UInt(input.read_var_uh_int()?.into()),
            PrimitiveKind::VarShort      => Value::Int(input.read_var_short()?.into()),
            PrimitiveKind::VarUhShort    => Value::UInt(input.read_var_uh_short()?.into()),
            PrimitiveKind::VarLong       => Value::Int(input.read_var_long()?),
            PrimitiveKind::VarUhLong     => Value::UInt(input.read_var_uh_long()?),
        })
    }

    /// Writes `value` with this encoding. Integers are truncated to the width
    /// of the encoding, the way the source runtime does it.
    pub fn write_value(self, value: &Value, output: &mut DataOutput) -> Result<(), WireError> {
        match self {
            PrimitiveKind::Boolean       => output.write_boolean(self.expect_bool(value)?),
            PrimitiveKind::Byte          => output.write_byte(self.expect_int(value)? as i8),
            PrimitiveKind::UnsignedByte  => output.write_unsigned_byte(self.expect_int(value)? as u8),
            PrimitiveKind::Short         => output.write_short(self.expect_int(value)? as i16),
            PrimitiveKind::UnsignedShort => output.write_unsigned_short(self.expect_int(value)? as u16),
            PrimitiveKind::Int           => output.write_int(self.expect_int(value)? as i32),
            PrimitiveKind::UnsignedInt   => output.write_unsigned_int(self.expect_int(value)? as u32),
            PrimitiveKind::Float         => output.write_float(self.expect_float(value)? as f32),
            PrimitiveKind::Double        => output.write_double(self.expect_float(value)?),
            PrimitiveKind::Utf           => output.write_utf(self.expect_string(value)?)?,
            PrimitiveKind::VarInt        => output.write_var_int(self.expect_int(value)? as i32),
            PrimitiveKind::VarUhInt      => output.write_var_uh_int(self.expect_int(value)? as u32),
            PrimitiveKind::VarShort      => output.write_var_short(self.expect_int(value)? as i16),
            PrimitiveKind::VarUhShort    => output.write_var_uh_short(self.expect_int(value)? as u16),
            PrimitiveKind::VarLong       => output.write_var_long(self.expect_int(value)? as i64),
            PrimitiveKind::VarUhLong     => output.write_var_uh_long(self.expect_int(value)? as u64),
        }
        Ok(())
    }

    fn mismatch(self, value: &Value) -> WireError {
        WireError::TypeMismatch {
            expected: self.write_method(),
            found:    value.kind_name(),
        }
    }

    fn expect_bool(self, value: &Value) -> Result<bool, WireError> {
        match *value {
            Value::Bool(b) => Ok(b),
            _ => Err(self.mismatch(value)),
        }
    }

    /// Integer payload as raw 128-bit so that both signed and unsigned values
    /// survive until the final truncating cast.
    fn expect_int(self, value: &Value) -> Result<i128, WireError> {
        match *value {
            Value::Int(v) => Ok(v.into()),
            Value::UInt(v) => Ok(v.into()),
            _ => Err(self.mismatch(value)),
        }
    }

    fn expect_float(self, value: &Value) -> Result<f64, WireError> {
        match *value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            _ => Err(self.mismatch(value)),
        }
    }

    fn expect_string(self, value: &Value) -> Result<&str, WireError> {
        match value {
            Value::String(s) => Ok(s.as_str()),
            _ => Err(self.mismatch(value)),
        }
    }
}

#[test]
fn method_names_round_trip() {
    for kind in ALL_KINDS {
        assert_eq!(PrimitiveKind::from_read_method(kind.read_method()), Some(kind));
    }
    assert_eq!(PrimitiveKind::from_write_method("writeVarInt"), Some(PrimitiveKind::VarInt));
    assert_eq!(PrimitiveKind::from_write_method("writeShort"), Some(PrimitiveKind::Short));
    assert_eq!(PrimitiveKind::from_read_method("readSomethingElse"), None);
}

#[test]
fn values_round_trip_through_every_kind() {
    let samples = [
        (PrimitiveKind::Boolean, Value::Bool(true)),
        (PrimitiveKind::Byte, Value::Int(-7)),
        (PrimitiveKind::UnsignedShort, Value::UInt(65_000)),
        (PrimitiveKind::Double, Value::Float(2.25)),
        (PrimitiveKind::Utf, Value::String("héllo".into())),
        (PrimitiveKind::VarUhLong, Value::UInt(9_007_199_254_740_991)),
        (PrimitiveKind::VarShort, Value::Int(-300)),
    ];
    let mut output = DataOutput::new();
    for (kind, value) in &samples {
        kind.write_value(value, &mut output).unwrap();
    }
    let bytes = output.data();
    let mut input = DataInput::new(&bytes);
    for (kind, value) in &samples {
        assert_eq!(&kind.read_value(&mut input).unwrap(), value);
    }
}

#[test]
fn write_rejects_wrong_value_kind() {
    let err = PrimitiveKind::Utf.write_value(&Value::Int(1), &mut DataOutput::new()).unwrap_err();
    assert_eq!(
        err,
        WireError::TypeMismatch { expected: "writeUTF", found: "int" }
    );
}
