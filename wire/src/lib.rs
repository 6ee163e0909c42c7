//! Rust rendition of the binary data contract that the legacy network classes
//! read and write: big-endian fixed-width integers, 7-bit variable-length
//! integers, length-prefixed UTF strings and boolean flags packed into bytes.
//!
//! ```
//! use scriptgen_wire::*;
//!
//! let mut output = DataOutput::new();
//! output.write_var_int(300);
//! output.write_utf("hi").unwrap();
//!
//! let bytes = output.data();
//! assert_eq!(bytes, [172, 2, 0, 2, 104, 105]);
//!
//! let mut input = DataInput::new(&bytes);
//! assert_eq!(input.read_var_int(), Ok(300));
//! assert_eq!(input.read_utf().unwrap(), "hi");
//! ```

pub mod error;
pub mod flags;
pub mod input;
pub mod output;
pub mod primitive;
pub mod value;

pub use error::WireError;
pub use flags::{get_flag, set_flag};
pub use input::DataInput;
pub use output::DataOutput;
pub use primitive::PrimitiveKind;
pub use value::Value;
