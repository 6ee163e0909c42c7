//! Pattern catalog: one regular expression per syntactic construct the parsers
//! and the ordering engine recognise. Line patterns expect one trimmed source
//! line; the field and method patterns run over the whole joined text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Headers
    pub static ref NAMESPACE:             Regex = Regex::new(r"^\s*package\s+(?P<name>[\w.]+)").unwrap();
    pub static ref IMPORT:                Regex = Regex::new(r"^\s*import\s+(?P<name>[\w.]+)\s*;").unwrap();
    pub static ref CLASS:                 Regex = Regex::new(
        r"^\s*public\s+(?:final\s+)?class\s+(?P<name>\w+)(?:\s+extends\s+(?:\w+\.)*(?P<parent>\w+))?(?:\s+implements\s+(?P<interfaces>[\w.,\s]+))?",
    ).unwrap();
    pub static ref RECORD_CLASS:          Regex = Regex::new(r"public\s+(?:dynamic\s+)?class\s+(?P<name>\w+)").unwrap();
    pub static ref RECORD_CLASS_NUMBERED: Regex = Regex::new(r"public\s+(?:dynamic\s+)?class\s+(?P<name>\w+)#[0-9]+\s").unwrap();
    pub static ref HERITAGE:              Regex = Regex::new(r"extends\s+(?:\w+\.)*(?P<name>\w+)").unwrap();
    pub static ref CONST_ID:              Regex = Regex::new(
        r"^\s*public\s+static\s+const\s+(?P<name>\w+)\s*:\s*\w+\s*=\s*(?P<value>\d+)\s*;",
    ).unwrap();

    // Record members
    pub static ref CONST_FIELD:           Regex = Regex::new(
        r"(?P<access>public|protected|private|internal)\s+(?P<static>static\s+)?const\s+(?P<name>\w+)\s*:\s*(?P<type>[\w.]+(?:\.?<(?:\w+\.)*(?P<generic>[\w<>]+)>)?)(?:\s*=\s*(?P<value>.*))?;",
    ).unwrap();
    pub static ref FIELD:                 Regex = Regex::new(
        r"(?P<access>public|protected|private|internal)\s+(?P<static>static\s+)?var\s+(?P<name>[\w@]+)\s*:\s*(?P<type>[\w.<>]+)(?:\s*=\s*(?P<value>.*))?;",
    ).unwrap();
    pub static ref METHOD:                Regex = Regex::new(
        r"(?:(?P<override>override)\s+)?(?P<access>public|protected|private|internal)\s+(?:(?P<override_late>override)\s+)?(?:final\s+)?function\s+(?:(?P<prop>get|set)\s+)?(?P<name>\w+)\s*\((?P<arguments>[^)]*)\)\s*:\s*(?:\w+\.)*(?P<return_type>[\w*]+)",
    ).unwrap();

    // Statements
    pub static ref CONTROL_STATEMENT:     Regex = Regex::new(
        r"^(?P<kind>else\s+if|if|else|for\s+each|for|while|switch|do|try|catch|finally)\b\s*(?P<condition>.*)$",
    ).unwrap();
    pub static ref ASSIGNATION:           Regex = Regex::new(
        r"^(?:var\s+)?(?P<target>[\w.@\[\]]+)(?:\s*:\s*[\w.<>*]+)?\s*(?P<operator>[-+*/|&]?=)\s*(?P<value>[^=].*?)\s*;?$",
    ).unwrap();

    // Protocol declarations
    pub static ref VAR_PRIMITIVE:         Regex = Regex::new(
        r"^\s*(?P<access>public|private|protected)\s+var\s+(?P<name>\w+)\s*:\s*(?P<type>String|Boolean|int|uint|Number|byte)\s*(?:=\s*[^;]*)?;",
    ).unwrap();
    pub static ref VAR_VECTOR:            Regex = Regex::new(
        r"^\s*(?P<access>public|private|protected)\s+var\s+(?P<name>\w+)\s*:\s*(?:__AS3__\.vec\.)?Vector\.<\s*(?:\w+\.)*(?P<type>\w+)\s*>\s*(?:=\s*[^;]*)?;",
    ).unwrap();
    pub static ref VAR_OBJECT:            Regex = Regex::new(
        r"^\s*public\s+var\s+(?P<name>\w+)\s*:\s*(?P<type>\w+)\s*(?:=\s*[^;]*)?;",
    ).unwrap();

    // Serializer side
    pub static ref WRITE_PRIMITIVE:       Regex = Regex::new(
        r"^\s*output\.(?P<method>write\w+)\(\s*this\.(?P<name>\w+)\s*\)\s*;",
    ).unwrap();
    pub static ref WRITE_ELEMENT:         Regex = Regex::new(
        r"^\s*output\.(?P<method>write\w+)\(\s*this\.(?P<name>\w+)\[\s*\w+\s*\]\s*\)\s*;",
    ).unwrap();
    pub static ref VECTOR_COUNT_WRITE:    Regex = Regex::new(
        r"^\s*output\.(?P<method>write\w+)\(\s*this\.(?P<name>\w+)\.length\s*\)\s*;",
    ).unwrap();
    pub static ref VECTOR_COUNT_READ:     Regex = Regex::new(
        r"^\s*var\s+_(?P<name>\w+?)Len\s*:\s*\w+\s*=\s*input\.(?P<method>read\w+)\(\s*\)\s*;",
    ).unwrap();

    // Deserializer shapes
    pub static ref READ_FLAG:             Regex = Regex::new(
        r"^\s*this\.(?P<name>\w+)\s*=\s*BooleanByteWrapper\.getFlag\(\s*\w+\s*,\s*(?P<bit>\d+)\s*\)\s*;",
    ).unwrap();
    pub static ref READ_PRIMITIVE:        Regex = Regex::new(
        r"^\s*this\.(?P<name>\w+)\s*=\s*input\.(?P<method>read\w+)\(\s*\)\s*;",
    ).unwrap();
    pub static ref READ_OBJECT:           Regex = Regex::new(
        r"^\s*this\.(?P<name>\w+)\.deserialize\w*\(\s*\w+\s*\)\s*;",
    ).unwrap();
    pub static ref POLYMORPHIC_INSTANCE:  Regex = Regex::new(
        r"^\s*this\.(?P<name>\w+)\s*=\s*ProtocolTypeManager\.getInstance\(\s*(?P<type>\w+)\s*,\s*\w+\s*\)\s*;",
    ).unwrap();
    pub static ref NEW_ELEMENT:           Regex = Regex::new(
        r"^\s*(?P<local>_\w+)\s*=\s*new\s+(?P<type>\w+)\(\s*\)\s*;",
    ).unwrap();
    pub static ref DESERIALIZE_ELEMENT:   Regex = Regex::new(
        r"^\s*(?P<local>_\w+)\.deserialize\w*\(\s*\w+\s*\)\s*;",
    ).unwrap();
    pub static ref PUSH_ELEMENT:          Regex = Regex::new(
        r"^\s*this\.(?P<name>\w+)\.push\(\s*(?P<local>_\w+)\s*\)\s*;",
    ).unwrap();
    pub static ref READ_TYPE_ID:          Regex = Regex::new(
        r"^\s*(?:var\s+)?(?P<local>_\w+)(?:\s*:\s*\w+)?\s*=\s*input\.readUnsignedShort\(\s*\)\s*;",
    ).unwrap();
    pub static ref POLYMORPHIC_ELEMENT:   Regex = Regex::new(
        r"^\s*(?:var\s+)?(?P<local>_\w+)(?:\s*:\s*\w+)?\s*=\s*ProtocolTypeManager\.getInstance\(\s*(?P<type>\w+)\s*,\s*(?P<id>_\w+)\s*\)\s*;",
    ).unwrap();
    pub static ref READ_ELEMENT:          Regex = Regex::new(
        r"^\s*(?:var\s+)?(?P<local>_\w+)(?:\s*:\s*\w+)?\s*=\s*input\.(?P<method>read\w+)\(\s*\)\s*;",
    ).unwrap();

    // Enums
    pub static ref ENUM_ITEM:             Regex = Regex::new(
        r"^\s*public\s+static\s+const\s+(?P<name>\w+)\s*:\s*(?P<type>\w+)\s*=\s*(?P<value>[^;]+?)\s*;",
    ).unwrap();

    // Id registries
    pub static ref MESSAGE_ID:            Regex = Regex::new(r"_messagesTypes\[(?P<id>[0-9]+)\]\s*=\s*(?P<name>\w+)").unwrap();
    pub static ref TYPE_ID:               Regex = Regex::new(r"_typesTypes\[(?P<id>[0-9]+)\]\s*=\s*(?P<name>\w+)").unwrap();
}
