//! Naming and type rules of the generated C# sources.

use crate::utils::{capitalize, namespace_to_path};
use scriptgen_wire::PrimitiveKind;

pub const KEYWORDS: [&str; 77] = [
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch",
    "char", "checked", "class", "const", "continue", "decimal", "default", "delegate",
    "do", "double", "else", "enum", "event", "explicit", "extern", "false",
    "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit",
    "in", "int", "interface", "internal", "is", "lock", "long", "namespace",
    "new", "null", "object", "operator", "out", "override", "params", "private",
    "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw",
    "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort",
    "using", "virtual", "void", "volatile", "while",
];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Name a protocol variable takes in generated code. `id` would collide with
/// the generated id constant; keywords get the verbatim `@` prefix.
pub fn target_name(name: &str) -> String {
    if name == "id" {
        "objectId".to_string()
    } else if is_keyword(name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}

/// `readVarUhInt` → `ReadVarUInt`.
pub fn method_name(source: &str) -> String {
    capitalize(&source.replace("Uh", "U"))
}

/// C# type produced by a wire read.
pub fn primitive_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean       => "bool",
        PrimitiveKind::Byte          => "sbyte",
        PrimitiveKind::UnsignedByte  => "byte",
        PrimitiveKind::Short         => "short",
        PrimitiveKind::UnsignedShort => "ushort",
        PrimitiveKind::Int           => "int",
        PrimitiveKind::UnsignedInt   => "uint",
        PrimitiveKind::Float         => "float",
        PrimitiveKind::Double        => "double",
        PrimitiveKind::Utf           => "string",
        PrimitiveKind::VarInt        => "int",
        PrimitiveKind::VarUhInt      => "uint",
        PrimitiveKind::VarShort      => "short",
        PrimitiveKind::VarUhShort    => "ushort",
        PrimitiveKind::VarLong       => "long",
        PrimitiveKind::VarUhLong     => "ulong",
    }
}

/// Maps a declared source type onto C#. Class names pass through.
pub fn map_source_type(type_name: &str) -> String {
    match type_name {
        "String" => "string".to_string(),
        "Boolean" => "bool".to_string(),
        "int" => "int".to_string(),
        "uint" => "uint".to_string(),
        "Number" => "double".to_string(),
        "byte" => "sbyte".to_string(),
        other => other.to_string(),
    }
}

/// Cast applied to `Count()` before a vector length is written.
pub fn count_cast(write_method: &str) -> &'static str {
    match write_method {
        "writeByte" => "(byte)",
        "writeInt" | "writeVarInt" => "(int)",
        "writeUnsignedInt" => "(uint)",
        _ => "(ushort)",
    }
}

/// Relative output path of a generated class.
pub fn output_path(namespace: &str, class_name: &str) -> String {
    let dir = namespace_to_path(namespace);
    if dir.is_empty() {
        format!("{}.cs", class_name)
    } else {
        format!("{}/{}.cs", dir, class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames() {
        assert_eq!(target_name("id"), "objectId");
        assert_eq!(target_name("params"), "@params");
        assert_eq!(target_name("object"), "@object");
        assert_eq!(target_name("typeId"), "typeId");
        assert_eq!(target_name("look"), "look");
    }

    #[test]
    fn method_names() {
        assert_eq!(method_name("readVarUhInt"), "ReadVarUInt");
        assert_eq!(method_name("writeVarShort"), "WriteVarShort");
        assert_eq!(method_name("readUTF"), "ReadUTF");
    }

    #[test]
    fn types_and_paths() {
        assert_eq!(primitive_type(PrimitiveKind::VarUhLong), "ulong");
        assert_eq!(map_source_type("Number"), "double");
        assert_eq!(map_source_type("EntityLook"), "EntityLook");
        assert_eq!(count_cast("writeShort"), "(ushort)");
        assert_eq!(output_path("Types.Game.Look", "EntityLook"), "Types/Game/Look/EntityLook.cs");
        assert_eq!(output_path("", "Root"), "Root.cs");
    }
}
