use crate::{
    config::GeneratorConfig,
    csharp::{map_source_type, output_path},
    gen_protocol::GeneratedFile,
    ir::EnumClass,
};

pub const ENUM_DIR: &str = "Enums";

pub fn generate_enum_file(enum_class: &EnumClass, config: &GeneratorConfig) -> GeneratedFile {
    GeneratedFile {
        path:     output_path(ENUM_DIR, &enum_class.name),
        contents: generate_enum(enum_class, config),
    }
}

/// Numeric constants become a C# `enum`. A class with any string constant
/// can't, and is emitted as a static class of constants instead.
///
/// The parsed namespace is kept; every enum file still lands in [`ENUM_DIR`].
pub fn generate_enum(enum_class: &EnumClass, config: &GeneratorConfig) -> String {
    let namespace = if enum_class.namespace.is_empty() {
        &config.namespaces.enums
    } else {
        &enum_class.namespace
    };

    let mut code: Vec<String> = Vec::new();
    code.push(format!("namespace {}", namespace));
    code.push("{".to_string());

    let has_strings = enum_class.items.iter().any(|item| item.type_ == "String");
    if has_strings {
        code.push(format!("    public static class {}", enum_class.name));
        code.push("    {".to_string());
        for item in &enum_class.items {
            code.push(format!(
                "        public const {} {} = {};",
                map_source_type(&item.type_),
                item.name,
                item.value
            ));
        }
    } else {
        let unsigned = !enum_class.items.is_empty() && enum_class.items.iter().all(|item| item.type_ == "uint");
        if unsigned {
            code.push(format!("    public enum {} : uint", enum_class.name));
        } else {
            code.push(format!("    public enum {}", enum_class.name));
        }
        code.push("    {".to_string());
        let items: Vec<String> = enum_class
            .items
            .iter()
            .map(|item| format!("        {} = {}", item.name, item.value))
            .collect();
        code.push(items.join(",\n"));
    }

    code.push("    }".to_string());
    code.push("}".to_string());
    code.push(String::new());
    code.join("\n")
}
