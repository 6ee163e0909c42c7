use crate::{
    config::{ClassPolicy, GeneratorConfig},
    gen_protocol::GeneratedFile,
    ir::{AccessModifier, FieldInfo, RecordClass},
    utils::{namespace_to_raw_path, quote, to_pascal_case},
};

/// Record output lives below this directory of the output root.
pub const RECORD_DIR: &str = "DataCenter";

const MODULE_FIELD: &str = "MODULE";

/// What the generator derives from a record before rendering it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordAnalysis {
    /// Field exposed through `IIndexedData.Id`.
    pub identity:  Option<String>,
    /// Fields a getter fills through the localization lookup.
    pub localized: Vec<String>,
}

pub fn analyze_record(record: &RecordClass, config: &GeneratorConfig) -> RecordAnalysis {
    RecordAnalysis {
        identity:  identity_field(record, &config.policy).map(|field| field.name.clone()),
        localized: localized_fields(record, &config.i18n_lookup),
    }
}

fn is_integer(field: &FieldInfo) -> bool {
    field.type_ == "int" || field.type_ == "uint"
}

/// `id`, else the first public integer whose name mentions an id but not a
/// type, else the first public integer mentioning an id at all.
pub fn identity_field<'a>(record: &'a RecordClass, policy: &ClassPolicy) -> Option<&'a FieldInfo> {
    if policy.suppresses_identity(&record.class.name) {
        return None;
    }

    let candidates = || {
        record
            .fields
            .iter()
            .filter(|f| f.modifiers == AccessModifier::Public && is_integer(f))
            .filter(|f| f.name.to_lowercase().contains("id"))
    };

    record
        .field("id")
        .or_else(|| candidates().find(|f| !f.name.to_lowercase().contains("type")))
        .or_else(|| candidates().next())
}

fn localized_fields(record: &RecordClass, lookup: &str) -> Vec<String> {
    record
        .fields
        .iter()
        .filter(|field| {
            record
                .properties
                .iter()
                .filter_map(|property| property.getter.as_ref())
                .flat_map(|getter| getter.assignations())
                .any(|(_, value)| value.contains(lookup) && value.contains(field.name.as_str()))
        })
        .map(|field| field.name.clone())
        .collect()
}

pub fn generate_record_file(record: &RecordClass, config: &GeneratorConfig) -> GeneratedFile {
    let dir = namespace_to_raw_path(&record.class.namespace);
    let path = if dir.is_empty() {
        format!("{}/{}.cs", RECORD_DIR, record.class.name)
    } else {
        format!("{}/{}/{}.cs", RECORD_DIR, dir, record.class.name)
    };
    GeneratedFile {
        path,
        contents: generate_record_class(record, config),
    }
}

fn csharp_type(type_: &str) -> String {
    type_.replace("float", "double")
}

/// Renders a data-record class: raw public fields, the indexed-data accessor
/// and one PascalCase property per instance field.
pub fn generate_record_class(record: &RecordClass, config: &GeneratorConfig) -> String {
    let class = &record.class;
    let namespace = &config.namespaces.records;
    let analysis = analyze_record(record, config);
    let has_heritage = config.policy.has_heritage(&class.heritage);
    let identity = analysis
        .identity
        .as_deref()
        .and_then(|name| record.field(name))
        .filter(|field| field.type_ != "String");

    let mut code: Vec<String> = Vec::new();

    code.push("using System;".to_string());
    code.push("using System.Collections.Generic;".to_string());
    code.push(format!("using {};", namespace));
    code.push(format!("using {}.Tools.D2o;", namespace));
    code.push(String::new());
    code.push(format!("namespace {}", namespace));
    code.push("{".to_string());
    code.push(format!("    [D2OClass({}, {})]", quote(&class.name), quote(&class.namespace)));
    code.push("    [Serializable]".to_string());

    let base = if has_heritage {
        class.heritage.clone()
    } else if identity.is_some() {
        "IDataObject, IIndexedData".to_string()
    } else {
        "IDataObject".to_string()
    };
    code.push(format!("    public class {} : {}", class.name, base));
    code.push("    {".to_string());

    for field in &record.fields {
        if field.modifiers != AccessModifier::Public && field.name != MODULE_FIELD {
            continue;
        }
        if analysis.localized.contains(&field.name) {
            code.push("        [I18NField]".to_string());
        }
        code.push(field_declaration(field));
    }

    if let Some(identity) = identity {
        if !has_heritage {
            code.push("        int IIndexedData.Id".to_string());
            code.push("        {".to_string());
            code.push(format!("            get {{ return (int){}; }}", identity.name));
            code.push("        }".to_string());
        }
    }

    for field in &record.fields {
        if field.modifiers != AccessModifier::Public || field.is_const || field.is_static || field.name == MODULE_FIELD {
            continue;
        }

        let mut name = to_pascal_case(&field.name);
        if name == class.name {
            name.push('_');
        }

        code.push("        [D2OIgnore]".to_string());
        code.push(format!("        public {} {}", csharp_type(&field.type_), name));
        code.push("        {".to_string());
        code.push(format!("            get {{ return this.{}; }}", field.name));
        code.push(format!("            set {{ this.{} = value; }}", field.name));
        code.push("        }".to_string());
    }

    code.push("    }".to_string());
    code.push("}".to_string());
    code.push(String::new());
    code.join("\n")
}

fn field_declaration(field: &FieldInfo) -> String {
    let mut declaration = format!("        {} ", field.modifiers.keyword());
    if field.is_const {
        declaration.push_str("const ");
    }
    if field.is_static {
        declaration.push_str("static ");
    }
    declaration.push_str(&csharp_type(&field.type_));
    declaration.push(' ');
    declaration.push_str(&field.name);
    if !field.value.is_empty() {
        declaration.push_str(" = ");
        declaration.push_str(&field.value);
    }
    declaration.push(';');
    declaration
}
