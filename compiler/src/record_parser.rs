use crate::{
    config::ClassPolicy,
    error::GenError,
    ir::{AccessModifier, Argument, ClassInfo, ClassModifier, FieldInfo, MethodInfo, PropertyInfo, RecordClass, Statement},
    patterns::{ASSIGNATION, CLASS, CONST_FIELD, CONTROL_STATEMENT, FIELD, HERITAGE, METHOD, NAMESPACE, RECORD_CLASS, RECORD_CLASS_NUMBERED},
    preprocess::{BracketIndex, Preprocessor, SourceText},
};
use log::{debug, trace};
use regex::{Captures, Regex};

/// Parses one data-record source file.
///
/// `file_name` only selects the class-header variant: names containing `#`
/// come from numbered class definitions (`public class Foo#12 ...`).
pub fn parse_record_class(file_name: &str, text: &str, policy: &ClassPolicy) -> Result<RecordClass, GenError> {
    let source = Preprocessor::records().process(text)?;
    let class = parse_class_info(file_name, &source)?;

    let fields = parse_fields(&source.text());

    let (methods, properties) = if policy.skips_methods(&class.name) {
        debug!("Skipping method bodies of {}", class.name);
        (Vec::new(), Vec::new())
    } else {
        parse_methods(&source)
    };

    trace!(
        "Record {}: {} fields, {} methods, {} properties",
        class.name,
        fields.len(),
        methods.len(),
        properties.len()
    );

    Ok(RecordClass {
        class,
        fields,
        methods,
        properties,
    })
}

fn first_capture(lines: &[String], pattern: &Regex, group: &str) -> Option<String> {
    lines
        .iter()
        .find_map(|line| pattern.captures(line))
        .and_then(|caps| caps.name(group).map(|m| m.as_str().to_string()))
}

fn parse_class_info(file_name: &str, source: &SourceText) -> Result<ClassInfo, GenError> {
    let header = if file_name.contains('#') {
        &*RECORD_CLASS_NUMBERED
    } else {
        &*RECORD_CLASS
    };

    let name = first_capture(&source.lines, header, "name")
        .filter(|name| !name.is_empty())
        .ok_or_else(|| GenError::NoClassFound(file_name.to_string()))?;

    let class_line = source.lines.iter().find(|line| CLASS.is_match(line) || header.is_match(line));
    let class_modifier = match class_line {
        Some(line) if line.contains(" dynamic ") => ClassModifier::Dynamic,
        Some(line) if line.contains(" final ") => ClassModifier::Final,
        _ => ClassModifier::None,
    };

    Ok(ClassInfo {
        name,
        namespace: first_capture(&source.lines, &NAMESPACE, "name").unwrap_or_default(),
        heritage: first_capture(&source.lines, &HERITAGE, "name").unwrap_or_default(),
        access_modifier: AccessModifier::Public,
        class_modifier,
    })
}

/// Constants first, then instance fields, each in source order.
pub fn parse_fields(text: &str) -> Vec<FieldInfo> {
    let mut fields = Vec::new();

    for caps in CONST_FIELD.captures_iter(text) {
        let type_ = match caps.name("generic") {
            Some(generic) => format!("List<{}>", generic.as_str()),
            None => caps["type"].to_string(),
        };
        fields.push(FieldInfo {
            modifiers: AccessModifier::parse(&caps["access"]),
            name: caps["name"].to_string(),
            type_,
            value: capture_value(&caps),
            is_const: true,
            is_static: caps.name("static").is_some(),
        });
    }

    for caps in FIELD.captures_iter(text) {
        let name = &caps["name"];
        let type_ = &caps["type"];
        if is_type_selector(name, type_) {
            trace!("Dropping type selector field {}:{}", name, type_);
            continue;
        }
        fields.push(FieldInfo {
            modifiers: AccessModifier::parse(&caps["access"]),
            name: name.to_string(),
            type_: type_.to_string(),
            value: capture_value(&caps),
            is_const: false,
            is_static: caps.name("static").is_some(),
        });
    }

    fields
}

fn capture_value(caps: &Captures) -> String {
    caps.name("value")
        .map(|value| value.as_str().trim_start_matches('=').trim().to_string())
        .unwrap_or_default()
}

/// Fields that only pick a subtype at load time carry no data of their own.
fn is_type_selector(name: &str, type_: &str) -> bool {
    (name == "type" && type_.contains("Type")) || type_.contains("type")
}

/// Splits a raw argument list. An explicit default moves an argument into the
/// defaulted tail; every later argument without one defaults to `null`.
pub fn parse_arguments(text: &str) -> Vec<Argument> {
    let mut arguments: Vec<Argument> = Vec::new();

    for raw in text.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let (declaration, explicit_default) = match raw.split_once('=') {
            Some((declaration, default)) => (declaration.trim(), Some(default.trim().to_string())),
            None => (raw, None),
        };

        let (name, type_text) = match declaration.split_once(':') {
            Some((name, type_text)) => (name.trim(), type_text.trim()),
            None => (declaration, ""),
        };

        let type_ = if type_text.contains('<') {
            let generic = type_text
                .rsplit('<')
                .next()
                .and_then(|tail| tail.split('>').next())
                .and_then(|inner| inner.rsplit('.').next())
                .unwrap_or_default();
            format!("List<{}>", generic)
        } else {
            type_text.rsplit('.').next().unwrap_or_default().trim().to_string()
        };

        let default_value = match explicit_default {
            Some(default) => Some(default),
            None if arguments.last().map_or(false, |prev| prev.default_value.is_some()) => {
                Some("null".to_string())
            }
            None => None,
        };

        arguments.push(Argument {
            name: name.to_string(),
            type_,
            default_value,
        });
    }

    arguments
}

/// Extracts plain methods and folds `get`/`set` pairs into properties.
pub fn parse_methods(source: &SourceText) -> (Vec<MethodInfo>, Vec<PropertyInfo>) {
    let text = source.text();
    let mut methods: Vec<MethodInfo> = Vec::new();
    let mut properties: Vec<PropertyInfo> = Vec::new();

    for caps in METHOD.captures_iter(&text) {
        let whole = match caps.get(0) {
            Some(whole) => whole,
            None => continue,
        };
        let header_line = text[..whole.start()].matches('\n').count() + whole.as_str().matches('\n').count();
        let body = method_body(&source.lines, &source.brackets, header_line);

        let method = MethodInfo {
            name:            caps["name"].to_string(),
            access_modifier: AccessModifier::parse(&caps["access"]),
            is_override:     caps.name("override").is_some() || caps.name("override_late").is_some(),
            return_type:     caps["return_type"].to_string(),
            arguments:       parse_arguments(caps.name("arguments").map_or("", |m| m.as_str())),
            statements:      parse_statements(body),
        };

        match caps.name("prop").map(|m| m.as_str()) {
            Some(kind) => {
                let index = match properties.iter().position(|p| p.name == method.name) {
                    Some(index) => index,
                    None => {
                        properties.push(PropertyInfo {
                            name:            method.name.clone(),
                            access_modifier: method.access_modifier,
                            property_type:   method.return_type.clone(),
                            getter:          None,
                            setter:          None,
                        });
                        properties.len() - 1
                    }
                };
                let property = &mut properties[index];
                if kind == "set" {
                    property.setter = Some(method);
                } else {
                    property.property_type = method.return_type.clone();
                    property.getter = Some(method);
                }
            }
            None => methods.push(method),
        }
    }

    (methods, properties)
}

/// Lines strictly between the opening brace of a method and its closing brace.
/// A header not ending in `{` puts the brace on the following line.
fn method_body<'a>(lines: &'a [String], brackets: &BracketIndex, header_line: usize) -> &'a [String] {
    let mut open = header_line;
    if lines.get(open).map_or(false, |line| !line.ends_with('{')) {
        open += 1;
    }
    match brackets.get(&open) {
        Some(&close) if close > open + 1 => &lines[open + 1..close],
        _ => &[],
    }
}

/// Turns body lines into statements, tracking control nesting so that only
/// braces closing a control block become [`Statement::ControlEnd`].
pub fn parse_statements(lines: &[String]) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut depth = 0usize;

    for line in lines.iter().map(|line| line.trim()) {
        if line.is_empty() || line == "{" {
            continue;
        }

        let mut line = line;
        if let Some(rest) = line.strip_prefix('}') {
            if depth > 0 {
                statements.push(Statement::ControlEnd);
                depth -= 1;
            }
            line = rest.trim();
            if line.is_empty() {
                continue;
            }
        }

        if let Some(caps) = CONTROL_STATEMENT.captures(line) {
            let condition = caps["condition"].trim().trim_end_matches('{').trim().to_string();
            statements.push(Statement::Control {
                kind: caps["kind"].split_whitespace().collect::<Vec<_>>().join(" "),
                condition,
            });
            depth += 1;
        } else if let Some(caps) = ASSIGNATION.captures(line) {
            statements.push(Statement::Assignation {
                target: caps["target"].to_string(),
                value:  caps["value"].to_string(),
            });
        } else {
            statements.push(Statement::Unknown(line.to_string()));
        }
    }

    statements
}
