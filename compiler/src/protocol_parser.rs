use crate::{
    config::GeneratorConfig,
    csharp::map_source_type,
    error::GenError,
    ir::{AccessModifier, ProtocolClass, ProtocolClassVariable, VarType},
    ordering::{order_variables, DeclaredVariable},
    patterns::{
        CLASS, CONST_ID, IMPORT, NAMESPACE, VAR_OBJECT, VAR_PRIMITIVE, VAR_VECTOR, VECTOR_COUNT_READ,
        VECTOR_COUNT_WRITE, WRITE_ELEMENT, WRITE_PRIMITIVE,
    },
    plan::{DEFAULT_COUNT_READ, DEFAULT_COUNT_WRITE},
    preprocess::Preprocessor,
    utils::normalize_namespace,
};
use log::trace;

/// Parses one network message or type source file into a [`ProtocolClass`]
/// whose variables are already in wire order.
pub fn parse_protocol_class(text: &str, config: &GeneratorConfig) -> Result<ProtocolClass, GenError> {
    let source = Preprocessor::protocol().process(text)?;
    let lines = &source.lines;

    let caps = lines
        .iter()
        .find_map(|line| CLASS.captures(line))
        .ok_or_else(|| GenError::NoClassFound(first_line(text)))?;
    let name = caps["name"].to_string();
    let interfaces = caps.name("interfaces").map_or("", |m| m.as_str());
    let parent = resolve_parent(caps.name("parent").map(|m| m.as_str()), interfaces, config);

    let namespace = lines
        .iter()
        .find_map(|line| NAMESPACE.captures(line))
        .map(|caps| normalize_namespace(&caps["name"], 0, config))
        .unwrap_or_default();

    let imports = filter_imports(lines.iter().filter_map(|line| IMPORT.captures(line)).map(|caps| caps["name"].to_string()), config);

    let mut declared = declared_variables(lines);
    annotate_writes(lines, &mut declared);
    let variables = order_variables(lines, &declared, &name)?;

    trace!("{} ({}): {} variables, parent {:?}", name, namespace, variables.len(), parent);

    Ok(ProtocolClass {
        message_id: heuristic_id(lines),
        name,
        namespace,
        parent,
        imports,
        variables,
    })
}

fn first_line(text: &str) -> String {
    text.lines().find(|line| !line.trim().is_empty()).unwrap_or_default().trim().to_string()
}

/// `extends` wins; a class extending nothing (or `Object`) takes the root
/// implied by the interface it implements.
fn resolve_parent(extends: Option<&str>, interfaces: &str, config: &GeneratorConfig) -> String {
    match extends {
        Some(parent) if parent != "Object" => parent.to_string(),
        _ => {
            let implemented: Vec<&str> = interfaces.split(',').map(|i| i.trim().rsplit('.').next().unwrap_or_default()).collect();
            if implemented.contains(&"INetworkType") {
                config.policy.type_root.clone()
            } else if implemented.contains(&"INetworkMessage") {
                config.policy.message_root.clone()
            } else {
                String::new()
            }
        }
    }
}

/// Drops framework and blacklisted imports, normalizes the rest and appends
/// the IO namespace. Order is kept and duplicates removed.
pub fn filter_imports<I>(imports: I, config: &GeneratorConfig) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let framework = config.framework_namespace.to_lowercase();
    let mut result: Vec<String> = Vec::new();

    let kept = imports.into_iter().filter_map(|import| {
        let lower = import.to_lowercase();
        if lower.contains(&framework) || config.blacklisted_imports.iter().any(|b| *b == lower) {
            None
        } else {
            Some(normalize_namespace(&import, 1, config))
        }
    });

    for import in kept.chain(std::iter::once(config.namespaces.io.clone())) {
        if !import.is_empty() && !result.contains(&import) {
            result.push(import);
        }
    }
    result
}

/// `protocolId` when declared, else the first numeric class constant, else 0.
fn heuristic_id(lines: &[String]) -> u32 {
    let constants: Vec<(String, u32)> = lines
        .iter()
        .filter_map(|line| CONST_ID.captures(line))
        .filter_map(|caps| caps["value"].parse::<u32>().ok().map(|value| (caps["name"].to_string(), value)))
        .collect();

    constants
        .iter()
        .find(|(name, _)| name == "protocolId")
        .or_else(|| constants.first())
        .map_or(0, |(_, value)| *value)
}

fn declared_variables(lines: &[String]) -> Vec<DeclaredVariable> {
    let mut declared: Vec<DeclaredVariable> = Vec::new();

    for line in lines {
        let found = if let Some(caps) = VAR_VECTOR.captures(line) {
            Some((
                AccessModifier::parse(&caps["access"]),
                ProtocolClassVariable::new(&caps["name"], &map_source_type(&caps["type"]), VarType::Vector),
            ))
        } else if let Some(caps) = VAR_PRIMITIVE.captures(line) {
            Some((
                AccessModifier::parse(&caps["access"]),
                ProtocolClassVariable::new(&caps["name"], &map_source_type(&caps["type"]), VarType::Primitive),
            ))
        } else {
            VAR_OBJECT.captures(line).map(|caps| {
                (
                    AccessModifier::Public,
                    ProtocolClassVariable::new(&caps["name"], &caps["type"], VarType::Object),
                )
            })
        };

        if let Some((access, variable)) = found {
            if !declared.iter().any(|d| d.variable.name == variable.name) {
                declared.push(DeclaredVariable { access, variable });
            }
        }
    }

    declared
}

/// Serializer-side details the deserializer does not show: the write method
/// of each primitive and vector element, and non-default vector count methods.
fn annotate_writes(lines: &[String], declared: &mut [DeclaredVariable]) {
    fn find<'a>(declared: &'a mut [DeclaredVariable], name: &str) -> Option<&'a mut ProtocolClassVariable> {
        declared.iter_mut().map(|d| &mut d.variable).find(|v| v.name == name)
    }

    for line in lines {
        if let Some(caps) = WRITE_PRIMITIVE.captures(line).or_else(|| WRITE_ELEMENT.captures(line)) {
            if let Some(variable) = find(declared, &caps["name"]) {
                if variable.write_method.is_none() {
                    variable.write_method = Some(caps["method"].to_string());
                }
            }
        } else if let Some(caps) = VECTOR_COUNT_WRITE.captures(line) {
            let method = &caps["method"];
            if method != DEFAULT_COUNT_WRITE {
                if let Some(variable) = find(declared, &caps["name"]) {
                    variable.vector_field_write = Some(method.to_string());
                }
            }
        } else if let Some(caps) = VECTOR_COUNT_READ.captures(line) {
            let method = &caps["method"];
            if method != DEFAULT_COUNT_READ {
                if let Some(variable) = find(declared, &caps["name"]) {
                    variable.vector_field_read = Some(method.to_string());
                }
            }
        }
    }
}
