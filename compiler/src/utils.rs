use crate::config::GeneratorConfig;

/// JSON-style quoting, used in diagnostics and in emitted string literals.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Uppercases the first character and keeps the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().to_string() + chars.as_str(),
    }
}

/// Record-property casing. A leading non-letter (`_name`, `@base`) is dropped
/// and the following character is uppercased.
pub fn to_pascal_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) if !first.is_alphabetic() => capitalize(chars.as_str()),
        Some(_) => capitalize(s),
    }
}

/// Rewrites a source namespace below the network root into its generated
/// form: the root prefix goes, each segment is capitalized, and the last
/// `remove_count` segments are dropped. `Enums` maps onto the configured enum
/// namespace. Namespaces outside the network root come back unchanged.
pub fn normalize_namespace(namespace: &str, remove_count: usize, config: &GeneratorConfig) -> String {
    let root = &config.network_root_namespace;
    if !namespace.contains(root.as_str()) {
        return namespace.to_string();
    }

    let prefix = format!("{}.", root);
    let stripped = namespace.replacen(&prefix, "", 1);
    let segments: Vec<&str> = stripped.split('.').collect();
    let keep = segments.len().saturating_sub(remove_count);

    let result = segments[..keep]
        .iter()
        .map(|segment| capitalize(segment))
        .collect::<Vec<_>>()
        .join(".");

    if result == "Enums" {
        config.namespaces.enums.clone()
    } else {
        result
    }
}

/// `Types.Game.Look` → `Types/Game/Look`, each segment capitalized.
pub fn namespace_to_path(namespace: &str) -> String {
    namespace
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("/")
}

/// Like [`namespace_to_path`] but keeps the source casing.
pub fn namespace_to_raw_path(namespace: &str) -> String {
    namespace
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
