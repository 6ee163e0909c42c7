use crate::{
    config::GeneratorConfig,
    error::GenError,
    ir::{EnumClass, EnumItem},
    patterns::{CLASS, ENUM_ITEM, NAMESPACE},
    utils::normalize_namespace,
};

/// Parses a constants-only class into an [`EnumClass`], keeping items in
/// source order.
pub fn parse_enum_class(text: &str, config: &GeneratorConfig) -> Result<EnumClass, GenError> {
    let lines: Vec<&str> = text.lines().map(|line| line.trim()).collect();

    let name = lines
        .iter()
        .find_map(|line| CLASS.captures(line))
        .map(|caps| caps["name"].to_string())
        .ok_or_else(|| GenError::NoClassFound(lines.iter().find(|l| !l.is_empty()).unwrap_or(&"").to_string()))?;

    let namespace = lines
        .iter()
        .find_map(|line| NAMESPACE.captures(line))
        .map(|caps| normalize_namespace(&caps["name"], 0, config))
        .unwrap_or_else(|| config.namespaces.enums.clone());

    let items = lines
        .iter()
        .filter_map(|line| ENUM_ITEM.captures(line))
        .map(|caps| EnumItem {
            name:  caps["name"].to_string(),
            type_: caps["type"].to_string(),
            value: caps["value"].to_string(),
        })
        .collect();

    Ok(EnumClass { name, namespace, items })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_in_order() {
        let text = r#"package com.ankamagames.dofus.network.enums
{
   public class PlayerStateEnum
   {
      public static const NOT_CONNECTED:uint = 0;
      public static const GAME_TYPE_ROLEPLAY:uint = 1;
      public static const UNKNOWN_STATE:uint = 99;

      public function PlayerStateEnum()
      {
         super();
      }
   }
}"#;
        let parsed = parse_enum_class(text, &GeneratorConfig::default()).unwrap();
        assert_eq!(parsed.name, "PlayerStateEnum");
        assert_eq!(parsed.namespace, "Nex.Protocol.Enums");
        let names: Vec<&str> = parsed.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["NOT_CONNECTED", "GAME_TYPE_ROLEPLAY", "UNKNOWN_STATE"]);
        assert_eq!(parsed.items[2].value, "99");
        assert_eq!(parsed.items[0].type_, "uint");
    }

    #[test]
    fn no_class_is_fatal() {
        let err = parse_enum_class("package a.b", &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GenError::NoClassFound(_)));
    }
}
