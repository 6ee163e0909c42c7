//! Recovers the wire order of a protocol class from its deserializer.
//!
//! The scan walks every line with a small window around it and classifies the
//! statement shape found there. The first shape that matches a line wins, and
//! a variable keeps the position of its first match only.

use crate::{
    csharp::{primitive_type, target_name},
    error::GenError,
    ir::{AccessModifier, MethodType, ProtocolClassVariable, VarType},
    patterns::{
        DESERIALIZE_ELEMENT, NEW_ELEMENT, POLYMORPHIC_ELEMENT, POLYMORPHIC_INSTANCE, PUSH_ELEMENT, READ_ELEMENT,
        READ_FLAG, READ_OBJECT, READ_PRIMITIVE, READ_TYPE_ID,
    },
};
use log::{debug, trace, warn};
use scriptgen_wire::PrimitiveKind;
use std::collections::HashSet;

/// Lines visible after the current one.
pub const LOOKAHEAD: usize = 4;

/// A declared variable together with its source visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredVariable {
    pub access:   AccessModifier,
    pub variable: ProtocolClassVariable,
}

#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub previous:  &'a str,
    pub current:   &'a str,
    pub following: &'a [String],
}

impl<'a> Window<'a> {
    pub fn at(lines: &'a [String], index: usize) -> Window<'a> {
        let end = (index + 1 + LOOKAHEAD).min(lines.len());
        Window {
            previous:  if index > 0 { lines[index - 1].as_str() } else { "" },
            current:   lines[index].as_str(),
            following: &lines[index + 1..end],
        }
    }

    fn next(&self, offset: usize) -> &'a str {
        self.following.get(offset).map_or("", |line| line.as_str())
    }
}

/// Statement shapes, in matching priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    FlagRead { name: String, bit: u8 },
    PrimitiveRead { name: String, method: String },
    ObjectRead { name: String, polymorphic: bool },
    VectorObject { name: String, type_name: String },
    VectorPolymorphic { name: String, type_name: String },
    VectorPrimitive { name: String, method: String },
}

impl Shape {
    pub fn name(&self) -> &str {
        match self {
            Shape::FlagRead { name, .. }
            | Shape::PrimitiveRead { name, .. }
            | Shape::ObjectRead { name, .. }
            | Shape::VectorObject { name, .. }
            | Shape::VectorPolymorphic { name, .. }
            | Shape::VectorPrimitive { name, .. } => name,
        }
    }
}

pub fn match_window(window: &Window) -> Option<Shape> {
    let line = window.current;

    if let Some(caps) = READ_FLAG.captures(line) {
        if let Ok(bit) = caps["bit"].parse::<u8>() {
            return Some(Shape::FlagRead {
                name: caps["name"].to_string(),
                bit,
            });
        }
    }

    if let Some(caps) = READ_PRIMITIVE.captures(line) {
        return Some(Shape::PrimitiveRead {
            name:   caps["name"].to_string(),
            method: caps["method"].to_string(),
        });
    }

    if let Some(caps) = READ_OBJECT.captures(line) {
        let name = &caps["name"];
        let polymorphic = POLYMORPHIC_INSTANCE
            .captures(window.previous)
            .map_or(false, |prev| &prev["name"] == name);
        return Some(Shape::ObjectRead {
            name: name.to_string(),
            polymorphic,
        });
    }

    if let Some(caps) = NEW_ELEMENT.captures(line) {
        let local = &caps["local"];
        let deserialized = DESERIALIZE_ELEMENT
            .captures(window.next(0))
            .map_or(false, |next| &next["local"] == local);
        if deserialized {
            if let Some(name) = pushed_into(window.next(1), local) {
                return Some(Shape::VectorObject {
                    name,
                    type_name: caps["type"].to_string(),
                });
            }
        }
    }

    if let Some(caps) = READ_TYPE_ID.captures(line) {
        let id_local = &caps["local"];
        if let Some(instance) = POLYMORPHIC_ELEMENT.captures(window.next(0)) {
            if &instance["id"] == id_local {
                let local = &instance["local"];
                let pushed = window.following[1.min(window.following.len())..]
                    .iter()
                    .take(3)
                    .find_map(|next| pushed_into(next, local));
                if let Some(name) = pushed {
                    return Some(Shape::VectorPolymorphic {
                        name,
                        type_name: instance["type"].to_string(),
                    });
                }
            }
        }
    }

    if let Some(caps) = READ_ELEMENT.captures(line) {
        let local = &caps["local"];
        let pushed = window.following.iter().find_map(|next| pushed_into(next, local));
        if let Some(name) = pushed {
            return Some(Shape::VectorPrimitive {
                name,
                method: caps["method"].to_string(),
            });
        }
    }

    None
}

fn pushed_into(line: &str, local: &str) -> Option<String> {
    PUSH_ELEMENT
        .captures(line)
        .filter(|caps| &caps["local"] == local)
        .map(|caps| caps["name"].to_string())
}

/// Orders and classifies `declared` by scanning `lines`.
///
/// Flags are kept together at the head of the order, in source order. Names
/// are passed through the target naming rule once the scan is done.
pub fn order_variables(
    lines: &[String],
    declared: &[DeclaredVariable],
    class_name: &str,
) -> Result<Vec<ProtocolClassVariable>, GenError> {
    let mut ordered: Vec<ProtocolClassVariable> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut flag_count = 0usize;

    for index in 0..lines.len() {
        let shape = match match_window(&Window::at(lines, index)) {
            Some(shape) => shape,
            None => continue,
        };
        if seen.contains(shape.name()) {
            continue;
        }

        let mut variable = declared
            .iter()
            .find(|d| d.variable.name == shape.name())
            .map(|d| d.variable.clone())
            .ok_or_else(|| GenError::UndeclaredField {
                class: class_name.to_string(),
                field: shape.name().to_string(),
            })?;
        variable.index = index;
        trace!("{}: line {} classified as {:?}", class_name, index, shape);

        match shape {
            Shape::FlagRead { bit, .. } => {
                variable.type_of_var = VarType::Primitive;
                variable.method_type = MethodType::BooleanByteWrapper;
                variable.object_type = "bool".to_string();
                variable.flag_bit = Some(bit);
                variable.read_method = None;
                variable.write_method = None;
                seen.insert(variable.name.clone());
                ordered.insert(flag_count, variable);
                flag_count += 1;
                continue;
            }
            Shape::PrimitiveRead { method, .. } => {
                variable.type_of_var = VarType::Primitive;
                variable.method_type = MethodType::Primitive;
                classify_primitive(&mut variable, &method);
            }
            Shape::ObjectRead { polymorphic, .. } => {
                variable.type_of_var = VarType::Object;
                variable.method_type = if polymorphic {
                    MethodType::ProtocolTypeManager
                } else {
                    MethodType::SerializeOrDeserialize
                };
            }
            Shape::VectorObject { type_name, .. } => {
                variable.type_of_var = VarType::Vector;
                variable.method_type = MethodType::SerializeOrDeserialize;
                variable.object_type = type_name;
            }
            Shape::VectorPolymorphic { type_name, .. } => {
                variable.type_of_var = VarType::Vector;
                variable.method_type = MethodType::ProtocolTypeManager;
                variable.object_type = type_name;
            }
            Shape::VectorPrimitive { method, .. } => {
                variable.type_of_var = VarType::Vector;
                variable.method_type = MethodType::VectorPrimitive;
                classify_primitive(&mut variable, &method);
            }
        }

        seen.insert(variable.name.clone());
        ordered.push(variable);
    }

    report_unmatched(declared, &seen, class_name);
    report_flag_bits(&ordered, class_name);

    for variable in ordered.iter_mut() {
        variable.name = target_name(&variable.name);
    }

    Ok(ordered)
}

fn classify_primitive(variable: &mut ProtocolClassVariable, read_method: &str) {
    let kind = PrimitiveKind::from_read_method(read_method);
    if let Some(kind) = kind {
        variable.object_type = primitive_type(kind).to_string();
        if variable.write_method.is_none() {
            variable.write_method = Some(kind.write_method().to_string());
        }
    }
    variable.read_method = Some(read_method.to_string());
}

fn report_unmatched(declared: &[DeclaredVariable], seen: &HashSet<String>, class_name: &str) {
    for d in declared.iter().filter(|d| !seen.contains(&d.variable.name)) {
        if d.access == AccessModifier::Public {
            warn!(
                "{}: variable {} is declared but never deserialized, it is left out",
                class_name, d.variable.name
            );
        } else {
            debug!("{}: ignoring helper variable {}", class_name, d.variable.name);
        }
    }
}

fn report_flag_bits(ordered: &[ProtocolClassVariable], class_name: &str) {
    for (position, variable) in ordered.iter().filter(|v| v.is_flag()).enumerate() {
        let expected = (position % 8) as u8;
        if variable.flag_bit != Some(expected) {
            warn!(
                "{}: flag {} is read from bit {:?} but packed at bit {}",
                class_name, variable.name, variable.flag_bit, expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::Preprocessor;

    fn declared(name: &str, type_: &str, type_of_var: VarType) -> DeclaredVariable {
        DeclaredVariable {
            access:   AccessModifier::Public,
            variable: ProtocolClassVariable::new(name, type_, type_of_var),
        }
    }

    fn lines(text: &str) -> Vec<String> {
        Preprocessor::protocol().process(text).unwrap().lines
    }

    const DESERIALIZER: &str = r#"
        this.id = input.readVarUhInt();
        var _box0:uint = input.readByte();
        this.sitting = BooleanByteWrapper.getFlag(_box0,0);
        this.hidden = BooleanByteWrapper.getFlag(_box0,1);
        var _id3:uint = input.readUnsignedShort();
        this.infos = ProtocolTypeManager.getInstance(GameContextActorInformations,_id3);
        this.infos.deserialize(input);
        this.look = new EntityLook();
        this.look.deserialize(input);
        var _itemsLen:uint = input.readUnsignedShort();
        for(var _i5:uint = 0; _i5 < _itemsLen; _i5++)
        {
            _item5 = new ObjectItem();
            _item5.deserialize(input);
            this.items.push(_item5);
        }
        var _actorsLen:uint = input.readUnsignedShort();
        for(var _i6:uint = 0; _i6 < _actorsLen; _i6++)
        {
            _id6 = input.readUnsignedShort();
            _item6 = ProtocolTypeManager.getInstance(GameRolePlayActorInformations,_id6);
            _item6.deserialize(input);
            this.actors.push(_item6);
        }
        var _idsLen:uint = input.readUnsignedShort();
        for(var _i7:uint = 0; _i7 < _idsLen; _i7++)
        {
            _val7 = input.readVarUhShort();
            if(_val7 < 0)
            {
                throw new Error("Forbidden value");
            }
            this.ids.push(_val7);
        }
        this.name = input.readUTF();
    "#;

    fn all_declared() -> Vec<DeclaredVariable> {
        vec![
            declared("id", "uint", VarType::Primitive),
            declared("sitting", "Boolean", VarType::Primitive),
            declared("hidden", "Boolean", VarType::Primitive),
            declared("infos", "GameContextActorInformations", VarType::Object),
            declared("look", "EntityLook", VarType::Object),
            declared("items", "ObjectItem", VarType::Vector),
            declared("actors", "GameRolePlayActorInformations", VarType::Vector),
            declared("ids", "uint", VarType::Vector),
            declared("name", "String", VarType::Primitive),
        ]
    }

    #[test]
    fn classifies_every_shape() {
        let ordered = order_variables(&lines(DESERIALIZER), &all_declared(), "Sample").unwrap();
        let names: Vec<&str> = ordered.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["sitting", "hidden", "objectId", "infos", "look", "items", "actors", "ids", "name"]
        );

        assert_eq!(ordered[0].method_type, MethodType::BooleanByteWrapper);
        assert_eq!(ordered[1].flag_bit, Some(1));
        assert_eq!(ordered[2].object_type, "uint");
        assert_eq!(ordered[2].read_method.as_deref(), Some("readVarUhInt"));
        assert_eq!(ordered[2].write_method.as_deref(), Some("writeVarInt"));
        assert_eq!(ordered[3].method_type, MethodType::ProtocolTypeManager);
        assert_eq!(ordered[4].method_type, MethodType::SerializeOrDeserialize);
        assert_eq!(ordered[5].type_of_var, VarType::Vector);
        assert_eq!(ordered[5].method_type, MethodType::SerializeOrDeserialize);
        assert_eq!(ordered[6].method_type, MethodType::ProtocolTypeManager);
        assert_eq!(ordered[6].object_type, "GameRolePlayActorInformations");
        assert_eq!(ordered[7].method_type, MethodType::VectorPrimitive);
        assert_eq!(ordered[7].object_type, "ushort");
        assert_eq!(ordered[8].object_type, "string");
    }

    #[test]
    fn ordering_is_idempotent() {
        let source = lines(DESERIALIZER);
        let first = order_variables(&source, &all_declared(), "Sample").unwrap();
        let second = order_variables(&source, &all_declared(), "Sample").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn repeated_reads_keep_first_position() {
        let source = lines("this.a = input.readInt();\nthis.b = input.readInt();\nthis.a = input.readShort();");
        let ordered = order_variables(
            &source,
            &[declared("a", "int", VarType::Primitive), declared("b", "int", VarType::Primitive)],
            "Twice",
        )
        .unwrap();
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].name, "a");
        assert_eq!(ordered[0].read_method.as_deref(), Some("readInt"));
    }

    #[test]
    fn undeclared_read_is_fatal() {
        let err = order_variables(&lines("this.ghost = input.readInt();"), &[], "Haunted").unwrap_err();
        assert!(matches!(err, GenError::UndeclaredField { ref field, .. } if field == "ghost"));
    }

    #[test]
    fn unmatched_declarations_are_dropped() {
        let ordered = order_variables(
            &lines("this.a = input.readInt();"),
            &[declared("a", "int", VarType::Primitive), declared("unused", "int", VarType::Primitive)],
            "Partial",
        )
        .unwrap();
        assert_eq!(ordered.len(), 1);
    }

    #[test]
    fn flags_stay_contiguous() {
        let source = lines(
            "this.x = input.readInt();\nthis.f0 = BooleanByteWrapper.getFlag(_box0,0);\nthis.y = input.readInt();\nthis.f1 = BooleanByteWrapper.getFlag(_box0,1);",
        );
        let declared = vec![
            declared("x", "int", VarType::Primitive),
            declared("y", "int", VarType::Primitive),
            declared("f0", "Boolean", VarType::Primitive),
            declared("f1", "Boolean", VarType::Primitive),
        ];
        let ordered = order_variables(&source, &declared, "Flags").unwrap();
        let names: Vec<&str> = ordered.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["f0", "f1", "x", "y"]);
    }
}
