//! The ordered list of wire operations of one protocol class.
//!
//! Both the C# emitter and the reference codec walk the same plan, so the
//! generated serializer and the codec agree byte for byte.

use crate::{
    config::GeneratorConfig,
    ir::{MethodType, ProtocolClass, ProtocolClassVariable, VarType},
};
use scriptgen_wire::PrimitiveKind;

pub const DEFAULT_COUNT_READ: &str = "readUnsignedShort";
pub const DEFAULT_COUNT_WRITE: &str = "writeShort";
pub const FLAGS_PER_BYTE: usize = 8;

/// A primitive wire value, with the source method names it was read and
/// written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveAccess {
    pub kind:         Option<PrimitiveKind>,
    pub read_method:  String,
    pub write_method: String,
}

impl PrimitiveAccess {
    fn of(variable: &ProtocolClassVariable) -> PrimitiveAccess {
        let kind = variable.primitive_kind();
        let read_method = variable
            .read_method
            .clone()
            .or_else(|| kind.map(|k| k.read_method().to_string()))
            .unwrap_or_default();
        let write_method = variable
            .write_method
            .clone()
            .or_else(|| kind.map(|k| k.write_method().to_string()))
            .unwrap_or_default();
        PrimitiveAccess {
            kind,
            read_method,
            write_method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Primitive(PrimitiveAccess),
    Object(String),
    Polymorphic(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The parent class's fields go first.
    CallBase,
    Primitive {
        name:   String,
        access: PrimitiveAccess,
    },
    /// The K-th flag of a class lives at bit `K mod 8` of packed byte `K div 8`.
    Flag {
        name:         String,
        group:        usize,
        bit:          u8,
        opens_group:  bool,
        closes_group: bool,
    },
    Object {
        name:        String,
        type_name:   String,
        polymorphic: bool,
    },
    Vector {
        name:        String,
        element:     Element,
        count_read:  String,
        count_write: String,
    },
    /// Opaque payload prefixed by its var-int length.
    RawPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationPlan {
    pub class_name: String,
    pub steps:      Vec<Step>,
}

impl SerializationPlan {
    pub fn build(class: &ProtocolClass, config: &GeneratorConfig) -> SerializationPlan {
        let policy = &config.policy;
        let mut steps = Vec::new();

        if policy.is_raw_payload(&class.name) {
            steps.push(Step::RawPayload);
            return SerializationPlan {
                class_name: class.name.clone(),
                steps,
            };
        }

        if !policy.is_protocol_root(&class.parent) {
            steps.push(Step::CallBase);
        }

        let flag_total = class.variables.iter().filter(|v| v.is_flag()).count();
        let mut flag_index = 0usize;

        for variable in &class.variables {
            let name = variable.name.clone();
            let step = match (variable.type_of_var, variable.method_type) {
                (_, MethodType::BooleanByteWrapper) => {
                    let position = flag_index % FLAGS_PER_BYTE;
                    let step = Step::Flag {
                        name,
                        group: flag_index / FLAGS_PER_BYTE,
                        bit: position as u8,
                        opens_group: position == 0,
                        closes_group: position == FLAGS_PER_BYTE - 1 || flag_index + 1 == flag_total,
                    };
                    flag_index += 1;
                    step
                }
                (VarType::Primitive, _) => Step::Primitive {
                    name,
                    access: PrimitiveAccess::of(variable),
                },
                (VarType::Object, method_type) => Step::Object {
                    name,
                    type_name: variable.object_type.clone(),
                    polymorphic: method_type == MethodType::ProtocolTypeManager,
                },
                (VarType::Vector, method_type) => {
                    let element = match method_type {
                        MethodType::VectorPrimitive | MethodType::Primitive => {
                            Element::Primitive(PrimitiveAccess::of(variable))
                        }
                        MethodType::ProtocolTypeManager => Element::Polymorphic(variable.object_type.clone()),
                        _ => Element::Object(variable.object_type.clone()),
                    };
                    Step::Vector {
                        name,
                        element,
                        count_read: variable
                            .vector_field_read
                            .clone()
                            .unwrap_or_else(|| DEFAULT_COUNT_READ.to_string()),
                        count_write: variable
                            .vector_field_write
                            .clone()
                            .unwrap_or_else(|| DEFAULT_COUNT_WRITE.to_string()),
                    }
                }
            };
            steps.push(step);
        }

        SerializationPlan {
            class_name: class.name.clone(),
            steps,
        }
    }

    pub fn calls_base(&self) -> bool {
        self.steps.first() == Some(&Step::CallBase)
    }

    pub fn has_flags(&self) -> bool {
        self.steps.iter().any(|step| matches!(step, Step::Flag { .. }))
    }

    /// Number of packed bytes the serializer writes.
    pub fn flag_flushes(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, Step::Flag { closes_group: true, .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(name: &str, bit: u8) -> ProtocolClassVariable {
        let mut variable = ProtocolClassVariable::new(name, "bool", VarType::Primitive);
        variable.method_type = MethodType::BooleanByteWrapper;
        variable.flag_bit = Some(bit);
        variable
    }

    fn class_with_flags(count: usize) -> ProtocolClass {
        ProtocolClass {
            name: "Flags".to_string(),
            parent: "NetworkType".to_string(),
            variables: (0..count).map(|i| flag(&format!("f{}", i), (i % 8) as u8)).collect(),
            ..ProtocolClass::default()
        }
    }

    #[test]
    fn flag_groups_flush_once_per_byte() {
        let config = GeneratorConfig::default();
        for count in [1usize, 7, 8, 9, 16, 17] {
            let plan = SerializationPlan::build(&class_with_flags(count), &config);
            assert_eq!(plan.flag_flushes(), (count + 7) / 8, "{} flags", count);
            assert!(!plan.calls_base());
        }

        let plan = SerializationPlan::build(&class_with_flags(10), &config);
        match &plan.steps[9] {
            Step::Flag { group, bit, opens_group, closes_group, .. } => {
                assert_eq!((*group, *bit, *opens_group, *closes_group), (1, 1, false, true));
            }
            other => panic!("unexpected step {:?}", other),
        }
        match &plan.steps[8] {
            Step::Flag { opens_group, .. } => assert!(*opens_group),
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn subclasses_call_base_and_raw_payload_is_opaque() {
        let config = GeneratorConfig::default();
        let mut class = class_with_flags(0);
        class.parent = "GameRolePlayActorInformations".to_string();
        assert!(SerializationPlan::build(&class, &config).calls_base());

        class.name = "RawDataMessage".to_string();
        assert_eq!(SerializationPlan::build(&class, &config).steps, vec![Step::RawPayload]);
    }

    #[test]
    fn vectors_default_to_short_counts() {
        let mut ids = ProtocolClassVariable::new("ids", "uint", VarType::Vector);
        ids.method_type = MethodType::VectorPrimitive;
        ids.read_method = Some("readVarUhInt".to_string());
        let class = ProtocolClass {
            name: "Ids".to_string(),
            parent: "NetworkMessage".to_string(),
            variables: vec![ids],
            ..ProtocolClass::default()
        };
        let plan = SerializationPlan::build(&class, &GeneratorConfig::default());
        assert_eq!(
            plan.steps,
            vec![Step::Vector {
                name:        "ids".to_string(),
                element:     Element::Primitive(PrimitiveAccess {
                    kind:         Some(PrimitiveKind::VarUhInt),
                    read_method:  "readVarUhInt".to_string(),
                    write_method: "writeVarInt".to_string(),
                }),
                count_read:  "readUnsignedShort".to_string(),
                count_write: "writeShort".to_string(),
            }]
        );
    }
}
