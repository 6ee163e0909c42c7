//! Reference encoder and decoder for generated protocol classes.
//!
//! Both walk the same [`SerializationPlan`] the C# emitter renders, over
//! dynamic [`Value`]s, so the bytes they produce are the bytes the generated
//! `Serialize` writes.

use crate::{
    config::GeneratorConfig,
    error::GenError,
    gen_protocol::ClassTable,
    ids::IdRegistry,
    ir::{Family, ProtocolClass},
    plan::{Element, PrimitiveAccess, SerializationPlan, Step},
};
use scriptgen_wire::{get_flag, set_flag, DataInput, DataOutput, PrimitiveKind, Value};
use std::collections::HashMap;

pub struct CodecEnv<'a> {
    table:  &'a ClassTable<'a>,
    ids:    &'a IdRegistry,
    config: &'a GeneratorConfig,
    by_id:  HashMap<u32, Vec<&'a ProtocolClass>>,
}

impl<'a> CodecEnv<'a> {
    /// Resolves the type id of every class in `table` once.
    pub fn new(table: &'a ClassTable<'a>, ids: &'a IdRegistry, config: &'a GeneratorConfig) -> CodecEnv<'a> {
        let mut by_id: HashMap<u32, Vec<&'a ProtocolClass>> = HashMap::new();
        for class in table.iter() {
            by_id.entry(ids.resolve(Family::Type, class)).or_default().push(class);
        }
        for classes in by_id.values_mut() {
            classes.sort_by(|a, b| a.name.cmp(&b.name));
        }
        CodecEnv { table, ids, config, by_id }
    }

    fn class(&self, name: &str) -> Result<&'a ProtocolClass, GenError> {
        self.table
            .get(name)
            .ok_or_else(|| GenError::Codec(format!("Unknown class {}", name)))
    }

    /// Type ids travel as an unsigned short.
    fn type_id(&self, name: &str) -> Result<u16, GenError> {
        let class = self.class(name)?;
        let id = self.ids.resolve(Family::Type, class);
        u16::try_from(id).map_err(|_| GenError::Codec(format!("Type id {} of {} does not fit in 16 bits", id, name)))
    }

    /// The class sent under `id` where `declared` was expected: `declared`
    /// itself or one of its descendants. More than one match is an error.
    fn class_by_type_id(&self, id: u16, declared: &str) -> Result<&'a ProtocolClass, GenError> {
        let candidates: Vec<&'a ProtocolClass> = self
            .by_id
            .get(&u32::from(id))
            .map(|classes| {
                classes
                    .iter()
                    .copied()
                    .filter(|class| {
                        class.name == declared || self.table.ancestors(class).iter().any(|a| a.name == declared)
                    })
                    .collect()
            })
            .unwrap_or_default();

        match candidates.as_slice() {
            [] => Err(GenError::Codec(format!("No {} with type id {}", declared, id))),
            [class] => Ok(*class),
            _ => {
                let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
                Err(GenError::Codec(format!("Type id {} is shared by {}", id, names.join(", "))))
            }
        }
    }
}

pub fn encode(value: &Value, class_name: &str, env: &CodecEnv) -> Result<Vec<u8>, GenError> {
    let mut output = DataOutput::new();
    encode_class(value, class_name, env, &mut output)?;
    Ok(output.data())
}

/// Decodes one instance of `class_name`. Bytes left over after the last
/// field are an error.
pub fn decode(bytes: &[u8], class_name: &str, env: &CodecEnv) -> Result<Value, GenError> {
    let mut input = DataInput::new(bytes);
    let value = decode_class(class_name, env, &mut input)?;
    if input.remaining() > 0 {
        return Err(GenError::Codec(format!(
            "{} trailing byte(s) after {}",
            input.remaining(),
            class_name
        )));
    }
    Ok(value)
}

fn field<'v>(value: &'v Value, class_name: &str, name: &str) -> Result<&'v Value, GenError> {
    value
        .get(name)
        .ok_or_else(|| GenError::Codec(format!("{} is missing field {}", class_name, name)))
}

fn primitive_kind(access: &PrimitiveAccess, name: &str) -> Result<PrimitiveKind, GenError> {
    access
        .kind
        .ok_or_else(|| GenError::Codec(format!("Field {} has no known wire encoding", name)))
}

fn count_kind(method: &str, read: bool) -> Result<PrimitiveKind, GenError> {
    let kind = if read {
        PrimitiveKind::from_read_method(method)
    } else {
        PrimitiveKind::from_write_method(method)
    };
    kind.ok_or_else(|| GenError::Codec(format!("Unknown count method {}", method)))
}

fn encode_class(value: &Value, class_name: &str, env: &CodecEnv, output: &mut DataOutput) -> Result<(), GenError> {
    let class = env.class(class_name)?;
    let plan = SerializationPlan::build(class, env.config);
    let mut flag = 0u8;

    for step in &plan.steps {
        match step {
            Step::CallBase => encode_class(value, &class.parent, env, output)?,
            Step::Primitive { name, access } => {
                primitive_kind(access, name)?.write_value(field(value, class_name, name)?, output)?;
            }
            Step::Flag { name, bit, closes_group, .. } => {
                flag = set_flag(flag, *bit, field(value, class_name, name)?.as_bool())?;
                if *closes_group {
                    output.write_unsigned_byte(flag);
                    flag = 0;
                }
            }
            Step::Object { name, type_name, polymorphic } => {
                let object = field(value, class_name, name)?;
                encode_object(object, type_name, *polymorphic, env, output)?;
            }
            Step::Vector { name, element, count_write, .. } => {
                let items = field(value, class_name, name)?.as_array();
                count_kind(count_write, false)?.write_value(&Value::UInt(items.len() as u64), output)?;
                for item in items {
                    match element {
                        Element::Primitive(access) => primitive_kind(access, name)?.write_value(item, output)?,
                        Element::Object(type_name) => encode_object(item, type_name, false, env, output)?,
                        Element::Polymorphic(type_name) => encode_object(item, type_name, true, env, output)?,
                    }
                }
            }
            Step::RawPayload => {
                let content = value
                    .get("content")
                    .or_else(|| value.get("Content"))
                    .map_or(&[][..], Value::as_bytes);
                output.write_var_int(content.len() as i32);
                output.write_bytes(content);
            }
        }
    }

    Ok(())
}

/// Polymorphic objects are written under their own class, prefixed by its
/// type id.
fn encode_object(
    object: &Value,
    declared: &str,
    polymorphic: bool,
    env: &CodecEnv,
    output: &mut DataOutput,
) -> Result<(), GenError> {
    if polymorphic {
        let concrete = object.type_name().unwrap_or(declared);
        output.write_unsigned_short(env.type_id(concrete)?);
        encode_class(object, concrete, env, output)
    } else {
        encode_class(object, declared, env, output)
    }
}

fn decode_class(class_name: &str, env: &CodecEnv, input: &mut DataInput) -> Result<Value, GenError> {
    let mut fields = HashMap::new();
    decode_fields(class_name, env, input, &mut fields)?;
    Ok(Value::Object(class_name.to_string(), fields))
}

fn decode_fields(
    class_name: &str,
    env: &CodecEnv,
    input: &mut DataInput,
    fields: &mut HashMap<String, Value>,
) -> Result<(), GenError> {
    let class = env.class(class_name)?;
    let plan = SerializationPlan::build(class, env.config);
    let mut flag = 0u8;

    for step in &plan.steps {
        match step {
            Step::CallBase => decode_fields(&class.parent, env, input, fields)?,
            Step::Primitive { name, access } => {
                fields.insert(name.clone(), primitive_kind(access, name)?.read_value(input)?);
            }
            Step::Flag { name, bit, opens_group, .. } => {
                if *opens_group {
                    flag = input.read_unsigned_byte()?;
                }
                fields.insert(name.clone(), Value::Bool(get_flag(flag, *bit)?));
            }
            Step::Object { name, type_name, polymorphic } => {
                fields.insert(name.clone(), decode_object(type_name, *polymorphic, env, input)?);
            }
            Step::Vector { name, element, count_read, .. } => {
                let count = match count_kind(count_read, true)?.read_value(input)? {
                    Value::Int(n) if n < 0 => {
                        return Err(GenError::Codec(format!("Negative length {} for {}", n, name)))
                    }
                    Value::Int(n) => n as usize,
                    Value::UInt(n) => n as usize,
                    other => {
                        return Err(GenError::Codec(format!("Invalid length {:?} for {}", other, name)))
                    }
                };
                let mut items = Vec::with_capacity(count.min(input.remaining()));
                for _ in 0..count {
                    items.push(match element {
                        Element::Primitive(access) => primitive_kind(access, name)?.read_value(input)?,
                        Element::Object(type_name) => decode_object(type_name, false, env, input)?,
                        Element::Polymorphic(type_name) => decode_object(type_name, true, env, input)?,
                    });
                }
                fields.insert(name.clone(), Value::Array(items));
            }
            Step::RawPayload => {
                let length = input.read_var_int()?;
                if length < 0 {
                    return Err(GenError::Codec(format!("Negative payload length {}", length)));
                }
                let content = input.read_bytes(length as usize)?.to_vec();
                fields.insert("content".to_string(), Value::Bytes(content));
            }
        }
    }

    Ok(())
}

fn decode_object(declared: &str, polymorphic: bool, env: &CodecEnv, input: &mut DataInput) -> Result<Value, GenError> {
    if polymorphic {
        let id = input.read_unsigned_short()?;
        let concrete = env.class_by_type_id(id, declared)?;
        decode_class(&concrete.name, env, input)
    } else {
        decode_class(declared, env, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{MethodType, ProtocolClassVariable, VarType};

    fn primitive(name: &str, read: &str) -> ProtocolClassVariable {
        let kind = PrimitiveKind::from_read_method(read).unwrap();
        let mut variable = ProtocolClassVariable::new(name, crate::csharp::primitive_type(kind), VarType::Primitive);
        variable.read_method = Some(read.to_string());
        variable.write_method = Some(kind.write_method().to_string());
        variable
    }

    fn flag(name: &str) -> ProtocolClassVariable {
        let mut variable = ProtocolClassVariable::new(name, "bool", VarType::Primitive);
        variable.method_type = MethodType::BooleanByteWrapper;
        variable
    }

    fn classes() -> Vec<ProtocolClass> {
        let mut actor = ProtocolClassVariable::new("actor", "Actor", VarType::Object);
        actor.method_type = MethodType::ProtocolTypeManager;

        vec![
            ProtocolClass {
                name: "Actor".to_string(),
                parent: "NetworkType".to_string(),
                message_id: 3,
                variables: vec![primitive("objectId", "readDouble")],
                ..ProtocolClass::default()
            },
            ProtocolClass {
                name: "NamedActor".to_string(),
                parent: "Actor".to_string(),
                message_id: 4,
                variables: vec![flag("sitting"), primitive("name", "readUTF")],
                ..ProtocolClass::default()
            },
            ProtocolClass {
                name: "ActorMessage".to_string(),
                parent: "NetworkMessage".to_string(),
                message_id: 900,
                variables: vec![actor],
                ..ProtocolClass::default()
            },
        ]
    }

    #[test]
    fn subclass_writes_parent_fields_first() {
        let classes = classes();
        let table = ClassTable::new(&classes);
        let ids = IdRegistry::default();
        let config = GeneratorConfig::default();
        let env = CodecEnv::new(&table, &ids, &config);

        let value = Value::object(
            "NamedActor",
            vec![
                ("objectId", Value::Float(1.5)),
                ("sitting", Value::Bool(true)),
                ("name", Value::String("ab".to_string())),
            ],
        );
        let bytes = encode(&value, "NamedActor", &env).unwrap();
        assert_eq!(&bytes[..8], &1.5f64.to_be_bytes());
        assert_eq!(bytes[8], 0b0000_0001);
        assert_eq!(&bytes[9..], &[0, 2, b'a', b'b']);
        assert_eq!(decode(&bytes, "NamedActor", &env).unwrap(), value);
    }

    #[test]
    fn polymorphic_field_carries_concrete_type_id() {
        let classes = classes();
        let table = ClassTable::new(&classes);
        let mut ids = IdRegistry::default();
        ids.parse_type_ids("_typesTypes[77] = NamedActor;");
        let config = GeneratorConfig::default();
        let env = CodecEnv::new(&table, &ids, &config);

        let actor = Value::object(
            "NamedActor",
            vec![
                ("objectId", Value::Float(2.0)),
                ("sitting", Value::Bool(false)),
                ("name", Value::String(String::new())),
            ],
        );
        let message = Value::object("ActorMessage", vec![("actor", actor)]);
        let bytes = encode(&message, "ActorMessage", &env).unwrap();
        assert_eq!(&bytes[..2], &[0, 77]);
        assert_eq!(decode(&bytes, "ActorMessage", &env).unwrap(), message);
    }

    #[test]
    fn missing_field_and_trailing_bytes_are_errors() {
        let classes = classes();
        let table = ClassTable::new(&classes);
        let ids = IdRegistry::default();
        let config = GeneratorConfig::default();
        let env = CodecEnv::new(&table, &ids, &config);

        let err = encode(&Value::object("Actor", vec![]), "Actor", &env).unwrap_err();
        assert!(matches!(err, GenError::Codec(_)));

        let mut bytes = 1.0f64.to_be_bytes().to_vec();
        bytes.push(0);
        assert!(matches!(decode(&bytes, "Actor", &env), Err(GenError::Codec(_))));
        assert!(matches!(decode(&bytes[..4], "Actor", &env), Err(GenError::Wire(_))));
    }

    #[test]
    fn type_ids_must_fit_the_wire() {
        let classes = classes();
        let table = ClassTable::new(&classes);
        let mut ids = IdRegistry::default();
        ids.parse_type_ids("_typesTypes[65539] = NamedActor;");
        let config = GeneratorConfig::default();
        let env = CodecEnv::new(&table, &ids, &config);

        let actor = Value::object(
            "NamedActor",
            vec![
                ("objectId", Value::Float(2.0)),
                ("sitting", Value::Bool(false)),
                ("name", Value::String(String::new())),
            ],
        );
        let message = Value::object("ActorMessage", vec![("actor", actor)]);
        let err = encode(&message, "ActorMessage", &env).unwrap_err();
        assert!(matches!(err, GenError::Codec(ref text) if text.contains("65539")));

        // Actor keeps its text id 3; the truncated id must not be read back as NamedActor.
        let mut bytes = vec![0, 3];
        bytes.extend_from_slice(&2.0f64.to_be_bytes());
        let decoded = decode(&bytes, "ActorMessage", &env).unwrap();
        assert_eq!(decoded.get("actor").and_then(Value::type_name), Some("Actor"));
    }

    #[test]
    fn shared_type_id_is_rejected() {
        let classes = classes();
        let table = ClassTable::new(&classes);
        let mut ids = IdRegistry::default();
        ids.parse_type_ids("_typesTypes[3] = NamedActor;");
        let config = GeneratorConfig::default();
        let env = CodecEnv::new(&table, &ids, &config);

        let mut bytes = vec![0, 3];
        bytes.extend_from_slice(&2.0f64.to_be_bytes());
        for _ in 0..8 {
            let err = decode(&bytes, "ActorMessage", &env).unwrap_err();
            assert!(matches!(err, GenError::Codec(ref text) if text.contains("Actor, NamedActor")));
        }
    }
}
