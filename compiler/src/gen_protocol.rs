use crate::{
    config::GeneratorConfig,
    csharp::{count_cast, method_name, output_path, primitive_type},
    ids::IdRegistry,
    ir::{Family, ProtocolClass, ProtocolClassVariable, VarType},
    plan::{Element, SerializationPlan, Step},
};
use std::collections::{HashMap, HashSet};

/// Every parsed class of one family, by name. Built once the whole family is
/// parsed so that constructors can reach the fields of their ancestors.
#[derive(Debug, Default)]
pub struct ClassTable<'a> {
    classes: HashMap<&'a str, &'a ProtocolClass>,
}

impl<'a> ClassTable<'a> {
    pub fn new<I>(classes: I) -> ClassTable<'a>
    where
        I: IntoIterator<Item = &'a ProtocolClass>,
    {
        ClassTable {
            classes: classes.into_iter().map(|class| (class.name.as_str(), class)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a ProtocolClass> {
        self.classes.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ProtocolClass> + '_ {
        self.classes.values().copied()
    }

    /// Known ancestors of `class`, root first. The walk stops at the first
    /// name missing from the table and never visits a class twice.
    pub fn ancestors(&self, class: &ProtocolClass) -> Vec<&'a ProtocolClass> {
        let mut chain = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(class.name.as_str());

        let mut parent = class.parent.as_str();
        while let Some(found) = self.get(parent) {
            if !visited.insert(found.name.as_str()) {
                break;
            }
            chain.push(found);
            parent = found.parent.as_str();
        }

        chain.reverse();
        chain
    }
}

pub struct GenContext<'a> {
    pub config: &'a GeneratorConfig,
    pub ids:    &'a IdRegistry,
    pub table:  &'a ClassTable<'a>,
}

/// One generated source file, path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path:     String,
    pub contents: String,
}

pub fn generate_protocol_file(class: &ProtocolClass, family: Family, ctx: &GenContext) -> GeneratedFile {
    GeneratedFile {
        path:     output_path(&class.namespace, &class.name),
        contents: generate_protocol_class(class, family, ctx),
    }
}

/// Renders a message or type class with its constructors, id accessors and
/// (de)serializers.
pub fn generate_protocol_class(class: &ProtocolClass, family: Family, ctx: &GenContext) -> String {
    let config = ctx.config;
    let policy = &config.policy;
    let is_root = policy.is_protocol_root(&class.parent);
    let plan = SerializationPlan::build(class, config);
    let id = ctx.ids.resolve(family, class);

    let mut code: Vec<String> = Vec::new();

    code.push("using System;".to_string());
    code.push("using System.Collections.Generic;".to_string());
    code.push("using System.Linq;".to_string());
    for import in &class.imports {
        if import.starts_with("Types.") || import.starts_with("Messages.") {
            continue;
        }
        code.push(format!("using {};", import));
    }
    if class.variables.iter().any(|v| v.object_type == "Version") {
        code.push(format!("using Version = {}.Version;", config.namespaces.types));
    }
    code.push(String::new());

    let namespace = match family {
        Family::Message => &config.namespaces.messages,
        Family::Type => &config.namespaces.types,
    };
    code.push(format!("namespace {}", namespace));
    code.push("{".to_string());
    code.push("    [Serializable]".to_string());

    let base = if !is_root {
        Some(class.parent.as_str())
    } else if family == Family::Message {
        Some(config.message_base_class.as_str())
    } else {
        None
    };
    match base {
        Some(base) => code.push(format!("    public class {} : {}", class.name, base)),
        None => code.push(format!("    public class {}", class.name)),
    }
    code.push("    {".to_string());

    if policy.is_raw_payload(&class.name) {
        write_raw_payload(&mut code, class, id);
    } else {
        write_id(&mut code, family, is_root, id);
        for variable in &class.variables {
            code.push(format!("        public {} {} {{ get; set; }}", property_type(variable), variable.name));
        }

        let mut parameters: Vec<&ProtocolClassVariable> = Vec::new();
        if !class.variables.is_empty() || !is_root {
            for ancestor in ctx.table.ancestors(class) {
                parameters.extend(ancestor.variables.iter());
            }
            parameters.extend(class.variables.iter());
        }
        if !parameters.is_empty() {
            write_constructor(&mut code, &class.name, &parameters);
        }

        code.push(String::new());
        code.push(format!("        public {}() {{ }}", class.name));

        let modifier = if family == Family::Type && is_root { "virtual" } else { "override" };
        write_serialize(&mut code, &plan, modifier);
        write_deserialize(&mut code, &plan, modifier);
    }

    code.push("    }".to_string());
    code.push("}".to_string());
    code.push(String::new());
    code.join("\n")
}

fn property_type(variable: &ProtocolClassVariable) -> String {
    match variable.type_of_var {
        VarType::Vector => format!("IEnumerable<{}>", variable.object_type),
        _ => variable.object_type.clone(),
    }
}

/// Locals derived from a field name cannot carry the verbatim `@` prefix.
fn local_name(name: &str) -> &str {
    name.trim_start_matches('@')
}

fn write_id(code: &mut Vec<String>, family: Family, is_root: bool, id: u32) {
    let new = if is_root { "" } else { "new " };
    match family {
        Family::Type => {
            code.push(format!("        public {}const short Id = {};", new, id));
            let modifier = if is_root { "virtual" } else { "override" };
            code.push(format!("        public {} short TypeId => Id;", modifier));
        }
        Family::Message => {
            code.push(format!("        public {}const uint Id = {};", new, id));
            code.push("        public override uint MessageId => Id;".to_string());
        }
    }
}

fn write_constructor(code: &mut Vec<String>, class_name: &str, parameters: &[&ProtocolClassVariable]) {
    let signature = parameters
        .iter()
        .map(|v| format!("{} {}", property_type(v), v.name))
        .collect::<Vec<_>>()
        .join(", ");

    code.push(String::new());
    code.push(format!("        public {}({})", class_name, signature));
    code.push("        {".to_string());
    for variable in parameters {
        code.push(format!("            this.{} = {};", variable.name, variable.name));
    }
    code.push("        }".to_string());
}

fn write_serialize(code: &mut Vec<String>, plan: &SerializationPlan, modifier: &str) {
    code.push(String::new());
    code.push(format!("        public {} void Serialize(IDataWriter writer)", modifier));
    code.push("        {".to_string());

    if plan.has_flags() {
        code.push("            var flag = new byte();".to_string());
    }
    let last_group = plan
        .steps
        .iter()
        .filter_map(|step| match step {
            Step::Flag { group, .. } => Some(*group),
            _ => None,
        })
        .max();

    for step in &plan.steps {
        match step {
            Step::CallBase => code.push("            base.Serialize(writer);".to_string()),
            Step::Primitive { name, access } => {
                code.push(format!("            writer.{}({});", method_name(&access.write_method), name));
            }
            Step::Flag { name, group, bit, closes_group, .. } => {
                code.push(format!("            flag = BooleanByteWrapper.SetFlag(flag, {}, {});", bit, name));
                if *closes_group {
                    code.push("            writer.WriteByte(flag);".to_string());
                    if Some(*group) != last_group {
                        code.push("            flag = new byte();".to_string());
                    }
                }
            }
            Step::Object { name, polymorphic, .. } => {
                if *polymorphic {
                    code.push(format!("            writer.WriteShort({}.TypeId);", name));
                }
                code.push(format!("            {}.Serialize(writer);", name));
            }
            Step::Vector { name, element, count_write, .. } => {
                code.push(format!(
                    "            writer.{}({}{}.Count());",
                    method_name(count_write),
                    count_cast(count_write),
                    name
                ));
                code.push(format!("            foreach (var objectToSend in {})", name));
                code.push("            {".to_string());
                match element {
                    Element::Primitive(access) => {
                        code.push(format!("                writer.{}(objectToSend);", method_name(&access.write_method)));
                    }
                    Element::Object(_) => code.push("                objectToSend.Serialize(writer);".to_string()),
                    Element::Polymorphic(_) => {
                        code.push("                writer.WriteShort(objectToSend.TypeId);".to_string());
                        code.push("                objectToSend.Serialize(writer);".to_string());
                    }
                }
                code.push("            }".to_string());
            }
            Step::RawPayload => {}
        }
    }

    code.push("        }".to_string());
}

fn write_deserialize(code: &mut Vec<String>, plan: &SerializationPlan, modifier: &str) {
    code.push(String::new());
    code.push(format!("        public {} void Deserialize(IDataReader reader)", modifier));
    code.push("        {".to_string());

    for step in &plan.steps {
        match step {
            Step::CallBase => code.push("            base.Deserialize(reader);".to_string()),
            Step::Primitive { name, access } => {
                code.push(format!("            {} = reader.{}();", name, method_name(&access.read_method)));
            }
            Step::Flag { name, group, bit, opens_group, .. } => {
                if *opens_group {
                    let declare = if *group == 0 { "var " } else { "" };
                    code.push(format!("            {}flag = reader.ReadByte();", declare));
                }
                code.push(format!("            {} = BooleanByteWrapper.GetFlag(flag, {});", name, bit));
            }
            Step::Object { name, type_name, polymorphic } => {
                if *polymorphic {
                    code.push(format!(
                        "            {} = ProtocolTypeManager.GetInstance<{}>(reader.ReadShort());",
                        name, type_name
                    ));
                } else {
                    code.push(format!("            {} = new {}();", name, type_name));
                }
                code.push(format!("            {}.Deserialize(reader);", name));
            }
            Step::Vector { name, element, count_read, .. } => {
                let local = local_name(name);
                let element_type = match element {
                    Element::Primitive(access) => access
                        .kind
                        .map(primitive_type)
                        .unwrap_or("object")
                        .to_string(),
                    Element::Object(type_name) | Element::Polymorphic(type_name) => type_name.clone(),
                };
                code.push(format!("            var {}Count = reader.{}();", local, method_name(count_read)));
                code.push(format!("            var {}_ = new {}[{}Count];", local, element_type, local));
                code.push(format!(
                    "            for (var {l}Index = 0; {l}Index < {l}Count; {l}Index++)",
                    l = local
                ));
                code.push("            {".to_string());
                match element {
                    Element::Primitive(access) => {
                        code.push(format!(
                            "                {l}_[{l}Index] = reader.{m}();",
                            l = local,
                            m = method_name(&access.read_method)
                        ));
                    }
                    Element::Object(type_name) => {
                        code.push(format!("                var objectToAdd = new {}();", type_name));
                        code.push("                objectToAdd.Deserialize(reader);".to_string());
                        code.push(format!("                {l}_[{l}Index] = objectToAdd;", l = local));
                    }
                    Element::Polymorphic(type_name) => {
                        code.push(format!(
                            "                var objectToAdd = ProtocolTypeManager.GetInstance<{}>(reader.ReadShort());",
                            type_name
                        ));
                        code.push("                objectToAdd.Deserialize(reader);".to_string());
                        code.push(format!("                {l}_[{l}Index] = objectToAdd;", l = local));
                    }
                }
                code.push("            }".to_string());
                code.push(format!("            {} = {}_;", name, local));
            }
            Step::RawPayload => {}
        }
    }

    code.push("        }".to_string());
}

fn write_raw_payload(code: &mut Vec<String>, class: &ProtocolClass, id: u32) {
    let lines = [
        format!("        public const uint Id = {};", id),
        "        public override uint MessageId => Id;".to_string(),
        "        public byte[] Content { get; set; }".to_string(),
        String::new(),
        format!("        public {}() {{ }}", class.name),
        String::new(),
        format!("        public {}(byte[] content)", class.name),
        "        {".to_string(),
        "            Content = content;".to_string(),
        "        }".to_string(),
        String::new(),
        "        public override void Serialize(IDataWriter writer)".to_string(),
        "        {".to_string(),
        "            writer.WriteVarInt(Content.Length);".to_string(),
        "            writer.WriteBytes(Content);".to_string(),
        "        }".to_string(),
        String::new(),
        "        public override void Deserialize(IDataReader reader)".to_string(),
        "        {".to_string(),
        "            var contentLength = reader.ReadVarInt();".to_string(),
        "            Content = reader.ReadBytes(contentLength);".to_string(),
        "        }".to_string(),
    ];
    code.extend(lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::MethodType;

    fn variable(name: &str, object_type: &str, type_of_var: VarType, method_type: MethodType) -> ProtocolClassVariable {
        let mut variable = ProtocolClassVariable::new(name, object_type, type_of_var);
        variable.method_type = method_type;
        variable
    }

    fn flag(name: &str) -> ProtocolClassVariable {
        variable(name, "bool", VarType::Primitive, MethodType::BooleanByteWrapper)
    }

    fn root_type() -> ProtocolClass {
        let mut level = variable("level", "ushort", VarType::Primitive, MethodType::Primitive);
        level.read_method = Some("readVarUhShort".to_string());
        level.write_method = Some("writeVarShort".to_string());
        ProtocolClass {
            name: "ActorInformations".to_string(),
            namespace: "Types.Game.Context".to_string(),
            parent: "NetworkType".to_string(),
            imports: vec!["Types.Game.Look".to_string(), "Nex.IO".to_string()],
            message_id: 10,
            variables: vec![flag("a"), flag("b"), level],
        }
    }

    fn child_type() -> ProtocolClass {
        ProtocolClass {
            name: "NamedActorInformations".to_string(),
            namespace: "Types.Game.Context".to_string(),
            parent: "ActorInformations".to_string(),
            imports: vec!["Nex.IO".to_string()],
            message_id: 11,
            variables: vec![
                variable("look", "EntityLook", VarType::Object, MethodType::SerializeOrDeserialize),
                variable("@params", "ActorParams", VarType::Vector, MethodType::ProtocolTypeManager),
            ],
        }
    }

    #[test]
    fn root_type_layout() {
        let classes = vec![root_type(), child_type()];
        let table = ClassTable::new(&classes);
        let config = GeneratorConfig::default();
        let mut ids = IdRegistry::default();
        ids.parse_type_ids("_typesTypes[42] = ActorInformations;");
        let ctx = GenContext {
            config: &config,
            ids:    &ids,
            table:  &table,
        };

        let code = generate_protocol_class(&classes[0], Family::Type, &ctx);
        assert!(code.contains("namespace Nex.Protocol.Types"));
        assert!(code.contains("using Nex.IO;"));
        assert!(!code.contains("using Types.Game.Look;"));
        assert!(code.contains("    public class ActorInformations\n"));
        assert!(code.contains("public const short Id = 42;"));
        assert!(code.contains("public virtual short TypeId => Id;"));
        assert!(code.contains("public ActorInformations(bool a, bool b, ushort level)"));
        assert!(code.contains("public virtual void Serialize(IDataWriter writer)"));
        assert!(code.contains("flag = BooleanByteWrapper.SetFlag(flag, 1, b);"));
        assert!(code.contains("writer.WriteVarShort(level);"));
        assert!(code.contains("level = reader.ReadVarUShort();"));
        assert_eq!(code.matches("writer.WriteByte(flag);").count(), 1);
        assert!(!code.contains("base.Serialize"));
    }

    #[test]
    fn child_type_layout() {
        let classes = vec![root_type(), child_type()];
        let table = ClassTable::new(&classes);
        let config = GeneratorConfig::default();
        let ids = IdRegistry::default();
        let ctx = GenContext {
            config: &config,
            ids:    &ids,
            table:  &table,
        };

        let file = generate_protocol_file(&classes[1], Family::Type, &ctx);
        assert_eq!(file.path, "Types/Game/Context/NamedActorInformations.cs");
        let code = file.contents;
        assert!(code.contains("public class NamedActorInformations : ActorInformations"));
        assert!(code.contains("public new const short Id = 11;"));
        assert!(code.contains("public override short TypeId => Id;"));
        assert!(code.contains(
            "public NamedActorInformations(bool a, bool b, ushort level, EntityLook look, IEnumerable<ActorParams> @params)"
        ));
        assert!(code.contains("base.Serialize(writer);"));
        assert!(code.contains("writer.WriteShort((ushort)@params.Count());"));
        assert!(code.contains("writer.WriteShort(objectToSend.TypeId);"));
        assert!(code.contains("var paramsCount = reader.ReadUnsignedShort();"));
        assert!(code.contains("var objectToAdd = ProtocolTypeManager.GetInstance<ActorParams>(reader.ReadShort());"));
        assert!(code.contains("@params = params_;"));
        assert!(code.contains("look = new EntityLook();"));
    }

    #[test]
    fn ancestor_walk_stops_on_cycles() {
        let mut a = root_type();
        a.parent = "NamedActorInformations".to_string();
        let classes = vec![a, child_type()];
        let table = ClassTable::new(&classes);
        let chain = table.ancestors(&classes[1]);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name, "ActorInformations");
    }

    #[test]
    fn raw_payload_message() {
        let class = ProtocolClass {
            name: "RawDataMessage".to_string(),
            parent: "NetworkMessage".to_string(),
            message_id: 6253,
            ..ProtocolClass::default()
        };
        let classes = vec![class];
        let table = ClassTable::new(&classes);
        let config = GeneratorConfig::default();
        let ids = IdRegistry::default();
        let ctx = GenContext {
            config: &config,
            ids:    &ids,
            table:  &table,
        };
        let code = generate_protocol_class(&classes[0], Family::Message, &ctx);
        assert!(code.contains("public class RawDataMessage : Message"));
        assert!(code.contains("public byte[] Content { get; set; }"));
        assert!(code.contains("writer.WriteVarInt(Content.Length);"));
        assert!(!code.contains("BooleanByteWrapper"));
    }
}
