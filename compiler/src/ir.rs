//! Intermediate representation shared by the parsers and the generators.

use scriptgen_wire::PrimitiveKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessModifier {
    #[default]
    Public,
    Protected,
    Private,
    Internal,
}

impl AccessModifier {
    pub fn parse(text: &str) -> AccessModifier {
        match text.to_ascii_lowercase().as_str() {
            "protected" => AccessModifier::Protected,
            "private" => AccessModifier::Private,
            "internal" => AccessModifier::Internal,
            _ => AccessModifier::Public,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            AccessModifier::Public => "public",
            AccessModifier::Protected => "protected",
            AccessModifier::Private => "private",
            AccessModifier::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassModifier {
    #[default]
    None,
    Dynamic,
    Final,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassInfo {
    pub name:            String,
    pub namespace:       String,
    pub heritage:        String,
    pub access_modifier: AccessModifier,
    pub class_modifier:  ClassModifier,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldInfo {
    pub modifiers: AccessModifier,
    pub name:      String,
    pub type_:     String,
    pub value:     String,
    pub is_const:  bool,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Argument {
    pub name:          String,
    pub type_:         String,
    pub default_value: Option<String>,
}

/// One statement of a method body. Order within a body is significant.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignation { target: String, value: String },
    Control { kind: String, condition: String },
    ControlEnd,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodInfo {
    pub name:            String,
    pub access_modifier: AccessModifier,
    pub is_override:     bool,
    pub return_type:     String,
    pub arguments:       Vec<Argument>,
    pub statements:      Vec<Statement>,
}

impl MethodInfo {
    pub fn assignations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Assignation { target, value } => Some((target.as_str(), value.as_str())),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyInfo {
    pub name:            String,
    pub access_modifier: AccessModifier,
    pub property_type:   String,
    pub getter:          Option<MethodInfo>,
    pub setter:          Option<MethodInfo>,
}

/// A parsed data-record class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordClass {
    pub class:      ClassInfo,
    pub fields:     Vec<FieldInfo>,
    pub methods:    Vec<MethodInfo>,
    pub properties: Vec<PropertyInfo>,
}

impl RecordClass {
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Primitive,
    Object,
    Vector,
}

/// How a variable goes on and off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodType {
    Primitive,
    BooleanByteWrapper,
    ProtocolTypeManager,
    SerializeOrDeserialize,
    VectorPrimitive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolClassVariable {
    pub name:               String,
    pub object_type:        String,
    pub type_of_var:        VarType,
    pub method_type:        MethodType,
    /// Source read method (`readVarUhShort`), primitives and primitive vectors only.
    pub read_method:        Option<String>,
    pub write_method:       Option<String>,
    pub flag_bit:           Option<u8>,
    /// Vector count read method when it differs from the 16-bit default.
    pub vector_field_read:  Option<String>,
    pub vector_field_write: Option<String>,
    /// Line of the statement that fixed this variable's position.
    pub index:              usize,
}

impl ProtocolClassVariable {
    pub fn new(name: &str, object_type: &str, type_of_var: VarType) -> ProtocolClassVariable {
        let method_type = match type_of_var {
            VarType::Primitive => MethodType::Primitive,
            VarType::Object => MethodType::SerializeOrDeserialize,
            VarType::Vector => MethodType::SerializeOrDeserialize,
        };
        ProtocolClassVariable {
            name: name.to_string(),
            object_type: object_type.to_string(),
            type_of_var,
            method_type,
            read_method: None,
            write_method: None,
            flag_bit: None,
            vector_field_read: None,
            vector_field_write: None,
            index: 0,
        }
    }

    pub fn is_flag(&self) -> bool {
        self.method_type == MethodType::BooleanByteWrapper
    }

    /// Wire kind of a primitive or of a primitive vector element.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        self.read_method
            .as_deref()
            .and_then(PrimitiveKind::from_read_method)
            .or_else(|| self.write_method.as_deref().and_then(PrimitiveKind::from_write_method))
    }
}

/// A parsed network message or type class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProtocolClass {
    pub name:       String,
    pub namespace:  String,
    pub parent:     String,
    pub imports:    Vec<String>,
    /// Id found in the class text; the registry wins over it.
    pub message_id: u32,
    pub variables:  Vec<ProtocolClassVariable>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumItem {
    pub name:  String,
    pub type_: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumClass {
    pub name:      String,
    pub namespace: String,
    pub items:     Vec<EnumItem>,
}

/// The protocol family a class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Message,
    Type,
}

impl Family {
    pub fn label(&self) -> &'static str {
        match self {
            Family::Message => "message",
            Family::Type => "type",
        }
    }
}
