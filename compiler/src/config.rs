//! Opaque knobs the parsers and generators consume. Defaults reproduce the
//! layout of the game client the tool was written for; every value can be
//! overridden from a JSON document.

use crate::error::GenError;
use serde::{Deserialize, Serialize};

/// Target namespaces of each generated family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespaces {
    pub types:    String,
    pub messages: String,
    pub records:  String,
    pub enums:    String,
    pub io:       String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Namespaces {
            types:    "Nex.Protocol.Types".to_string(),
            messages: "Nex.Protocol.Messages".to_string(),
            records:  "Nex.Protocol.D2oClasses".to_string(),
            enums:    "Nex.Protocol.Enums".to_string(),
            io:       "Nex.IO".to_string(),
        }
    }
}

/// Per-class exemptions, keyed by class name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassPolicy {
    /// Record classes whose method bodies are not parsed.
    pub skip_method_parsing: Vec<String>,
    /// Record classes that never get an identity accessor.
    pub no_identity_field:   Vec<String>,
    /// Message classes generated as a single opaque byte payload.
    pub raw_payload_classes: Vec<String>,
    /// Record heritage names that do not count as a parent class.
    pub ignored_heritage:    Vec<String>,
    pub message_root:        String,
    pub type_root:           String,
}

impl Default for ClassPolicy {
    fn default() -> Self {
        ClassPolicy {
            skip_method_parsing: vec!["FinishMoves".to_string(), "Spell".to_string()],
            no_identity_field:   vec!["InfoMessage".to_string(), "RideFood".to_string()],
            raw_payload_classes: vec!["RawDataMessage".to_string()],
            ignored_heritage:    vec!["Object".to_string(), "Proxy".to_string()],
            message_root:        "NetworkMessage".to_string(),
            type_root:           "NetworkType".to_string(),
        }
    }
}

impl ClassPolicy {
    pub fn skips_methods(&self, class_name: &str) -> bool {
        self.skip_method_parsing.iter().any(|name| name == class_name)
    }

    pub fn suppresses_identity(&self, class_name: &str) -> bool {
        self.no_identity_field.iter().any(|name| name == class_name)
    }

    pub fn is_raw_payload(&self, class_name: &str) -> bool {
        self.raw_payload_classes.iter().any(|name| name == class_name)
    }

    /// `true` when `heritage` names a real parent record class.
    pub fn has_heritage(&self, heritage: &str) -> bool {
        !heritage.is_empty() && !self.ignored_heritage.iter().any(|name| name == heritage)
    }

    /// `true` when `parent` is empty or one of the two protocol roots.
    pub fn is_protocol_root(&self, parent: &str) -> bool {
        parent.is_empty() || parent == self.message_root || parent == self.type_root
    }
}

/// File names of the two id registries, relative to the network directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryFiles {
    pub message_file: String,
    pub type_file:    String,
}

impl Default for RegistryFiles {
    fn default() -> Self {
        RegistryFiles {
            message_file: "MessageReceiver.as".to_string(),
            type_file:    "ProtocolTypeManager.as".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub namespaces:             Namespaces,
    pub policy:                 ClassPolicy,
    pub registry:               RegistryFiles,
    /// Source namespace prefix stripped from protocol namespaces.
    pub network_root_namespace: String,
    /// Imports below this namespace belong to the source framework and are dropped.
    pub framework_namespace:    String,
    /// Lower-cased imports that never make it into generated usings.
    pub blacklisted_imports:    Vec<String>,
    /// Base class of generated messages whose source parent is the message root.
    pub message_base_class:     String,
    /// Call that marks a record getter as a localized lookup.
    pub i18n_lookup:            String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            namespaces:             Namespaces::default(),
            policy:                 ClassPolicy::default(),
            registry:               RegistryFiles::default(),
            network_root_namespace: "com.ankamagames.dofus.network".to_string(),
            framework_namespace:    "com.ankamagames.jerakine".to_string(),
            blacklisted_imports:    [
                "__as3__.vec.vector",
                "flash.utils.idataoutput",
                "flash.utils.bytearray",
                "flash.utils.idatainput",
                "com.ankamagames.dofus.network.protocoltypemanager",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            message_base_class:     "Message".to_string(),
            i18n_lookup:            "I18n.getText".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parses a JSON document; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<GeneratorConfig, GenError> {
        Ok(serde_json::from_str(text)?)
    }
}
