use crate::{
    config::GeneratorConfig,
    error::GenError,
    ir::{Family, ProtocolClass},
    patterns::{MESSAGE_ID, TYPE_ID},
};
use log::{info, warn};
use regex::Regex;
use std::{collections::HashMap, fs, path::Path};

/// A name seen twice in a registry with different ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdConflict {
    pub name: String,
    pub old:  u32,
    pub new:  u32,
}

/// Authoritative message and type ids. Built once before generation and only
/// read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdRegistry {
    messages: HashMap<String, u32>,
    types:    HashMap<String, u32>,
}

impl IdRegistry {
    /// Reads both registry files below `network_dir`. A missing file is not an
    /// error: classes of that family keep the id found in their own text.
    pub fn load(network_dir: &Path, config: &GeneratorConfig) -> Result<IdRegistry, GenError> {
        info!("Parsing real ids...");
        let mut registry = IdRegistry::default();

        let message_path = network_dir.join(&config.registry.message_file);
        if message_path.is_file() {
            registry.parse_message_ids(&fs::read_to_string(&message_path)?);
        } else {
            warn!(
                "{} is not found, unable to find real messages ids",
                config.registry.message_file
            );
        }

        let type_path = network_dir.join(&config.registry.type_file);
        if type_path.is_file() {
            registry.parse_type_ids(&fs::read_to_string(&type_path)?);
        } else {
            warn!("{} is not found, unable to find real types ids", config.registry.type_file);
        }

        Ok(registry)
    }

    pub fn parse_message_ids(&mut self, text: &str) -> Vec<IdConflict> {
        parse_assignments(text, &MESSAGE_ID, &mut self.messages, Family::Message)
    }

    pub fn parse_type_ids(&mut self, text: &str) -> Vec<IdConflict> {
        parse_assignments(text, &TYPE_ID, &mut self.types, Family::Type)
    }

    pub fn message_id(&self, name: &str) -> Option<u32> {
        self.messages.get(name).copied()
    }

    pub fn type_id(&self, name: &str) -> Option<u32> {
        self.types.get(name).copied()
    }

    pub fn lookup(&self, family: Family, name: &str) -> Option<u32> {
        match family {
            Family::Message => self.message_id(name),
            Family::Type => self.type_id(name),
        }
    }

    /// Registry id when present, else the id found in the class text.
    pub fn resolve(&self, family: Family, class: &ProtocolClass) -> u32 {
        self.lookup(family, &class.name).unwrap_or(class.message_id)
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

fn parse_assignments(text: &str, pattern: &Regex, table: &mut HashMap<String, u32>, family: Family) -> Vec<IdConflict> {
    let mut conflicts = Vec::new();

    for caps in text.lines().filter_map(|line| pattern.captures(line)) {
        let id: u32 = match caps["id"].parse() {
            Ok(id) => id,
            Err(_) => continue,
        };
        let name = &caps["name"];

        match table.insert(name.to_string(), id) {
            Some(old) if old != id => {
                warn!(
                    "{} {} has a duplicated id, old:{} new:{}",
                    family.label(),
                    name,
                    old,
                    id
                );
                conflicts.push(IdConflict {
                    name: name.to_string(),
                    old,
                    new: id,
                });
            }
            _ => {}
        }
    }

    conflicts
}
