use crate::error::GenError;
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use std::collections::HashMap;

/// Maps the line index of every opening delimiter to the line index of its
/// matching closing delimiter.
pub type BracketIndex = HashMap<usize, usize>;

/// One `pattern → replacement` substitution, applied to a single line.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern:     Regex,
    pub replacement: String,
}

impl Rule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Rule, GenError> {
        Ok(Rule {
            pattern:     Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }
}

/// Normalized source lines plus their bracket index.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceText {
    pub lines:    Vec<String>,
    pub brackets: BracketIndex,
}

impl SourceText {
    /// All lines joined with `\n`, for the patterns that run over whole files.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Record rules: keyword escaping, container normalization and the field
/// visibility fixups the record corpus needs.
pub const RECORD_RULES: [(&str, &str); 23] = [
    (r"(var\s|this\.)base\b", "${1}@base"),
    (r"(var\s|this\.)object\b", "${1}@object"),
    (r"(var\s|this\.)operator\b", "${1}@operator"),
    (r"(var\s|this\.)params\b", "${1}@params"),
    (r"Vector\.([\w]+) = new ([\w]+)\(\);", "${1} = new List<${2}>();"),
    (r"new Vector\.<([\w]+)>\((\d+), (true|false)\)", "new List<${1}>(${2})"),
    (r"new Vector\.<([\w]+)>", "new List<${1}>()"),
    (r"(__AS3__\.vec\.)?Vector\.", "List"),
    (r"\.push\(", ".Add("),
    (r"\.length\b", ".Count"),
    (r"\bNumber\b", "float"),
    (r"static const", "const"),
    (r"const OPERATORS_LIST:Array\s?=\s?\[([^\]]+)\]", "static var OPERATORS_LIST:Array = new string[]{${1}}"),
    (r"(protected|private) var _rawZone\b", "public var rawZone"),
    (r"(protected|private) var _zoneSize\b", "public var zoneSize"),
    (r"(protected|private) var _zoneShape\b", "public var zoneShape"),
    (r"(protected|private) var _zoneMinSize\b", "public var zoneMinSize"),
    (r"(protected|private) var _weight\b", "public var weight"),
    (r"(protected|private) var _type\b", "public var type"),
    (r"(protected|private) var _oldValue\b", "public var oldValue"),
    (r"(protected|private) var _newValue\b", "public var newValue"),
    (r"(protected|private) var _lang\b", "public var lang"),
    (r"public var iconId:uint", "public var iconId:int"),
];

/// Protocol rules only fold the fully qualified vector type into its short form.
pub const PROTOCOL_RULES: [(&str, &str); 1] = [(r"__AS3__\.vec\.Vector", "Vector")];

/// Range-check failures carry no wire data and would push vector appends out
/// of the ordering window.
pub const PROTOCOL_IGNORED: [&str; 1] = [r"^\s*throw\s"];

lazy_static! {
    static ref RECORD_PREPROCESSOR:   Preprocessor = Preprocessor::from_patterns(&[], &RECORD_RULES).unwrap();
    static ref PROTOCOL_PREPROCESSOR: Preprocessor = Preprocessor::from_patterns(&PROTOCOL_IGNORED, &PROTOCOL_RULES).unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    ignored: Vec<Regex>,
    rules:   Vec<Rule>,
}

impl Preprocessor {
    pub fn new(ignored: Vec<Regex>, rules: Vec<Rule>) -> Preprocessor {
        Preprocessor { ignored, rules }
    }

    pub fn from_patterns(ignored: &[&str], rules: &[(&str, &str)]) -> Result<Preprocessor, GenError> {
        let ignored = ignored
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        let rules = rules
            .iter()
            .map(|(pattern, replacement)| Rule::new(pattern, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Preprocessor::new(ignored, rules))
    }

    pub fn records() -> &'static Preprocessor {
        &RECORD_PREPROCESSOR
    }

    pub fn protocol() -> &'static Preprocessor {
        &PROTOCOL_PREPROCESSOR
    }

    pub fn is_ignored(&self, line: &str) -> bool {
        self.ignored.iter().any(|rule| rule.is_match(line))
    }

    /// Applies every rule, in declaration order, to `line`.
    pub fn apply_rules(&self, line: &str) -> String {
        let mut current = line.to_string();
        for rule in &self.rules {
            current = rule.pattern.replace_all(&current, rule.replacement.as_str()).into_owned();
        }
        current
    }

    /// Drops ignored lines, trims and normalizes the rest, then indexes `{ }`.
    pub fn process(&self, text: &str) -> Result<SourceText, GenError> {
        let lines: Vec<String> = text
            .lines()
            .filter(|line| !self.is_ignored(line))
            .map(|line| self.apply_rules(line.trim()))
            .collect();
        let brackets = index_brackets(&lines, '{', '}')?;
        trace!("Preprocessed {} lines, {} bracket pairs", lines.len(), brackets.len());
        Ok(SourceText { lines, brackets })
    }
}

/// Stack-based bracket matching by line. A line containing the opener pushes
/// its index; a line containing the closer pops and records the pair (so a line
/// holding both pairs with itself).
pub fn index_brackets(lines: &[String], open: char, close: char) -> Result<BracketIndex, GenError> {
    let mut stack: Vec<usize> = Vec::new();
    let mut result = BracketIndex::new();

    for (i, line) in lines.iter().enumerate() {
        if line.contains(open) {
            stack.push(i);
        }
        if line.contains(close) {
            let start = stack.pop().ok_or(GenError::UnmatchedBracket {
                delimiter: close,
                line:      i,
            })?;
            result.insert(start, i);
        }
    }

    if let Some(&line) = stack.first() {
        return Err(GenError::UnclosedBracket {
            delimiter: open,
            line,
        });
    }

    Ok(result)
}
