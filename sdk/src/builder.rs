//! Family builders. Each family is parsed completely before anything is
//! generated, so generators can look at every class of the family.

use crate::output::OutputTree;
use log::{info, warn};
use scriptgen_compiler::{
    generate_enum_file, generate_protocol_file, generate_record_file, parse_enum_class, parse_protocol_class,
    parse_record_class, ClassTable, Family, GenContext, GenError, GeneratorConfig, IdRegistry,
};
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

/// Outcome of one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyReport {
    pub family:    &'static str,
    pub generated: usize,
    pub skipped:   usize,
    pub elapsed:   Duration,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads and parses every file, logging and counting the ones that fail.
fn parse_all<T, F>(files: &[PathBuf], mut parse: F) -> (Vec<T>, usize)
where
    F: FnMut(&Path, &str) -> Result<T, GenError>,
{
    let mut parsed = Vec::with_capacity(files.len());
    let mut skipped = 0;

    for path in files {
        let result = fs::read_to_string(path)
            .map_err(GenError::from)
            .and_then(|text| parse(path, &text));
        match result {
            Ok(class) => parsed.push(class),
            Err(err) => {
                warn!("File {} not parsed correctly: {}", file_name(path), err);
                skipped += 1;
            }
        }
    }

    (parsed, skipped)
}

pub fn build_protocol_family(
    family: Family,
    files: &[PathBuf],
    config: &GeneratorConfig,
    ids: &IdRegistry,
    output: &mut OutputTree,
) -> Result<FamilyReport, GenError> {
    let start = Instant::now();
    let (classes, skipped) = parse_all(files, |_, text| parse_protocol_class(text, config));

    let table = ClassTable::new(&classes);
    let ctx = GenContext {
        config,
        ids,
        table: &table,
    };
    for class in &classes {
        output.write(&generate_protocol_file(class, family, &ctx))?;
        info!("> Parsing {} ...", class.name);
    }

    Ok(FamilyReport {
        family: match family {
            Family::Message => "Messages",
            Family::Type => "Types",
        },
        generated: classes.len(),
        skipped,
        elapsed: start.elapsed(),
    })
}

pub fn build_enum_family(files: &[PathBuf], config: &GeneratorConfig, output: &mut OutputTree) -> Result<FamilyReport, GenError> {
    let start = Instant::now();
    let (enums, skipped) = parse_all(files, |_, text| parse_enum_class(text, config));

    for enum_class in &enums {
        output.write(&generate_enum_file(enum_class, config))?;
        info!("> Parsing {} ...", enum_class.name);
    }

    Ok(FamilyReport {
        family: "Enums",
        generated: enums.len(),
        skipped,
        elapsed: start.elapsed(),
    })
}

pub fn build_record_family(files: &[PathBuf], config: &GeneratorConfig, output: &mut OutputTree) -> Result<FamilyReport, GenError> {
    let start = Instant::now();
    let (records, skipped) = parse_all(files, |path, text| {
        parse_record_class(&file_name(path), text, &config.policy)
    });

    for record in &records {
        output.write(&generate_record_file(record, config))?;
        info!("Parsed {}", record.class.name);
    }

    Ok(FamilyReport {
        family: "Records",
        generated: records.len(),
        skipped,
        elapsed: start.elapsed(),
    })
}
