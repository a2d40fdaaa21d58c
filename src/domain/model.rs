use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One data row of the input file, keyed by lower-cased header name.
/// Empty values are omitted, so "absent column" and "blank cell" read the
/// same way through `get`.
pub type RawRow = std::collections::HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstitutionType {
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeLevel {
    Licence,
    Master,
    Doctorat,
}

impl DegreeLevel {
    /// Maps a raw `cycle` value to a degree level. Anything outside the
    /// three recognized cycles falls back to `Licence`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("master") => DegreeLevel::Master,
            Some("doctorat") => DegreeLevel::Doctorat,
            _ => DegreeLevel::Licence,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DegreeLevel::Licence => "Licence",
            DegreeLevel::Master => "Master",
            DegreeLevel::Doctorat => "Doctorat",
        }
    }
}

/// Display aggregates shown on institution cards. Never authoritative; the
/// catalog service recomputes them on its side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionStats {
    pub faculties: u32,
    pub programs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub description: String,
    pub levels: Vec<DegreeLevel>,
}

impl Faculty {
    pub fn new(name: impl Into<String>, level: DegreeLevel) -> Self {
        Self {
            id: generate_id("fac"),
            name: name.into(),
            description: String::new(),
            levels: vec![level],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub acronym: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: InstitutionType,
    pub is_standalone_school: bool,
    #[serde(default)]
    pub stats: InstitutionStats,
    #[serde(default)]
    pub faculties: Vec<Faculty>,
}

impl Institution {
    pub fn new(
        acronym: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        kind: InstitutionType,
        is_standalone_school: bool,
    ) -> Self {
        Self {
            id: generate_id("inst"),
            name: name.into(),
            acronym: acronym.into(),
            location: location.into(),
            kind,
            is_standalone_school,
            stats: InstitutionStats::default(),
            faculties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerProspect {
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredDiploma {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub name: String,
    pub institution_id: String,
    pub institution_acronym: String,
    pub faculty_name: String,
    pub domain: String,
    pub level: DegreeLevel,
    pub duration: String,
    pub fees: String,
    pub location: String,
    pub career_prospects: Vec<CareerProspect>,
    pub required_diplomas: Vec<RequiredDiploma>,
}

/// One pending write against the catalog service, in row-processing order.
/// `UpdateInstitution` carries the whole parent: faculties are exclusively
/// owned, so persisting a new faculty means re-submitting its institution.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogMutation {
    CreateInstitution(Institution),
    UpdateInstitution(Institution),
    CreateProgram(Program),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    MissingAcronym,
    MissingProgramName,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingAcronym => write!(f, "missing institution acronym (sigle_inst)"),
            SkipReason::MissingProgramName => write!(f, "missing program name (nom_filiere)"),
        }
    }
}

/// Diagnostic for a data row excluded from the run. `row_number` is the
/// 1-based ordinal of the parsed data row (blank lines excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub institutions_created: usize,
    pub programs_created: usize,
    pub skipped: Vec<SkippedRow>,
    pub imported_at: DateTime<Utc>,
}

/// Placeholder policy for fields the input file may leave blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDefaults {
    pub city: String,
    pub faculty_label: String,
    pub domain: String,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            city: "Non précisée".to_string(),
            faculty_label: "Tronc commun".to_string(),
            domain: "Général".to_string(),
        }
    }
}

/// Locally generated, provisional identifier: entity-kind prefix plus a
/// random suffix. The catalog service may assign its own on persistence.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
