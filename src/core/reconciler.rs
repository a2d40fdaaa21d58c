//! Catalog reconciliation: matches parsed rows against the working
//! institution snapshot and emits the pending catalog mutations.
//!
//! Pure: no I/O, no callbacks. The snapshot is mutated in place so that a
//! row can resolve an institution or faculty created by an earlier row of
//! the same batch.

use crate::domain::model::{
    generate_id, CareerProspect, CatalogMutation, DegreeLevel, Faculty, ImportDefaults,
    Institution, InstitutionType, Program, RawRow, RequiredDiploma, SkipReason, SkippedRow,
};

// Recognized header names (lower-cased by the parser).
const COL_ACRONYM: &str = "sigle_inst";
const COL_NAME: &str = "nom_inst";
const COL_CITY: &str = "ville";
const COL_STATUS: &str = "statut_inst";
const COL_KIND: &str = "type_inst";
const COL_FACULTY: &str = "nom_faculte";
const COL_CYCLE: &str = "cycle";
const COL_PROGRAM: &str = "nom_filiere";
const COL_DOMAIN: &str = "domaine";
const COL_DURATION: &str = "duree";
const COL_FEES: &str = "frais";
const COL_PROSPECTS: &str = "debouche";
const COL_DIPLOMAS: &str = "diplome";

/// Single-letter institution-kind code marking a standalone school.
const STANDALONE_SCHOOL_CODE: &str = "E";

/// Canonical separator for multi-value sub-fields (`debouche`, `diplome`).
const SUBFIELD_SEPARATOR: char = '|';

const CAREER_ICON: &str = "briefcase";
const DIPLOMA_ICON: &str = "graduation-cap";

#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub mutations: Vec<CatalogMutation>,
    pub institutions_created: usize,
    pub programs_created: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Resolves each row to an existing or newly created institution and
/// faculty, always attaching a new program. Rows missing a required field
/// are recorded in `skipped` and touch neither the snapshot nor the counts.
pub fn reconcile(
    rows: &[RawRow],
    snapshot: &mut Vec<Institution>,
    defaults: &ImportDefaults,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for (idx, row) in rows.iter().enumerate() {
        let row_number = idx + 1;

        let Some(acronym) = row.get(COL_ACRONYM) else {
            outcome.skipped.push(SkippedRow {
                row_number,
                reason: SkipReason::MissingAcronym,
            });
            continue;
        };
        let Some(program_name) = row.get(COL_PROGRAM) else {
            outcome.skipped.push(SkippedRow {
                row_number,
                reason: SkipReason::MissingProgramName,
            });
            continue;
        };

        let inst_idx = match snapshot
            .iter()
            .position(|i| i.acronym.to_lowercase() == acronym.to_lowercase())
        {
            Some(existing) => existing,
            None => {
                let institution = build_institution(row, acronym, defaults);
                outcome
                    .mutations
                    .push(CatalogMutation::CreateInstitution(institution.clone()));
                outcome.institutions_created += 1;
                snapshot.push(institution);
                snapshot.len() - 1
            }
        };

        let level = DegreeLevel::parse_or_default(row.get(COL_CYCLE).map(String::as_str));
        let sought_faculty = row
            .get(COL_FACULTY)
            .cloned()
            .unwrap_or_else(|| defaults.faculty_label.clone());

        // Faculty matching is scoped to the resolved institution; the same
        // name under another institution is a distinct faculty. Standalone
        // schools still get a faculty container.
        let institution = &mut snapshot[inst_idx];
        let faculty_name = match institution
            .faculties
            .iter()
            .position(|f| f.name.to_lowercase() == sought_faculty.to_lowercase())
        {
            Some(existing) => institution.faculties[existing].name.clone(),
            None => {
                let faculty = Faculty::new(sought_faculty, level);
                let name = faculty.name.clone();
                institution.faculties.push(faculty);
                outcome
                    .mutations
                    .push(CatalogMutation::UpdateInstitution(institution.clone()));
                name
            }
        };

        let program = build_program(
            row,
            program_name,
            &snapshot[inst_idx],
            faculty_name,
            level,
            defaults,
        );
        outcome
            .mutations
            .push(CatalogMutation::CreateProgram(program));
        outcome.programs_created += 1;
    }

    outcome
}

fn build_institution(row: &RawRow, acronym: &str, defaults: &ImportDefaults) -> Institution {
    let name = row
        .get(COL_NAME)
        .cloned()
        .unwrap_or_else(|| acronym.to_string());
    let location = row
        .get(COL_CITY)
        .cloned()
        .unwrap_or_else(|| defaults.city.clone());
    let kind = match row.get(COL_STATUS) {
        Some(status) if status.to_lowercase().contains("priv") => InstitutionType::Private,
        _ => InstitutionType::Public,
    };
    let is_standalone_school = row
        .get(COL_KIND)
        .is_some_and(|code| code.eq_ignore_ascii_case(STANDALONE_SCHOOL_CODE));

    Institution::new(acronym, name, location, kind, is_standalone_school)
}

fn build_program(
    row: &RawRow,
    name: &str,
    institution: &Institution,
    faculty_name: String,
    level: DegreeLevel,
    defaults: &ImportDefaults,
) -> Program {
    Program {
        id: generate_id("prog"),
        name: name.to_string(),
        institution_id: institution.id.clone(),
        institution_acronym: institution.acronym.clone(),
        faculty_name,
        domain: row
            .get(COL_DOMAIN)
            .cloned()
            .unwrap_or_else(|| defaults.domain.clone()),
        level,
        duration: row.get(COL_DURATION).cloned().unwrap_or_default(),
        fees: row.get(COL_FEES).cloned().unwrap_or_default(),
        location: institution.location.clone(),
        career_prospects: split_multi_value(row.get(COL_PROSPECTS))
            .into_iter()
            .map(|title| CareerProspect {
                title,
                icon: CAREER_ICON.to_string(),
            })
            .collect(),
        required_diplomas: split_multi_value(row.get(COL_DIPLOMAS))
            .into_iter()
            .map(|name| RequiredDiploma {
                name,
                icon: DIPLOMA_ICON.to_string(),
            })
            .collect(),
    }
}

fn split_multi_value(raw: Option<&String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(SUBFIELD_SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
