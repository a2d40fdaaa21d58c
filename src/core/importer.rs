use crate::core::{parser, reconciler};
use crate::domain::model::{CatalogMutation, ImportDefaults, ImportSummary, Institution};
use crate::domain::ports::CatalogWriter;
use crate::utils::error::Result;
use chrono::Utc;

/// Import orchestrator: parse → reconcile → apply.
///
/// The run is not transactional: a failing collaborator call aborts the
/// remainder, but mutations already applied stay applied. Callers should
/// re-fetch the catalog afterward instead of trusting the local snapshot.
pub struct ImportEngine<W: CatalogWriter> {
    writer: W,
    defaults: ImportDefaults,
}

impl<W: CatalogWriter> ImportEngine<W> {
    pub fn new(writer: W, defaults: ImportDefaults) -> Self {
        Self { writer, defaults }
    }

    pub async fn run(
        &self,
        raw_text: &str,
        snapshot: &mut Vec<Institution>,
    ) -> Result<ImportSummary> {
        let rows = parser::parse_rows(raw_text)?;
        tracing::info!("Parsed {} data rows", rows.len());

        let outcome = reconciler::reconcile(&rows, snapshot, &self.defaults);
        for skipped in &outcome.skipped {
            tracing::warn!("Row {} skipped: {}", skipped.row_number, skipped.reason);
        }

        tracing::info!("Applying {} catalog mutations", outcome.mutations.len());
        self.apply(&outcome.mutations).await?;

        Ok(ImportSummary {
            institutions_created: outcome.institutions_created,
            programs_created: outcome.programs_created,
            skipped: outcome.skipped,
            imported_at: Utc::now(),
        })
    }

    /// Fires exactly one collaborator call per mutation, in row-processing
    /// order. The first failure propagates; nothing is rolled back.
    async fn apply(&self, mutations: &[CatalogMutation]) -> Result<()> {
        for mutation in mutations {
            match mutation {
                CatalogMutation::CreateInstitution(institution) => {
                    let persisted = self.writer.create_institution(institution).await?;
                    tracing::debug!(
                        "Created institution {} (provisional id {}, stored id {})",
                        institution.acronym,
                        institution.id,
                        persisted.id
                    );
                }
                CatalogMutation::UpdateInstitution(institution) => {
                    self.writer.update_institution(institution).await?;
                    tracing::debug!(
                        "Updated institution {} ({} faculties)",
                        institution.acronym,
                        institution.faculties.len()
                    );
                }
                CatalogMutation::CreateProgram(program) => {
                    self.writer.create_program(program).await?;
                    tracing::debug!(
                        "Created program {} under {}",
                        program.name,
                        program.institution_acronym
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DegreeLevel, SkipReason};
    use crate::utils::error::ImportError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    const SAMPLE_FILE: &str = "\
sigle_inst;nom_inst;ville;statut_inst;type_inst;nom_faculte;cycle;nom_filiere;domaine;duree;frais
HECM;Hautes Études;Cotonou;Privé;U;Gestion;Licence;Marketing;Commerce;3 Ans;300000
HECM;Hautes Études;Cotonou;Privé;U;Gestion;Master;Finance;Commerce;2 Ans;500000
ISM;Institut ISM;Parakou;Public;E;;Licence;Droit;Droit;3 Ans;100000
";

    #[derive(Clone, Default)]
    struct RecordingCatalog {
        calls: Arc<Mutex<Vec<String>>>,
        fail_on_program: Option<String>,
    }

    impl RecordingCatalog {
        fn failing_on_program(name: &str) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                fail_on_program: Some(name.to_string()),
            }
        }

        async fn calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl CatalogWriter for RecordingCatalog {
        async fn create_institution(&self, institution: &Institution) -> Result<Institution> {
            let mut calls = self.calls.lock().await;
            calls.push(format!("create_institution:{}", institution.acronym));
            Ok(institution.clone())
        }

        async fn update_institution(&self, institution: &Institution) -> Result<()> {
            let mut calls = self.calls.lock().await;
            calls.push(format!("update_institution:{}", institution.acronym));
            Ok(())
        }

        async fn create_program(&self, program: &crate::domain::model::Program) -> Result<()> {
            if self.fail_on_program.as_deref() == Some(program.name.as_str()) {
                return Err(ImportError::MalformedInput {
                    message: format!("simulated persistence failure for {}", program.name),
                });
            }
            let mut calls = self.calls.lock().await;
            calls.push(format!("create_program:{}", program.name));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_end_to_end_sample_file() {
        let catalog = RecordingCatalog::default();
        let engine = ImportEngine::new(catalog.clone(), ImportDefaults::default());
        let mut snapshot = Vec::new();

        let summary = engine.run(SAMPLE_FILE, &mut snapshot).await.unwrap();

        assert_eq!(summary.institutions_created, 2);
        assert_eq!(summary.programs_created, 3);
        assert!(summary.skipped.is_empty());

        // HECM ends up with exactly one faculty shared by both programs.
        let hecm = snapshot.iter().find(|i| i.acronym == "HECM").unwrap();
        assert_eq!(hecm.faculties.len(), 1);
        assert_eq!(hecm.faculties[0].name, "Gestion");

        // ISM is a standalone school and still gets the generic faculty.
        let ism = snapshot.iter().find(|i| i.acronym == "ISM").unwrap();
        assert!(ism.is_standalone_school);
        assert_eq!(ism.faculties[0].name, "Tronc commun");

        let calls = catalog.calls().await;
        assert_eq!(
            calls,
            vec![
                "create_institution:HECM",
                "update_institution:HECM",
                "create_program:Marketing",
                "create_program:Finance",
                "create_institution:ISM",
                "update_institution:ISM",
                "create_program:Droit",
            ]
        );
    }

    #[tokio::test]
    async fn test_sample_file_program_details() {
        let catalog = RecordingCatalog::default();
        let engine = ImportEngine::new(catalog, ImportDefaults::default());
        let mut snapshot = Vec::new();

        engine.run(SAMPLE_FILE, &mut snapshot).await.unwrap();

        let hecm = snapshot.iter().find(|i| i.acronym == "HECM").unwrap();
        assert_eq!(
            hecm.faculties[0].levels,
            vec![DegreeLevel::Licence],
            "faculty levels are seeded from the first row that created it"
        );
    }

    #[tokio::test]
    async fn test_collaborator_failure_aborts_without_rollback() {
        let catalog = RecordingCatalog::failing_on_program("Finance");
        let engine = ImportEngine::new(catalog.clone(), ImportDefaults::default());
        let mut snapshot = Vec::new();

        let result = engine.run(SAMPLE_FILE, &mut snapshot).await;
        assert!(result.is_err());

        // Everything before the failing program was already applied and
        // stays applied; everything after it never ran.
        let calls = catalog.calls().await;
        assert_eq!(
            calls,
            vec![
                "create_institution:HECM",
                "update_institution:HECM",
                "create_program:Marketing",
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_input_rejects_run_before_any_call() {
        let catalog = RecordingCatalog::default();
        let engine = ImportEngine::new(catalog.clone(), ImportDefaults::default());
        let mut snapshot = Vec::new();

        let result = engine.run("sigle_inst;nom_filiere\n", &mut snapshot).await;

        assert!(matches!(result, Err(ImportError::MalformedInput { .. })));
        assert!(catalog.calls().await.is_empty());
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_summary_carries_skip_diagnostics() {
        let text = "sigle_inst;nom_filiere\nHECM;Marketing\n;Droit\nISM;\n";
        let catalog = RecordingCatalog::default();
        let engine = ImportEngine::new(catalog, ImportDefaults::default());
        let mut snapshot = Vec::new();

        let summary = engine.run(text, &mut snapshot).await.unwrap();

        assert_eq!(summary.institutions_created, 1);
        assert_eq!(summary.programs_created, 1);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.skipped[0].reason, SkipReason::MissingAcronym);
        assert_eq!(summary.skipped[0].row_number, 2);
        assert_eq!(summary.skipped[1].reason, SkipReason::MissingProgramName);
        assert_eq!(summary.skipped[1].row_number, 3);
    }

    #[tokio::test]
    async fn test_preexisting_snapshot_suppresses_institution_create() {
        let catalog = RecordingCatalog::default();
        let engine = ImportEngine::new(catalog.clone(), ImportDefaults::default());
        let mut snapshot = vec![Institution::new(
            "HECM",
            "Hautes Études",
            "Cotonou",
            crate::domain::model::InstitutionType::Private,
            false,
        )];

        let summary = engine
            .run("sigle_inst;nom_filiere\nhecm;Marketing\n", &mut snapshot)
            .await
            .unwrap();

        assert_eq!(summary.institutions_created, 0);
        assert_eq!(summary.programs_created, 1);
        let calls = catalog.calls().await;
        assert_eq!(
            calls,
            vec!["update_institution:HECM", "create_program:Marketing"]
        );
    }
}
