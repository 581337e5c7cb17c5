//! End-to-end report generation and report-file management.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::advisor::NarrativeAdvisor;
use crate::audit::AuditRecord;
use crate::catalogue::Catalogues;
use crate::composer::{compose, Branding};
use crate::config::ManziliConfig;
use crate::credentials::Credentials;
use crate::document::Renderer;
use crate::docx::DocxRenderer;
use crate::error::ReportError;
use crate::locale::Locale;
use crate::locks::KeyedLocks;
use crate::matcher::match_recommendations;

/// File name prefix shared by every generated report.
pub const REPORT_FILE_PREFIX: &str = "Manzili_Energy_Audit_Report_";

/// Deterministic file name for `report_number` with extension `ext`.
///
/// # Errors
///
/// Returns [`ReportError::InvalidFilename`] if the report number could
/// escape the output directory.
pub fn report_file_name(report_number: &str, ext: &str) -> Result<String, ReportError> {
    let name = format!("{REPORT_FILE_PREFIX}{report_number}.{ext}");
    if report_number.contains(['/', '\\', '\0']) || report_number.contains("..") {
        return Err(ReportError::InvalidFilename(name));
    }
    Ok(name)
}

/// Whether `name` is a bare file name this service could have produced.
pub fn is_report_file_name(name: &str, ext: &str) -> bool {
    let Some(number) = name
        .strip_prefix(REPORT_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(ext))
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return false;
    };
    !number.is_empty() && report_file_name(number, ext).is_ok()
}

/// A report that has just been written.
///
/// `bytes` is the content that was stored at `path`. Serve it from here:
/// once [`ReportService::generate`] returns, a concurrent request for the
/// same report number may already be replacing the file.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// Where the report was written.
    pub path: PathBuf,
    /// The rendered document.
    pub bytes: Vec<u8>,
}

impl GeneratedReport {
    /// Bare file name of the written report.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Generates, stores and deletes report files.
///
/// Cloning is cheap; clones share the per-report-number locks.
#[derive(Clone)]
pub struct ReportService {
    catalogues: Arc<Catalogues>,
    advisor: NarrativeAdvisor,
    renderer: Arc<dyn Renderer>,
    branding: Arc<Branding>,
    output_dir: PathBuf,
    locks: Arc<KeyedLocks>,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService")
            .field("advisor", &self.advisor)
            .field("extension", &self.renderer.extension())
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}

impl ReportService {
    /// Assemble a service from its parts.
    pub fn new(
        catalogues: Catalogues,
        advisor: NarrativeAdvisor,
        renderer: Arc<dyn Renderer>,
        branding: Branding,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalogues: Arc::new(catalogues),
            advisor,
            renderer,
            branding: Arc::new(branding),
            output_dir: output_dir.into(),
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Build the service from configuration: catalogues, branding images,
    /// the narrative provider and the DOCX renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalogue override or a branding image cannot
    /// be loaded, or the output directory cannot be created. A provider that
    /// cannot be built is not an error.
    pub fn from_config(
        config: &ManziliConfig,
        credentials: &Credentials,
    ) -> Result<Self, ReportError> {
        let catalogues = Catalogues::load(config.reports.catalogue_dir.as_deref())?;
        let branding = Branding::load(&config.reports.assets_dir)?;
        let advisor = NarrativeAdvisor::from_config(&config.advisor, credentials);
        let output_dir = config.reports.output_dir.clone();
        std::fs::create_dir_all(&output_dir).map_err(|e| ReportError::io(&output_dir, e))?;
        Ok(Self::new(
            catalogues,
            advisor,
            Arc::new(DocxRenderer::new()),
            branding,
            output_dir,
        ))
    }

    /// Loaded catalogues.
    pub fn catalogues(&self) -> &Catalogues {
        &self.catalogues
    }

    /// The narrative advisor.
    pub fn advisor(&self) -> &NarrativeAdvisor {
        &self.advisor
    }

    /// Directory report files are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Extension of produced files, without the dot.
    pub fn extension(&self) -> &'static str {
        self.renderer.extension()
    }

    /// File name a report with `report_number` is stored under.
    ///
    /// # Errors
    ///
    /// See [`report_file_name`].
    pub fn file_name(&self, report_number: &str) -> Result<String, ReportError> {
        report_file_name(report_number, self.extension())
    }

    /// Generate the report for one audit, returning where it was written
    /// together with the written bytes.
    ///
    /// Every required field is checked before the narrative call, and the
    /// whole document is rendered in memory before anything touches the
    /// output directory. A previous file with the same report number is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] for absent or blank fields,
    /// [`ReportError::Advisor`] for upstream failures, and
    /// [`ReportError::Io`] or [`ReportError::Document`] for write failures.
    pub async fn generate(
        &self,
        locale: Locale,
        record: &AuditRecord,
    ) -> Result<GeneratedReport, ReportError> {
        record.validate(locale)?;
        let report_number = record.report_number(locale)?;
        let file_name = self.file_name(report_number)?;

        let catalogue = self.catalogues.get(locale);
        let groups = match_recommendations(record, catalogue, locale)?;
        let narrative = self.advisor.narrative(record, locale).await?;
        let document = compose(locale, record, &groups, &narrative, &self.branding)?;
        let bytes = self.renderer.render(&document)?;

        let path = self.output_dir.join(&file_name);
        let _guard = self.locks.lock(report_number).await;
        self.replace(&path, &bytes).await?;

        info!(
            %locale,
            report_number,
            path = %path.display(),
            selections = groups.len(),
            fallback_narrative = narrative.is_fallback(),
            bytes = bytes.len(),
            "report written"
        );
        Ok(GeneratedReport { path, bytes })
    }

    /// Remove the old file, then write through a temporary file and rename.
    async fn replace(&self, path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => info!(path = %path.display(), "removed previous report"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "could not remove previous report"),
        }

        let tmp = self
            .output_dir
            .join(format!(".tmp-{}", uuid::Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(ReportError::io(&tmp, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(ReportError::io(path, e));
        }
        Ok(())
    }

    /// Delete a previously generated report by file name.
    ///
    /// Returns `false` if no such file existed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidFilename`] for names this service never
    /// produces, or [`ReportError::Io`] if removal fails.
    pub async fn delete(&self, file_name: &str) -> Result<bool, ReportError> {
        if !is_report_file_name(file_name, self.extension()) {
            return Err(ReportError::InvalidFilename(file_name.to_owned()));
        }
        let path = self.output_dir.join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "report deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ReportError::io(path, e)),
        }
    }
}
