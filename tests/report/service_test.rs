//! Report generation, replacement and deletion on disk.

use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use manzili::advisor::NarrativeAdvisor;
use manzili::catalogue::Catalogues;
use manzili::composer::Branding;
use manzili::docx::DocxRenderer;
use manzili::error::ReportError;
use manzili::locale::Locale;
use manzili::report::ReportService;

use crate::fixtures::{answers, record, tick, ScriptedProvider};

fn service(dir: &Path, advisor: NarrativeAdvisor) -> ReportService {
    ReportService::new(
        Catalogues::builtin().expect("catalogues"),
        advisor,
        Arc::new(DocxRenderer::new()),
        Branding::none(),
        dir,
    )
}

fn scripted(provider: ScriptedProvider) -> NarrativeAdvisor {
    NarrativeAdvisor::new(Arc::new(provider), Duration::from_secs(5), 256)
}

fn body_of(path: &Path) -> String {
    document_xml(std::fs::read(path).expect("report readable"))
}

fn document_xml(bytes: Vec<u8>) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut file = archive.by_name("word/document.xml").expect("body part");
    let mut out = String::new();
    file.read_to_string(&mut out).expect("utf-8");
    out
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("dir readable")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn generate_writes_deterministic_file_with_fallback_narrative() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svc = service(dir.path(), NarrativeAdvisor::unavailable());

    let report = svc
        .generate(Locale::English, &record(answers(Locale::English)))
        .await
        .expect("generate");
    assert_eq!(
        report.path,
        dir.path().join("Manzili_Energy_Audit_Report_007.docx")
    );
    assert_eq!(report.file_name(), "Manzili_Energy_Audit_Report_007.docx");
    assert_eq!(listing(dir.path()), ["Manzili_Energy_Audit_Report_007.docx"]);
    assert_eq!(std::fs::read(&report.path).expect("read"), report.bytes);
    assert!(body_of(&report.path).contains(Locale::English.text().fallback_narrative));
}

#[tokio::test]
async fn generated_narrative_is_sanitised_into_the_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svc = service(
        dir.path(),
        scripted(ScriptedProvider::replying("**Lighting:** swap bulbs [see annex]")),
    );
    let mut form = answers(Locale::English);
    tick(&mut form, "LED Lighting", "High Priority", "kitchen");

    let report = svc
        .generate(Locale::English, &record(form))
        .await
        .expect("generate");
    let body = body_of(&report.path);
    assert!(body.contains("Lighting: swap bulbs"));
    assert!(!body.contains("see annex"));
    assert!(body.contains("Replace old lighting with LED lights in kitchen"));
}

#[tokio::test]
async fn regenerating_replaces_the_previous_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svc = service(dir.path(), NarrativeAdvisor::unavailable());

    let first = answers(Locale::English);
    let mut second = answers(Locale::English);
    second.insert("homeowner".to_owned(), "Khalid Omar".to_owned());

    let a = svc
        .generate(Locale::English, &record(first))
        .await
        .expect("first");
    let b = svc
        .generate(Locale::English, &record(second))
        .await
        .expect("second");
    assert_eq!(a.path, b.path);
    assert_eq!(listing(dir.path()), ["Manzili_Energy_Audit_Report_007.docx"]);
    let body = body_of(&b.path);
    assert!(body.contains("Khalid Omar"));
    assert!(!body.contains("Mariam Saeed"));
}

#[tokio::test]
async fn concurrent_generation_for_one_number_leaves_one_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svc = service(dir.path(), NarrativeAdvisor::unavailable());

    let mut tasks = Vec::new();
    for owner in ["A One", "B Two", "C Three", "D Four"] {
        let svc = svc.clone();
        let mut form = answers(Locale::English);
        form.insert("homeowner".to_owned(), owner.to_owned());
        tasks.push(tokio::spawn(async move {
            svc.generate(Locale::English, &record(form)).await
        }));
    }
    let owners = ["A One", "B Two", "C Three", "D Four"];
    let mut returned = Vec::new();
    for task in tasks {
        returned.push(task.await.expect("join").expect("generate"));
    }
    assert_eq!(listing(dir.path()), ["Manzili_Energy_Audit_Report_007.docx"]);
    let path = dir.path().join("Manzili_Energy_Audit_Report_007.docx");
    let body = body_of(&path);
    assert_eq!(owners.iter().filter(|o| body.contains(*o)).count(), 1);

    for (owner, report) in owners.iter().zip(returned) {
        let own = document_xml(report.bytes);
        assert!(own.contains(owner), "{owner} got another request's report");
        assert_eq!(owners.iter().filter(|o| own.contains(*o)).count(), 1);
    }
}

#[tokio::test]
async fn missing_field_fails_before_advisor_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let provider = Arc::new(ScriptedProvider::replying("unused"));
    let svc = service(
        dir.path(),
        NarrativeAdvisor::new(provider.clone(), Duration::from_secs(5), 256),
    );
    let mut form = answers(Locale::English);
    form.remove("water_heaters");

    let err = svc.generate(Locale::English, &record(form)).await;
    assert!(matches!(
        err,
        Err(ReportError::MissingField { field }) if field == "water_heaters"
    ));
    assert_eq!(provider.calls(), 0);
    assert!(listing(dir.path()).is_empty());
}

#[tokio::test]
async fn advisor_failure_keeps_previous_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = service(dir.path(), NarrativeAdvisor::unavailable());
    let path = good
        .generate(Locale::Arabic, &record(answers(Locale::Arabic)))
        .await
        .expect("first report")
        .path;
    let before = std::fs::read(&path).expect("read");

    let failing = service(dir.path(), scripted(ScriptedProvider::failing(503)));
    let err = failing
        .generate(Locale::Arabic, &record(answers(Locale::Arabic)))
        .await
        .expect_err("503 should fail");
    assert!(matches!(err, ReportError::Advisor(_)));
    assert!(err.is_retryable());
    assert_eq!(std::fs::read(&path).expect("read"), before);
    assert_eq!(listing(dir.path()).len(), 1);
}

#[tokio::test]
async fn delete_removes_only_report_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svc = service(dir.path(), NarrativeAdvisor::unavailable());
    svc.generate(Locale::English, &record(answers(Locale::English)))
        .await
        .expect("generate");
    std::fs::write(dir.path().join("notes.txt"), "keep").expect("write");

    assert!(svc
        .delete("Manzili_Energy_Audit_Report_007.docx")
        .await
        .expect("delete"));
    assert!(!svc
        .delete("Manzili_Energy_Audit_Report_007.docx")
        .await
        .expect("second delete"));
    for bad in ["notes.txt", "../Manzili_Energy_Audit_Report_007.docx", ""] {
        assert!(matches!(
            svc.delete(bad).await,
            Err(ReportError::InvalidFilename(_))
        ));
    }
    assert_eq!(listing(dir.path()), ["notes.txt"]);
}

#[tokio::test]
async fn report_number_with_path_separator_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svc = service(dir.path(), NarrativeAdvisor::unavailable());
    let mut form = answers(Locale::English);
    form.insert("report_number".to_owned(), "../escape".to_owned());

    let err = svc.generate(Locale::English, &record(form)).await;
    assert!(matches!(err, Err(ReportError::InvalidFilename(_))));
    assert!(listing(dir.path()).is_empty());
}
