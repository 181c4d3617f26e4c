//! Integration tests for the resume tailor

use resume_tailor::config::Config;
use resume_tailor::error::ResumeTailorError;
use resume_tailor::input::InputManager;
use resume_tailor::processing::compliance::Dimension;
use resume_tailor::processing::{
    Addition, ComplianceScorer, DocumentComposer, DocumentExtractor, GapAnalyzer, Importance,
    RequirementExtractor, SectionKind, StructuredResume,
};
use resume_tailor::session::SessionStore;
use std::path::Path;
use tempfile::TempDir;

fn manager() -> InputManager {
    InputManager::new(DocumentExtractor::default())
}

async fn sample_resume() -> StructuredResume {
    manager()
        .load_resume(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap()
}

async fn sample_job() -> String {
    manager()
        .load_text(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_resume_structure_from_txt() {
    let resume = sample_resume().await;

    assert!(resume.raw_text.contains("John Doe"));
    assert!(resume.raw_text.contains("Node.js"));
    for kind in [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Education,
    ] {
        assert!(resume.has_section(kind), "missing {:?}", kind);
    }
    assert_eq!(resume.sections[0].kind, SectionKind::Other);
    assert!(resume.sections[0].body.starts_with("John Doe"));
    assert!(resume
        .section(SectionKind::Skills)
        .unwrap()
        .body
        .contains("React"));
}

#[tokio::test]
async fn test_resume_structure_from_markdown() {
    let resume = manager()
        .load_resume(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();

    assert!(resume.raw_text.contains("Software Engineer"));
    assert!(!resume.raw_text.contains("**"));
    assert!(!resume.raw_text.contains("##"));
    assert!(resume.has_section(SectionKind::Experience));
    assert!(resume.has_section(SectionKind::Skills));
    assert!(resume
        .section(SectionKind::Experience)
        .unwrap()
        .body
        .contains("- Built React and Node.js services"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = manager();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let first = manager.load_resume(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.load_resume(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);

    let mut uncached = InputManager::new(DocumentExtractor::default()).with_cache(false);
    uncached.load_resume(path).await.unwrap();
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let result = manager()
        .load_resume(Path::new("tests/fixtures/unsupported.xyz"))
        .await;

    assert!(matches!(result, Err(ResumeTailorError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let result = manager()
        .load_resume(Path::new("tests/fixtures/nonexistent.txt"))
        .await;

    assert!(matches!(result, Err(ResumeTailorError::InvalidInput(_))));
}

#[tokio::test]
async fn test_empty_text_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, b"").unwrap();

    let resume = manager().load_resume(&path).await.unwrap();

    assert_eq!(resume.sections.len(), 1);
    assert_eq!(resume.sections[0].kind, SectionKind::Other);
    assert!(resume.sections[0].body.is_empty());

    let config = Config::default();
    let report = ComplianceScorer::new(&config.compliance, &config.matching).unwrap().score(&resume);
    assert!(report.overall_score < 60.0);
}

#[tokio::test]
async fn test_full_gap_analysis() {
    let config = Config::default();
    let resume = sample_resume().await;
    let job = sample_job().await;

    let requirements = RequirementExtractor::new(&config.matching).unwrap().extract(&job);
    let report = GapAnalyzer::new(&config.matching).analyze(&resume, &requirements);

    assert_eq!(report.total(), requirements.len());
    assert!(report.matched.iter().any(|k| k.term == "Python"));
    assert!(report.matched.iter().any(|k| k.term == "Docker"));
    assert!(report.matched.iter().any(|k| k.term == "5+ years experience"));

    let aws = report.find_missing("aws").unwrap();
    assert_eq!(aws.keyword.importance, Importance::Required);
    assert_eq!(aws.suggested_sections.first(), Some(&SectionKind::Skills));

    let kubernetes = report.find_missing("Kubernetes").unwrap();
    assert_eq!(kubernetes.keyword.importance, Importance::Preferred);

    // Required gaps come before preferred ones
    let first_preferred = report
        .missing
        .iter()
        .position(|m| m.keyword.importance == Importance::Preferred)
        .unwrap();
    assert!(report.missing[..first_preferred]
        .iter()
        .all(|m| m.keyword.importance == Importance::Required));

    assert!(report.match_score > 0.0 && report.match_score < 100.0);
}

#[tokio::test]
async fn test_compliance_on_sample_resume() {
    let config = Config::default();
    let resume = sample_resume().await;

    let report = ComplianceScorer::new(&config.compliance, &config.matching).unwrap().score(&resume);

    let weighted: f32 = Dimension::ALL
        .iter()
        .map(|d| report.components[d].score * d.weight())
        .sum();
    assert!((report.overall_score - weighted).abs() < 0.01);
    assert_eq!(report.components[&Dimension::Structure].score, 100.0);
}

#[tokio::test]
async fn test_session_flow_and_compose() {
    let config = Config::default();
    let dir = TempDir::new().unwrap();
    let store = SessionStore::open(dir.path()).unwrap();

    let resume = sample_resume().await;
    let requirements = RequirementExtractor::new(&config.matching)
        .unwrap()
        .extract(&sample_job().await);
    let gap = GapAnalyzer::new(&config.matching).analyze(&resume, &requirements);

    let session = store.create("sample_resume.txt", resume.clone(), Some(gap)).unwrap();
    let aws = session.gap_report.as_ref().unwrap().find_missing("AWS").unwrap();
    store
        .add_addition(&session.id, Addition::drafted(aws, "Skills", None))
        .unwrap();
    store
        .add_addition(
            &session.id,
            Addition::new("Terraform", "Certifications", "HashiCorp Terraform Associate", "technical_skill"),
        )
        .unwrap();

    let session = store.load(&session.id).unwrap();
    let composer = DocumentComposer::default();

    // A failed compose leaves the session untouched
    let err = composer.compose(&session.resume, &session.additions, "odt").unwrap_err();
    assert!(matches!(err, ResumeTailorError::UnsupportedFormat(_)));
    assert_eq!(store.load(&session.id).unwrap().additions.len(), 2);

    let bytes = composer.compose(&session.resume, &session.additions, "txt").unwrap();
    let text = String::from_utf8(bytes).unwrap();

    for line in resume.raw_text.lines().filter(|l| !l.trim().is_empty()) {
        assert!(text.contains(line), "lost line: {}", line);
    }
    assert!(text.contains("SKILLS\nJavaScript, TypeScript, React, Node.js, Python, PostgreSQL, Docker, Git\n- [NEW] AWS"));
    assert!(text.trim_end().ends_with("Certifications\n- [NEW] HashiCorp Terraform Associate"));

    let empty = store.clear_additions(&session.id).unwrap();
    let err = composer.compose(&empty.resume, &empty.additions, "md").unwrap_err();
    assert!(matches!(err, ResumeTailorError::EmptyAdditions));
}

#[tokio::test]
async fn test_compose_markdown_reparses() {
    let resume = sample_resume().await;
    let additions = vec![Addition::new("Kubernetes", "Skills", "Kubernetes", "technical_skill")];

    let bytes = DocumentComposer::default()
        .compose(&resume, &additions, "md")
        .unwrap();
    let reparsed = DocumentExtractor::default().extract(&bytes, "md").unwrap();

    assert!(reparsed
        .section(SectionKind::Skills)
        .unwrap()
        .body
        .contains("[NEW] Kubernetes"));
    assert_eq!(reparsed.sections.len(), resume.sections.len());
}

#[tokio::test]
async fn test_composed_docx_loads_from_disk() {
    let resume = sample_resume().await;
    let additions = vec![Addition::new("AWS", "Skills", "AWS", "technical_skill")];
    let bytes = DocumentComposer::default()
        .compose(&resume, &additions, "docx")
        .unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tailored.docx");
    std::fs::write(&path, &bytes).unwrap();

    let reloaded = manager().load_resume(&path).await.unwrap();
    assert!(reloaded.raw_text.contains("John Doe"));
    assert!(reloaded
        .section(SectionKind::Skills)
        .unwrap()
        .body
        .contains("- [NEW] AWS"));
    assert_eq!(reloaded.sections.len(), resume.sections.len());
}
