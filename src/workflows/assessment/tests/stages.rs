use super::common::*;
use crate::workflows::assessment::domain::{SampleKind, WritingSample};
use crate::workflows::assessment::services::{AnalysisServiceError, AuthorshipResponse};
use crate::workflows::assessment::stages::{authorship, plagiarism, style};
use chrono::Utc;

fn baseline_sample(title: &str, content: String) -> WritingSample {
    WritingSample {
        id: format!("sample-{title}"),
        title: title.to_string(),
        content,
        kind: SampleKind::Uploaded,
        submitted_at: Utc::now(),
    }
}

#[tokio::test]
async fn style_short_text_scores_deterministically_without_a_call() {
    let language = StubLanguageService::default();
    let rubric = rubric_100();

    let response = style::run(&language, &short_text(), &rubric)
        .await
        .expect("degenerate branch always succeeds");

    assert_eq!(language.style_calls(), 0);
    assert_eq!(response.feedback, "Text too short to analyze.");
    assert_eq!(response.metrics.vocabulary_richness, 0.0);
    assert_eq!(response.metrics.detected_ai_probability, 0.0);
    assert_eq!(response.rubric_scores.len(), rubric.len());
    for (score, criterion) in response.rubric_scores.iter().zip(&rubric) {
        assert_eq!(score.criterion_id, criterion.id);
        assert_eq!(score.score, 0.0);
        assert_eq!(score.comments, "Insufficient text");
    }
}

#[tokio::test]
async fn style_request_enumerates_rubric_and_truncates_text() {
    let language = StubLanguageService::default();
    let rubric = rubric_100();
    language.queue_style(Ok(style_response(&[
        ("clarity", 20.0),
        ("structure", 15.0),
        ("research", 22.0),
        ("grammar", 12.0),
        ("voice", 11.0),
    ])));

    let long_text = submission_text().repeat(40);
    assert!(long_text.chars().count() > 4000);

    style::run(&language, &long_text, &rubric)
        .await
        .expect("scripted response parses");

    let requests = language.style_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text.chars().count(), 4000);
    assert_eq!(requests[0].rubric.len(), rubric.len());
    for (spec, criterion) in requests[0].rubric.iter().zip(&rubric) {
        assert_eq!(spec.id, criterion.id);
        assert_eq!(spec.category, criterion.category);
        assert_eq!(spec.max_points, criterion.max_points);
        assert_eq!(spec.description, criterion.description);
    }
}

#[tokio::test]
async fn style_rejects_response_missing_a_criterion() {
    let language = StubLanguageService::default();
    language.queue_style(Ok(style_response(&[
        ("clarity", 20.0),
        ("structure", 15.0),
        ("research", 22.0),
        ("grammar", 12.0),
    ])));

    match style::run(&language, &submission_text(), &rubric_100()).await {
        Err(AnalysisServiceError::MalformedResponse(detail)) => {
            assert!(detail.contains("voice"), "unexpected detail: {detail}")
        }
        other => panic!("expected malformed response error, got {other:?}"),
    }
}

#[tokio::test]
async fn style_rejects_duplicate_and_unknown_criteria() {
    let language = StubLanguageService::default();
    language.queue_style(Ok(style_response(&[
        ("clarity", 20.0),
        ("clarity", 18.0),
        ("structure", 15.0),
        ("research", 22.0),
        ("grammar", 12.0),
    ])));
    assert!(matches!(
        style::run(&language, &submission_text(), &rubric_100()).await,
        Err(AnalysisServiceError::MalformedResponse(_))
    ));

    language.queue_style(Ok(style_response(&[
        ("clarity", 20.0),
        ("structure", 15.0),
        ("research", 22.0),
        ("grammar", 12.0),
        ("voice", 11.0),
        ("mystery", 5.0),
    ])));
    assert!(matches!(
        style::run(&language, &submission_text(), &rubric_100()).await,
        Err(AnalysisServiceError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn style_clamps_scores_into_criterion_range() {
    let language = StubLanguageService::default();
    language.queue_style(Ok(style_response(&[
        ("clarity", 99.0),
        ("structure", -4.0),
        ("research", 22.0),
        ("grammar", 12.0),
        ("voice", 11.0),
    ])));

    let response = style::run(&language, &submission_text(), &rubric_100())
        .await
        .expect("scripted response parses");

    assert_eq!(response.rubric_scores[0].score, 25.0);
    assert_eq!(response.rubric_scores[1].score, 0.0);
}

#[test]
fn plagiarism_score_follows_the_citation_heuristic() {
    assert_eq!(plagiarism::score_from_source_count(0), 0);
    assert_eq!(plagiarism::score_from_source_count(1), 60);
    assert_eq!(plagiarism::score_from_source_count(3), 80);
    assert_eq!(plagiarism::score_from_source_count(5), 100);
    assert_eq!(plagiarism::score_from_source_count(6), 100);
    assert_eq!(plagiarism::score_from_source_count(40), 100);
}

#[tokio::test]
async fn plagiarism_short_text_skips_the_service() {
    let search = StubSearchService::default();
    let result = plagiarism::run(&search, &short_text()).await;

    assert_eq!(search.calls(), 0);
    assert_eq!(result.score, 0);
    assert!(result.sources.is_empty());
    assert_eq!(result.analysis, "Text too short to check.");
}

#[tokio::test]
async fn plagiarism_truncates_and_scores_cited_sources() {
    let search = StubSearchService::default();
    search.queue(Ok(grounded_response(2)));

    let long_text = submission_text().repeat(20);
    let result = plagiarism::run(&search, &long_text).await;

    assert_eq!(result.score, 70);
    assert_eq!(result.sources.len(), 2);

    let requests = search.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text.chars().count(), 1000);
}

#[tokio::test]
async fn plagiarism_with_no_citations_scores_zero() {
    let search = StubSearchService::default();
    search.queue(Ok(grounded_response(0)));

    let result = plagiarism::run(&search, &submission_text()).await;

    assert_eq!(result.score, 0);
    assert!(result.sources.is_empty());
    assert_eq!(result.analysis, "Search found overlapping passages.");
}

#[tokio::test]
async fn plagiarism_failure_degrades_to_safe_result() {
    let search = StubSearchService::default();
    search.queue(Err(AnalysisServiceError::Unavailable(
        "search backend down".to_string(),
    )));

    let result = plagiarism::run(&search, &submission_text()).await;

    assert_eq!(result.score, 0);
    assert!(result.sources.is_empty());
    assert_eq!(result.analysis, "Error during plagiarism check.");
}

#[tokio::test]
async fn authorship_without_baseline_is_trivially_consistent() {
    let language = StubLanguageService::default();
    let verdict = authorship::run(&language, &[], &submission_text()).await;

    assert_eq!(language.authorship_calls(), 0);
    assert_eq!(verdict.match_score, 100.0);
    assert_eq!(verdict.reason, "No baseline to compare against.");
}

#[tokio::test]
async fn authorship_labels_and_truncates_baseline_blocks() {
    let language = StubLanguageService::default();
    language.queue_authorship(Ok(AuthorshipResponse {
        match_score: 87.5,
        reason: "Consistent punctuation habits.".to_string(),
    }));

    let samples = vec![
        baseline_sample("Essay on rivers", submission_text().repeat(30)),
        baseline_sample("Product teardown", submission_text()),
    ];
    let target = submission_text().repeat(30);

    let verdict = authorship::run(&language, &samples, &target).await;
    assert_eq!(verdict.match_score, 87.5);

    let requests = language.authorship_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.baseline_samples.len(), 2);
    assert_eq!(request.baseline_samples[0].label, "Sample 1: Essay on rivers");
    assert_eq!(request.baseline_samples[0].kind, "uploaded");
    assert_eq!(request.baseline_samples[0].content.chars().count(), 1500);
    assert_eq!(request.target_text.chars().count(), 3000);
}

#[tokio::test]
async fn authorship_failure_degrades_to_zero_match() {
    let language = StubLanguageService::default();
    language.queue_authorship(Err(AnalysisServiceError::MalformedResponse(
        "not json".to_string(),
    )));

    let samples = vec![baseline_sample("Essay", submission_text())];
    let verdict = authorship::run(&language, &samples, &submission_text()).await;

    assert_eq!(verdict.match_score, 0.0);
    assert_eq!(verdict.reason, "Analysis failed");
}
