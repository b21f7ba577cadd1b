use lim_editor::{Document, insert_lookup};
use lim_wiki::{LookupError, SummaryExtractor};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = r#"<html><body><div id="mw-content-text">
<p>Felis catus is a small cat.[1]</p></div></body></html>"#;

#[tokio::test]
async fn appends_rendered_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/Felis%20catus"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
        .mount(&server)
        .await;

    let ex = SummaryExtractor::new(&server.uri()).unwrap();
    let mut doc = Document::new();
    doc.set_text("My notes on Felis catus");
    let query = doc.select(12..23).unwrap().to_string();
    assert_eq!(query, "Felis catus");

    let result = insert_lookup(&mut doc, &ex, &query).await.unwrap();
    assert!(result.is_found());

    let expected_tail = format!(
        "-Felis catus is a small cat.\n--------------------------------------------\nSource: Wikipedia ({}/wiki/Felis%20catus)",
        server.uri()
    );
    assert!(doc.text().starts_with("My notes on Felis catus\n"));
    assert!(doc.text().ends_with(&expected_tail), "{}", doc.text());
}

#[tokio::test]
async fn failed_lookup_leaves_document_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ex = SummaryExtractor::new(&server.uri()).unwrap();
    let mut doc = Document::new();
    doc.set_text("untouched");
    let before = doc.clone();

    let err = insert_lookup(&mut doc, &ex, "Nowhere").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(doc, before);
}

#[tokio::test]
async fn whitespace_selection_is_rejected() {
    let ex = SummaryExtractor::new("http://127.0.0.1:9").unwrap();
    let mut doc = Document::new();
    let err = insert_lookup(&mut doc, &ex, "  \n ").await.unwrap_err();
    assert!(matches!(err, LookupError::InvalidQuery));
    assert!(doc.text().is_empty());
}
