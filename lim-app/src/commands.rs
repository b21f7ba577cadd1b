use anyhow::{Context, Result, bail};
use lim_editor::{Document, insert_lookup};
use lim_wiki::{ExtractionResult, LookupError, SummaryExtractor};
use serde::Serialize;
use std::ops::Range;
use std::path::Path;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Serialize)]
struct LookupView<'a> {
    found: bool,
    summary: String,
    locator: &'a str,
}

/// A lookup failure already explained to the user on stderr.
#[derive(Debug)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("lookup failed")
    }
}

impl std::error::Error for Reported {}

fn report(err: &LookupError, query: &str) -> anyhow::Error {
    tracing::warn!(error = %err, query = %query.trim(), "lim.lookup.failed");
    eprintln!("{}", err.user_message(query));
    anyhow::Error::new(Reported)
}

pub async fn lookup(
    extractor: &SummaryExtractor,
    query: &str,
    json: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let result = extractor
        .extract_with_cancel(query, cancel)
        .await
        .map_err(|e| report(&e, query))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view(&result))?);
    } else {
        println!("{}", result.render());
    }
    Ok(())
}

fn view(result: &ExtractionResult) -> LookupView<'_> {
    LookupView {
        found: result.is_found(),
        summary: result.message(),
        locator: result.locator().as_str(),
    }
}

pub async fn insert(
    extractor: &SummaryExtractor,
    file: &Path,
    select: Option<Range<usize>>,
    words: &[String],
    cancel: &CancellationToken,
) -> Result<()> {
    let mut doc = Document::open(file)?;
    let query = match select {
        Some(range) => doc.select(range)?.to_string(),
        None => words.join(" "),
    };

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LookupError::Cancelled),
        res = insert_lookup(&mut doc, extractor, &query) => res,
    };
    let result = outcome.map_err(|e| report(&e, &query))?;

    doc.save()
        .with_context(|| format!("saving {}", file.display()))?;
    eprintln!(
        "{}: inserted {} for '{}'",
        doc.title(),
        if result.is_found() { "summary" } else { "placeholder" },
        query.trim()
    );
    Ok(())
}

pub fn new_document(file: &Path, force: bool) -> Result<()> {
    if file.exists() && !force {
        let existing = Document::open(file)?;
        if !existing.is_blank() {
            bail!(
                "{} already has content; pass --force to discard it",
                file.display()
            );
        }
    }
    let mut doc = Document::new();
    doc.save_as(file)?;
    eprintln!("{}", doc.title());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ARTICLE: &str = r#"<html><body><div id="mw-content-text">
<p>Felis catus is a small cat.[1]</p></div></body></html>"#;

    async fn serve(route: &str, status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn json_view_carries_found_summary_and_locator() {
        let server = serve("/wiki/Felis%20catus", 200, ARTICLE).await;
        let ex = SummaryExtractor::new(&server.uri()).unwrap();

        let result = ex.extract("Felis catus").await.unwrap();
        let json = serde_json::to_value(view(&result)).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["summary"], "Felis catus is a small cat.");
        assert_eq!(
            json["locator"],
            format!("{}/wiki/Felis%20catus", server.uri())
        );

        lookup(&ex, "Felis catus", true, &CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn json_view_for_empty_article_is_not_found() {
        let server = serve(
            "/wiki/Blank",
            200,
            r#"<html><body><div id="mw-content-text"><p> </p></div></body></html>"#,
        )
        .await;
        let ex = SummaryExtractor::new(&server.uri()).unwrap();

        let result = ex.extract("Blank").await.unwrap();
        let json = serde_json::to_value(view(&result)).unwrap();
        assert_eq!(json["found"], false);
        assert!(
            json["summary"]
                .as_str()
                .unwrap()
                .starts_with("Could not find a relevant summary")
        );
    }

    #[tokio::test]
    async fn lookup_failure_is_reported() {
        let server = serve("/wiki/Catt", 404, "").await;
        let ex = SummaryExtractor::new(&server.uri()).unwrap();

        let err = lookup(&ex, "Catt", false, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is::<Reported>());
    }

    #[tokio::test]
    async fn insert_with_selection_saves_appended_block() {
        let server = serve("/wiki/Felis%20catus", 200, ARTICLE).await;
        let ex = SummaryExtractor::new(&server.uri()).unwrap();
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("notes.txt");
        std::fs::write(&p, "My notes on Felis catus").unwrap();

        insert(&ex, &p, Some(12..23), &[], &CancellationToken::new())
            .await
            .unwrap();

        let saved = std::fs::read_to_string(&p).unwrap();
        let expected = format!(
            "My notes on Felis catus\n-Felis catus is a small cat.\n{}\nSource: Wikipedia ({}/wiki/Felis%20catus)",
            "-".repeat(44),
            server.uri()
        );
        assert_eq!(saved, expected);
    }

    #[tokio::test]
    async fn insert_with_words_joins_them_into_the_query() {
        let server = serve("/wiki/Felis%20catus", 200, ARTICLE).await;
        let ex = SummaryExtractor::new(&server.uri()).unwrap();
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("notes.txt");
        std::fs::write(&p, "").unwrap();

        let words = vec!["Felis".to_string(), "catus".to_string()];
        insert(&ex, &p, None, &words, &CancellationToken::new())
            .await
            .unwrap();

        let saved = std::fs::read_to_string(&p).unwrap();
        assert!(saved.starts_with("-Felis catus is a small cat.\n"), "{saved}");
    }

    #[tokio::test]
    async fn failed_insert_leaves_file_byte_identical() {
        let server = serve("/wiki/Nowhere", 404, "").await;
        let ex = SummaryExtractor::new(&server.uri()).unwrap();
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("notes.txt");
        let original = "line one\nNowhere\n";
        std::fs::write(&p, original).unwrap();

        let err = insert(&ex, &p, Some(9..16), &[], &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is::<Reported>());
        assert_eq!(std::fs::read(&p).unwrap(), original.as_bytes());
    }

    #[tokio::test]
    async fn cancelled_insert_leaves_file_untouched() {
        let server = serve("/wiki/Cat", 200, ARTICLE).await;
        let ex = SummaryExtractor::new(&server.uri()).unwrap();
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("notes.txt");
        std::fs::write(&p, "keep").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let words = vec!["Cat".to_string()];
        assert!(insert(&ex, &p, None, &words, &cancel).await.is_err());
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "keep");
    }

    #[test]
    fn new_refuses_to_clobber_content() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("keep.txt");
        std::fs::write(&p, "precious").unwrap();

        assert!(new_document(&p, false).is_err());
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "precious");

        new_document(&p, true).unwrap();
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "");
    }

    #[test]
    fn new_over_blank_file_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("blank.txt");
        std::fs::write(&p, "  \n").unwrap();
        new_document(&p, false).unwrap();
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "");
    }
}
