//! Integration tests for PubMed Fetcher
//!
//! These tests run the full pipeline against a local mock of the E-utilities
//! endpoints and against the in-memory mock source.

use mockito::{Matcher, Mock, ServerGuard};
use pubmed_fetcher::output::write_csv;
use pubmed_fetcher::pipeline::{Pipeline, PipelineError};
use pubmed_fetcher::sources::{MockSource, PubMedSource, Source, SourceError};
use pubmed_fetcher::utils::HttpClient;
use pubmed_fetcher::PaperRow;
use std::sync::Arc;

const SEARCH_BODY: &str = r#"{
  "header": {"type": "esearch", "version": "0.3"},
  "esearchresult": {"count": "3", "retmax": "3", "retstart": "0", "idlist": ["111", "222", "333"]}
}"#;

const COMPANY_RECORD: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">111</PMID>
      <Article PubModel="Print">
        <ArticleTitle>A trial.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <AffiliationInfo>
              <Affiliation>Acme Biotech Inc., Cambridge, MA, USA.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Jones</LastName>
            <AffiliationInfo>
              <Affiliation>Department of Medicine, Harvard University, Boston, MA, USA.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Novak</LastName>
            <AffiliationInfo>
              <Affiliation>Beta Pharma Ltd, London, UK. Electronic address: novak@beta-pharma.co.uk.</Affiliation>
            </AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

const ACADEMIC_RECORD: &str = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
<PMID Version="1">222</PMID><Article><AuthorList CompleteYN="Y">
<Author ValidYN="Y"><LastName>Berg</LastName><AffiliationInfo>
<Affiliation>Karolinska Institutet, Stockholm, Sweden.</Affiliation></AffiliationInfo></Author>
</AuthorList></Article></MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

const NO_AUTHORS_RECORD: &str = r#"<PubmedArticleSet><PubmedArticle><MedlineCitation>
<PMID Version="1">333</PMID><Article><Abstract><AbstractText>contact: jane.doe@acme-pharma.com for details</AbstractText></Abstract>
</Article></MedlineCitation></PubmedArticle></PubmedArticleSet>"#;

fn pubmed_source(server: &ServerGuard) -> PubMedSource {
    let client = Arc::new(HttpClient::new().unwrap());
    PubMedSource::with_client(client, server.url())
}

async fn mock_search(server: &mut ServerGuard, term: &str, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("db".into(), "pubmed".into()),
            Matcher::UrlEncoded("term".into(), term.into()),
            Matcher::UrlEncoded("retmode".into(), "json".into()),
            Matcher::UrlEncoded("retmax".into(), "50".into()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_fetch(server: &mut ServerGuard, id: &str, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/efetch.fcgi")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("db".into(), "pubmed".into()),
            Matcher::UrlEncoded("id".into(), id.into()),
            Matcher::UrlEncoded("retmode".into(), "xml".into()),
        ]))
        .with_status(status)
        .with_header("content-type", "text/xml")
        .with_body(body)
        .create_async()
        .await
}

fn canned_source() -> MockSource {
    MockSource::new()
        .with_record("111", COMPANY_RECORD)
        .with_record("222", ACADEMIC_RECORD)
        .with_record("333", NO_AUTHORS_RECORD)
}

#[tokio::test]
async fn test_pubmed_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let search = mock_search(&mut server, "cancer drug", 200, SEARCH_BODY).await;
    let fetches = vec![
        mock_fetch(&mut server, "111", 200, COMPANY_RECORD).await,
        mock_fetch(&mut server, "222", 200, ACADEMIC_RECORD).await,
        mock_fetch(&mut server, "333", 200, NO_AUTHORS_RECORD).await,
    ];

    let pipeline = Pipeline::new(Arc::new(pubmed_source(&server)));
    let rows = pipeline.run("cancer drug").await.unwrap();

    search.assert_async().await;
    for fetch in &fetches {
        fetch.assert_async().await;
    }

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].pubmed_id, "111");
    assert_eq!(rows[0].non_academic_authors, "Smith, Novak");
    assert_eq!(
        rows[0].company_affiliations,
        "Acme Biotech Inc., Cambridge, MA, USA., Beta Pharma Ltd, London, UK. Electronic address: novak@beta-pharma.co.uk."
    );
    assert_eq!(rows[0].corresponding_email, "novak@beta-pharma.co.uk");

    assert_eq!(rows[1].pubmed_id, "222");
    assert_eq!(rows[1].non_academic_authors, "");
    assert_eq!(rows[1].corresponding_email, "N/A");

    assert_eq!(rows[2].pubmed_id, "333");
    assert_eq!(rows[2].company_affiliations, "");
    assert_eq!(rows[2].corresponding_email, "jane.doe@acme-pharma.com");

    assert!(rows.iter().all(|r| r.title == "N/A" && r.publication_date == "N/A"));
}

#[tokio::test]
async fn test_pubmed_concurrent_fetch_keeps_order() {
    let mut server = mockito::Server::new_async().await;
    let _search = mock_search(&mut server, "q", 200, SEARCH_BODY).await;
    let _f1 = mock_fetch(&mut server, "111", 200, COMPANY_RECORD).await;
    let _f2 = mock_fetch(&mut server, "222", 200, ACADEMIC_RECORD).await;
    let _f3 = mock_fetch(&mut server, "333", 200, NO_AUTHORS_RECORD).await;

    let rows = Pipeline::new(Arc::new(pubmed_source(&server)))
        .concurrency(3)
        .run("q")
        .await
        .unwrap();

    let ids: Vec<&str> = rows.iter().map(|r| r.pubmed_id.as_str()).collect();
    assert_eq!(ids, vec!["111", "222", "333"]);
}

#[tokio::test]
async fn test_pubmed_search_without_idlist_is_empty() {
    let mut server = mockito::Server::new_async().await;
    let _search = mock_search(&mut server, "nothing", 200, r#"{"header":{}}"#).await;

    let rows = Pipeline::new(Arc::new(pubmed_source(&server)))
        .run("nothing")
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_pubmed_search_server_error_is_fatal_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("GET", "/esearch.fcgi")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let err = Pipeline::new(Arc::new(pubmed_source(&server)))
        .run("q")
        .await
        .unwrap_err();

    search.assert_async().await;
    match err {
        PipelineError::Search {
            source: SourceError::Api { status, .. },
            ..
        } => assert_eq!(status, 503),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_pubmed_search_malformed_body_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let _search = mock_search(&mut server, "q", 200, "<html>not json</html>").await;

    let err = pubmed_source(&server).search("q").await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)));
}

#[tokio::test]
async fn test_pubmed_fetch_failure_aborts_run() {
    let mut server = mockito::Server::new_async().await;
    let _search = mock_search(&mut server, "q", 200, SEARCH_BODY).await;
    let _f1 = mock_fetch(&mut server, "111", 200, COMPANY_RECORD).await;
    let _f2 = mock_fetch(&mut server, "222", 404, "").await;

    let err = Pipeline::new(Arc::new(pubmed_source(&server)))
        .run("q")
        .await
        .unwrap_err();

    match err {
        PipelineError::Fetch { id, source } => {
            assert_eq!(id.as_str(), "222");
            assert!(matches!(source, SourceError::Api { status: 404, .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_pubmed_rate_limit_maps_to_rate_limit_error() {
    let mut server = mockito::Server::new_async().await;
    let _search = mock_search(&mut server, "q", 429, "").await;

    let err = pubmed_source(&server).search("q").await.unwrap_err();
    assert!(matches!(err, SourceError::RateLimit));
}

#[tokio::test]
async fn test_csv_round_trip() {
    let rows = Pipeline::new(Arc::new(canned_source()))
        .run("q")
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("papers.csv");
    write_csv(&rows, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, PaperRow::HEADERS.to_vec());

    let read: Vec<PaperRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(read.len(), 3);
    assert_eq!(read, rows);

    let records: Vec<csv::StringRecord> = csv::Reader::from_path(&path)
        .unwrap()
        .records()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(records.iter().all(|r| r.len() == 6));
    assert_eq!(&records[1][3], "");
    assert_eq!(&records[1][5], "N/A");
}

#[tokio::test]
async fn test_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    for path in [&first, &second] {
        let rows = Pipeline::new(Arc::new(canned_source()))
            .run("q")
            .await
            .unwrap();
        write_csv(&rows, path).unwrap();
    }

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[tokio::test]
async fn test_row_count_matches_search_count() {
    let source = MockSource::new();
    for i in 0..17 {
        source.add_record(&format!("{}", 1000 - i), "<AuthorList></AuthorList>");
    }
    let source = Arc::new(source);

    let rows = Pipeline::new(source.clone()).run("q").await.unwrap();

    assert_eq!(rows.len(), 17);
    assert_eq!(source.fetch_calls(), 17);
    assert_eq!(rows[0].pubmed_id, "1000");
    assert_eq!(rows[16].pubmed_id, "984");
}
