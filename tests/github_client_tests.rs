use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use mockito::Matcher;
use readmegen::error::GeneratorError;
use readmegen::{Config, GitHubClient, RepoPath};

fn test_config(base_url: &str) -> Config {
    Config {
        github_api_base: base_url.to_string(),
        ..Config::default()
    }
}

fn repo() -> RepoPath {
    RepoPath {
        owner: "octo".into(),
        name: "demo".into(),
    }
}

const REPO_BODY: &str = r#"{
    "name": "demo",
    "description": "A demo",
    "language": "Rust",
    "html_url": "https://github.com/octo/demo",
    "default_branch": "trunk",
    "license": {"name": "MIT License"},
    "owner": {"login": "octo"}
}"#;

#[tokio::test]
async fn test_fetch_repository_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octo/demo")
        .match_header("accept", "application/vnd.github.v3+json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPO_BODY)
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url()), None).unwrap();
    let meta = client.fetch_repository(&repo()).await.unwrap();

    assert_eq!(meta.name, "demo");
    assert_eq!(meta.default_branch.as_deref(), Some("trunk"));
    assert_eq!(meta.owner_login(), Some("octo"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bearer_token_is_sent_when_present() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octo/demo")
        .match_header("authorization", "Bearer testtoken")
        .with_status(200)
        .with_body(REPO_BODY)
        .create_async()
        .await;

    let client =
        GitHubClient::new(&test_config(&server.url()), Some("testtoken".into())).unwrap();
    client.fetch_repository(&repo()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anonymous_calls_omit_authorization() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octo/demo")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(REPO_BODY)
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url()), None).unwrap();
    client.fetch_repository(&repo()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_status_classification() {
    let cases = [
        (401, "authentication"),
        (404, "not_found"),
        (403, "rate_limit"),
        (502, "remote"),
    ];

    for (status, expected) in cases {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/repos/octo/demo")
            .with_status(status)
            .with_body(r#"{"message": "nope"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(&test_config(&server.url()), None).unwrap();
        let err = client.fetch_repository(&repo()).await.unwrap_err();

        match expected {
            "authentication" => assert!(matches!(err, GeneratorError::Authentication(_))),
            "not_found" => assert!(matches!(err, GeneratorError::NotFound(_))),
            "rate_limit" => assert!(matches!(err, GeneratorError::RateLimit(_))),
            _ => {
                assert!(matches!(err, GeneratorError::Remote { status: 502, .. }));
                assert!(err.to_string().contains("nope"));
            }
        }
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/octo/demo")
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url()), None).unwrap();
    let err = client.fetch_repository(&repo()).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_tree_returns_paths_in_api_order() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/octo/demo/git/trees/trunk?recursive=1")
        .with_status(200)
        .with_body(
            r#"{"tree": [
                {"path": "README.md", "type": "blob"},
                {"path": "src", "type": "tree"},
                {"path": "src/main.rs", "type": "blob"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url()), None).unwrap();
    let paths = client.fetch_tree(&repo(), "trunk").await.unwrap();
    assert_eq!(paths, vec!["README.md", "src", "src/main.rs"]);
}

#[tokio::test]
async fn test_fetch_content_decodes_base64() {
    let raw = "{\n  \"name\": \"demo\"\n}";
    // GitHub wraps base64 content across lines
    let mut encoded = BASE64.encode(raw);
    encoded.insert(8, '\n');

    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/octo/demo/contents/package.json?ref=trunk")
        .with_status(200)
        .with_body(format!(
            r#"{{"content": "{}", "encoding": "base64"}}"#,
            encoded.replace('\n', "\\n")
        ))
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url()), None).unwrap();
    let content = client
        .fetch_content(&repo(), "package.json", "trunk")
        .await
        .unwrap();
    assert_eq!(content, raw);
}

#[tokio::test]
async fn test_fetch_content_rejects_unknown_encoding() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/octo/demo/contents/weird.bin?ref=trunk")
        .with_status(200)
        .with_body(r#"{"content": "abc", "encoding": "utf-16"}"#)
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url()), None).unwrap();
    let err = client
        .fetch_content(&repo(), "weird.bin", "trunk")
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_license_template() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/licenses/mit")
        .with_status(200)
        .with_body(r#"{"name": "MIT License", "body": "Copyright (c) [year] [fullname]"}"#)
        .create_async()
        .await;

    let client = GitHubClient::new(&test_config(&server.url()), None).unwrap();
    let template = client.fetch_license("mit").await.unwrap();
    assert_eq!(template.name, "MIT License");
    assert!(template.body.contains("[fullname]"));
}
