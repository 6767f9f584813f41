//! Integration tests for the FaaS client using wiremock
//!
//! These tests verify every endpoint's method, path, auth header, and body
//! shape against mocked responses, plus the decoding of typed results.

use faas_protocol::{FaasClient, ResourceType};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client bound to a mock server with the token every test expects
fn client_for(server: &MockServer) -> FaasClient {
    FaasClient::new("test-token", &server.uri()).expect("client should build")
}

/// Matcher for the platform's jwt auth scheme
fn jwt_header() -> wiremock::matchers::HeaderExactMatcher {
    header("authorization", "jwt test-token")
}

/// Test module for account endpoints
mod account_tests {
    use super::*;

    /// Test refresh returns the raw token body
    #[tokio::test]
    async fn test_refresh_returns_new_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/account/refresh-token"))
            .and(jwt_header())
            .respond_with(ResponseTemplate::new(200).set_body_string("fresh-token"))
            .mount(&server)
            .await;

        let token = client_for(&server).refresh().await.expect("refresh should succeed");
        assert_eq!(token, "fresh-token");
    }

    /// Test validate parses the boolean payload
    #[tokio::test]
    async fn test_validate_parses_boolean() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/validate"))
            .and(jwt_header())
            .respond_with(ResponseTemplate::new(200).set_body_json(true))
            .mount(&server)
            .await;

        assert!(client_for(&server).validate().await.expect("validate should succeed"));
    }

    /// Test deploy-enabled parses the boolean payload
    #[tokio::test]
    async fn test_deploy_enabled() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/account/deploy-enabled"))
            .and(jwt_header())
            .respond_with(ResponseTemplate::new(200).set_body_json(false))
            .mount(&server)
            .await;

        let enabled = client_for(&server)
            .deploy_enabled()
            .await
            .expect("deploy_enabled should succeed");
        assert!(!enabled);
    }

    /// Test the flat subscription list is reduced to a count by id
    #[tokio::test]
    async fn test_subscriptions_are_counted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/billing/list-subscriptions"))
            .and(jwt_header())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["basic", "basic", "pro"])))
            .mount(&server)
            .await;

        let map = client_for(&server)
            .list_subscriptions()
            .await
            .expect("list should succeed");
        assert_eq!(map.get("basic"), Some(&2));
        assert_eq!(map.get("pro"), Some(&1));
        assert_eq!(map.len(), 2);
    }

    /// Test subscription-deploy records parse into typed rows
    #[tokio::test]
    async fn test_subscription_deploys_parse() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/billing/list-subscriptions-deploys"))
            .and(jwt_header())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "sub-1", "plan": "basic", "date": "2024-04-01", "deploy": "greeter"}
            ])))
            .mount(&server)
            .await;

        let deploys = client_for(&server)
            .list_subscriptions_deploys()
            .await
            .expect("list should succeed");
        assert_eq!(deploys.len(), 1);
        assert_eq!(deploys[0].plan, "basic");
        assert_eq!(deploys[0].deploy, "greeter");
    }
}

/// Test module for inspect and error propagation
mod inspect_tests {
    use super::*;
    use faas_protocol::{DeployStatus, Error, LanguageId, ValueId};

    fn inspect_payload() -> serde_json::Value {
        json!([{
            "status": "ready",
            "prefix": "alice",
            "suffix": "greeter",
            "version": "v1",
            "packages": {
                "node": [{
                    "name": "index.js",
                    "scope": {
                        "name": "index",
                        "funcs": [{
                            "name": "greet",
                            "signature": {
                                "ret": {"type": {"name": "string", "id": 7}},
                                "args": []
                            },
                            "async": false
                        }],
                        "classes": [],
                        "objects": []
                    }
                }]
            },
            "ports": [41289]
        }])
    }

    /// Test inspect parses the full deployment payload
    #[tokio::test]
    async fn test_inspect_parses_deployments() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/inspect"))
            .and(jwt_header())
            .respond_with(ResponseTemplate::new(200).set_body_json(inspect_payload()))
            .mount(&server)
            .await;

        let deployments = client_for(&server).inspect().await.expect("inspect should succeed");
        assert_eq!(deployments.len(), 1);

        let deployment = &deployments[0];
        assert_eq!(deployment.status, DeployStatus::Ready);
        assert_eq!(deployment.ports, vec![41289]);

        let handles = &deployment.packages[&LanguageId::Node];
        let func = &handles[0].scope.funcs[0];
        assert_eq!(func.name, "greet");
        assert!(!func.is_async);
        assert_eq!(func.signature.ret.ty.id, ValueId::String);
    }

    /// Test the suffix lookup returns the matching deployment
    #[tokio::test]
    async fn test_inspect_by_name_finds_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/inspect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(inspect_payload()))
            .mount(&server)
            .await;

        let deployment = client_for(&server)
            .inspect_by_name("greeter")
            .await
            .expect("lookup should succeed");
        assert_eq!(deployment.prefix, "alice");
    }

    /// Test a missing suffix is an immediate NotFound, with no retry
    #[tokio::test]
    async fn test_inspect_by_name_miss_is_immediate() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/inspect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .inspect_by_name("ghost")
            .await
            .expect_err("lookup should miss");
        match err {
            Error::NotFound { suffix } => assert_eq!(suffix, "ghost"),
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Test a 500 response surfaces the status and the error body
    #[tokio::test]
    async fn test_error_body_is_preserved() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/inspect"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "database down"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).inspect().await.expect_err("inspect should fail");
        assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
        assert!(!err.is_connect());
        match err {
            Error::Protocol { body: Some(body), message, .. } => {
                assert!(body.contains("database down"), "{body}");
                assert!(message.contains("500"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

/// Test module for package upload and repository endpoints
mod repository_tests {
    use super::*;
    use faas_protocol::PackageManifest;

    /// Test upload sends every multipart field and returns the upload id
    #[tokio::test]
    async fn test_upload_sends_multipart_fields() {
        let server = MockServer::start().await;

        let manifest = PackageManifest {
            language_id: faas_protocol::LanguageId::Py,
            path: "main.py".to_string(),
            scripts: vec![],
        };

        Mock::given(method("POST"))
            .and(path("/api/package/create"))
            .and(jwt_header())
            .and(body_string_contains("name=\"id\""))
            .and(body_string_contains("calculator"))
            .and(body_string_contains("application/x-zip-compressed"))
            .and(body_string_contains("name=\"jsons\""))
            .and(body_string_contains("main.py"))
            .and(body_string_contains("name=\"runners\""))
            .and(body_string_contains("filename=\"blob\""))
            .respond_with(ResponseTemplate::new(200).set_body_string("upload-7"))
            .mount(&server)
            .await;

        let id = client_for(&server)
            .upload(
                "calculator",
                b"PK\x03\x04zipbytes".to_vec(),
                &[manifest],
                &["python".to_string()],
            )
            .await
            .expect("upload should succeed");
        assert_eq!(id, "upload-7");
    }

    /// Test repository registration posts manifests as JSON objects
    #[tokio::test]
    async fn test_add_repository() {
        let server = MockServer::start().await;

        let manifest = PackageManifest {
            language_id: faas_protocol::LanguageId::Node,
            path: "index.js".to_string(),
            scripts: vec!["run.sh".to_string()],
        };

        Mock::given(method("POST"))
            .and(path("/api/repository/add"))
            .and(jwt_header())
            .and(body_json(json!({
                "url": "https://github.com/example/fn.git",
                "branch": "main",
                "jsons": [{
                    "language_id": "node",
                    "path": "index.js",
                    "scripts": ["run.sh"]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "repo-3"})))
            .mount(&server)
            .await;

        let added = client_for(&server)
            .add("https://github.com/example/fn.git", "main", &[manifest])
            .await
            .expect("add should succeed");
        assert_eq!(added.id, "repo-3");
    }

    /// Test branch listing returns the branches envelope
    #[tokio::test]
    async fn test_branch_list() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/repository/branchlist"))
            .and(jwt_header())
            .and(body_json(json!({"url": "https://github.com/example/fn.git"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"branches": ["main", "dev"]})),
            )
            .mount(&server)
            .await;

        let branches = client_for(&server)
            .branch_list("https://github.com/example/fn.git")
            .await
            .expect("branch list should succeed");
        assert_eq!(branches.branches, vec!["main", "dev"]);
    }

    /// Test file listing unwraps the files envelope field
    #[tokio::test]
    async fn test_file_list_unwraps_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/repository/filelist"))
            .and(jwt_header())
            .and(body_json(json!({
                "url": "https://github.com/example/fn.git",
                "branch": "main"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"files": ["index.js", "package.json"]})),
            )
            .mount(&server)
            .await;

        let files = client_for(&server)
            .file_list("https://github.com/example/fn.git", "main")
            .await
            .expect("file list should succeed");
        assert_eq!(files, vec!["index.js", "package.json"]);
    }
}

/// Test module for deployment lifecycle endpoints
mod deploy_tests {
    use super::*;
    use faas_protocol::LogType;

    /// Test deploy sends the full body when everything is explicit
    #[tokio::test]
    async fn test_deploy_sends_explicit_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/deploy/create"))
            .and(jwt_header())
            .and(body_json(json!({
                "resourceType": "Package",
                "suffix": "greeter",
                "release": "abc123",
                "env": ["DEBUG=1"],
                "plan": "free",
                "version": "v2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suffix": "greeter",
                "prefix": "alice",
                "version": "v2"
            })))
            .mount(&server)
            .await;

        let created = client_for(&server)
            .deploy(
                "greeter",
                &["DEBUG=1".to_string()],
                "free",
                ResourceType::Package,
                Some("abc123".to_string()),
                Some("v2".to_string()),
            )
            .await
            .expect("deploy should succeed");
        assert_eq!(created.prefix, "alice");
        assert_eq!(created.version, "v2");
    }

    /// Test deploy defaults the release to a hex timestamp and version to v1
    #[tokio::test]
    async fn test_deploy_defaults_release_and_version() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/deploy/create"))
            .and(body_partial_json(json!({
                "resourceType": "Repository",
                "suffix": "greeter",
                "version": "v1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "suffix": "greeter",
                "prefix": "alice",
                "version": "v1"
            })))
            .mount(&server)
            .await;

        client_for(&server)
            .deploy("greeter", &[], "free", ResourceType::Repository, None, None)
            .await
            .expect("deploy should succeed");

        let requests = server.received_requests().await.expect("requests recorded");
        let body: serde_json::Value =
            serde_json::from_slice(&requests[0].body).expect("body should be JSON");
        let release = body["release"].as_str().expect("release should be set");
        assert!(
            i64::from_str_radix(release, 16).is_ok(),
            "release {release} should be hex"
        );
    }

    /// Test deploy delete sends the coordinates with the default version
    #[tokio::test]
    async fn test_deploy_delete() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/deploy/delete"))
            .and(jwt_header())
            .and(body_json(json!({
                "prefix": "alice",
                "suffix": "greeter",
                "version": "v1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("Deploy Delete Requested"))
            .mount(&server)
            .await;

        let confirmation = client_for(&server)
            .deploy_delete("alice", "greeter", None)
            .await
            .expect("delete should succeed");
        assert_eq!(confirmation, "Deploy Delete Requested");
    }

    /// Test log fetch selects the deploy stream
    #[tokio::test]
    async fn test_logs_requests_deploy_stream() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/deploy/logs"))
            .and(jwt_header())
            .and(body_json(json!({
                "container": "greeter-0",
                "type": "deploy",
                "suffix": "greeter",
                "prefix": "alice",
                "version": "v1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("booting\nready\n"))
            .mount(&server)
            .await;

        let logs = client_for(&server)
            .logs("greeter-0", LogType::Deploy, "greeter", "alice", None)
            .await
            .expect("logs should succeed");
        assert!(logs.contains("ready"));
    }
}

/// Test module for function invocation routes
mod invoke_tests {
    use super::*;
    use serde_json::Value;

    /// Test a no-argument call issues a bare GET
    #[tokio::test]
    async fn test_call_without_args_uses_get() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alice/greeter/v1/call/greet"))
            .and(jwt_header())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("hello")))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .call("alice", "greeter", None, "greet", None)
            .await
            .expect("call should succeed");
        assert_eq!(value, json!("hello"));
    }

    /// Test an empty argument list still POSTs a JSON array
    #[tokio::test]
    async fn test_call_with_empty_args_posts_array() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/alice/greeter/v1/call/greet"))
            .and(body_json(json!([])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("hello")))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .call("alice", "greeter", None, "greet", Some(&[]))
            .await
            .expect("call should succeed");
        assert_eq!(value, json!("hello"));
    }

    /// Test arguments are sent as a JSON array and the result parsed
    #[tokio::test]
    async fn test_call_with_args_sends_them() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/alice/calculator/v1/call/add"))
            .and(body_json(json!([2, 3])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(5)))
            .mount(&server)
            .await;

        let args = [json!(2), json!(3)];
        let value = client_for(&server)
            .call("alice", "calculator", None, "add", Some(&args))
            .await
            .expect("call should succeed");
        assert_eq!(value, json!(5));
    }

    /// Test the long-running route goes through the await segment
    #[tokio::test]
    async fn test_await_route() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/alice/batch/v1/await/crunch"))
            .and(body_json(json!([10])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
            .mount(&server)
            .await;

        let args = [json!(10)];
        let value = client_for(&server)
            .await_call("alice", "batch", None, "crunch", Some(&args))
            .await
            .expect("await call should succeed");
        assert_eq!(value["done"], json!(true));
    }

    /// Test an empty response body maps to null
    #[tokio::test]
    async fn test_empty_invoke_body_is_null() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alice/greeter/v1/call/fire_and_forget"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let value = client_for(&server)
            .call("alice", "greeter", None, "fire_and_forget", None)
            .await
            .expect("call should succeed");
        assert_eq!(value, Value::Null);
    }

    /// Test a non-JSON response body is kept as raw text
    #[tokio::test]
    async fn test_non_json_invoke_body_is_raw_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alice/greeter/v1/call/motd"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain text, not json"))
            .mount(&server)
            .await;

        let value = client_for(&server)
            .call("alice", "greeter", None, "motd", None)
            .await
            .expect("call should succeed");
        assert_eq!(value, Value::String("plain text, not json".to_string()));
    }

    /// Test an explicit version lands in the route
    #[tokio::test]
    async fn test_invoke_custom_version_in_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alice/greeter/v3/call/greet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("hi")))
            .expect(1)
            .mount(&server)
            .await;

        let value = client_for(&server)
            .call("alice", "greeter", Some("v3"), "greet", None)
            .await
            .expect("call should succeed");
        assert_eq!(value, json!("hi"));
    }
}

/// Test module for the pre-token account operations
mod auth_tests {
    use super::*;

    /// Test login omits the captcha field against a loopback plane
    /// and returns the raw token body
    #[tokio::test]
    async fn test_login_returns_token_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({
                "email": "user@example.com",
                "password": "hunter2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("jwt-token-value"))
            .mount(&server)
            .await;

        let token = faas_protocol::login("user@example.com", "hunter2", &server.uri())
            .await
            .expect("login should succeed");
        assert_eq!(token, "jwt-token-value");
    }

    /// Test signup carries the alias alongside the credentials
    #[tokio::test]
    async fn test_signup_sends_alias() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/signup"))
            .and(body_json(json!({
                "email": "user@example.com",
                "password": "hunter2",
                "alias": "alice"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("jwt-token-value"))
            .mount(&server)
            .await;

        let token = faas_protocol::signup("user@example.com", "hunter2", "alice", &server.uri())
            .await
            .expect("signup should succeed");
        assert_eq!(token, "jwt-token-value");
    }

    /// Test a failed login surfaces the status code
    #[tokio::test]
    async fn test_login_failure_propagates_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let err = faas_protocol::login("user@example.com", "wrong", &server.uri())
            .await
            .expect_err("login should fail");
        assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    }
}
