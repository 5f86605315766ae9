use scwsync::{ScalewayClient, ScalewayError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PN_ID: &str = "11111111-2222-3333-4444-555555555555";

fn client(server: &MockServer) -> ScalewayClient {
    ScalewayClient::with_base_url("test_key".to_string(), server.uri()).unwrap()
}

fn private_network(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "region": "fr-par",
        "project_id": "proj",
        "organization_id": "org",
        "tags": [],
        "subnets": [{"id": "sub", "subnet": "172.16.0.0/22"}]
    })
}

#[tokio::test]
async fn test_requests_carry_auth_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/vpc/v2/regions/fr-par/private-networks/{PN_ID}")))
        .and(header("X-Auth-Token", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(private_network(PN_ID, "main")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .get_private_network("fr-par", PN_ID)
        .await
        .unwrap();

    let pn = result.expect("private network should be present");
    assert_eq!(pn.id, PN_ID);
    assert_eq!(pn.name, "main");
}

#[tokio::test]
async fn test_get_private_network_not_found_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/vpc/v2/regions/fr-par/private-networks/{PN_ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "resource is not found",
            "type": "not_found",
            "resource": "private_network",
            "resource_id": PN_ID
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .get_private_network("fr-par", PN_ID)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/vpc/v2/regions/fr-par/private-networks/{PN_ID}")))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "authentication is denied",
            "type": "denied_authentication"
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .get_private_network("fr-par", PN_ID)
        .await;

    if let Err(ScalewayError::Auth { message }) = result {
        assert_eq!(message, "authentication is denied");
    } else {
        panic!("Expected ScalewayError::Auth, got {:?}", result);
    }
}

#[tokio::test]
async fn test_auth_error_does_not_contain_secret_key() {
    let mock_server = MockServer::start().await;
    let secret_key = "scw_super_secret_key_xyz789";

    Mock::given(method("GET"))
        .and(path(format!("/vpc/v2/regions/fr-par/private-networks/{PN_ID}")))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "message": "insufficient permissions",
            "type": "permissions_denied"
        })))
        .mount(&mock_server)
        .await;

    let client =
        ScalewayClient::with_base_url(secret_key.to_string(), mock_server.uri()).unwrap();
    let result = client.get_private_network("fr-par", PN_ID).await;
    let error_string = format!("{:?}", result);

    assert!(
        !error_string.contains(secret_key),
        "Error output must not contain the secret key"
    );
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/document-db/v1beta1/regions/fr-par/instances/inst1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "internal error"
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .get_documentdb_instance("fr-par", "inst1")
        .await;

    if let Err(ScalewayError::Api { status, message }) = result {
        assert_eq!(status, 500);
        assert_eq!(message, "internal error");
    } else {
        panic!("Expected ScalewayError::Api, got {:?}", result);
    }
}

#[tokio::test]
async fn test_list_private_networks_by_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vpc/v2/regions/fr-par/private-networks"))
        .and(query_param("name", "my network"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "private_networks": [private_network(PN_ID, "my network")],
            "total_count": 1
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .list_private_networks("fr-par", Some("my network"))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "my network");
}

#[tokio::test]
async fn test_list_private_networks_multiple_pages() {
    let mock_server = MockServer::start().await;

    for (page, ids) in [("1", vec!["a", "b"]), ("2", vec!["c", "d"]), ("3", vec!["e"])] {
        let networks: Vec<serde_json::Value> =
            ids.into_iter().map(|id| private_network(id, id)).collect();

        Mock::given(method("GET"))
            .and(path("/vpc/v2/regions/fr-par/private-networks"))
            .and(query_param("page", page))
            .and(query_param("page_size", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "private_networks": networks,
                "total_count": 5
            })))
            .mount(&mock_server)
            .await;
    }

    let client = client(&mock_server);
    let url = format!("{}/vpc/v2/regions/fr-par/private-networks", mock_server.uri());
    let ids: Vec<String> = client
        .fetch_all_pages(&url, 2, |body| {
            Ok(body["private_networks"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v["id"].as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default())
        })
        .await
        .unwrap();

    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_fetch_all_pages_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vpc/v2/regions/fr-par/private-networks"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "invalid argument(s)",
            "type": "invalid_arguments"
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .list_private_networks("fr-par", None)
        .await;

    if let Err(ScalewayError::Api { status, message }) = result {
        assert_eq!(status, 400);
        assert!(message.contains("invalid argument"));
    } else {
        panic!("Expected ScalewayError::Api, got {:?}", result);
    }
}

#[tokio::test]
async fn test_list_documentdb_databases_for_missing_instance() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/document-db/v1beta1/regions/fr-par/instances/gone/databases"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "resource is not found",
            "type": "not_found"
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .list_documentdb_databases("fr-par", "gone", Some("mydb"))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_list_webhosting_offers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhosting/v1alpha1/regions/fr-par/offers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "offers": [{
                "id": "de2426b4-a9e9-11ec-b909-0242ac120002",
                "billing_operation_path": "/perf",
                "product": {
                    "name": "performance",
                    "option": false,
                    "email_accounts_quota": 10,
                    "email_storage_quota": 5,
                    "databases_quota": -1,
                    "hosting_storage_quota": 100,
                    "support_included": true,
                    "v_cpu": 4,
                    "ram": 2
                },
                "price": {"currency_code": "EUR", "units": 18, "nanos": 990000000},
                "available": true
            }]
        })))
        .mount(&mock_server)
        .await;

    let offers = client(&mock_server)
        .list_webhosting_offers("fr-par")
        .await
        .unwrap();

    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].product.name, "performance");
    assert_eq!(
        offers[0].price.as_ref().map(|p| p.display()),
        Some("€ 18.99".to_string())
    );
}
