use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::gateway::{CreateError, FetchError, PlantGateway};
use super::model::Plant;
use super::record::{decode_plants, Record, PLANT_RECORD_TYPE};
use super::types::Settings;

const PAGE_SIZE: usize = 200;

/// Talks to the private database of a CloudKit container over the web
/// services API.
#[derive(Clone)]
pub struct CloudKitGateway {
    client: reqwest::Client,
    records_url: String,
    api_token: Option<String>,
    web_auth_token: Option<String>,
}

impl std::fmt::Debug for CloudKitGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudKitGateway")
            .field("records_url", &self.records_url)
            .finish()
    }
}

impl CloudKitGateway {
    pub fn new(settings: &Settings) -> Self {
        let records_url = format!(
            "{}/database/1/{}/{}/private/records",
            settings.base_url.trim_end_matches('/'),
            settings.container,
            settings.environment
        );
        Self {
            client: reqwest::Client::new(),
            records_url,
            api_token: settings.api_token.clone(),
            web_auth_token: settings.web_auth_token.clone(),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        body: &B,
    ) -> Result<T, String> {
        let mut query = Vec::new();
        if let Some(token) = &self.api_token {
            query.push(("ckAPIToken", token.as_str()));
        }
        if let Some(token) = &self.web_auth_token {
            query.push(("ckWebAuthToken", token.as_str()));
        }

        let response = self
            .client
            .post(format!("{}/{operation}", self.records_url))
            .query(&query)
            .json(body)
            .send()
            .await
            .string_error(operation)?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(e) => e.message(),
                Err(_) => format!("HTTP {status}"),
            };
            log::error!("API Error: {operation} {message}");
            return Err(message);
        }

        response.json::<T>().await.string_error(operation)
    }
}

#[async_trait]
impl PlantGateway for CloudKitGateway {
    async fn list_plants(&self) -> Result<Vec<Plant>, FetchError> {
        log::trace!("list plants");
        let mut plants = Vec::new();
        let mut continuation_marker: Option<String> = None;
        loop {
            let request = QueryRequest {
                query: Query {
                    record_type: PLANT_RECORD_TYPE,
                },
                results_limit: PAGE_SIZE,
                continuation_marker: continuation_marker.clone(),
            };
            let response: QueryResponse = self
                .post("query", &request)
                .await
                .map_err(FetchError::Unknown)?;
            plants.extend(decode_plants(&response.records));
            match response.continuation_marker {
                Some(marker) if continuation_marker.as_ref() == Some(&marker) => {
                    log::warn!("Store sent continuation marker {marker} twice, stopping");
                    break;
                }
                Some(marker) => continuation_marker = Some(marker),
                None => break,
            }
        }
        log::trace!("plants arrived {}", plants.len());
        Ok(plants)
    }

    async fn create_plant(&self, plant: Plant) -> Result<Plant, CreateError> {
        log::trace!("create plant {}", plant.id);
        let request = ModifyRequest {
            operations: vec![Operation {
                operation_type: "forceReplace",
                record: Record::from(&plant),
            }],
        };
        let response: ModifyResponse = self
            .post("modify", &request)
            .await
            .map_err(CreateError::Unknown)?;
        let Some(record) = response.records.first() else {
            return Err(CreateError::Unknown("The store returned no record".to_string()));
        };
        if let Some(message) = record.error_message() {
            log::error!("API Error: modify {message}");
            return Err(CreateError::Unknown(message));
        }
        Plant::try_from(record).map_err(|e| {
            log::error!("Saved plant came back broken: {e}");
            CreateError::DecodingError
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    query: Query,
    results_limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    continuation_marker: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Query {
    record_type: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    records: Vec<Record>,
    continuation_marker: Option<String>,
}

#[derive(Serialize)]
struct ModifyRequest {
    operations: Vec<Operation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    operation_type: &'static str,
    record: Record,
}

#[derive(Deserialize)]
struct ModifyResponse {
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    server_error_code: Option<String>,
    reason: Option<String>,
}

impl ErrorResponse {
    fn message(self) -> String {
        match (self.server_error_code, self.reason) {
            (Some(code), Some(reason)) => format!("{code}: {reason}"),
            (Some(code), None) => code,
            (None, Some(reason)) => reason,
            (None, None) => "Unknown".to_string(),
        }
    }
}

trait ResultExt {
    type Output;
    fn string_error(self, call: &'static str) -> Result<Self::Output, String>;
}

impl<T, E: std::fmt::Display> ResultExt for Result<T, E> {
    type Output = T;
    fn string_error(self, call: &'static str) -> Result<T, String> {
        self.map_err(|e| {
            let string_error = format!("API Error: {call} {e}");
            log::error!("{string_error}");
            string_error
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use axum::extract::{Query as QueryParams, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::environment::model::PlantId;

    const RECORDS: &str = "/database/1/iCloud.test/development/private/records";

    #[derive(Clone, Default)]
    struct Recorded {
        bodies: Arc<Mutex<Vec<Value>>>,
        tokens: Arc<Mutex<Vec<Option<String>>>>,
        pages: Arc<Mutex<VecDeque<Value>>>,
    }

    async fn serve(router: Router) -> Settings {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Settings {
            container: "iCloud.test".to_string(),
            base_url: format!("http://{address}"),
            api_token: Some("secret".to_string()),
            ..Settings::default()
        }
    }

    fn plant_record(id: PlantId, name: &str) -> Value {
        json!({
            "recordName": id.to_string(),
            "recordType": "Plant",
            "fields": { "name": { "value": name, "type": "STRING" } }
        })
    }

    #[tokio::test]
    async fn a_repeated_continuation_marker_ends_the_listing() {
        let id = PlantId::new();
        let recorded = Recorded::default();
        let page = json!({
            "records": [plant_record(id, "Fern")],
            "continuationMarker": "again"
        });
        let router = Router::new()
            .route(
                &format!("{RECORDS}/query"),
                post(
                    move |State(recorded): State<Recorded>, Json(body): Json<Value>| {
                        let page = page.clone();
                        async move {
                            recorded.bodies.lock().unwrap().push(body);
                            Json(page)
                        }
                    },
                ),
            )
            .with_state(recorded.clone());
        let gateway = CloudKitGateway::new(&serve(router).await);

        let plants = gateway.list_plants().await.unwrap();

        assert_eq!(plants.len(), 2);
        assert_eq!(recorded.bodies.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn lists_every_page_and_skips_broken_records() {
        let (a, b) = (PlantId::new(), PlantId::new());
        let recorded = Recorded::default();
        recorded.pages.lock().unwrap().extend([
            json!({
                "records": [plant_record(a, "Fern"), { "recordName": "broken", "recordType": "Plant" }],
                "continuationMarker": "page-2"
            }),
            json!({ "records": [plant_record(b, "Cactus")] }),
        ]);
        let router = Router::new()
            .route(
                &format!("{RECORDS}/query"),
                post(
                    |State(recorded): State<Recorded>,
                     QueryParams(params): QueryParams<HashMap<String, String>>,
                     Json(body): Json<Value>| async move {
                        recorded.bodies.lock().unwrap().push(body);
                        recorded
                            .tokens
                            .lock()
                            .unwrap()
                            .push(params.get("ckAPIToken").cloned());
                        let page = recorded.pages.lock().unwrap().pop_front().unwrap();
                        Json(page)
                    },
                ),
            )
            .with_state(recorded.clone());
        let gateway = CloudKitGateway::new(&serve(router).await);

        let plants = gateway.list_plants().await.unwrap();

        assert_eq!(
            plants,
            vec![Plant::new(a, "Fern", None), Plant::new(b, "Cactus", None)]
        );
        let bodies = recorded.bodies.lock().unwrap();
        assert_eq!(bodies[0]["query"]["recordType"], "Plant");
        assert!(bodies[0].get("continuationMarker").is_none());
        assert_eq!(bodies[1]["continuationMarker"], "page-2");
        assert_eq!(
            *recorded.tokens.lock().unwrap(),
            vec![Some("secret".to_string()), Some("secret".to_string())]
        );
    }

    #[tokio::test]
    async fn store_failures_are_unknown_fetch_errors() {
        let router = Router::new().route(
            &format!("{RECORDS}/query"),
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "serverErrorCode": "AUTHENTICATION_FAILED", "reason": "bad token" })),
                )
            }),
        );
        let gateway = CloudKitGateway::new(&serve(router).await);

        assert_eq!(
            gateway.list_plants().await,
            Err(FetchError::Unknown(
                "AUTHENTICATION_FAILED: bad token".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn unreachable_store_is_an_unknown_error() {
        let gateway = CloudKitGateway::new(&Settings {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Settings::default()
        });
        assert_matches!(gateway.list_plants().await, Err(FetchError::Unknown(_)));
        assert_matches!(
            gateway
                .create_plant(Plant::new(PlantId::new(), "Ivy", None))
                .await,
            Err(CreateError::Unknown(_))
        );
    }

    #[tokio::test]
    async fn create_saves_under_the_plant_id_and_decodes_the_answer() {
        let recorded = Recorded::default();
        let router = Router::new()
            .route(
                &format!("{RECORDS}/modify"),
                post(
                    |State(recorded): State<Recorded>, Json(body): Json<Value>| async move {
                        let record = body["operations"][0]["record"].clone();
                        recorded.bodies.lock().unwrap().push(body);
                        Json(json!({ "records": [record] }))
                    },
                ),
            )
            .with_state(recorded.clone());
        let gateway = CloudKitGateway::new(&serve(router).await);
        let plant = Plant::new(PlantId::new(), "Ivy", Some("Hedera".to_string()));

        assert_eq!(gateway.create_plant(plant.clone()).await, Ok(plant.clone()));

        let bodies = recorded.bodies.lock().unwrap();
        let operation = &bodies[0]["operations"][0];
        assert_eq!(operation["operationType"], "forceReplace");
        assert_eq!(operation["record"]["recordName"], plant.id.to_string());
    }

    #[tokio::test]
    async fn create_reports_undecodable_answers() {
        let router = Router::new().route(
            &format!("{RECORDS}/modify"),
            post(|| async {
                Json(json!({ "records": [{ "recordName": "???", "recordType": "Plant" }] }))
            }),
        );
        let gateway = CloudKitGateway::new(&serve(router).await);

        assert_eq!(
            gateway
                .create_plant(Plant::new(PlantId::new(), "Ivy", None))
                .await,
            Err(CreateError::DecodingError)
        );
    }

    #[tokio::test]
    async fn create_reports_rejected_records() {
        let router = Router::new().route(
            &format!("{RECORDS}/modify"),
            post(|| async {
                Json(json!({ "records": [{
                    "recordName": "x",
                    "serverErrorCode": "QUOTA_EXCEEDED",
                    "reason": "offline"
                }] }))
            }),
        );
        let gateway = CloudKitGateway::new(&serve(router).await);

        assert_eq!(
            gateway
                .create_plant(Plant::new(PlantId::new(), "Ivy", None))
                .await,
            Err(CreateError::Unknown("QUOTA_EXCEEDED: offline".to_string()))
        );
    }
}
