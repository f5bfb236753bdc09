//! Stub routes for the ledger canister wire API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use medrec_ledger::wire::{
    FaultBody, GetRecordsArgs, GetRecordsReply, StatusReply, StoreRecordArgs, StoreRecordReply,
    FAULT_NO_RECORDS,
};

use crate::store::StubState;

/// Fixed stand-in for a development replica root key.
const DEV_ROOT_KEY: &str = "3082012230"; // truncated DER prefix, enough for clients that only store it

/// Build the stub router.
pub fn router(state: StubState) -> Router {
    Router::new()
        .route("/api/v1/status", get(status))
        .route(
            "/api/v1/canisters/:canister_id/call/storeRecord",
            post(store_record),
        )
        .route(
            "/api/v1/canisters/:canister_id/query/getRecords",
            post(get_records),
        )
        .with_state(state)
}

async fn status() -> Json<StatusReply> {
    Json(StatusReply {
        root_key: DEV_ROOT_KEY.to_string(),
    })
}

async fn store_record(
    State(state): State<StubState>,
    Path(canister_id): Path<String>,
    Json(args): Json<StoreRecordArgs>,
) -> (StatusCode, Json<StoreRecordReply>) {
    let (record_id, record) = state.append(args);
    tracing::debug!(
        canister_id,
        record_id,
        patient_id = %record.patient_id,
        cid = %record.content_address,
        "stub ledger stored record"
    );
    (StatusCode::CREATED, Json(StoreRecordReply { record_id }))
}

async fn get_records(
    State(state): State<StubState>,
    Path(_canister_id): Path<String>,
    Json(args): Json<GetRecordsArgs>,
) -> Result<Json<GetRecordsReply>, (StatusCode, Json<FaultBody>)> {
    match state.records_for(&args.patient_id) {
        Some(records) => Ok(Json(GetRecordsReply { records })),
        // The real ledger faults on an empty result rather than returning
        // an empty list; clients normalize it.
        None => Err((
            StatusCode::NOT_FOUND,
            Json(FaultBody {
                code: FAULT_NO_RECORDS.to_string(),
                message: format!("no records found for patient {}", args.patient_id),
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(StubState::new())
    }

    #[tokio::test]
    async fn status_returns_root_key() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_records_for_unknown_patient_faults_with_no_records() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/canisters/test/query/getRecords")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"patientId":"nobody"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_then_get_round_trip() {
        let state = StubState::new();
        let app = router(state);

        let store = Request::builder()
            .method("POST")
            .uri("/api/v1/canisters/test/call/storeRecord")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"patientId":"p1","contentAddress":"QmAbc","integrityDigest":"dd","accessControl":["p1"]}"#,
            ))
            .unwrap();
        let response = app.clone().oneshot(store).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let reply: StoreRecordReply = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reply.record_id, 1);

        let query = Request::builder()
            .method("POST")
            .uri("/api/v1/canisters/test/query/getRecords")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"patientId":"p1"}"#))
            .unwrap();
        let response = app.oneshot(query).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
