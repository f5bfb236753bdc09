//! The anchoring resource.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use medrec_anchor::AnchorError;
use medrec_core::AccessControlList;

use crate::envelope::{AnchorResponse, ApiFailure, RecordsResponse};
use crate::state::AppState;

/// Build the records router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/records",
            post(anchor_record)
                .get(get_records)
                .put(method_not_allowed)
                .delete(method_not_allowed),
        )
        .route("/v1/records/anchor", post(anchor_existing))
}

async fn method_not_allowed() -> ApiFailure {
    ApiFailure::method_not_allowed()
}

/// Multipart fields accepted by the anchoring endpoint.
#[derive(Debug, Default)]
struct AnchorForm {
    file: Option<(String, Vec<u8>)>,
    patient_id: Option<String>,
    access_control: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<AnchorForm, ApiFailure> {
    let mut form = AnchorForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiFailure::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiFailure::bad_request(format!("Invalid file format: {e}")))?;
                form.file = Some((file_name, bytes.to_vec()));
            }
            "patientId" => {
                form.patient_id = field.text().await.ok();
            }
            "accessControl" => {
                form.access_control = field.text().await.ok();
            }
            // Unknown fields are ignored, matching lenient multipart
            // handling.
            _ => {}
        }
    }
    Ok(form)
}

/// `POST /v1/records` — upload, digest, anchor.
async fn anchor_record(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnchorResponse>, ApiFailure> {
    let form = read_form(multipart).await?;

    let (file_name, bytes) = form
        .file
        .ok_or_else(|| ApiFailure::bad_request("No file uploaded"))?;
    if bytes.is_empty() {
        return Err(ApiFailure::bad_request("No file uploaded"));
    }

    let outcome = state
        .anchor_service
        .anchor(
            form.patient_id.as_deref(),
            bytes,
            &file_name,
            form.access_control.as_deref(),
        )
        .await
        .map_err(|e| match e {
            AnchorError::Validation(v) => ApiFailure::bad_request(v.to_string()),
            AnchorError::Storage(s) => {
                ApiFailure::internal("Failed to upload to IPFS", s.to_string())
            }
            // anchor() never raises the ledger variants; they downgrade
            // into the outcome instead.
            other => ApiFailure::internal("Anchor operation failed", other.to_string()),
        })?;

    Ok(Json(AnchorResponse {
        success: true,
        ipfs_hash: outcome.content_address,
        file_name: outcome.file_name,
        size: outcome.size,
        ipfs_url: outcome.gateway_url,
        record_stored: outcome.anchor.recorded(),
        canister_record_id: outcome.anchor.record_id().map(|id| id.to_string()),
        details: outcome.anchor.detail().map(str::to_string),
    }))
}

#[derive(Debug, Deserialize)]
struct RecordsQuery {
    #[serde(rename = "patientId")]
    patient_id: Option<String>,
}

/// `GET /v1/records?patientId=` — all anchors for a patient.
///
/// A patient with zero anchors yields `{success:true, records:[], count:0}`,
/// never an error envelope.
async fn get_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<impl IntoResponse, ApiFailure> {
    let patient_id = query
        .patient_id
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiFailure::bad_request("Patient ID is required"))?;

    let query_service = state
        .query_service
        .as_ref()
        .ok_or_else(|| ApiFailure::unavailable("Ledger anchoring is not enabled"))?;

    let records = query_service
        .records_for_patient(&patient_id)
        .await
        .map_err(|e| ApiFailure::internal("Failed to retrieve medical records", e.to_string()))?;

    Ok(Json(RecordsResponse {
        success: true,
        count: records.len(),
        records,
    }))
}

/// Request body for the ledger-half retry endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorExistingRequest {
    patient_id: Option<String>,
    content_address: Option<String>,
    integrity_digest: Option<String>,
    access_control: Option<Vec<String>>,
}

/// `POST /v1/records/anchor` — re-drive only the ledger write for an
/// object that is already stored (no re-upload).
async fn anchor_existing(
    State(state): State<AppState>,
    Json(req): Json<AnchorExistingRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let (patient_id, content_address, integrity_digest, access_control) = match (
        req.patient_id,
        req.content_address,
        req.integrity_digest,
        req.access_control,
    ) {
        (Some(p), Some(c), Some(d), Some(a)) => (p, c, d, a),
        _ => {
            return Err(ApiFailure::bad_request(
                "Missing required fields: patientId, contentAddress, integrityDigest, accessControl",
            ))
        }
    };

    let record_id = state
        .anchor_service
        .anchor_existing(
            &patient_id,
            &content_address,
            &integrity_digest,
            &AccessControlList::from_entries(access_control),
        )
        .await
        .map_err(|e| match e {
            AnchorError::Validation(v) => ApiFailure::bad_request(v.to_string()),
            AnchorError::LedgerDisabled => {
                ApiFailure::unavailable("Ledger anchoring is not enabled")
            }
            other => ApiFailure::internal("Failed to store medical record", other.to_string()),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "patientId": patient_id,
            "recordId": record_id.to_string(),
        })),
    ))
}
