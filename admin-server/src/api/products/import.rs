//! Bulk CSV import endpoint
//!
//! POST /api/products/import?policy=skip|update&dry_run=true
//!
//! Multipart body with one `file` field holding the CSV. The reconciler
//! report comes back in full; rows that failed validation are never
//! submitted while the rest of the batch proceeds.

use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::api::{AppError, AppResult};
use crate::core::ServerState;
use crate::db::repository::{brand, category, model, product};
use crate::imports::{
    self, DuplicatePolicy, FileError, ImportTally, ReconcileReport, reconcile, run_import,
};
use shared::ErrorCode;

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub policy: DuplicatePolicy,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub dry_run: bool,
    #[serde(flatten)]
    pub report: ReconcileReport,
    /// Tally of the submission run; zeroed counters for a dry run
    pub tally: ImportTally,
    /// Per-row storage failures from the runner
    pub failures: Vec<String>,
}

async fn read_csv_field(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::with_message(ErrorCode::ImportInvalidFile, format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                AppError::with_message(
                    ErrorCode::ImportInvalidFile,
                    format!("Failed to read upload: {e}"),
                )
            })?;
            return Ok(bytes.to_vec());
        }
    }
    Err(AppError::with_message(
        ErrorCode::ImportInvalidFile,
        "Missing 'file' field in multipart body",
    ))
}

fn file_error(err: FileError) -> AppError {
    let code = match &err {
        FileError::MissingColumns(_) => ErrorCode::ImportMissingColumns,
        FileError::NoDataRows => ErrorCode::ImportEmptyFile,
    };
    AppError::with_message(code, err.to_string())
}

/// POST /api/products/import
pub async fn import(
    State(state): State<ServerState>,
    Query(query): Query<ImportQuery>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportResponse>> {
    let bytes = read_csv_field(&mut multipart).await?;
    let table = imports::parse_csv(&bytes)?;

    // Snapshot the catalog once; resolution and duplicate detection both
    // run against this consistent view
    let brands = brand::find_all(&state.pool).await?;
    let models = model::find_all_plain(&state.pool).await?;
    let categories = category::find_all(&state.pool).await?;
    let products = product::find_all_plain(&state.pool).await?;

    let report = reconcile(
        &table,
        imports::CatalogSnapshot {
            brands: &brands,
            models: &models,
            categories: &categories,
            products: &products,
        },
        query.policy,
    )
    .map_err(file_error)?;

    if query.dry_run {
        return Ok(Json(ImportResponse {
            dry_run: true,
            tally: ImportTally {
                total: report.candidates.len() + report.skipped,
                skipped: report.skipped,
                ..Default::default()
            },
            failures: Vec::new(),
            report,
        }));
    }

    if report.candidates.is_empty() && report.skipped == 0 {
        return Err(AppError::new(ErrorCode::ImportNothingToSubmit)
            .with_detail("row_errors", serde_json::json!(report.row_errors)));
    }

    tracing::info!(
        candidates = report.candidates.len(),
        skipped = report.skipped,
        invalid_rows = report.row_errors.len(),
        policy = ?query.policy,
        "Starting product import"
    );

    let outcome = run_import(&state.pool, &report.candidates, report.skipped).await;

    tracing::info!(
        succeeded = outcome.tally.succeeded,
        failed = outcome.tally.failed,
        skipped = outcome.tally.skipped,
        "Product import finished"
    );

    Ok(Json(ImportResponse {
        dry_run: false,
        report,
        tally: outcome.tally,
        failures: outcome.failures,
    }))
}
