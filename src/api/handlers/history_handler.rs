//! Product history and export handlers.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::extractors::QueryParams;
use crate::api::routes::method_not_allowed;
use crate::api::AppState;
use crate::domain::{HistoryFilter, HistoryRecord};
use crate::errors::AppResult;
use crate::reports::{ExportFile, ExportFormat};

/// History query response
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub history: Vec<HistoryRecord>,
}

/// Export query: format plus the same date filter as the history endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    /// `pdf`, `excel` or `xlsx`
    #[serde(rename = "type")]
    pub export_type: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ExportParams {
    fn into_parts(self) -> AppResult<(ExportFormat, HistoryFilter)> {
        let format = self.export_type.as_deref().unwrap_or_default().parse()?;
        let filter = HistoryFilter {
            year: self.year,
            month: self.month,
            start_date: self.start_date,
            end_date: self.end_date,
        };
        Ok((format, filter))
    }
}

/// Create history routes (merged at the root, behind auth)
pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/productHistory",
            get(product_history).fallback(method_not_allowed),
        )
        .route("/api/export", get(export).fallback(method_not_allowed))
}

/// Query the product history log
#[utoipa::path(
    get,
    path = "/api/productHistory",
    tag = "History",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Matching records, newest first", body = HistoryResponse),
        (status = 400, description = "Malformed filter"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn product_history(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<HistoryFilter>,
) -> AppResult<Json<HistoryResponse>> {
    let history = state.history_service.query_history(&filter).await?;
    Ok(Json(HistoryResponse { history }))
}

/// Download the filtered history as PDF or XLSX
#[utoipa::path(
    get,
    path = "/api/export",
    tag = "History",
    params(ExportParams),
    responses(
        (status = 200, description = "Report attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid export type or filter"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn export(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ExportParams>,
) -> AppResult<Response> {
    let (format, filter) = params.into_parts()?;
    let file = state.history_service.export_history(&filter, format).await?;
    Ok(attachment(file))
}

fn attachment(file: ExportFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use axum::http::StatusCode;

    #[test]
    fn test_export_params_split() {
        let params = ExportParams {
            export_type: Some("xlsx".to_string()),
            year: Some("2024".to_string()),
            ..Default::default()
        };
        let (format, filter) = params.into_parts().unwrap();
        assert_eq!(format, ExportFormat::Excel);
        assert_eq!(filter.year.as_deref(), Some("2024"));
    }

    #[test]
    fn test_missing_type_rejected() {
        let err = ExportParams::default().into_parts().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_attachment_headers() {
        let response = attachment(ExportFile {
            bytes: b"%PDF-1.3".to_vec(),
            content_type: "application/pdf",
            file_name: "product-history-report.pdf".to_string(),
        });
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"product-history-report.pdf\""
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    }
}
