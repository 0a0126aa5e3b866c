use crate::diagnostics::SkippedRecords;
use crate::host::BridgeCounters;
use crate::server::AppState;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticsResponse {
    bridge: BridgeCounters,
    host_ready: bool,
    skipped_records: SkippedRecords,
}

pub async fn process(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(DiagnosticsResponse {
        bridge: state.bridge.counters(),
        host_ready: state.bridge.is_ready(),
        skipped_records: state.diagnostics.skipped_records(),
    })
}
