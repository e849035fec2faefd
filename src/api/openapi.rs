//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{assets, assignments, auctions, dashboard, events, health, lifecycle, repairs, returns};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ITAM API",
        version = "1.0.0",
        description = "IT asset management REST API: asset lifecycle, assignments, repairs, returns and auctions",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Lifecycle
        lifecycle::classify_records,
        lifecycle::check_assignable,
        lifecycle::list_transitions,
        lifecycle::check_transition,
        // Assets
        assets::list_assets,
        assets::get_asset,
        assets::create_asset,
        assets::update_status,
        assets::check_oracle_number,
        assets::check_serial_number,
        assets::list_device_types,
        assets::list_brands,
        assets::add_brand,
        assets::list_available,
        assets::list_assigned,
        assets::get_assignment_history,
        assets::get_assignment_details,
        // Assignments
        assignments::list_assignments,
        assignments::count_assignments,
        assignments::create_assignment,
        // Repairs
        repairs::list_repairs,
        repairs::get_repair_stats,
        repairs::list_under_repair,
        repairs::get_repair_history,
        repairs::request_repair,
        repairs::complete_repair,
        // Returns
        returns::list_returns,
        returns::get_return_stats,
        returns::get_total_count,
        returns::get_asset_returns,
        returns::create_return,
        returns::attach_voucher,
        // Auctions
        auctions::list_auctions,
        auctions::list_auctioned,
        auctions::get_asset_auctions,
        auctions::create_auction,
        // Dashboard
        dashboard::get_dashboard,
        dashboard::list_activities,
        // Events
        events::event_stream,
    ),
    components(
        schemas(
            // Lifecycle
            crate::lifecycle::AssetStatus,
            crate::lifecycle::ReturnType,
            crate::lifecycle::StatusCategory,
            crate::lifecycle::Severity,
            crate::lifecycle::BadgeColor,
            crate::lifecycle::StatusClassification,
            crate::lifecycle::AssetSnapshot,
            crate::lifecycle::TransitionRule,
            lifecycle::ClassifiedRecord,
            lifecycle::AssignableRequest,
            lifecycle::AssignableResponse,
            lifecycle::TransitionCheck,
            // Assets
            crate::models::asset::Asset,
            crate::models::asset::AssetView,
            crate::models::asset::AssetDetails,
            crate::models::asset::AvailableAsset,
            crate::models::asset::CreateAsset,
            crate::models::asset::UpdateAssetStatus,
            crate::models::asset::AddBrand,
            crate::models::asset::ExistsResponse,
            crate::models::device_brand::DeviceBrandMapping,
            // Assignments
            crate::models::assignment::Assignment,
            crate::models::assignment::AssignmentView,
            crate::models::assignment::CreateAssignment,
            crate::models::assignment::AssignmentHistoryEntry,
            crate::models::assignment::AssignmentDetails,
            crate::models::assignment::AssignmentCount,
            crate::models::enums::AssignmentStatus,
            // Repairs
            crate::models::repair::Repair,
            crate::models::repair::CreateRepairRequest,
            crate::models::repair::CompleteRepair,
            crate::models::repair::RepairStats,
            crate::models::repair::OracleNumberList,
            crate::models::enums::RepairStatus,
            crate::models::enums::RepairOutcome,
            // Returns
            crate::models::return_record::ReturnRecord,
            crate::models::return_record::ReturnView,
            crate::models::return_record::CreateReturn,
            crate::models::return_record::ReturnStats,
            crate::models::return_record::ReturnCount,
            returns::VoucherForm,
            // Auctions
            crate::models::auction::Auction,
            crate::models::auction::CreateAuction,
            // Dashboard
            crate::models::dashboard::DashboardStats,
            crate::models::dashboard::CategoryCount,
            crate::models::dashboard::DepartmentCount,
            crate::models::activity::ActivityLog,
            crate::models::enums::ActivityType,
            // Events
            crate::services::events::LifecycleEvent,
            crate::services::events::EventKind,
            crate::services::events::View,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "lifecycle", description = "Status classification and transition rules"),
        (name = "assets", description = "Asset register"),
        (name = "assignments", description = "Assets handed to employees"),
        (name = "repairs", description = "Repair workflow"),
        (name = "returns", description = "Returns, buybacks and damage"),
        (name = "auctions", description = "Auction disposal"),
        (name = "dashboard", description = "Statistics and activity feed"),
        (name = "events", description = "Live invalidation stream")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_lifecycle_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/lifecycle/classify",
            "/lifecycle/transitions",
            "/assets/update-status",
            "/returns/{id}/voucher",
            "/events/stream",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {} in {:?}",
                expected,
                paths
            );
        }
    }
}
