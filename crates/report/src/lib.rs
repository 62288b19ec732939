mod domain;
mod inbound;
mod outbound;
mod usecase;

use std::sync::Arc;

use app_core::uid::Generator;
pub use inbound::router::create_router;
pub use inbound::state::ReportState;
use sea_orm::DatabaseConnection;

use crate::outbound::orm::ReportORM;
use crate::usecase::report::ReportService;

pub struct Dependency {
    pub db: Arc<DatabaseConnection>,
    pub uid: Arc<dyn Generator>,
}

pub fn new(dep: Dependency) -> ReportState {
    let repo = Arc::new(ReportORM::new(dep.db));
    let report_svc = Arc::new(ReportService::new(dep.uid, repo));

    ReportState::new(report_svc)
}
