use std::sync::Arc;

use crate::usecase::report::ReportUseCase;

#[derive(Clone)]
pub struct ReportState {
    pub report: Arc<dyn ReportUseCase>,
}

impl ReportState {
    pub fn new(report: Arc<dyn ReportUseCase>) -> Self {
        Self { report }
    }
}
