use std::sync::Arc;

use crate::application::statistics::StatisticsService;
use crate::application::subjects::SubjectService;
use crate::infra::db::PostgresStore;

#[derive(Clone)]
pub struct ApiState {
    pub subjects: Arc<SubjectService>,
    pub statistics: Arc<StatisticsService>,
    pub db: Arc<PostgresStore>,
}
