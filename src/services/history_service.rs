//! History service - filtered audit log queries and report exports.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{HistoryFilter, HistoryRecord};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::reports::{self, ExportFile, ExportFormat};

/// History service trait for dependency injection.
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Records matching the filter, newest first
    async fn query_history(&self, filter: &HistoryFilter) -> AppResult<Vec<HistoryRecord>>;

    /// Render the matching records as a downloadable report
    async fn export_history(
        &self,
        filter: &HistoryFilter,
        format: ExportFormat,
    ) -> AppResult<ExportFile>;
}

/// Concrete implementation of HistoryService using Unit of Work.
pub struct HistoryReporter<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> HistoryReporter<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> HistoryService for HistoryReporter<U> {
    async fn query_history(&self, filter: &HistoryFilter) -> AppResult<Vec<HistoryRecord>> {
        let range = filter.resolve()?;
        self.uow.history().find_in_range(range).await
    }

    async fn export_history(
        &self,
        filter: &HistoryFilter,
        format: ExportFormat,
    ) -> AppResult<ExportFile> {
        let records = self.query_history(filter).await?;
        tracing::info!(format = ?format, records = records.len(), "Rendering history export");

        // Rendering is CPU-bound; keep it off the async workers.
        tokio::task::spawn_blocking(move || reports::render(&records, format))
            .await
            .map_err(|e| AppError::internal(format!("Export task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateRange, HistoryAction, HistoryUser};
    use crate::infra::{
        HistoryRepository, MockHistoryRepository, MockProductRepository, MockUserRepository,
        ProductRepository, UserRepository,
    };
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    struct TestUnitOfWork {
        history: Arc<MockHistoryRepository>,
    }

    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            Arc::new(MockUserRepository::new())
        }

        fn products(&self) -> Arc<dyn ProductRepository> {
            Arc::new(MockProductRepository::new())
        }

        fn history(&self) -> Arc<dyn HistoryRepository> {
            self.history.clone()
        }
    }

    fn service(history: MockHistoryRepository) -> HistoryReporter<TestUnitOfWork> {
        HistoryReporter::new(Arc::new(TestUnitOfWork {
            history: Arc::new(history),
        }))
    }

    fn filter(year: &str, month: &str, start: &str, end: &str) -> HistoryFilter {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        HistoryFilter {
            year: opt(year),
            month: opt(month),
            start_date: opt(start),
            end_date: opt(end),
        }
    }

    fn record() -> HistoryRecord {
        let user_id = Uuid::new_v4();
        HistoryRecord {
            id: Uuid::new_v4(),
            action: HistoryAction::Add,
            product_name: "Mouse".to_string(),
            changes: "Product added with category: Electronics, price: 10, quantity: 1"
                .to_string(),
            user_id,
            user: Some(HistoryUser {
                id: user_id,
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
            }),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_query_passes_resolved_range() {
        let expected = DateRange {
            start: Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };

        let mut history = MockHistoryRepository::new();
        history
            .expect_find_in_range()
            .withf(move |range| *range == Some(expected))
            .times(1)
            .returning(|_| Ok(vec![record()]));

        let records = service(history)
            .query_history(&filter("2023", "12", "", ""))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_query_without_params_is_unfiltered() {
        let mut history = MockHistoryRepository::new();
        history
            .expect_find_in_range()
            .withf(|range| range.is_none())
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let records = service(history)
            .query_history(&HistoryFilter::default())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_filter_never_hits_storage() {
        let mut history = MockHistoryRepository::new();
        history.expect_find_in_range().never();

        let err = service(history)
            .query_history(&filter("2024", "13", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_export_empty_result_is_well_formed() {
        let mut history = MockHistoryRepository::new();
        history
            .expect_find_in_range()
            .times(2)
            .returning(|_| Ok(Vec::new()));
        let service = service(history);

        let pdf = service
            .export_history(&HistoryFilter::default(), ExportFormat::Pdf)
            .await
            .unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));

        let xlsx = service
            .export_history(&HistoryFilter::default(), ExportFormat::Excel)
            .await
            .unwrap();
        assert!(xlsx.bytes.starts_with(b"PK"));
    }
}
