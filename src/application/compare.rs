use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::application::extract::fetch_scoped;
use crate::application::projection::ProjectionProfile;
use crate::domain::{
    fingerprint::fingerprint,
    ports::{Connector, Differ},
    report::{ComparisonRun, RunSides},
    value_objects::Side,
};

// ─── Compare Service ───

/// Retrieves both sides concurrently, projects them and runs the differ.
pub struct CompareService {
    left: Arc<dyn Connector>,
    right: Arc<dyn Connector>,
    differ: Arc<dyn Differ>,
}

impl CompareService {
    pub fn new(left: Arc<dyn Connector>, right: Arc<dyn Connector>, differ: Arc<dyn Differ>) -> Self {
        Self { left, right, differ }
    }

    pub async fn run(&self, profile: &ProjectionProfile) -> Result<ComparisonRun> {
        let (left_raw, right_raw) = tokio::join!(
            fetch_scoped(self.left.as_ref(), &profile.filter),
            fetch_scoped(self.right.as_ref(), &profile.filter)
        );
        let left_raw = left_raw?;
        let right_raw = right_raw?;

        let projector = profile.projector();
        let left = projector.project_all(&left_raw, Side::Left)?;
        let right = projector.project_all(&right_raw, Side::Right)?;

        let sides = RunSides {
            left_source: self.left.name().to_string(),
            right_source: self.right.name().to_string(),
            left_fingerprint: fingerprint(&left),
            right_fingerprint: fingerprint(&right),
            left_count: left.len(),
            right_count: right.len(),
        };

        // Fast path: equal fingerprints mean identical sequences.
        let report = if sides.left_fingerprint == sides.right_fingerprint {
            info!(object_type = %profile.object_type, records = left.len(), "sides are identical");
            self.differ.identity(&left)
        } else {
            self.differ.compare(&left, &right)?
        };

        Ok(ComparisonRun::new(profile.object_type.as_str(), sides, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::engine::ComparisonEngine;
    use crate::domain::error::DiffError;
    use crate::domain::object_type::{ObjectFilter, ObjectType};
    use crate::domain::ports::Session;
    use crate::domain::record::RawRecord;
    use async_trait::async_trait;
    use serde_json::json;

    struct VecConnector {
        name: String,
        rows: Result<Vec<RawRecord>, DiffError>,
    }

    struct VecSession(Result<Vec<RawRecord>, DiffError>);

    #[async_trait]
    impl Connector for VecConnector {
        fn name(&self) -> &str {
            &self.name
        }

        async fn open(&self) -> Result<Box<dyn Session>, DiffError> {
            Ok(Box::new(VecSession(self.rows.clone())))
        }
    }

    #[async_trait]
    impl Session for VecSession {
        async fn fetch(&self, filter: &ObjectFilter) -> Result<Vec<RawRecord>, DiffError> {
            self.0
                .clone()
                .map(|rows| rows.into_iter().filter(|r| filter.matches(r)).collect())
        }

        async fn release(self: Box<Self>) -> Result<(), DiffError> {
            Ok(())
        }
    }

    fn agents(names: &[&str]) -> Vec<RawRecord> {
        names
            .iter()
            .map(|n| {
                [
                    ("user_name".to_string(), json!(n)),
                    ("is_agent".to_string(), json!(true)),
                ]
                .into()
            })
            .collect()
    }

    fn service(left: Result<Vec<RawRecord>, DiffError>, right: Result<Vec<RawRecord>, DiffError>) -> CompareService {
        CompareService::new(
            Arc::new(VecConnector {
                name: "prod".into(),
                rows: left,
            }),
            Arc::new(VecConnector {
                name: "staging".into(),
                rows: right,
            }),
            Arc::new(ComparisonEngine::default()),
        )
    }

    #[tokio::test]
    async fn compares_two_sources() {
        let svc = service(
            Ok(agents(&["alice", "bob", "carol", "dave"])),
            Ok(agents(&["alice", "carol", "dave", "erin"])),
        );
        let run = svc
            .run(&ProjectionProfile::for_type(ObjectType::Agent))
            .await
            .unwrap();
        assert_eq!(run.left_source, "prod");
        assert_eq!(run.right_source, "staging");
        assert_eq!(run.left_count, 4);
        assert_eq!(
            run.report.summary.to_string(),
            "1 inserted, 1 deleted, 0 changed, 3 unchanged"
        );
        assert_ne!(run.left_fingerprint, run.right_fingerprint);
    }

    #[tokio::test]
    async fn identical_sources_take_fast_path() {
        let rows = agents(&["alice", "bob"]);
        let svc = service(Ok(rows.clone()), Ok(rows));
        let run = svc
            .run(&ProjectionProfile::for_type(ObjectType::Agent))
            .await
            .unwrap();
        assert_eq!(run.left_fingerprint, run.right_fingerprint);
        assert_eq!(run.report.summary.unchanged, 2);
        assert!(run.report.summary.is_clean());
    }

    #[tokio::test]
    async fn fast_path_is_timed_by_the_differ() {
        use crate::application::monitoring::{MonitoringDiffer, PerfReport};

        let report = PerfReport::new();
        let rows = agents(&["alice", "bob"]);
        let svc = CompareService::new(
            Arc::new(VecConnector {
                name: "prod".into(),
                rows: Ok(rows.clone()),
            }),
            Arc::new(VecConnector {
                name: "prod".into(),
                rows: Ok(rows),
            }),
            Arc::new(MonitoringDiffer::new(
                Arc::new(ComparisonEngine::default()),
                "agent",
                Arc::clone(&report),
            )),
        );
        svc.run(&ProjectionProfile::for_type(ObjectType::Agent))
            .await
            .unwrap();

        let perf = PerfReport::snapshot(&report);
        assert_eq!(perf.timings.len(), 1);
        assert_eq!(perf.timings[0].operation, "compare");
    }

    #[tokio::test]
    async fn retrieval_error_is_surfaced() {
        let svc = service(
            Ok(agents(&["alice"])),
            Err(DiffError::retrieval("staging", "auth rejected")),
        );
        let err = svc
            .run(&ProjectionProfile::for_type(ObjectType::Agent))
            .await
            .unwrap_err();
        let diff_err = err.downcast_ref::<DiffError>().unwrap();
        assert!(matches!(diff_err, DiffError::Retrieval { .. }));
    }

    #[tokio::test]
    async fn empty_key_aborts_before_diff() {
        let mut right = agents(&["alice"]);
        right[0].insert("user_name".into(), json!(""));
        let svc = service(Ok(agents(&["alice"])), Ok(right));
        let err = svc
            .run(&ProjectionProfile::for_type(ObjectType::Agent))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiffError>(),
            Some(DiffError::Projection { .. })
        ));
    }
}
