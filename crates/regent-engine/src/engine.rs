//! # Engine — analyze() and the Audit Query Surface
//!
//! The engine owns the collaborators (corpus store, reasoning service,
//! audit store) and the admission semaphores. One `Engine` instance is
//! shared per process; `analyze` takes `&self` and is safe to call
//! concurrently.
//!
//! ## Invariant
//!
//! The audit append is the last step of the pipeline. Any earlier
//! failure or cancellation leaves the audit log untouched — an entry
//! exists only for analyses whose report was fully assembled.

use std::sync::Arc;

use tokio::sync::Semaphore;
use uuid::Uuid;

use regent_audit::{AuditEntry, AuditStore};
use regent_core::{ContentDigest, ProjectProfile, Timestamp};
use regent_corpus::CorpusStore;
use regent_reasoning::{run_analysis, ReasoningPolicy, ReasoningService};
use regent_report::{build_report, ComplianceReport};
use regent_retrieval::{assemble_context, retrieve_evidence};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Whether the completed analysis made it into the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditStatus {
    /// The entry is recorded (or was already recorded by an identical
    /// earlier run).
    Recorded,
    /// Persistence failed. The report is still valid; the caller must
    /// treat it as unaudited.
    Failed { reason: String },
}

/// Result of one successful analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Process-local identifier for correlating log lines.
    pub analysis_id: Uuid,
    /// The assembled report.
    pub report: ComplianceReport,
    /// The report's content hash, the audit lookup key.
    pub content_hash: ContentDigest,
    /// Audit recording status.
    pub audit: AuditStatus,
}

/// The analysis pipeline over a corpus store `C`, reasoning service
/// `R`, and audit store `A`.
pub struct Engine<C, R, A> {
    corpus: Arc<C>,
    reasoning: R,
    audit: A,
    retrieval_k: usize,
    context_budget_bytes: usize,
    policy: ReasoningPolicy,
    // Admission control for the reasoning step: `admission` bounds
    // active + queued analyses (cap + queue depth), `inflight` bounds
    // active reasoning calls (cap). Both permits are held until the
    // reasoning call returns.
    admission: Semaphore,
    inflight: Semaphore,
}

impl<C, R, A> Engine<C, R, A>
where
    C: CorpusStore + 'static,
    R: ReasoningService,
    A: AuditStore,
{
    /// Assemble an engine from its collaborators and configuration.
    pub fn new(corpus: Arc<C>, reasoning: R, audit: A, config: EngineConfig) -> Self {
        Self {
            retrieval_k: config.retrieval_k,
            context_budget_bytes: config.context_budget_bytes,
            policy: config.reasoning_policy(),
            admission: Semaphore::new(
                config.reasoning_concurrency_cap + config.reasoning_queue_depth,
            ),
            inflight: Semaphore::new(config.reasoning_concurrency_cap),
            corpus,
            reasoning,
            audit,
        }
    }

    /// Run one full analysis: retrieve, assemble, reason, score, plan,
    /// record.
    ///
    /// # Errors
    ///
    /// See [`EngineError`]. Audit persistence failure is not an error
    /// here — the report is returned with [`AuditStatus::Failed`].
    pub async fn analyze(&self, profile: &ProjectProfile) -> Result<AnalysisOutcome, EngineError> {
        let analysis_id = Uuid::new_v4();
        tracing::info!(
            %analysis_id,
            project = profile.name(),
            families = profile.families().len(),
            "starting compliance analysis"
        );

        let evidence = retrieve_evidence(&self.corpus, profile, self.retrieval_k).await?;
        let ctx = assemble_context(&evidence, self.context_budget_bytes);
        tracing::debug!(
            %analysis_id,
            passages = ctx.passages().len(),
            bytes = ctx.size_bytes(),
            "reasoning context assembled"
        );

        let reasoned = {
            let _admitted = self
                .admission
                .try_acquire()
                .map_err(|_| EngineError::EngineOverloaded)?;
            let _slot = self
                .inflight
                .acquire()
                .await
                .map_err(|_| EngineError::EngineOverloaded)?;
            run_analysis(&self.reasoning, &self.policy, profile, &ctx).await?
        };

        let report = build_report(profile, &ctx, reasoned.gaps, Timestamp::now())?;
        let content_hash = report.content_hash;
        tracing::info!(
            %analysis_id,
            aggregate = report.scores.aggregate,
            gaps = report.gaps.len(),
            content_hash = %content_hash,
            "analysis complete"
        );

        let entry = AuditEntry::new(
            report.clone(),
            ctx,
            reasoned.raw_response,
            reasoned.instruction_version.to_string(),
            reasoned.usage,
            Timestamp::now(),
        );
        let audit = match self.audit.append(entry).await {
            Ok(_) => AuditStatus::Recorded,
            Err(e) => {
                tracing::warn!(
                    %analysis_id,
                    error = %e,
                    "audit append failed; returning report flagged unaudited"
                );
                AuditStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(AnalysisOutcome {
            analysis_id,
            report,
            content_hash,
            audit,
        })
    }

    /// Look up the audit entry recorded under `content_hash`.
    ///
    /// # Errors
    ///
    /// `EngineError::AuditPersistenceFailed` if the audit backend
    /// cannot answer.
    pub async fn audit_entry(
        &self,
        content_hash: &ContentDigest,
    ) -> Result<Option<AuditEntry>, EngineError> {
        self.audit
            .get(content_hash)
            .await
            .map_err(|e| EngineError::AuditPersistenceFailed {
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::future::Future;

    use tokio::sync::Notify;

    use regent_audit::{FailingAuditStore, InMemoryAuditStore};
    use regent_core::{ProjectAttributes, RegulationFamily, Severity};
    use regent_corpus::{
        EvidencePassage, InMemoryCorpusStore, Provenance, RelevanceBps, SourceKind,
        UnavailableCorpusStore,
    };
    use regent_reasoning::{ReasoningRequest, ReasoningResponse, ReasoningUsage, TransportError};

    fn profile() -> ProjectProfile {
        ProjectProfile::new(
            "MyStakingPool",
            "A decentralized staking pool for EU retail users.",
            [RegulationFamily::Gdpr, RegulationFamily::Mica]
                .into_iter()
                .collect::<BTreeSet<_>>(),
            ProjectAttributes::default(),
        )
        .unwrap()
    }

    fn passage(family: RegulationFamily, doc: &str, source: &str) -> EvidencePassage {
        let provenance = Provenance {
            document_id: doc.into(),
            offset: 0,
        };
        EvidencePassage {
            id: provenance.passage_id(),
            source: source.into(),
            kind: SourceKind::Regulation,
            family,
            excerpt: "controllers shall implement appropriate measures".into(),
            relevance: RelevanceBps::from_score(0.9),
            provenance,
        }
    }

    fn corpus() -> Arc<InMemoryCorpusStore> {
        Arc::new(InMemoryCorpusStore::with_passages(vec![
            passage(RegulationFamily::Gdpr, "gdpr-a", "GDPR Art. 17"),
            passage(RegulationFamily::Mica, "mica-a", "MiCA Art. 59"),
        ]))
    }

    /// One GDPR high gap citing a passage the corpus fixture serves.
    const VALID_BODY: &str = r#"{"gaps": [{
        "family": "GDPR",
        "description": "no erasure process for delegator records",
        "severity": "high",
        "evidence": ["gdpr-a@0"]
    }]}"#;

    /// Answers every request with a fixed body.
    struct CannedService {
        body: String,
    }

    impl ReasoningService for CannedService {
        fn generate(
            &self,
            _request: &ReasoningRequest,
        ) -> impl Future<Output = Result<ReasoningResponse, TransportError>> + Send {
            std::future::ready(Ok(ReasoningResponse {
                content: self.body.clone(),
                usage: Some(ReasoningUsage {
                    input_tokens: 1000,
                    output_tokens: 150,
                }),
            }))
        }
    }

    /// Holds every request until released, for overload tests.
    struct StalledService {
        release: Arc<Notify>,
    }

    impl ReasoningService for StalledService {
        fn generate(
            &self,
            _request: &ReasoningRequest,
        ) -> impl Future<Output = Result<ReasoningResponse, TransportError>> + Send {
            let release = Arc::clone(&self.release);
            async move {
                release.notified().await;
                Ok(ReasoningResponse {
                    content: VALID_BODY.to_string(),
                    usage: None,
                })
            }
        }
    }

    fn canned_engine() -> Engine<InMemoryCorpusStore, CannedService, InMemoryAuditStore> {
        Engine::new(
            corpus(),
            CannedService {
                body: VALID_BODY.to_string(),
            },
            InMemoryAuditStore::new(),
            EngineConfig::default(),
        )
    }

    #[tokio::test]
    async fn analyze_produces_scored_audited_report() {
        let engine = canned_engine();
        let outcome = engine.analyze(&profile()).await.unwrap();

        assert_eq!(outcome.audit, AuditStatus::Recorded);
        assert_eq!(outcome.report.scores.aggregate, 85);
        assert_eq!(outcome.report.gaps.len(), 1);
        assert_eq!(outcome.report.gaps[0].severity, Severity::High);
        assert_eq!(outcome.content_hash, outcome.report.content_hash);

        let entry = engine.audit_entry(&outcome.content_hash).await.unwrap();
        let entry = entry.expect("entry recorded");
        assert_eq!(entry.report, outcome.report);
        assert_eq!(entry.instruction_version, "regent.analysis.v1");
        assert_eq!(
            entry.usage,
            Some(ReasoningUsage {
                input_tokens: 1000,
                output_tokens: 150
            })
        );
    }

    #[tokio::test]
    async fn corpus_outage_fails_before_any_audit_write() {
        let audit = Arc::new(InMemoryAuditStore::new());
        let engine = Engine::new(
            Arc::new(UnavailableCorpusStore),
            CannedService {
                body: VALID_BODY.to_string(),
            },
            Arc::clone(&audit),
            EngineConfig::default(),
        );

        let err = engine.analyze(&profile()).await.unwrap_err();
        assert!(matches!(err, EngineError::RetrievalUnavailable { .. }));
        assert!(err.is_retryable());
        assert!(audit.is_empty());
    }

    #[tokio::test]
    async fn audit_failure_still_returns_the_report() {
        let engine = Engine::new(
            corpus(),
            CannedService {
                body: VALID_BODY.to_string(),
            },
            FailingAuditStore,
            EngineConfig::default(),
        );

        let outcome = engine.analyze(&profile()).await.unwrap();
        assert!(matches!(outcome.audit, AuditStatus::Failed { .. }));
        assert_eq!(outcome.report.scores.aggregate, 85);
    }

    #[tokio::test]
    async fn full_admission_queue_fails_fast() {
        let release = Arc::new(Notify::new());
        let config = EngineConfig {
            reasoning_concurrency_cap: 1,
            reasoning_queue_depth: 0,
            ..EngineConfig::default()
        };
        let engine = Arc::new(Engine::new(
            corpus(),
            StalledService {
                release: Arc::clone(&release),
            },
            InMemoryAuditStore::new(),
            config,
        ));

        let first = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.analyze(&profile()).await })
        };
        // Let the first analysis reach the stalled reasoning call.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let err = engine.analyze(&profile()).await.unwrap_err();
        assert!(matches!(err, EngineError::EngineOverloaded));
        assert!(err.is_retryable());

        release.notify_waiters();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.audit, AuditStatus::Recorded);
    }

    #[tokio::test]
    async fn aborting_a_stalled_analysis_leaves_no_audit_entry() {
        let release = Arc::new(Notify::new());
        let audit = Arc::new(InMemoryAuditStore::new());
        let engine = Arc::new(Engine::new(
            corpus(),
            StalledService {
                release: Arc::clone(&release),
            },
            Arc::clone(&audit),
            EngineConfig::default(),
        ));

        let task = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.analyze(&profile()).await })
        };
        // Let the analysis reach the stalled reasoning call, then drop it.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        task.abort();

        assert!(task.await.unwrap_err().is_cancelled());
        assert!(audit.is_empty());

        // The aborted run released its permits: a fresh analysis succeeds.
        release.notify_one();
        let outcome = engine.analyze(&profile()).await.unwrap();
        assert_eq!(outcome.audit, AuditStatus::Recorded);
    }

    #[tokio::test]
    async fn identical_reruns_share_one_audit_entry() {
        let audit = Arc::new(InMemoryAuditStore::new());
        let engine = Engine::new(
            corpus(),
            CannedService {
                body: VALID_BODY.to_string(),
            },
            Arc::clone(&audit),
            EngineConfig::default(),
        );

        let first = engine.analyze(&profile()).await.unwrap();
        let second = engine.analyze(&profile()).await.unwrap();

        assert_eq!(first.content_hash, second.content_hash);
        assert_eq!(second.audit, AuditStatus::Recorded);
        assert_eq!(audit.len(), 1);
    }
}
