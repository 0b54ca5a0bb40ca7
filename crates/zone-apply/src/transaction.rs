//! Delete, purge and restore orchestration against the fabric
//!
//! Every run owns exactly one fabric session. The session is released on
//! every exit path once login succeeded; release failures are logged only.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use serde_json::Value;

use fczone_config::{parse_defined, parse_effective, FabricSettings};
use fczone_core::{
    CrossReferenceIndex, DefinedConfiguration, EffectiveConfiguration, ObjectKind, Result,
    ZoneError,
};
use fczone_validate::{DeletionRequest, SafetyValidator};

use crate::confirm::{accepts, Confirm};
use crate::fabric::{Credentials, DeleteOutcome, FabricZoningService, SessionToken};
use crate::outcome::{
    BatchOutcome, CommitDecision, PurgeOutcome, RestoreOutcome, TargetResult, TargetStatus,
};
use crate::plan::{ChangePlan, ObjectResolver};

/// Delay between consecutive destructive calls
pub const DEFAULT_PACING: Duration = Duration::from_millis(1100);

const COMMIT_PROMPT: &str = "Commit the changes? (Y/N) ";

/// Raw configuration documents fetched from the fabric
#[derive(Debug, Clone, Default)]
pub struct FetchedDocuments {
    pub defined: Option<Value>,
    pub effective: Option<Value>,
}

/// Spaces out destructive calls; the first call goes out immediately
struct Pacer {
    delay: Duration,
    started: bool,
}

impl Pacer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: false,
        }
    }

    async fn wait(&mut self) {
        if self.started && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.started = true;
    }
}

/// Sequences delete, create and commit calls for one fabric
pub struct ZoningOrchestrator {
    service: Arc<dyn FabricZoningService>,
    confirm: Arc<dyn Confirm>,
    credentials: Credentials,
    pacing: Duration,
    override_confirm: bool,
}

impl ZoningOrchestrator {
    pub fn new(
        service: Arc<dyn FabricZoningService>,
        confirm: Arc<dyn Confirm>,
        credentials: Credentials,
    ) -> Self {
        Self {
            service,
            confirm,
            credentials,
            pacing: DEFAULT_PACING,
            override_confirm: false,
        }
    }

    /// Build from fabric settings; fails when credentials are missing
    pub fn from_settings(
        settings: &FabricSettings,
        service: Arc<dyn FabricZoningService>,
        confirm: Arc<dyn Confirm>,
    ) -> Result<Self> {
        Ok(Self::new(service, confirm, Credentials::from_settings(settings)?)
            .with_pacing(settings.pacing())
            .with_override_confirm(settings.override_confirm))
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Commit without asking
    pub fn with_override_confirm(mut self, override_confirm: bool) -> Self {
        self.override_confirm = override_confirm;
        self
    }

    /// Log in, run `f`, then always log out
    async fn scoped<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(SessionToken) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = self.service.authenticate(&self.credentials).await?;
        debug!("Session established");

        let result = f(session.clone()).await;

        if let Err(e) = self.service.release(&session).await {
            warn!("Failed to release fabric session: {}", e);
        }
        result
    }

    async fn defined(&self, session: &SessionToken) -> Result<DefinedConfiguration> {
        parse_defined(&self.service.fetch_defined_configuration(session).await?)
    }

    async fn effective(&self, session: &SessionToken) -> Result<EffectiveConfiguration> {
        parse_effective(&self.service.fetch_effective_configuration(session).await?)
    }

    /// Fetch the requested configuration documents
    pub async fn fetch_configurations(
        &self,
        defined: bool,
        effective: bool,
    ) -> Result<FetchedDocuments> {
        self.scoped(|session| async move {
            let mut documents = FetchedDocuments::default();
            if defined {
                documents.defined = Some(self.service.fetch_defined_configuration(&session).await?);
            }
            if effective {
                documents.effective =
                    Some(self.service.fetch_effective_configuration(&session).await?);
            }
            info!("Fetched configuration documents");
            Ok(documents)
        })
        .await
    }

    /// Fetch and parse the effective configuration
    pub async fn fetch_effective(&self) -> Result<EffectiveConfiguration> {
        self.scoped(|session| async move { self.effective(&session).await })
            .await
    }

    /// Delete the named objects, then commit after confirmation.
    ///
    /// Names missing from the defined configuration are skipped. Objects the
    /// fabric no longer has count as already absent. Other delete failures are
    /// recorded and the batch continues.
    pub async fn delete_objects(&self, names: &[String]) -> Result<BatchOutcome> {
        self.scoped(|session| async move {
            let before = self.effective(&session).await?;
            debug!("Effective configuration checksum before changes: {}", before.checksum);

            let defined = self.defined(&session).await?;
            let resolver = ObjectResolver::new(&defined);
            let planned: Vec<(&String, Result<ChangePlan>)> =
                names.iter().map(|name| (name, resolver.plan(name))).collect();

            let mut pacer = Pacer::new(self.pacing);
            let mut targets = Vec::with_capacity(planned.len());
            for (name, plan) in planned {
                let result = match plan {
                    Ok(plan) => {
                        pacer.wait().await;
                        let status = self.delete(&session, plan.kind, &plan.name).await;
                        TargetResult {
                            name: name.clone(),
                            kind: Some(plan.kind),
                            status,
                        }
                    }
                    Err(ZoneError::ObjectNotFound { .. }) => {
                        warn!("{} not found in defined configuration, skipping", name);
                        TargetResult {
                            name: name.clone(),
                            kind: None,
                            status: TargetStatus::NotFound,
                        }
                    }
                    Err(e) => return Err(e),
                };
                targets.push(result);
            }

            let mut outcome = BatchOutcome {
                targets,
                commit: CommitDecision::NotAttempted,
            };
            if outcome.deleted() == 0 {
                info!("No objects deleted, nothing to commit");
                return Ok(outcome);
            }

            outcome.commit = if self.confirmed()? {
                self.commit_fresh(&session).await?
            } else {
                info!("Changes discarded");
                CommitDecision::Discarded
            };
            Ok(outcome)
        })
        .await
    }

    /// Validate a WWN/zone deletion request against the live fabric and, when
    /// it is safe, delete the aliases behind the WWNs and the zones without
    /// committing. Uncommitted changes are dropped by the fabric on logout.
    ///
    /// A WWN referenced by several aliases refuses the purge unless
    /// `all_aliases` is set, in which case every such alias is deleted.
    pub async fn purge(&self, request: &DeletionRequest, all_aliases: bool) -> Result<PurgeOutcome> {
        self.scoped(|session| async move {
            let effective = self.effective(&session).await?;
            let defined = self.defined(&session).await?;
            let index = CrossReferenceIndex::build(&defined);

            let report = SafetyValidator::new().validate(request, &index, &defined, &effective);

            let aliases = match report.accepted_aliases().map(<[String]>::to_vec) {
                Ok(aliases) => aliases,
                Err(reason) => return Ok(PurgeOutcome::Refused { report, reason }),
            };
            if !all_aliases {
                if let Err(reason) = report.ensure_unambiguous() {
                    return Ok(PurgeOutcome::Refused { report, reason });
                }
            }

            let objects = aliases
                .iter()
                .map(|name| (ObjectKind::Alias, name))
                .chain(request.zones.iter().map(|name| (ObjectKind::Zone, name)));

            let mut pacer = Pacer::new(self.pacing);
            let mut targets = Vec::new();
            for (kind, name) in objects {
                pacer.wait().await;
                let status = self.delete(&session, kind, name).await;
                targets.push(TargetResult {
                    name: name.clone(),
                    kind: Some(kind),
                    status,
                });
            }

            info!("Purge finished without commit");
            Ok(PurgeOutcome::Purged {
                report,
                batch: BatchOutcome {
                    targets,
                    commit: CommitDecision::NotAttempted,
                },
            })
        })
        .await
    }

    /// Recreate one object from a defined configuration snapshot.
    ///
    /// The name is resolved before logging in; an unknown name fails with
    /// `ZoneError::ObjectNotFound` without touching the fabric.
    pub async fn restore_object(
        &self,
        snapshot: &DefinedConfiguration,
        name: &str,
    ) -> Result<RestoreOutcome> {
        let plan = ObjectResolver::new(snapshot).plan(name)?;

        self.scoped(|session| async move {
            let replaced = match self
                .service
                .delete_object(&session, plan.kind, &plan.name)
                .await?
            {
                DeleteOutcome::Deleted => TargetStatus::Deleted,
                DeleteOutcome::NotFound => {
                    debug!("{} {} was absent before restore", plan.kind, plan.name);
                    TargetStatus::AlreadyAbsent
                }
            };

            self.service
                .create_object(&session, plan.kind, &plan.name, &plan.prior_payload)
                .await
                .map_err(|e| {
                    error!("Failed to recreate {} {}: {}", plan.kind, plan.name, e);
                    e
                })?;
            info!("Recreated {} {}", plan.kind, plan.name);

            let commit = self.commit_fresh(&session).await?;
            Ok(RestoreOutcome {
                plan,
                replaced,
                commit,
            })
        })
        .await
    }

    async fn delete(&self, session: &SessionToken, kind: ObjectKind, name: &str) -> TargetStatus {
        match self.service.delete_object(session, kind, name).await {
            Ok(DeleteOutcome::Deleted) => {
                info!("Deleted {} {}", kind, name);
                TargetStatus::Deleted
            }
            Ok(DeleteOutcome::NotFound) => {
                warn!("{} {} is already absent", kind, name);
                TargetStatus::AlreadyAbsent
            }
            Err(e) => {
                error!("Failed to delete {} {}: {}", kind, name, e);
                TargetStatus::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    fn confirmed(&self) -> Result<bool> {
        if self.override_confirm {
            debug!("Confirmation overridden");
            return Ok(true);
        }
        Ok(accepts(&self.confirm.ask(COMMIT_PROMPT)?))
    }

    /// Commit with a checksum read right now, never an earlier one
    async fn commit_fresh(&self, session: &SessionToken) -> Result<CommitDecision> {
        let checksum = self.effective(session).await?.checksum;
        self.service.commit(session, &checksum).await?;
        info!("Committed zoning changes (checksum {})", checksum);
        Ok(CommitDecision::Committed { checksum })
    }
}
