//! Orchestration of one "create reminder" submission.
//!
//! The controller owns the form's retained input. A submission walks
//! `Idle → Validating → Resolving → Creating` and ends in `Succeeded` or
//! `Failed`; input is cleared only on success so a failed attempt can be
//! corrected and resubmitted without retyping.

use chrono::{DateTime, TimeZone};
use tracing::{debug, info, warn};

use crate::deadline::{DeadlineResolver, ParseError};
use crate::reminders::{
    ReminderRequest, ReminderService, ReminderStore, ResolvedDeadline, StoreError,
};

/// Which required field was left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Title,
    Deadline,
}

/// Every way a submission can fail. Each kind has exactly one presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    InputInvalid(InputField),
    DateParseFailed,
    AccessDenied,
    NoDefaultList,
    ListNotFound,
    DuplicateListId,
    CreateFailed,
    Unexpected,
}

impl From<&StoreError> for FailureKind {
    fn from(error: &StoreError) -> Self {
        match error {
            StoreError::AccessDenied => FailureKind::AccessDenied,
            StoreError::NoDefaultList => FailureKind::NoDefaultList,
            StoreError::ListNotFound(_) => FailureKind::ListNotFound,
            StoreError::DuplicateListId(_) => FailureKind::DuplicateListId,
            StoreError::CreateFailed(_) => FailureKind::CreateFailed,
            StoreError::RequestAccessFailed(_) => FailureKind::Unexpected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Resolving,
    Creating,
    Succeeded,
    Failed(FailureKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Success {
        title: String,
        deadline: ResolvedDeadline,
    },
    Failure {
        kind: FailureKind,
        /// Underlying error text, for logs and the detail line.
        detail: Option<String>,
    },
}

impl SubmissionOutcome {
    fn failure(kind: FailureKind, detail: Option<String>) -> Self {
        SubmissionOutcome::Failure { kind, detail }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            SubmissionOutcome::Success { .. } => None,
            SubmissionOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Text the user has typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub deadline: String,
    pub notes: String,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.deadline.is_empty() && self.notes.is_empty()
    }

    fn to_request(&self, destination: Option<&str>) -> ReminderRequest {
        let mut request = ReminderRequest::new(self.title.trim(), self.deadline.trim())
            .with_notes(self.notes.trim());
        if let Some(id) = destination {
            request = request.with_destination(id);
        }
        request
    }
}

pub struct SubmissionController {
    resolver: DeadlineResolver,
    draft: Draft,
    phase: Phase,
}

impl SubmissionController {
    pub fn new(resolver: DeadlineResolver) -> Self {
        Self {
            resolver,
            draft: Draft::default(),
            phase: Phase::Idle,
        }
    }

    pub fn resolver(&self) -> &DeadlineResolver {
        &self.resolver
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run one submission of the current draft.
    ///
    /// `destination` is the configured list id (`None` or empty for the
    /// default list) and `now` the reference time for deadline resolution.
    pub async fn submit<S, Tz>(
        &mut self,
        store: &ReminderStore<S>,
        destination: Option<&str>,
        now: &DateTime<Tz>,
    ) -> SubmissionOutcome
    where
        S: ReminderService,
        Tz: TimeZone,
    {
        let request = self.draft.to_request(destination);
        let outcome = self.run(store, &request, now).await;

        match &outcome {
            SubmissionOutcome::Success { title, deadline } => {
                info!(%title, %deadline, "submission succeeded");
                self.transition(Phase::Succeeded);
                self.draft = Draft::default();
            }
            SubmissionOutcome::Failure { kind, detail } => {
                warn!(?kind, detail = detail.as_deref().unwrap_or(""), "submission failed");
                self.transition(Phase::Failed(*kind));
            }
        }
        outcome
    }

    async fn run<S, Tz>(
        &mut self,
        store: &ReminderStore<S>,
        request: &ReminderRequest,
        now: &DateTime<Tz>,
    ) -> SubmissionOutcome
    where
        S: ReminderService,
        Tz: TimeZone,
    {
        self.transition(Phase::Validating);
        if request.title.is_empty() {
            return SubmissionOutcome::failure(FailureKind::InputInvalid(InputField::Title), None);
        }
        if request.deadline_text.is_empty() {
            return SubmissionOutcome::failure(
                FailureKind::InputInvalid(InputField::Deadline),
                None,
            );
        }
        // Checked before parsing so a denied user is sent to settings first.
        if !store.access_state().is_full() {
            return SubmissionOutcome::failure(FailureKind::AccessDenied, None);
        }

        self.transition(Phase::Resolving);
        let deadline = match self.resolver.resolve(&request.deadline_text, now) {
            Ok(deadline) => deadline,
            Err(e) => return parse_failure(&e),
        };

        self.transition(Phase::Creating);
        match store.create(request, deadline).await {
            Ok(record) => SubmissionOutcome::Success {
                title: record.title,
                deadline: record.due,
            },
            Err(e) => SubmissionOutcome::failure(FailureKind::from(&e), Some(e.to_string())),
        }
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "submission phase");
        self.phase = next;
    }
}

fn parse_failure(error: &ParseError) -> SubmissionOutcome {
    SubmissionOutcome::failure(FailureKind::DateParseFailed, Some(error.to_string()))
}
