use std::collections::HashSet;

use attest_core::model::{LinkId, Training, TrainingId};

use crate::error::CompletionError;

/// Phase of one party's attempt at one training.
///
/// `Studying -> FormOpen -> Completed`; the first transition is gated
/// strictly on full completion, and nothing skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Studying,
    FormOpen,
    Completed,
}

/// Client-local record of which study links have been opened.
///
/// Scoped to one party's one attempt at one training; never persisted, so a
/// page reload starts over. "Viewed" is recorded the moment the party is
/// directed to a link — there is no way to confirm the material was actually
/// consumed, which is a deliberate trust boundary.
#[derive(Debug, Clone)]
pub struct CompletionTracker {
    training_id: TrainingId,
    links: Vec<LinkId>,
    viewed: HashSet<LinkId>,
    phase: AttemptPhase,
}

impl CompletionTracker {
    /// Starts a fresh attempt over the training's links.
    #[must_use]
    pub fn for_training(training: &Training) -> Self {
        Self {
            training_id: training.id().clone(),
            links: training.links().iter().map(|l| l.id().clone()).collect(),
            viewed: HashSet::new(),
            phase: AttemptPhase::Studying,
        }
    }

    #[must_use]
    pub fn training_id(&self) -> &TrainingId {
        &self.training_id
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    #[must_use]
    pub fn total_links(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn viewed_count(&self) -> usize {
        self.viewed.len()
    }

    /// Records that the party was directed to `link`.
    ///
    /// Idempotent; marking an already-viewed link is a no-op, and ids that
    /// do not belong to the training are ignored. Returns whether the mark
    /// was newly recorded.
    pub fn mark_viewed(&mut self, link: &LinkId) -> bool {
        if !self.links.contains(link) {
            return false;
        }
        self.viewed.insert(link.clone())
    }

    /// Completion percentage. A training with no links is vacuously
    /// complete, so its progress reads 100.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.links.is_empty() {
            return 100.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.viewed.len() as f32 / self.links.len() as f32 * 100.0
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress() >= 100.0
    }

    /// Opens the submission form. Allowed only once every link has been
    /// viewed; calling it again while the form is open is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::GateClosed` while links remain unviewed,
    /// or `CompletionError::AlreadyCompleted` after a successful submit.
    pub fn open_form(&mut self) -> Result<(), CompletionError> {
        match self.phase {
            AttemptPhase::Studying => {
                if !self.is_complete() {
                    return Err(CompletionError::GateClosed {
                        progress: self.progress(),
                    });
                }
                self.phase = AttemptPhase::FormOpen;
                Ok(())
            }
            AttemptPhase::FormOpen => Ok(()),
            AttemptPhase::Completed => Err(CompletionError::AlreadyCompleted),
        }
    }

    /// Marks the attempt completed after a successful submission.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::FormNotOpen` unless the form was opened
    /// first, or `CompletionError::AlreadyCompleted` on a second call.
    pub fn finish(&mut self) -> Result<(), CompletionError> {
        match self.phase {
            AttemptPhase::FormOpen => {
                self.phase = AttemptPhase::Completed;
                Ok(())
            }
            AttemptPhase::Studying => Err(CompletionError::FormNotOpen),
            AttemptPhase::Completed => Err(CompletionError::AlreadyCompleted),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
