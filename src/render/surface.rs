//! Surface: the display-commit boundary.
//!
//! The template-to-UI-tree commit mechanism is an external collaborator; this
//! module specifies only its interface. A [`Surface`] receives the strips a
//! template produced, scoped by the committing element's identity, together
//! with the element that should receive events arising from the committed
//! output. [`TestSurface`] records commits for assertions in headless tests.

use crate::element::ElementId;
use crate::render::strip::Strip;

// ---------------------------------------------------------------------------
// Surface trait
// ---------------------------------------------------------------------------

/// Host-side display commit primitive.
pub trait Surface {
    /// Apply the template output of element `id` to the visible UI.
    ///
    /// `context` is the event-dispatch receiver for the committed output:
    /// the per-call context passed to `request_render`, the element's stored
    /// context, or the element itself, in that order of preference.
    fn commit(&mut self, id: ElementId, strips: Vec<Strip>, context: ElementId);
}

// ---------------------------------------------------------------------------
// TestSurface
// ---------------------------------------------------------------------------

/// One recorded display commit.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub id: ElementId,
    pub strips: Vec<Strip>,
    pub context: ElementId,
}

/// A surface that records every commit, for headless testing.
#[derive(Debug, Default)]
pub struct TestSurface {
    pub commits: Vec<CommitRecord>,
}

impl TestSurface {
    /// Create an empty recording surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits recorded for the given element.
    pub fn commit_count(&self, id: ElementId) -> usize {
        self.commits.iter().filter(|c| c.id == id).count()
    }

    /// The most recent commit for the given element, if any.
    pub fn last_commit(&self, id: ElementId) -> Option<&CommitRecord> {
        self.commits.iter().rev().find(|c| c.id == id)
    }

    /// The plain text of the most recent commit for `id`, one line per strip.
    pub fn last_text(&self, id: ElementId) -> Option<String> {
        self.last_commit(id).map(|c| {
            c.strips
                .iter()
                .map(|s| s.text().trim_end().to_owned())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Forget all recorded commits.
    pub fn clear(&mut self) {
        self.commits.clear();
    }
}

impl Surface for TestSurface {
    fn commit(&mut self, id: ElementId, strips: Vec<Strip>, context: ElementId) {
        self.commits.push(CommitRecord {
            id,
            strips,
            context,
        });
    }
}

// ===========================================================================
// Tests
// ===========================================================================
