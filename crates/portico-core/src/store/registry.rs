// ── Project registry ──
//
// Ordered, fixed-membership project store with push-based change
// notification via a `watch` channel. The poller is the only writer.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;
use tracing::warn;

use crate::error::CoreError;
use crate::model::{ProjectDescriptor, ProjectStatus};

/// Registry snapshot: projects in configured order.
pub type ProjectSnapshot = Arc<Vec<Arc<ProjectDescriptor>>>;

/// The project registry.
///
/// Membership is fixed at construction; only `status` changes afterwards.
/// Every effective change replaces the snapshot that subscribers receive,
/// so readers never observe a half-applied update.
pub struct Registry {
    /// Project id -> position in the snapshot.
    index: HashMap<String, usize>,

    /// Project id -> configured health endpoint.
    endpoints: IndexMap<String, String>,

    /// Full snapshot, replaced on every status change.
    snapshot: watch::Sender<ProjectSnapshot>,
}

impl Registry {
    /// Build a registry from configured projects and endpoint mappings.
    ///
    /// Fails if two projects share an id. Endpoint mappings that name no
    /// known project are kept but never polled.
    pub fn new(
        projects: Vec<ProjectDescriptor>,
        endpoints: IndexMap<String, String>,
    ) -> Result<Self, CoreError> {
        let mut index = HashMap::with_capacity(projects.len());
        for (position, project) in projects.iter().enumerate() {
            if index.insert(project.id.clone(), position).is_some() {
                return Err(CoreError::DuplicateProject {
                    id: project.id.clone(),
                });
            }
        }

        for id in endpoints.keys() {
            if !index.contains_key(id) {
                warn!(project = %id, "health endpoint configured for unknown project; ignoring");
            }
        }

        let values: Vec<Arc<ProjectDescriptor>> = projects.into_iter().map(Arc::new).collect();
        let (snapshot, _) = watch::channel(Arc::new(values));

        Ok(Self {
            index,
            endpoints,
            snapshot,
        })
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> ProjectSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<ProjectSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<Arc<ProjectDescriptor>> {
        let position = *self.index.get(id)?;
        self.snapshot.borrow().get(position).cloned()
    }

    pub fn status(&self, id: &str) -> Option<ProjectStatus> {
        self.get(id).map(|p| p.status)
    }

    /// The configured health endpoint for `id`, if any.
    pub fn endpoint(&self, id: &str) -> Option<&str> {
        self.endpoints.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Set the status of project `id`.
    ///
    /// Returns `false` (and does nothing) if `id` is unknown. Subscribers
    /// are notified only when the status actually changes.
    pub fn set_status(&self, id: &str, status: ProjectStatus) -> bool {
        let Some(&position) = self.index.get(id) else {
            return false;
        };

        self.snapshot.send_if_modified(|snap| {
            let Some(current) = snap.get(position) else {
                return false;
            };
            if current.status == status {
                return false;
            }

            let mut updated = ProjectDescriptor::clone(current);
            updated.status = status;

            let mut next: Vec<Arc<ProjectDescriptor>> = snap.iter().cloned().collect();
            if let Some(slot) = next.get_mut(position) {
                *slot = Arc::new(updated);
            }
            *snap = Arc::new(next);
            true
        });

        true
    }
}
