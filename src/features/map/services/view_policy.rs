use thiserror::Error;

use crate::features::locations::models::{Location, LocationStatus};
use crate::features::map::models::{MarkerAction, ViewContext};

/// Store mutation requested from a map surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Place,
    Edit,
    Delete,
    SetStatus(LocationStatus),
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Place => write!(f, "placing a pin"),
            Mutation::Edit => write!(f, "editing"),
            Mutation::Delete => write!(f, "deleting"),
            Mutation::SetStatus(status) => write!(f, "marking as {}", status),
        }
    }
}

/// Why the view policy refused a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyDenial {
    #[error("{mutation} is not available on the {context} map")]
    NotPermittedInContext {
        context: ViewContext,
        mutation: Mutation,
    },

    #[error("Location belongs to another contributor")]
    NotOwner,

    #[error("Verified locations are locked for their contributor")]
    Verified,

    #[error("Only pending locations can be moderated")]
    NotPending,

    #[error("Moderation outcome must be verified or rejected")]
    InvalidOutcome,
}

/// Visibility override and permitted mutations of a viewing context.
///
/// The override is applied on top of the user's `MapFilters`, never instead of
/// them. Each variant carries the id of the session user it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPolicy {
    /// Everything visible; contributors may place pins and finish editing
    /// their own pending ones.
    Public { viewer_id: String },
    /// Only the owner's locations; edit and delete while not verified.
    Dashboard { owner_id: String },
    /// Only pending locations; approve or reject, nothing else.
    Admin { moderator_id: String },
}

impl ViewPolicy {
    pub fn new(context: ViewContext, viewer_id: impl Into<String>) -> Self {
        let viewer_id = viewer_id.into();
        match context {
            ViewContext::Public => ViewPolicy::Public { viewer_id },
            ViewContext::Dashboard => ViewPolicy::Dashboard {
                owner_id: viewer_id,
            },
            ViewContext::Admin => ViewPolicy::Admin {
                moderator_id: viewer_id,
            },
        }
    }

    pub fn context(&self) -> ViewContext {
        match self {
            ViewPolicy::Public { .. } => ViewContext::Public,
            ViewPolicy::Dashboard { .. } => ViewContext::Dashboard,
            ViewPolicy::Admin { .. } => ViewContext::Admin,
        }
    }

    pub fn viewer_id(&self) -> &str {
        match self {
            ViewPolicy::Public { viewer_id } => viewer_id,
            ViewPolicy::Dashboard { owner_id } => owner_id,
            ViewPolicy::Admin { moderator_id } => moderator_id,
        }
    }

    /// Context override, conjoined with `FilterEngine::passes`
    pub fn admits(&self, location: &Location) -> bool {
        match self {
            ViewPolicy::Public { .. } => true,
            ViewPolicy::Dashboard { owner_id } => location.is_owned_by(owner_id),
            ViewPolicy::Admin { .. } => location.status == LocationStatus::Pending,
        }
    }

    /// The "only mine" switch is redundant on the dashboard and meaningless in moderation
    pub fn allows_only_mine_toggle(&self) -> bool {
        matches!(self, ViewPolicy::Public { .. })
    }

    pub fn authorize_place(&self) -> Result<(), PolicyDenial> {
        match self {
            ViewPolicy::Public { .. } | ViewPolicy::Dashboard { .. } => Ok(()),
            ViewPolicy::Admin { .. } => Err(self.not_here(Mutation::Place)),
        }
    }

    pub fn authorize(&self, mutation: Mutation, target: &Location) -> Result<(), PolicyDenial> {
        match (self, mutation) {
            (_, Mutation::Place) => self.authorize_place(),

            (ViewPolicy::Public { viewer_id }, Mutation::Edit) => {
                if !target.is_owned_by(viewer_id) {
                    Err(PolicyDenial::NotOwner)
                } else if target.status != LocationStatus::Pending {
                    Err(self.not_here(mutation))
                } else {
                    Ok(())
                }
            }

            (ViewPolicy::Dashboard { owner_id }, Mutation::Edit | Mutation::Delete) => {
                if !target.is_owned_by(owner_id) {
                    Err(PolicyDenial::NotOwner)
                } else if target.status == LocationStatus::Verified {
                    Err(PolicyDenial::Verified)
                } else {
                    Ok(())
                }
            }

            (ViewPolicy::Admin { .. }, Mutation::SetStatus(outcome)) => {
                if target.status != LocationStatus::Pending {
                    Err(PolicyDenial::NotPending)
                } else if outcome == LocationStatus::Pending {
                    Err(PolicyDenial::InvalidOutcome)
                } else {
                    Ok(())
                }
            }

            _ => Err(self.not_here(mutation)),
        }
    }

    /// Popup buttons for a marker, in display order. Mirrors `authorize`.
    pub fn marker_actions(&self, location: &Location) -> Vec<MarkerAction> {
        let candidates = [
            (MarkerAction::Approve, Mutation::SetStatus(LocationStatus::Verified)),
            (MarkerAction::Reject, Mutation::SetStatus(LocationStatus::Rejected)),
            (MarkerAction::Edit, Mutation::Edit),
            (MarkerAction::Delete, Mutation::Delete),
        ];

        std::iter::once(MarkerAction::Details)
            .chain(
                candidates
                    .into_iter()
                    .filter(|(_, mutation)| self.authorize(*mutation, location).is_ok())
                    .map(|(action, _)| action),
            )
            .collect()
    }

    fn not_here(&self, mutation: Mutation) -> PolicyDenial {
        PolicyDenial::NotPermittedInContext {
            context: self.context(),
            mutation,
        }
    }
}
