//! Errors that abort a turn.
//!
//! A failed turn persists nothing: the stored state stays where it was, so
//! the next event from the same user retries the same step.

use std::fmt;

use crate::ports::{CatalogError, GeocoderError, SessionStoreError, TransportError};

/// External collaborator that failed during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    SessionStore,
    Catalog,
    Geocoder,
    Transport,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Collaborator::SessionStore => "session store",
            Collaborator::Catalog => "catalog",
            Collaborator::Geocoder => "geocoder",
            Collaborator::Transport => "transport",
        };
        f.write_str(s)
    }
}

/// Why a turn was aborted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TurnError {
    /// Network, auth or protocol failure of an external client.
    #[error("{collaborator} failed: {message}")]
    CollaboratorUnavailable {
        collaborator: Collaborator,
        message: String,
    },

    /// The stored state token names no state. Never reset to start.
    #[error("Stored conversation state is corrupted: {0:?}")]
    UnknownState(String),

    /// A handler needs data an earlier turn should have recorded.
    #[error("Session data missing: {0}")]
    MissingContext(&'static str),

    #[error("Catalog lists no pizzerias")]
    NoPizzerias,
}

impl TurnError {
    /// Fatal errors indicate corrupted data rather than a transient failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TurnError::UnknownState(_))
    }

    fn collaborator(collaborator: Collaborator, err: impl fmt::Display) -> Self {
        TurnError::CollaboratorUnavailable {
            collaborator,
            message: err.to_string(),
        }
    }
}

impl From<SessionStoreError> for TurnError {
    fn from(err: SessionStoreError) -> Self {
        Self::collaborator(Collaborator::SessionStore, err)
    }
}

impl From<CatalogError> for TurnError {
    fn from(err: CatalogError) -> Self {
        Self::collaborator(Collaborator::Catalog, err)
    }
}

impl From<GeocoderError> for TurnError {
    fn from(err: GeocoderError) -> Self {
        Self::collaborator(Collaborator::Geocoder, err)
    }
}

impl From<TransportError> for TurnError {
    fn from(err: TransportError) -> Self {
        Self::collaborator(Collaborator::Transport, err)
    }
}
