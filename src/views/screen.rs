//! Top-level screen selection.

use serde::Serialize;

use crate::services::session::SessionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Landing,
    Dashboard,
}

impl Screen {
    /// Dashboard needs both identity and a loaded profile; until the profile
    /// arrives a signed-in user still sees the landing page.
    #[must_use]
    pub fn select(snapshot: &SessionSnapshot) -> Self {
        if snapshot.loading {
            Self::Loading
        } else if snapshot.identity.is_some() && snapshot.profile.is_some() {
            Self::Dashboard
        } else {
            Self::Landing
        }
    }
}

#[cfg(test)]
#[path = "screen_test.rs"]
mod tests;
