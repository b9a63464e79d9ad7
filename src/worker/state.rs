use std::fmt;

//
// LifecycleState
//

/// Worker lifecycle state.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LifecycleState {
    /// Constructed, not yet installed.
    #[default]
    Parsed,

    /// Precaching.
    Installing,

    /// Precached, waiting to activate.
    Installed,

    /// Collecting stale caches.
    Activating,

    /// Intercepting fetches.
    Activated,

    /// Install failed.
    Redundant,
}

impl LifecycleState {
    /// Whether fetches are served by the strategies.
    ///
    /// In any other state fetches pass straight through to the network.
    pub fn can_intercept_fetch(&self) -> bool {
        *self == Self::Activated
    }

    /// Whether install may start from this state.
    pub fn can_install(&self) -> bool {
        matches!(self, Self::Parsed | Self::Installed | Self::Redundant)
    }

    /// Whether activation may start from this state.
    pub fn can_activate(&self) -> bool {
        *self == Self::Installed
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        })
    }
}
