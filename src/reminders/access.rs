/// Permission level the platform grants this app over the reminders store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    NotDetermined,
    Denied,
    FullAccess,
    /// Write-only access: records can be added but lists cannot be read.
    PartialAccess,
}

impl AccessState {
    pub fn is_full(self) -> bool {
        self == AccessState::FullAccess
    }

    /// Whether the user has answered the permission prompt.
    pub fn is_decided(self) -> bool {
        self != AccessState::NotDetermined
    }
}
