use std::fmt;

use super::session::ShareState;

/// What the share dialog shows: the link, how often it was viewed, and whether it is live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDialog {
    pub link: String,
    pub view_count: u64,
    pub is_active: bool,
}

impl ShareDialog {
    /// Returns `None` unless the session is ready
    pub fn from_state(state: &ShareState) -> Option<Self> {
        match state {
            ShareState::Ready { profile, link } => Some(Self {
                link: link.clone(),
                view_count: profile.view_count,
                is_active: profile.is_active,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for ShareDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visibility = if self.is_active { "public" } else { "hidden" };
        writeln!(f, "{} ({})", self.link, visibility)?;
        write!(
            f,
            "{} {}",
            self.view_count,
            if self.view_count == 1 { "view" } else { "views" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PublicProfile;
    use chrono::Utc;

    #[test]
    fn only_ready_state_has_a_dialog() {
        assert!(ShareDialog::from_state(&ShareState::Idle).is_none());
        assert!(ShareDialog::from_state(&ShareState::Loading).is_none());
        assert!(ShareDialog::from_state(&ShareState::Error {
            message: "offline".into()
        })
        .is_none());
    }

    #[test]
    fn renders_link_and_count() {
        let now = Utc::now();
        let state = ShareState::Ready {
            profile: PublicProfile {
                id: "row".into(),
                user_id: "u1".into(),
                profile_id: "p1".into(),
                share_token: "abc123".into(),
                is_active: false,
                view_count: 1,
                shared_at: now,
                updated_at: now,
            },
            link: "http://localhost:3000/public-profile/abc123".into(),
        };

        let dialog = ShareDialog::from_state(&state).unwrap();
        assert_eq!(
            dialog.to_string(),
            "http://localhost:3000/public-profile/abc123 (hidden)\n1 view"
        );
    }
}
