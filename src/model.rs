//! Data models for the public profile sharing service
//!
//! This module defines the records stored in the database, the request
//! payloads accepted by the API and the projections returned to anonymous
//! visitors. Everything is serialized as camelCase JSON, which is what the
//! web frontend expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's public profile record
///
/// One row exists per user who has ever asked for a share link. The row is
/// reachable by `user_id` and by `share_token`; both are unique.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    /// Opaque identifier, generated once
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// The profile snapshot this public profile exposes
    pub profile_id: String,

    /// Unguessable token embedded in the public URL (e.g. "/public-profile/{token}")
    pub share_token: String,

    /// When false, lookups by token or user id fail as if the row did not exist
    pub is_active: bool,

    /// Number of external views, never decreases
    #[serde(default)]
    pub view_count: u64,

    /// Timestamp when the share link was first created
    pub shared_at: DateTime<Utc>,

    /// Timestamp of the last visibility change
    pub updated_at: DateTime<Utc>,
}

/// A link to one of the user's social accounts
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// The editable profile snapshot a public profile points at
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Creates an empty snapshot for a user who has never edited their profile
    pub fn empty(id: String, user_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            first_name: None,
            last_name: None,
            title: None,
            bio: None,
            avatar: None,
            city: None,
            school: None,
            major: None,
            objective: None,
            social_links: Vec::new(),
            updated_at: now,
        }
    }

    /// Applies a partial update; fields missing from the request are left untouched
    pub fn apply(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        let ProfileUpdate {
            first_name,
            last_name,
            title,
            bio,
            avatar,
            city,
            school,
            major,
            objective,
            social_links,
        } = update;

        fn merge(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }

        merge(&mut self.first_name, first_name);
        merge(&mut self.last_name, last_name);
        merge(&mut self.title, title);
        merge(&mut self.bio, bio);
        merge(&mut self.avatar, avatar);
        merge(&mut self.city, city);
        merge(&mut self.school, school);
        merge(&mut self.major, major);
        merge(&mut self.objective, objective);

        if let Some(links) = social_links {
            self.social_links = links;
        }
        self.updated_at = now;
    }
}

/// Request payload for `PUT /profiles/me`
///
/// # Example
/// ```json
/// {
///   "firstName": "An",
///   "title": "Backend Engineer",
///   "socialLinks": [{ "platform": "github", "url": "https://github.com/an" }]
/// }
/// ```
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub city: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    pub objective: Option<String>,
    pub social_links: Option<Vec<SocialLink>>,
}

/// Request payload for `POST /profiles/public/toggle`
#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub is_active: bool,
}

/// Profile fields safe to show to anonymous visitors
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub city: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    pub objective: Option<String>,
    pub social_links: Vec<SocialLink>,
}

impl From<Profile> for PublicProfileFields {
    fn from(profile: Profile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            title: profile.title,
            bio: profile.bio,
            avatar: profile.avatar,
            city: profile.city,
            school: profile.school,
            major: profile.major,
            objective: profile.objective,
            social_links: profile.social_links,
        }
    }
}

/// Read-only projection returned by the public lookup endpoints
///
/// Carries neither the share token nor the row id.
///
/// # Example
/// ```json
/// {
///   "userId": "u1",
///   "viewCount": 3,
///   "sharedAt": "2026-01-17T13:40:00Z",
///   "profile": { "firstName": "An", "socialLinks": [] }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileView {
    pub user_id: String,
    pub view_count: u64,
    pub shared_at: DateTime<Utc>,
    pub profile: PublicProfileFields,
}

impl PublicProfileView {
    pub fn new(record: &PublicProfile, profile: Profile) -> Self {
        Self {
            user_id: record.user_id.clone(),
            view_count: record.view_count,
            shared_at: record.shared_at,
            profile: profile.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_fields_missing_from_update() {
        let now = Utc::now();
        let mut profile = Profile::empty("p1".into(), "u1".into(), now);
        profile.bio = Some("old bio".into());

        profile.apply(
            ProfileUpdate {
                first_name: Some("An".into()),
                ..Default::default()
            },
            now,
        );

        assert_eq!(profile.first_name.as_deref(), Some("An"));
        assert_eq!(profile.bio.as_deref(), Some("old bio"));
    }

    #[test]
    fn view_serializes_without_token_or_id() {
        let now = Utc::now();
        let record = PublicProfile {
            id: "row".into(),
            user_id: "u1".into(),
            profile_id: "p1".into(),
            share_token: "secret".into(),
            is_active: true,
            view_count: 2,
            shared_at: now,
            updated_at: now,
        };
        let view = PublicProfileView::new(&record, Profile::empty("p1".into(), "u1".into(), now));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["viewCount"], 2);
        assert!(json.get("shareToken").is_none());
        assert!(json.get("id").is_none());
        assert!(json.get("isActive").is_none());
    }
}
