//! User model for storage and API.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::hobby;

/// User profile stored in Firestore.
///
/// The document ID is the locally generated `id`; the Google subject ID and
/// email are additionally tracked in index collections to keep them unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Local user ID (UUID v4, also the document ID)
    pub id: String,
    /// Google subject ID from the verified identity token
    pub google_id: String,
    /// Email address (unique, lowercased)
    pub email: String,
    /// Display name
    pub name: String,
    /// Profile picture URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    /// Short free-form bio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Hobby tags, each drawn from [`hobby::HOBBIES`]
    #[serde(default)]
    pub hobbies: Vec<String>,
    /// When the user first signed up (RFC 3339)
    pub created_at: String,
    /// Last profile update (RFC 3339)
    pub updated_at: String,
}

/// Index document mapping a Google subject ID to the owning user.
///
/// Keyed by the Google subject ID; created with insert semantics so a
/// concurrent duplicate sign-up fails at the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub user_id: String,
    pub email: String,
}

/// Index document mapping an email address to the owning user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRecord {
    pub user_id: String,
}

/// Profile update request body for `PATCH /user`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(custom(function = "validate_hobbies"))]
    pub hobbies: Option<Vec<String>>,
    #[validate(length(min = 1, message = "Profile picture must not be empty"))]
    pub profile_picture: Option<String>,
}

fn validate_hobbies(hobbies: &Vec<String>) -> Result<(), validator::ValidationError> {
    if hobbies.iter().all(|h| hobby::is_valid_hobby(h)) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("hobbies")
            .with_message("Hobby must be in the available hobbies list".into()))
    }
}

impl User {
    /// Apply a validated profile update, bumping `updated_at`.
    pub fn apply_update(&mut self, update: UpdateProfileRequest, now: &str) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio.trim().to_string());
        }
        if let Some(hobbies) = update.hobbies {
            self.hobbies = hobbies;
        }
        if let Some(picture) = update.profile_picture {
            self.profile_picture = Some(picture);
        }
        self.updated_at = now.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn update(hobbies: Option<Vec<String>>, bio: Option<String>) -> UpdateProfileRequest {
        UpdateProfileRequest {
            name: None,
            bio,
            hobbies,
            profile_picture: None,
        }
    }

    #[test]
    fn test_update_accepts_known_hobbies() {
        let req = update(
            Some(vec!["Reading".to_string(), "Hiking".to_string()]),
            None,
        );
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_rejects_unknown_hobby() {
        let req = update(Some(vec!["Underwater basket weaving".to_string()]), None);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_rejects_oversized_bio() {
        let req = update(None, Some("x".repeat(501)));
        assert!(req.validate().is_err());

        let req = update(None, Some("x".repeat(500)));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_hobby_list_is_valid() {
        let req = update(Some(vec![]), None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_apply_update_bumps_timestamp() {
        let mut user = User {
            id: "u1".to_string(),
            google_id: "g1".to_string(),
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            profile_picture: None,
            bio: None,
            hobbies: vec![],
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            updated_at: "2026-01-01T00:00:00+00:00".to_string(),
        };

        user.apply_update(
            update(Some(vec!["Cooking".to_string()]), Some("hello".to_string())),
            "2026-02-01T00:00:00+00:00",
        );

        assert_eq!(user.hobbies, vec!["Cooking".to_string()]);
        assert_eq!(user.bio.as_deref(), Some("hello"));
        assert_eq!(user.updated_at, "2026-02-01T00:00:00+00:00");
    }
}
