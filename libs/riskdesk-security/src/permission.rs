//! Permission identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named capability that can be granted directly or through a role.
///
/// The set is closed: every permission a controller gates on is listed here,
/// and the wire name (`Display` / serde) is the kebab-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    Certificates,
    Claims,
    Contracts,
    Entities,
    Forum,
    ForumAdmin,
    ImpersonateAdmin,
    ImpersonateUser,
    LocationCreate,
    LocationEdit,
    ManageAccountAdmins,
    ManageAccounts,
    ManageDocumentLibrary,
    ManageFaqs,
    ManageOwnAccount,
    ManageTutorials,
    ManageUsers,
    ShareDocuments,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Certificates,
        Self::Claims,
        Self::Contracts,
        Self::Entities,
        Self::Forum,
        Self::ForumAdmin,
        Self::ImpersonateAdmin,
        Self::ImpersonateUser,
        Self::LocationCreate,
        Self::LocationEdit,
        Self::ManageAccountAdmins,
        Self::ManageAccounts,
        Self::ManageDocumentLibrary,
        Self::ManageFaqs,
        Self::ManageOwnAccount,
        Self::ManageTutorials,
        Self::ManageUsers,
        Self::ShareDocuments,
    ];

    /// The wire name, e.g. `"manage-accounts"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Certificates => "certificates",
            Self::Claims => "claims",
            Self::Contracts => "contracts",
            Self::Entities => "entities",
            Self::Forum => "forum",
            Self::ForumAdmin => "forum-admin",
            Self::ImpersonateAdmin => "impersonate-admin",
            Self::ImpersonateUser => "impersonate-user",
            Self::LocationCreate => "location-create",
            Self::LocationEdit => "location-edit",
            Self::ManageAccountAdmins => "manage-account-admins",
            Self::ManageAccounts => "manage-accounts",
            Self::ManageDocumentLibrary => "manage-document-library",
            Self::ManageFaqs => "manage-faqs",
            Self::ManageOwnAccount => "manage-own-account",
            Self::ManageTutorials => "manage-tutorials",
            Self::ManageUsers => "manage-users",
            Self::ShareDocuments => "share-documents",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a permission name that is not in [`Permission::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_owned()))
    }
}
