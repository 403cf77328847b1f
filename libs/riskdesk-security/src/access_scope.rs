use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AccountId, LocationId};

/// The kind of record a [`Scope`] anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    /// Scope id is an account id.
    Account,
    /// Scope id is a location id.
    Location,
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => f.write_str("account"),
            Self::Location => f.write_str("location"),
        }
    }
}

/// Where a granted role or permission applies: an `(scope_type, scope_id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scope {
    pub scope_type: ScopeType,
    pub scope_id: i64,
}

impl Scope {
    #[must_use]
    pub const fn account(id: AccountId) -> Self {
        Self {
            scope_type: ScopeType::Account,
            scope_id: id,
        }
    }

    #[must_use]
    pub const fn location(id: LocationId) -> Self {
        Self {
            scope_type: ScopeType::Location,
            scope_id: id,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope_type, self.scope_id)
    }
}

/// The union of scopes a principal holds for one permission.
///
/// Duplicates collapse and iteration order is irrelevant to callers (it is
/// sorted, which keeps logs and JSON output stable). An empty set means the
/// principal holds the permission nowhere.
///
/// Ids are passed through as stored: nothing here checks that a scoped
/// account or location still exists.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use riskdesk_security::{Scope, ScopeSet, ScopeType};
///
/// let scopes: ScopeSet = [Scope::account(7), Scope::location(42), Scope::account(7)]
///     .into_iter()
///     .collect();
/// assert_eq!(scopes.len(), 2);
/// assert_eq!(scopes.account_ids(), BTreeSet::from([7]));
/// assert_eq!(scopes.filter_by_type(ScopeType::Location), BTreeSet::from([42]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet {
    scopes: BTreeSet<Scope>,
}

impl ScopeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scope: Scope) -> bool {
        self.scopes.insert(scope)
    }

    #[must_use]
    pub fn contains(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    /// Project the set onto one scope type, dropping the type tag.
    #[must_use]
    pub fn filter_by_type(&self, scope_type: ScopeType) -> BTreeSet<i64> {
        self.scopes
            .iter()
            .filter(|s| s.scope_type == scope_type)
            .map(|s| s.scope_id)
            .collect()
    }

    /// Ids of every account-typed scope.
    #[must_use]
    pub fn account_ids(&self) -> BTreeSet<AccountId> {
        self.filter_by_type(ScopeType::Account)
    }

    /// Ids of every location-typed scope.
    #[must_use]
    pub fn location_ids(&self) -> BTreeSet<LocationId> {
        self.filter_by_type(ScopeType::Location)
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().collect(),
        }
    }
}

impl Extend<Scope> for ScopeSet {
    fn extend<I: IntoIterator<Item = Scope>>(&mut self, iter: I) {
        self.scopes.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ScopeSet {
    type Item = &'a Scope;
    type IntoIter = std::collections::btree_set::Iter<'a, Scope>;

    fn into_iter(self) -> Self::IntoIter {
        self.scopes.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn filter_drops_other_type() {
        let set: ScopeSet = [Scope::account(1), Scope::location(1), Scope::account(3)]
            .into_iter()
            .collect();

        assert_eq!(set.account_ids().into_iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(set.location_ids().into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn same_id_different_type_are_distinct() {
        let set: ScopeSet = [Scope::account(5), Scope::location(5)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Scope::account(5)));
        assert!(set.contains(&Scope::location(5)));
    }

    #[test]
    fn empty_set_projects_to_empty() {
        let set = ScopeSet::new();
        assert!(set.is_empty());
        assert!(set.account_ids().is_empty());
        assert!(set.location_ids().is_empty());
    }

    #[test]
    fn serializes_as_plain_list() {
        let set: ScopeSet = [Scope::location(42)].into_iter().collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "scope_type": "location", "scope_id": 42 }])
        );
    }

    #[test]
    fn scope_display() {
        assert_eq!(Scope::account(7).to_string(), "account:7");
        assert_eq!(Scope::location(42).to_string(), "location:42");
    }
}
