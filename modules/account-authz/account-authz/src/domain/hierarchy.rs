//! Bounded walks over the account forest.
//!
//! The directory is expected to hold a forest (one parent per account, no
//! cycles) but nothing enforces it, so every walk tracks visited ids and
//! stops after `max_hierarchy_depth` levels.

use std::collections::{BTreeSet, HashSet, VecDeque};

use account_authz_sdk::{AccountDirectoryPluginClient, AccountInfo, AnchorPolicy};
use riskdesk_security::AccountId;
use tracing::{debug, warn};

use super::error::DomainError;
use crate::config::AccountAuthzConfig;

pub(super) struct Hierarchy<'a> {
    directory: &'a dyn AccountDirectoryPluginClient,
    max_depth: usize,
    strict: bool,
}

impl<'a> Hierarchy<'a> {
    pub(super) fn new(
        directory: &'a dyn AccountDirectoryPluginClient,
        config: &AccountAuthzConfig,
    ) -> Self {
        Self {
            directory,
            max_depth: config.max_hierarchy_depth,
            strict: config.strict_hierarchy,
        }
    }

    /// Load an account that must exist.
    pub(super) async fn load(&self, id: AccountId) -> Result<AccountInfo, DomainError> {
        self.directory
            .get_account(id)
            .await?
            .ok_or(DomainError::AccountNotFound(id))
    }

    /// Walk from `start` up to its root and return the first account that is
    /// in `anchors` and admitted by `policy`.
    ///
    /// A root (no parent) ends the walk after checking itself. A parent id
    /// that does not resolve ends it the same way.
    pub(super) async fn find_ancestor_anchor(
        &self,
        start: &AccountInfo,
        anchors: &BTreeSet<AccountId>,
        policy: AnchorPolicy,
    ) -> Result<Option<AccountId>, DomainError> {
        let mut visited = HashSet::new();
        let mut current = start.clone();

        for _ in 0..=self.max_depth {
            if !visited.insert(current.id) {
                return self.give_up(current.id, "cycle in parent chain");
            }
            if anchors.contains(&current.id) && policy.admits(current.deactivated) {
                debug!(target_account = start.id, anchor = current.id, "ancestor anchor found");
                return Ok(Some(current.id));
            }
            let Some(parent_id) = current.parent_account_id else {
                return Ok(None);
            };
            current = match self.directory.get_account(parent_id).await? {
                Some(parent) => parent,
                None => {
                    warn!(
                        account_id = current.id,
                        parent_account_id = parent_id,
                        "parent account missing, ending walk"
                    );
                    return Ok(None);
                }
            };
        }

        self.give_up(current.id, "depth limit exceeded")
    }

    /// Breadth-first walk from `start` down through its descendants; return
    /// the first account that is in `anchors` and admitted by `policy`.
    ///
    /// Like the upward walk, a chain of `max_depth + 1` levels is accepted;
    /// only a node at the cap that still has children gives up.
    pub(super) async fn find_descendant_anchor(
        &self,
        start: &AccountInfo,
        anchors: &BTreeSet<AccountId>,
        policy: AnchorPolicy,
    ) -> Result<Option<AccountId>, DomainError> {
        let mut visited = HashSet::from([start.id]);
        let mut queue = VecDeque::from([(start.clone(), 0_usize)]);

        while let Some((account, depth)) = queue.pop_front() {
            if anchors.contains(&account.id) && policy.admits(account.deactivated) {
                debug!(target_account = start.id, anchor = account.id, "descendant anchor found");
                return Ok(Some(account.id));
            }
            let children = self.directory.get_child_accounts(account.id).await?;
            if depth >= self.max_depth && !children.is_empty() {
                self.give_up::<()>(account.id, "depth limit exceeded")?;
                continue;
            }
            for child in children {
                if !visited.insert(child.id) {
                    self.give_up::<()>(child.id, "account reachable twice")?;
                    continue;
                }
                queue.push_back((child, depth + 1));
            }
        }

        Ok(None)
    }

    /// `roots` plus every account below them. Roots that nest inside one
    /// another are covered once.
    pub(super) async fn subtree_ids(
        &self,
        roots: &[AccountId],
    ) -> Result<BTreeSet<AccountId>, DomainError> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<(AccountId, usize)> = roots.iter().map(|id| (*id, 0)).collect();

        while let Some((id, depth)) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            let children = self.directory.get_child_accounts(id).await?;
            if depth >= self.max_depth && !children.is_empty() {
                self.give_up::<()>(id, "depth limit exceeded")?;
                continue;
            }
            for child in children {
                queue.push_back((child.id, depth + 1));
            }
        }

        Ok(seen)
    }

    /// Malformed hierarchy: an error in strict mode, otherwise "no match".
    fn give_up<T: Default>(&self, account_id: AccountId, reason: &'static str) -> Result<T, DomainError> {
        if self.strict {
            return Err(DomainError::MalformedHierarchy { account_id, reason });
        }
        warn!(account_id, reason, "malformed account hierarchy, walk stopped");
        Ok(T::default())
    }
}
