//! Out-of-band consistency repair between tab records and owner indexes.
//!
//! Tab creation and removal write the owner's index and the tab record separately, so a
//! crash can leave them disagreeing. The repair pass reconciles them from the tab records,
//! which are treated as authoritative. It is never run automatically.

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use super::{Namespace, RecordStore, Tab, TabId, User};
use crate::Result;

/// What a repair pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RepairReport {
    /// Users whose index was examined
    pub users_checked: usize,
    /// Index entries dropped because the tab record is missing
    pub dangling_removed: usize,
    /// Index entries dropped because the tab belongs to another user
    pub foreign_removed: usize,
    /// Repeated index entries dropped
    pub duplicates_removed: usize,
    /// Tabs appended to their owner's index because the entry was missing
    pub reattached: usize,
    /// Tabs deleted because their owner no longer exists
    pub orphans_deleted: usize,
}

impl RepairReport {
    /// Whether the pass found nothing to fix.
    pub fn is_clean(&self) -> bool {
        self.dangling_removed == 0
            && self.foreign_removed == 0
            && self.duplicates_removed == 0
            && self.reattached == 0
            && self.orphans_deleted == 0
    }
}

impl RecordStore {
    /// Reconciles every user's tab index with the tab records.
    ///
    /// For each user, under that user's lock: entries pointing at missing tabs or at tabs
    /// owned by someone else are dropped, duplicates are collapsed to their first
    /// occurrence, and tabs owned by the user but absent from the index are appended.
    /// Tabs whose owner does not exist are deleted.
    ///
    /// Intended for maintenance windows; tabs created while the pass runs may be
    /// reported as orphans if their owner is created after the user scan.
    pub fn repair(&self) -> Result<RepairReport> {
        let mut report = RepairReport::default();

        let tabs: HashMap<TabId, Tab> = self
            .scan::<Tab>()?
            .map(|tab| tab.map(|tab| (tab.id, tab)))
            .collect::<Result<_>>()?;

        let mut owned: HashMap<&str, Vec<TabId>> = HashMap::new();
        for tab in tabs.values() {
            owned.entry(tab.owner.as_str()).or_default().push(tab.id);
        }
        for ids in owned.values_mut() {
            ids.sort();
        }

        let users = self.get_users()?;
        let names: HashSet<&str> = users.iter().map(|u| u.name.as_str()).collect();

        for user in &users {
            report.users_checked += 1;
            let owned_ids = owned.get(user.name.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            self.inner.owner_locks.with_owner(&user.name, || {
                // Re-read under the lock; the scanned copy may be stale.
                let mut current: User = match self.get_user(&user.name) {
                    Ok(user) => user,
                    Err(e) if e.is_not_found() => return Ok(()),
                    Err(e) => return Err(e),
                };
                let fixed = reconcile(&current, &tabs, owned_ids, &mut report);
                if fixed != current.tabs {
                    warn!(
                        user = %current.name,
                        before = current.tabs.len(),
                        after = fixed.len(),
                        "repairing tab index"
                    );
                    current.tabs = fixed;
                    self.put_record(&current)?;
                }
                Ok(())
            })?;
        }

        for tab in tabs.values() {
            if names.contains(tab.owner.as_str()) {
                continue;
            }
            // The owner may have been created since the scan.
            let deleted = self.inner.owner_locks.with_owner(&tab.owner, || {
                match self.get_user(&tab.owner) {
                    Ok(_) => return Ok(false),
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
                warn!(tab = %tab.id, owner = %tab.owner, "deleting tab with missing owner");
                self.delete(Namespace::Tabs, &tab.id.to_string())?;
                Ok(true)
            })?;
            if deleted {
                report.orphans_deleted += 1;
            }
        }

        info!(?report, "repair pass finished");
        Ok(report)
    }
}

fn reconcile(
    user: &User,
    tabs: &HashMap<TabId, Tab>,
    owned_ids: &[TabId],
    report: &mut RepairReport,
) -> Vec<TabId> {
    let mut seen = HashSet::new();
    let mut fixed = Vec::with_capacity(user.tabs.len());

    for id in &user.tabs {
        match tabs.get(id) {
            None => report.dangling_removed += 1,
            Some(tab) if tab.owner != user.name => report.foreign_removed += 1,
            Some(_) if !seen.insert(*id) => report.duplicates_removed += 1,
            Some(_) => fixed.push(*id),
        }
    }

    for id in owned_ids {
        if seen.insert(*id) {
            fixed.push(*id);
            report.reattached += 1;
        }
    }

    fixed
}
