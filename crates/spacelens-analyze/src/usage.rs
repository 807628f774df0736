//! Sorting and usage classification of application records.

use std::cmp::Reverse;
use std::time::{Duration, SystemTime};

use itertools::Itertools;
use strum::{Display, EnumIter, EnumString};

use spacelens_core::ApplicationRecord;

/// Modified more than this many days ago counts as old.
pub const OLD_AFTER_DAYS: u64 = 365;
/// Modified at most this many days ago counts as recent.
pub const RECENT_WITHIN_DAYS: u64 = 30;
/// Last used more than this many days ago counts as stale.
pub const STALE_AFTER_DAYS: u64 = 180;

/// Ordering for application listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    /// Bundle size, largest first.
    #[default]
    Size,
    /// Creation time, newest first.
    Created,
    /// Modification time, newest first.
    Modified,
    /// Name, case-insensitive A-Z.
    Name,
}

impl SortKey {
    /// Sort records in place by this key.
    ///
    /// Missing timestamps sort as the earliest possible value.
    pub fn sort(self, apps: &mut [ApplicationRecord]) {
        match self {
            Self::Size => apps.sort_by_key(|a| Reverse(a.size)),
            Self::Created => apps.sort_by_key(|a| Reverse(a.created)),
            Self::Modified => apps.sort_by_key(|a| Reverse(a.modified)),
            Self::Name => apps.sort_by_cached_key(|a| a.name.to_lowercase()),
        }
    }
}

/// Sort by `key`, then keep at most `top` records.
pub fn sort_and_limit(
    mut apps: Vec<ApplicationRecord>,
    key: SortKey,
    top: Option<usize>,
) -> Vec<ApplicationRecord> {
    key.sort(&mut apps);
    if let Some(n) = top {
        apps.truncate(n);
    }
    apps
}

/// Whole days between `then` and `now`; times in the future count as 0.
pub fn days_between(then: SystemTime, now: SystemTime) -> u64 {
    now.duration_since(then)
        .unwrap_or(Duration::ZERO)
        .as_secs()
        / 86_400
}

/// Totals and usage buckets over a set of applications.
///
/// The buckets are independent: one application can appear in several.
/// Each bucket is sorted by bundle size, largest first.
#[derive(Debug, Clone)]
pub struct UsageSummary<'a> {
    pub app_count: usize,
    pub app_size: u64,
    pub data_size: u64,
    pub cache_size: u64,
    /// Not modified in more than a year.
    pub old: Vec<&'a ApplicationRecord>,
    /// Modified within the last 30 days.
    pub recent: Vec<&'a ApplicationRecord>,
    /// No recorded use at all.
    pub never_used: Vec<&'a ApplicationRecord>,
    /// Last used more than six months ago.
    pub stale: Vec<&'a ApplicationRecord>,
}

impl<'a> UsageSummary<'a> {
    /// Classify `apps` relative to `now`.
    pub fn classify(apps: &'a [ApplicationRecord], now: SystemTime) -> Self {
        let by_size = |bucket: Vec<&'a ApplicationRecord>| -> Vec<&'a ApplicationRecord> {
            bucket.into_iter().sorted_by_key(|a| Reverse(a.size)).collect()
        };

        let modified_days = |a: &ApplicationRecord| a.modified.map(|m| days_between(m, now));

        let old = apps
            .iter()
            .filter(|a| modified_days(*a).is_some_and(|d| d > OLD_AFTER_DAYS))
            .collect();
        let recent = apps
            .iter()
            .filter(|a| modified_days(*a).is_some_and(|d| d <= RECENT_WITHIN_DAYS))
            .collect();
        let never_used = apps.iter().filter(|a| a.is_never_used()).collect();
        let stale = apps
            .iter()
            .filter(|a| {
                a.last_used
                    .is_some_and(|t| days_between(t, now) > STALE_AFTER_DAYS)
            })
            .collect();

        Self {
            app_count: apps.len(),
            app_size: apps.iter().map(|a| a.size).sum(),
            data_size: apps.iter().map(|a| a.data_size).sum(),
            cache_size: apps.iter().map(|a| a.cache_size).sum(),
            old: by_size(old),
            recent: by_size(recent),
            never_used: by_size(never_used),
            stale: by_size(stale),
        }
    }

    /// Bundle, data and cache sizes combined.
    pub fn combined_size(&self) -> u64 {
        self.app_size + self.data_size + self.cache_size
    }

    /// Mean bundle size, 0 for an empty set.
    pub fn average_size(&self) -> u64 {
        match self.app_count {
            0 => 0,
            n => self.app_size / n as u64,
        }
    }

    /// Bundle sizes of the never-used applications.
    pub fn never_used_size(&self) -> u64 {
        self.never_used.iter().map(|a| a.size).sum()
    }

    /// Bundle sizes of the stale applications.
    pub fn stale_size(&self) -> u64 {
        self.stale.iter().map(|a| a.size).sum()
    }

    /// Bundle sizes of the old applications.
    pub fn old_size(&self) -> u64 {
        self.old.iter().map(|a| a.size).sum()
    }
}
