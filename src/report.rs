//! Ranked text reports over a finished [`TagCounter`].

use std::io;

use anyhow::Result;

use crate::counter::{tag_weight, KeyWeights, RoleCounts, TagCounter, TagCounts, SKIP_KEYS};

/// Rows printed by [`dump_tags`]: indexes 0 through 512.
pub const TAG_DUMP_LIMIT: usize = 513;
pub const KEY_WEIGHT_LIMIT: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedTag<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub count: u64,
    pub weight: u64,
}

/// All entries of `tags`, heaviest first. Equal weights keep map order.
pub fn weigh_tags(tags: &TagCounts) -> Vec<WeightedTag<'_>> {
    let mut weighted = tags
        .iter()
        .map(|((key, value), &count)| WeightedTag {
            key: key.as_str(),
            value: value.as_str(),
            count,
            weight: tag_weight(key, value) * count,
        })
        .collect::<Vec<_>>();
    weighted.sort_by(|a, b| b.weight.cmp(&a.weight));
    weighted
}

pub fn dump_tags(tags: &TagCounts, mut out: impl io::Write) -> Result<()> {
    for (num, tag) in weigh_tags(tags).iter().take(TAG_DUMP_LIMIT).enumerate() {
        writeln!(out, "{} {}={} ({})", num, tag.key, tag.value, tag.count)?;
    }
    Ok(())
}

/// The [`KEY_WEIGHT_LIMIT`] heaviest keys, in ascending weight order.
pub fn heaviest_keys(key_weights: &KeyWeights) -> Vec<(&str, u64)> {
    let mut worst = key_weights
        .iter()
        .map(|(key, &weight)| (key.as_str(), weight))
        .collect::<Vec<_>>();
    worst.sort_by_key(|&(_, weight)| weight);
    let skip = worst.len().saturating_sub(KEY_WEIGHT_LIMIT);
    worst.split_off(skip)
}

pub fn write_key_weights(key_weights: &KeyWeights, mut out: impl io::Write) -> Result<()> {
    for (key, weight) in heaviest_keys(key_weights) {
        writeln!(out, "{} {}", key, weight)?;
    }
    Ok(())
}

pub fn role_counts(roles: &RoleCounts) -> Vec<(&str, u64)> {
    let mut counts = roles
        .iter()
        .map(|(role, &count)| (role.as_str(), count))
        .collect::<Vec<_>>();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn write_role_counts(roles: &RoleCounts, mut out: impl io::Write) -> Result<()> {
    for (role, count) in role_counts(roles) {
        writeln!(out, "{} {}", role, count)?;
    }
    Ok(())
}

pub fn write(counter: &TagCounter, mut out: impl io::Write) -> Result<()> {
    writeln!(out, "KEY WEIGHTS")?;
    write_key_weights(&counter.key_weights, &mut out)?;
    writeln!(out, "NODES")?;
    dump_tags(&counter.node_tags, &mut out)?;
    writeln!(out, "WAYS")?;
    dump_tags(&counter.way_tags, &mut out)?;
    writeln!(out, "AVOID")?;
    writeln!(out, "{:?}", SKIP_KEYS)?;
    write_role_counts(&counter.role_weights, &mut out)?;
    out.flush()?;
    Ok(())
}
