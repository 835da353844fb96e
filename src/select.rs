//! Picks the best JVM out of the registry.
//!
//! Filtering happens in two tiers: the hard rules are applied first, and if
//! at least one candidate survives, the preferred rules narrow the list
//! further — unless they would empty it, in which case they are dropped
//! with an informational message.
//!
//! Candidates are ranked by specification version, newest first. Ties are
//! broken by comparing home directories in descending lexicographic order;
//! the tie-break is deterministic but does not reflect any real priority
//! between equal-version installations.

use crate::jvm::Jvm;
use crate::log::Logger;
use crate::rules::SelectionRules;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Returns the best-matching JVM, or `None` when nothing satisfies the
/// hard rules. "No match" is a normal outcome, not an error.
pub fn select(
    rules: &SelectionRules,
    jvms: &BTreeMap<PathBuf, Jvm>,
    logger: &Logger,
) -> Option<Jvm> {
    let mut candidates = select_candidates(rules, jvms, logger);
    if candidates.is_empty() {
        return None;
    }
    let selected = candidates.remove(0);
    log_jvm_list("[SELECTED]", std::slice::from_ref(&selected), logger);
    Some(selected)
}

/// Returns every matching JVM ranked best-first, logging each considered
/// record as `[CANDIDATE]` or `[IGNORED]`.
pub fn select_candidates(
    rules: &SelectionRules,
    jvms: &BTreeMap<PathBuf, Jvm>,
    logger: &Logger,
) -> Vec<Jvm> {
    let all: Vec<Jvm> = jvms.values().cloned().collect();
    let (mut candidates, mut ignored) = filter_jvm_list(rules, all, logger);
    sort_jvms(&mut ignored);
    sort_jvms(&mut candidates);
    log_jvm_list("[IGNORED]", &ignored, logger);
    log_jvm_list("[CANDIDATE]", &candidates, logger);
    candidates
}

fn filter_jvm_list(
    rules: &SelectionRules,
    jvms: Vec<Jvm>,
    logger: &Logger,
) -> (Vec<Jvm>, Vec<Jvm>) {
    let (candidates, mut ignored): (Vec<Jvm>, Vec<Jvm>) = jvms
        .into_iter()
        .partition(|jvm| rules.matches(jvm, logger));

    if !candidates.is_empty()
        && let Some(preferred) = &rules.preferred
    {
        let (preferred_candidates, preferred_ignored) =
            filter_jvm_list(preferred, candidates.clone(), logger);
        if !preferred_candidates.is_empty() {
            ignored.extend(preferred_ignored);
            return (preferred_candidates, ignored);
        }
        logger.info(format!(
            "Unable to satisfy preferred selection rules {preferred}, ignoring them"
        ));
    }
    (candidates, ignored)
}

fn sort_jvms(jvms: &mut [Jvm]) {
    jvms.sort_by(|a, b| {
        b.java_specification_version
            .cmp(&a.java_specification_version)
            .then_with(|| b.java_home.cmp(&a.java_home))
    });
}

fn log_jvm_list(tag: &str, jvms: &[Jvm], logger: &Logger) {
    // Worst first, so the winning record is the last line printed.
    for jvm in jvms.iter().rev() {
        logger.info(format!(
            "{tag:<12} {:>3}: {}",
            jvm.java_specification_version,
            jvm.java_home.display()
        ));
    }
}
