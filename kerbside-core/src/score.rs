//! Weighted route scores and ranking.
//!
//! Scores are raw weighted sums. They are not normalised by route length,
//! so longer routes accumulate more opportunities for issues.

use crate::{Issue, IssueWeights, RouteAnalysis};

/// Sum the configured weight of every issue. Lower is more accessible.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kerbside_core::{Issue, IssueKind, IssueWeights, score};
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let issues = [
///     Issue::new(0, origin, IssueKind::NarrowSidewalk, Some(4.0)),
///     Issue::new(0, origin, IssueKind::PoorLighting, Some(0.0)),
/// ];
/// let weights = IssueWeights::default();
/// assert_eq!(score(&issues, &weights), weights.narrow_sidewalk + weights.poor_lighting);
/// ```
#[must_use]
pub fn score(issues: &[Issue], weights: &IssueWeights) -> f64 {
    issues.iter().map(|issue| weights.weight(issue.kind)).sum()
}

/// Order analyses by ascending score and keep the first `k`.
///
/// The sort is stable, so equal scores keep their input order, and the
/// result is a pure function of the input.
///
/// # Examples
/// ```
/// use kerbside_core::{Route, RouteAnalysis, rank};
///
/// let mut worse = RouteAnalysis::empty(Route::default());
/// worse.score = 12.0;
/// let mut better = RouteAnalysis::empty(Route::default());
/// better.score = 4.0;
///
/// let ranked = rank(vec![worse, better], 1);
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked.first().map(|a| a.score), Some(4.0));
/// ```
#[must_use]
pub fn rank(mut analyses: Vec<RouteAnalysis>, k: usize) -> Vec<RouteAnalysis> {
    analyses.sort_by(|a, b| a.score.total_cmp(&b.score));
    analyses.truncate(k);
    analyses
}
