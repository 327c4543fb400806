use crate::PointAttributes;

/// One row of model features per route point.
pub type FeatureMatrix = Vec<Vec<f64>>;

/// Column names for daytime rows, in order.
pub const DAY_COLUMNS: [&str; 8] = [
    "speed_limit_mph",
    "ramp_count",
    "tree_count",
    "crosswalk_count",
    "sidewalk_width_ft",
    "sidewalk_slope_pct",
    "damage_ratio",
    "has_sidewalk_coverage",
];

/// Column names for night rows, in order. Lighting is only a model input
/// at night.
pub const NIGHT_COLUMNS: [&str; 9] = [
    "speed_limit_mph",
    "ramp_count",
    "tree_count",
    "lamp_count",
    "crosswalk_count",
    "sidewalk_width_ft",
    "sidewalk_slope_pct",
    "damage_ratio",
    "has_sidewalk_coverage",
];

/// Encode one point's attributes as a model row.
///
/// Returns `None` when width, slope or damage is unknown, since the model
/// cannot score incomplete rows. An unknown speed limit encodes as `0`.
///
/// # Examples
/// ```
/// use kerbside_core::PointAttributes;
/// use kerbside_core::safety::feature_row;
///
/// let attrs = PointAttributes {
///     sidewalk_width_ft: Some(6.0),
///     sidewalk_slope_pct: Some(2.0),
///     damage_ratio: Some(0.1),
///     has_sidewalk_coverage: true,
///     lamp_count: 2,
///     ..PointAttributes::default()
/// };
/// assert_eq!(feature_row(&attrs, false).map(|row| row.len()), Some(8));
/// assert_eq!(feature_row(&attrs, true).map(|row| row.len()), Some(9));
/// assert_eq!(feature_row(&PointAttributes::default(), false), None);
/// ```
#[must_use]
pub fn feature_row(attrs: &PointAttributes, is_night: bool) -> Option<Vec<f64>> {
    let width = attrs.sidewalk_width_ft?;
    let slope = attrs.sidewalk_slope_pct?;
    let damage = attrs.damage_ratio?;
    let mut row = vec![
        attrs.speed_limit_mph.unwrap_or(0.0),
        f64::from(attrs.ramp_count),
        f64::from(attrs.tree_count),
    ];
    if is_night {
        row.push(f64::from(attrs.lamp_count));
    }
    row.extend([
        f64::from(attrs.crosswalk_count),
        width,
        slope,
        damage,
        f64::from(u8::from(attrs.has_sidewalk_coverage)),
    ]);
    Some(row)
}

/// Encode every complete point as a model row, skipping the rest.
#[must_use]
pub fn feature_matrix(points: &[PointAttributes], is_night: bool) -> FeatureMatrix {
    points
        .iter()
        .filter_map(|attrs| feature_row(attrs, is_night))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn complete() -> PointAttributes {
        PointAttributes {
            speed_limit_mph: Some(30.0),
            ramp_count: 1,
            tree_count: 2,
            lamp_count: 3,
            crosswalk_count: 4,
            sidewalk_width_ft: Some(6.0),
            sidewalk_slope_pct: Some(2.5),
            damage_ratio: Some(0.1),
            has_sidewalk_coverage: true,
        }
    }

    #[rstest]
    fn night_rows_include_lighting(complete: PointAttributes) {
        assert_eq!(
            feature_row(&complete, true),
            Some(vec![30.0, 1.0, 2.0, 3.0, 4.0, 6.0, 2.5, 0.1, 1.0])
        );
        assert_eq!(
            feature_row(&complete, false),
            Some(vec![30.0, 1.0, 2.0, 4.0, 6.0, 2.5, 0.1, 1.0])
        );
    }

    #[rstest]
    fn column_names_match_row_width(complete: PointAttributes) {
        assert_eq!(feature_row(&complete, false).map(|r| r.len()), Some(DAY_COLUMNS.len()));
        assert_eq!(feature_row(&complete, true).map(|r| r.len()), Some(NIGHT_COLUMNS.len()));
    }

    #[rstest]
    fn incomplete_rows_are_excluded(complete: PointAttributes) {
        let missing_slope = PointAttributes {
            sidewalk_slope_pct: None,
            ..complete.clone()
        };
        let unknown_speed = PointAttributes {
            speed_limit_mph: None,
            ..complete.clone()
        };
        let matrix = feature_matrix(&[missing_slope, complete, unknown_speed], false);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.last().and_then(|row| row.first()), Some(&0.0));
    }
}
