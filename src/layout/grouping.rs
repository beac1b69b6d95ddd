use crate::ir::DetectedComponent;

/// Sweeps components top to bottom, pulling everything whose vertical centre lies within
/// `tolerance` of the current anchor into one row. Rows come back ordered top to bottom with
/// members ordered left to right.
pub fn group_spatially(
    components: &[DetectedComponent],
    tolerance: f32,
) -> Vec<Vec<DetectedComponent>> {
    let mut remaining: Vec<DetectedComponent> = components.to_vec();
    remaining.sort_by(|a, b| a.rect.center_y().total_cmp(&b.rect.center_y()));

    let mut rows = Vec::new();
    while !remaining.is_empty() {
        let anchor = remaining.remove(0);
        let anchor_y = anchor.rect.center_y();
        let (mut row, rest): (Vec<_>, Vec<_>) = remaining
            .into_iter()
            .partition(|c| (c.rect.center_y() - anchor_y).abs() <= tolerance);
        row.insert(0, anchor);
        row.sort_by(|a, b| a.rect.center_x().total_cmp(&b.rect.center_x()));
        rows.push(row);
        remaining = rest;
    }
    rows
}
