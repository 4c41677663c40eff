use crate::model::Placed;

/// Row-major reading order.
///
/// Elements are taken top to bottom; one joins the current row when its top
/// is within `row_threshold` of the previous row member's top. Rows are then
/// ordered left to right.
pub fn sort_by_position<T: Placed>(mut items: Vec<T>, row_threshold: f64) -> Vec<T> {
    items.sort_by(|a, b| a.rect().top.total_cmp(&b.rect().top));

    let mut rows: Vec<Vec<T>> = Vec::new();
    let mut last_top: Option<f64> = None;

    for item in items {
        let top = item.rect().top;
        let same_row = matches!(last_top, Some(prev) if (top - prev).abs() <= row_threshold);
        match rows.last_mut() {
            Some(row) if same_row => row.push(item),
            _ => rows.push(vec![item]),
        }
        last_top = Some(top);
    }

    rows.into_iter()
        .flat_map(|mut row| {
            row.sort_by(|a, b| a.rect().left.total_cmp(&b.rect().left));
            row
        })
        .collect()
}
