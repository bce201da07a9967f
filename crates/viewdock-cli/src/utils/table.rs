use viewdock::engine::store::CollectionStore;

const MISSING: &str = "-";
const ID_HEADER: &str = "id";

/// Lays out the poses of `store` in its current order as right-aligned columns:
/// the pose id followed by every visible score field.
pub fn render_store(store: &CollectionStore, top: Option<usize>) -> String {
    let fields = store.visible_fields();
    let mut header: Vec<String> = vec![ID_HEADER.to_string()];
    header.extend(fields.iter().map(|f| f.to_string()));

    let rows: Vec<Vec<String>> = store
        .iter()
        .take(top.unwrap_or(usize::MAX))
        .map(|record| {
            let mut row = vec![record.id().to_string()];
            row.extend(fields.iter().map(|field| {
                record
                    .score(field)
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| MISSING.to_string())
            }));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            rows.iter()
                .map(|row| row[col].len())
                .chain(std::iter::once(header[col].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = width))
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out
}
