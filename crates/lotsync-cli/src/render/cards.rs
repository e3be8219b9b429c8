use lotsync_core::{LotRecord, LotTable, OccupancyBucket, Thresholds};

/// Renders one status card per record, in list order. With `color`, the
/// bucket tag is painted in the bucket's palette colour.
pub(crate) fn render_cards(
    records: &[LotRecord],
    lots: &LotTable,
    thresholds: &Thresholds,
    color: bool,
) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&render_card(record, lots, thresholds, color));
        out.push('\n');
    }
    out
}

fn render_card(record: &LotRecord, lots: &LotTable, thresholds: &Thresholds, color: bool) -> String {
    let bucket = thresholds.bucket(record.occupancy_pct);
    let tag = format!("[{} / {}]", bucket.label().to_uppercase(), bucket.color_name());
    let tag = if color { paint(bucket, &tag) } else { tag };
    let mut card = format!(
        "{}\n  {:>3}% occupied  {tag}\n",
        lots.display_name(&record.lot_id),
        record.occupancy_pct,
    );
    if let (Some(available), Some(capacity)) = (record.available_spaces, record.capacity) {
        card.push_str(&format!("  {available}/{capacity} spaces free\n"));
    }
    card
}

/// Wraps `text` in a 24-bit ANSI foreground colour taken from the bucket's
/// hex colour. Falls back to plain text if the hex value does not parse.
fn paint(bucket: OccupancyBucket, text: &str) -> String {
    match rgb(bucket.hex_color()) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        None => text.to_string(),
    }
}

fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
