use crate::lots::LotTable;
use crate::record::LotRecord;

/// Sort key for allowed lots the table has no priority for.
pub const FALLBACK_PRIORITY: u32 = 999;

/// Drops records outside the allow-list and orders the rest by lot priority.
///
/// The sort is stable, so records sharing a priority (including every
/// unmapped lot) keep their input order.
#[must_use]
pub fn filter_and_sort(candidates: Vec<LotRecord>, lots: &LotTable) -> Vec<LotRecord> {
    let mut kept: Vec<LotRecord> = candidates
        .into_iter()
        .filter(|r| lots.allows(&r.lot_id))
        .collect();
    kept.sort_by_key(|r| lots.priority(&r.lot_id).unwrap_or(FALLBACK_PRIORITY));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, pct: u8) -> LotRecord {
        LotRecord::from_key(id, pct)
    }

    fn ids(records: &[LotRecord]) -> Vec<(&str, u8)> {
        records
            .iter()
            .map(|r| (r.lot_id.as_str(), r.occupancy_pct))
            .collect()
    }

    #[test]
    fn drops_lots_outside_allow_list() {
        let out = filter_and_sort(vec![rec("Z", 1), rec("G", 2), rec("", 3)], &LotTable::default());
        assert_eq!(ids(&out), vec![("G", 2)]);
    }

    #[test]
    fn orders_by_priority_g_h_j_m() {
        let out = filter_and_sort(
            vec![rec("M", 1), rec("J", 2), rec("G", 3), rec("H", 4)],
            &LotTable::default(),
        );
        assert_eq!(ids(&out), vec![("G", 3), ("H", 4), ("J", 2), ("M", 1)]);
    }

    #[test]
    fn unmapped_allowed_lots_sort_last_in_input_order() {
        let table = LotTable::default()
            .with_allowed(["G", "H", "J", "M", "K", "A"])
            .unwrap();
        let out = filter_and_sort(
            vec![rec("K", 1), rec("M", 2), rec("A", 3), rec("G", 4)],
            &table,
        );
        assert_eq!(ids(&out), vec![("G", 4), ("M", 2), ("K", 1), ("A", 3)]);
    }

    #[test]
    fn duplicate_ids_keep_input_order() {
        let out = filter_and_sort(
            vec![rec("H", 10), rec("G", 20), rec("H", 30)],
            &LotTable::default(),
        );
        assert_eq!(ids(&out), vec![("G", 20), ("H", 10), ("H", 30)]);
    }

    #[test]
    fn sorted_filtered_input_is_unchanged() {
        let input = vec![rec("G", 1), rec("H", 2), rec("M", 3)];
        let out = filter_and_sort(input.clone(), &LotTable::default());
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(filter_and_sort(Vec::new(), &LotTable::default()).is_empty());
    }
}
