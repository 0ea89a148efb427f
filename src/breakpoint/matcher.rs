use crate::breakpoint::{BreakpointIndex, BreakpointRecord, MatchWindow};

/// Window-bound view over an index that returns matches in a stable order.
///
/// Results are ascending by id, so "smallest id wins" policies downstream are
/// reproducible across runs.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'i, 'a> {
    index: &'i BreakpointIndex<'a>,
    window: MatchWindow,
}

impl<'i, 'a> Matcher<'i, 'a> {
    /// Bind an index to a window.
    pub fn new(index: &'i BreakpointIndex<'a>, window: MatchWindow) -> Self {
        Self { index, window }
    }

    /// Window used for every query.
    pub fn window(&self) -> MatchWindow {
        self.window
    }

    /// Ids matching `record`, ascending lexicographically.
    pub fn matches(&self, record: &BreakpointRecord) -> Vec<&'a str> {
        self.index.query(record, self.window).into_iter().collect()
    }
}

/// One-shot form of [`Matcher::matches`].
pub fn match_record<'a>(
    index: &BreakpointIndex<'a>,
    record: &BreakpointRecord,
    window: MatchWindow,
) -> Vec<&'a str> {
    Matcher::new(index, window).matches(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::Strand;

    fn record(id: &str, pos_1: u64, pos_2: u64) -> BreakpointRecord {
        BreakpointRecord::builder()
            .id(id)
            .caller("test")
            .first("1", pos_1, Strand::Plus)
            .second("1", pos_2, Strand::Minus)
            .build()
            .unwrap()
    }

    #[test]
    fn matches_are_sorted_by_id_not_input_order() {
        let records = vec![
            record("zeta", 100, 900),
            record("alpha", 110, 905),
            record("mu", 95, 880),
        ];
        let index = BreakpointIndex::build(&records).unwrap();

        let hits = match_record(&index, &records[0], MatchWindow::new(50));
        assert_eq!(hits, vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn ids_compare_as_strings() {
        let records = vec![record("10", 100, 900), record("9", 100, 900)];
        let index = BreakpointIndex::build(&records).unwrap();

        let matcher = Matcher::new(&index, MatchWindow::new(0));
        assert_eq!(matcher.window(), MatchWindow::new(0));
        assert_eq!(matcher.matches(&records[1]), vec!["10", "9"]);
    }
}
