use std::fmt;

/// What a join run did with each resonance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub resonances: usize,
    pub contributing: usize,
    pub skipped_no_match: usize,
    pub skipped_missing_file: usize,
    pub skipped_underpopulated: usize,
    /// Rows in the full joined dataset, before any cap.
    pub rows: usize,
    pub from_cache: bool,
}

impl JoinReport {
    /// Resonances dropped because their libration data is absent or thin.
    pub fn skipped_for_missing_data(&self) -> usize {
        self.skipped_missing_file + self.skipped_underpopulated
    }

    /// Summary at `info`, plus a warning when libration data was missing.
    pub fn log_summary(&self) {
        log::info!("Resonance join: {self}");
        if self.skipped_for_missing_data() > 0 {
            log::warn!(
                "{} resonances skipped for missing or under-populated libration files",
                self.skipped_for_missing_data()
            );
        }
    }

    /// Resonance counts as `key=value` pairs, as stored in a cache header.
    pub fn header_fields(&self) -> String {
        format!(
            "resonances={} contributing={} no_match={} missing_file={} underpopulated={}",
            self.resonances,
            self.contributing,
            self.skipped_no_match,
            self.skipped_missing_file,
            self.skipped_underpopulated
        )
    }

    /// Inverse of [`header_fields`](Self::header_fields). `rows` and
    /// `from_cache` are left for the caller to fill in.
    pub fn from_header_fields(fields: &str) -> Option<Self> {
        let mut report = JoinReport::default();
        for pair in fields.split_whitespace() {
            let (key, value) = pair.split_once('=')?;
            let value: usize = value.parse().ok()?;
            match key {
                "resonances" => report.resonances = value,
                "contributing" => report.contributing = value,
                "no_match" => report.skipped_no_match = value,
                "missing_file" => report.skipped_missing_file = value,
                "underpopulated" => report.skipped_underpopulated = value,
                _ => {}
            }
        }
        Some(report)
    }
}

impl fmt::Display for JoinReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = if self.from_cache { " (cached)" } else { "" };
        write!(
            f,
            "{} rows{source} from {}/{} resonances (skipped: {} without asteroids, {} without libration file, {} under-populated)",
            self.rows,
            self.contributing,
            self.resonances,
            self.skipped_no_match,
            self.skipped_missing_file,
            self.skipped_underpopulated
        )
    }
}
