use serde::Serialize;

pub const CSV_COLUMNS: [&str; 4] = ["term", "reading", "meaning", "example"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JlptLevel {
    N3,
    N2,
    N1,
}

impl JlptLevel {
    pub const ALL: [JlptLevel; 3] = [JlptLevel::N3, JlptLevel::N2, JlptLevel::N1];

    pub fn as_str(&self) -> &'static str {
        match self {
            JlptLevel::N3 => "N3",
            JlptLevel::N2 => "N2",
            JlptLevel::N1 => "N1",
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            JlptLevel::N3 => "N3:",
            JlptLevel::N2 => "N2:",
            JlptLevel::N1 => "N1:",
        }
    }
}

/// One parsed vocabulary row. The fields are whatever the model emitted,
/// split on tabs; nothing is validated or reordered.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct VocabularyEntry {
    pub fields: Vec<String>,
}

/// Per-tier entry lists for one run. All three tiers are always present;
/// a tier the response never mentioned is simply empty.
#[derive(Debug, Clone, Default)]
pub struct VocabularyTable {
    n3: Vec<VocabularyEntry>,
    n2: Vec<VocabularyEntry>,
    n1: Vec<VocabularyEntry>,
}

impl VocabularyTable {
    pub fn entries(&self, level: JlptLevel) -> &[VocabularyEntry] {
        match level {
            JlptLevel::N3 => &self.n3,
            JlptLevel::N2 => &self.n2,
            JlptLevel::N1 => &self.n1,
        }
    }

    fn entries_mut(&mut self, level: JlptLevel) -> &mut Vec<VocabularyEntry> {
        match level {
            JlptLevel::N3 => &mut self.n3,
            JlptLevel::N2 => &mut self.n2,
            JlptLevel::N1 => &mut self.n1,
        }
    }
}

/// Scans the raw vocabulary response line by line. A line counts only when it
/// starts with a bare tier marker (`N3:`, `N2:`, `N1:`); the remainder is
/// split on tabs into the entry's fields. Everything else is dropped, so any
/// format drift on the model side shows up as missing rows, not as an error.
/// Note the prompt asks for tiered tables but never pins down this exact line
/// shape; skipped lines are logged at debug level for diagnostics.
pub fn parse_vocabulary_response(response: &str) -> VocabularyTable {
    let mut table = VocabularyTable::default();
    for line in response.lines() {
        let Some((level, rest)) = match_tier_line(line) else {
            tracing::debug!(line, "discarding unrecognized vocabulary line");
            continue;
        };
        let fields = rest.split('\t').map(|field| field.to_string()).collect();
        table.entries_mut(level).push(VocabularyEntry { fields });
    }
    table
}

fn match_tier_line(line: &str) -> Option<(JlptLevel, &str)> {
    for level in JlptLevel::ALL {
        if let Some(rest) = line.strip_prefix(level.marker()) {
            return Some((level, rest));
        }
    }
    None
}

pub fn csv_file_name(level: JlptLevel) -> String {
    format!("vocabulary_{}.csv", level.as_str())
}

/// Renders one tier as CSV with a fixed header row. Empty tiers yield `None`
/// so callers can skip the download artifact entirely.
pub fn tier_csv(table: &VocabularyTable, level: JlptLevel) -> Option<String> {
    let entries = table.entries(level);
    if entries.is_empty() {
        return None;
    }
    let mut output = String::new();
    output.push_str(&CSV_COLUMNS.join(","));
    output.push('\n');
    for entry in entries {
        let row = entry
            .fields
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",");
        output.push_str(&row);
        output.push('\n');
    }
    Some(output)
}

fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_marked_lines_and_discards_the_rest() {
        let response = "N2:termA\treadingA\tmeaningA\texampleA\nfoo";
        let table = parse_vocabulary_response(response);
        assert_eq!(table.entries(JlptLevel::N2).len(), 1);
        assert_eq!(
            table.entries(JlptLevel::N2)[0].fields,
            vec!["termA", "readingA", "meaningA", "exampleA"]
        );
        assert!(table.entries(JlptLevel::N3).is_empty());
        assert!(table.entries(JlptLevel::N1).is_empty());
    }

    #[test]
    fn unmatched_response_leaves_every_tier_empty() {
        let response = "| word | reading |\n| --- | --- |\n| 勉強 | べんきょう |";
        let table = parse_vocabulary_response(response);
        for level in JlptLevel::ALL {
            assert!(table.entries(level).is_empty());
        }
    }

    #[test]
    fn marker_must_be_at_line_start() {
        let table = parse_vocabulary_response(" N3:word\treading\tmeaning\texample");
        assert!(table.entries(JlptLevel::N3).is_empty());
    }

    #[test]
    fn short_rows_are_kept_as_split() {
        let table = parse_vocabulary_response("N1:word only");
        assert_eq!(table.entries(JlptLevel::N1)[0].fields, vec!["word only"]);
    }

    #[test]
    fn tier_csv_quotes_embedded_delimiters() {
        let table = parse_vocabulary_response("N3:言葉\tことば (kotoba)\tword, term\t例です");
        let csv = tier_csv(&table, JlptLevel::N3).expect("csv for non-empty tier");
        assert_eq!(
            csv,
            "term,reading,meaning,example\n言葉,ことば (kotoba),\"word, term\",例です\n"
        );
        assert!(tier_csv(&table, JlptLevel::N2).is_none());
    }

    #[test]
    fn csv_field_doubles_quotes() {
        assert_eq!(csv_field("a \"b\""), "\"a \"\"b\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn csv_file_names_follow_tier() {
        assert_eq!(csv_file_name(JlptLevel::N2), "vocabulary_N2.csv");
    }
}
