/// Join round records into a match record, one round per line.
pub fn join_rounds<'a>(rounds: impl IntoIterator<Item = &'a str>) -> String {
    let mut record = String::new();
    for round in rounds {
        record.push_str(round);
        record.push('\n');
    }
    record
}

/// Append a match record to a batch, followed by a blank separator line.
pub fn append_match(batch: &mut String, match_record: &str) {
    batch.push_str(match_record);
    if !match_record.ends_with('\n') {
        batch.push('\n');
    }
    batch.push('\n');
}

/// Match records of a batch, without their trailing newlines.
pub fn split_batch(batch: &str) -> impl Iterator<Item = &str> {
    batch
        .split("\n\n")
        .map(|chunk| chunk.trim_matches(['\r', '\n']))
        .filter(|chunk| !chunk.is_empty())
}

/// Round records of a match record.
pub fn split_rounds(match_record: &str) -> impl Iterator<Item = &str> {
    match_record
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{append_match, join_rounds, split_batch, split_rounds};

    #[test]
    fn batch_round_trips_match_boundaries() {
        let first = join_rounds(["20a", "21b"]);
        let second = join_rounds(["20c"]);
        assert_eq!(first, "20a\n21b\n");

        let mut batch = String::new();
        append_match(&mut batch, &first);
        append_match(&mut batch, &second);
        assert_eq!(batch, "20a\n21b\n\n20c\n\n");

        let matches: Vec<&str> = split_batch(&batch).collect();
        assert_eq!(matches, vec!["20a\n21b", "20c"]);
        assert_eq!(split_rounds(matches[0]).collect::<Vec<_>>(), vec!["20a", "21b"]);
    }

    #[test]
    fn empty_batch_has_no_matches() {
        assert_eq!(split_batch("").count(), 0);
        assert_eq!(split_batch("\n\n").count(), 0);
    }
}
