// ---------------------------------------------------------------------------
// Dataset loading: `userID,itemID,value` text records
// ---------------------------------------------------------------------------
//
// One record per line. Fields are separated by a comma or, if the line has
// no comma, by a tab. User and item identifiers are non-negative integers;
// the value is a finite floating-point number.
//
// Strict loading rejects the whole input on the first bad line (blank lines
// included). Lenient loading skips bad lines with a warning.
// ---------------------------------------------------------------------------

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use crate::error::CfError;
use crate::store::RatingStore;
use crate::types::{ItemId, Rating, UserId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
	#[default]
	Strict,
	Lenient,
}

/// A loaded store plus bookkeeping about the input it came from.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
	pub store: RatingStore,
	/// Lines successfully parsed, duplicates included.
	pub records: usize,
	/// Lines dropped under [`LoadPolicy::Lenient`].
	pub skipped: usize,
}

/// Parse one record. `line_no` is 1-based and only used for error reporting.
pub fn parse_record(line: &str, line_no: usize) -> Result<Rating, CfError> {
	let malformed = |reason: String| CfError::MalformedRecord {
		line: line_no,
		reason,
	};

	let line = line.trim();
	if line.is_empty() {
		return Err(malformed("blank line".into()));
	}

	let delimiter = if line.contains(',') { ',' } else { '\t' };
	let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
	if fields.len() != 3 {
		return Err(malformed(format!(
			"expected 3 fields, found {}",
			fields.len()
		)));
	}

	let user: UserId = fields[0]
		.parse()
		.map_err(|_| malformed(format!("invalid user id '{}'", fields[0])))?;
	let item: ItemId = fields[1]
		.parse()
		.map_err(|_| malformed(format!("invalid item id '{}'", fields[1])))?;
	let value: f64 = fields[2]
		.parse()
		.map_err(|_| malformed(format!("invalid value '{}'", fields[2])))?;
	if !value.is_finite() {
		return Err(malformed(format!("non-finite value '{}'", fields[2])));
	}

	Ok(Rating::new(user, item, value))
}

pub fn load_reader<R: BufRead>(reader: R, policy: LoadPolicy) -> Result<LoadedDataset, CfError> {
	let mut store = RatingStore::new();
	let mut records = 0;
	let mut skipped = 0;

	for (index, line) in reader.lines().enumerate() {
		let line = line?;
		match parse_record(&line, index + 1) {
			Ok(rating) => {
				store.insert(rating);
				records += 1;
			}
			Err(e) if policy == LoadPolicy::Lenient => {
				tracing::warn!("Skipping record: {}", e);
				skipped += 1;
			}
			Err(e) => return Err(e),
		}
	}

	tracing::info!(
		users = store.num_users(),
		items = store.num_items(),
		ratings = store.len(),
		skipped,
		"Dataset loaded"
	);

	Ok(LoadedDataset {
		store,
		records,
		skipped,
	})
}

pub fn load_path(path: impl AsRef<Path>, policy: LoadPolicy) -> Result<LoadedDataset, CfError> {
	let path = path.as_ref();
	tracing::debug!(path = %path.display(), "Opening dataset");
	let file = File::open(path)?;
	load_reader(BufReader::new(file), policy)
}

pub fn parse_str(input: &str, policy: LoadPolicy) -> Result<LoadedDataset, CfError> {
	load_reader(Cursor::new(input), policy)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	// -- parse_record tests ---------------------------------------------------

	#[test]
	fn parses_comma_record() {
		let r = parse_record("1,10,1.0", 1).unwrap();
		assert_eq!(r, Rating::new(1, 10, 1.0));
	}

	#[test]
	fn parses_tab_record_with_padding() {
		let r = parse_record(" 3\t 18\t4.5 \r", 1).unwrap();
		assert_eq!(r, Rating::new(3, 18, 4.5));
	}

	#[test]
	fn rejects_wrong_field_count() {
		let err = parse_record("1,10", 4).unwrap_err();
		assert!(matches!(err, CfError::MalformedRecord { line: 4, .. }));
		assert!(parse_record("1,10,1.0,99", 1).is_err());
	}

	#[test]
	fn rejects_negative_ids() {
		assert!(parse_record("-1,10,1.0", 1).is_err());
		assert!(parse_record("1,-10,1.0", 1).is_err());
	}

	#[test]
	fn rejects_non_numeric_and_non_finite_values() {
		assert!(parse_record("1,10,high", 1).is_err());
		assert!(parse_record("1,10,NaN", 1).is_err());
		assert!(parse_record("1,10,inf", 1).is_err());
	}

	#[test]
	fn rejects_blank_line() {
		let err = parse_record("   ", 2).unwrap_err();
		assert_eq!(err.to_string(), "Malformed record at line 2: blank line");
	}

	// -- load tests -----------------------------------------------------------

	#[test]
	fn strict_rejects_on_first_bad_line() {
		let err = parse_str("1,10,1.0\n1,11\n1,12,x\n", LoadPolicy::Strict).unwrap_err();
		assert!(matches!(err, CfError::MalformedRecord { line: 2, .. }));
	}

	#[test]
	fn strict_rejects_blank_line_in_the_middle() {
		let err = parse_str("1,10,1.0\n\n1,11,2.0\n", LoadPolicy::Strict).unwrap_err();
		assert!(matches!(err, CfError::MalformedRecord { line: 2, .. }));
	}

	#[test]
	fn lenient_skips_and_counts() {
		let loaded = parse_str("1,10,1.0\n\nbad\n1,11,2.0\n", LoadPolicy::Lenient).unwrap();
		assert_eq!(loaded.records, 2);
		assert_eq!(loaded.skipped, 2);
		assert_eq!(loaded.store.len(), 2);
	}

	#[test]
	fn duplicate_records_overwrite() {
		let loaded = parse_str("1,10,1.0\n1,10,3.0\n", LoadPolicy::Strict).unwrap();
		assert_eq!(loaded.records, 2);
		assert_eq!(loaded.store.len(), 1);
		assert_eq!(loaded.store.rating(1, 10), Some(3.0));
	}

	#[test]
	fn load_path_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "1,10,1.0").unwrap();
		writeln!(file, "2,10,2.0").unwrap();
		let loaded = load_path(file.path(), LoadPolicy::Strict).unwrap();
		assert_eq!(loaded.store.num_users(), 2);
		assert_eq!(loaded.store.ratings_for_item(10).count(), 2);
	}

	#[test]
	fn load_path_missing_file_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = load_path(dir.path().join("missing.csv"), LoadPolicy::Strict).unwrap_err();
		assert_eq!(err.code(), "IO_ERROR");
	}
}
