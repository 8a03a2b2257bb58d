//! Property-based tests for log file rolling.
//!
//! These verify `rolled_log_path` substitution and output consistency across
//! arbitrary base paths and dates. Refer to `src/logging/mod.rs`.

use intent_relayer::logging::rolled_log_path;
use proptest::{prelude::*, test_runner::Config};

proptest! {
  #![proptest_config(Config {
    cases: 1000, ..Config::default()
  })]

  /// When the base ends with ".log" the suffix is stripped before the date
  /// and index are inserted.
  #[test]
  fn prop_rolled_path_with_log_suffix(
    base in ".*[^.]",
    date in "[0-9]{4}-[0-9]{2}-[0-9]{2}",
    index in 0u32..100
  ) {
      let base_with_log = format!("{}.log", base);
      let result = rolled_log_path(&base_with_log, &date, index);
      let expected = format!(
          "{}-{}.{}.log",
          base_with_log.strip_suffix(".log").unwrap(),
          date,
          index
      );
      prop_assert_eq!(result, expected);
  }

  /// Without the ".log" suffix the base is used verbatim.
  #[test]
  fn prop_rolled_path_without_log_suffix(
    base in ".*",
    date in "[0-9]{4}-[0-9]{2}-[0-9]{2}"
  ) {
      let base_non_log = if base.ends_with(".log") {
          format!("{}x", base)
      } else {
          base
      };
      let result = rolled_log_path(&base_non_log, &date, 1);
      prop_assert_eq!(result, format!("{}-{}.1.log", base_non_log, date));
  }

  /// The produced path always terminates in ".log".
  #[test]
  fn prop_rolled_path_always_ends_in_log(
    base in ".*",
    date in "[0-9]{4}-[0-9]{2}-[0-9]{2}",
    index in 0u32..1000
  ) {
      prop_assert!(rolled_log_path(&base, &date, index).ends_with(".log"));
  }
}
