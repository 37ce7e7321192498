use std::cmp::Ordering;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use icu_locale_core::Locale;

use crate::fs::Entry;

/// Locale-aware entry ordering: directories group before everything else,
/// and names compare with ICU collation rather than byte order, matching
/// what `ls --group-directories-first` shows a user in their locale.
pub struct EntrySorter {
  collator: CollatorBorrowed<'static>,
}

impl EntrySorter {
  /// Build a sorter for the locale found in the environment, following the
  /// usual precedence: `LC_ALL`, then `LC_COLLATE`, then `LANG`. Unset or
  /// unparseable values fall back to root collation.
  pub fn from_env() -> Self {
    Self::with_locale(locale_from_env())
  }

  pub fn with_locale(locale: Locale) -> Self {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Tertiary);
    let collator = match Collator::try_new(locale.into(), options) {
      Ok(c) => c,
      Err(_) => {
        let mut fallback = CollatorOptions::default();
        fallback.strength = Some(Strength::Tertiary);
        // Root collation data is compiled into the binary.
        Collator::try_new(CollatorPreferences::default(), fallback).expect("root collator")
      }
    };
    Self { collator }
  }

  pub fn compare(&self, a: &str, b: &str) -> Ordering {
    self.collator.compare(a, b)
  }

  /// Stable sort: directories first, then collated names. Equal-collation
  /// names keep the enumeration order of the underlying read.
  pub fn sort(&self, entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
      b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| self.compare(&a.name, &b.name))
    });
  }
}

fn locale_from_env() -> Locale {
  ["LC_ALL", "LC_COLLATE", "LANG"]
    .iter()
    .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
    .and_then(|tag| parse_locale_tag(&tag))
    .unwrap_or(Locale::UNKNOWN)
}

/// Turn a POSIX locale string like `de_AT.UTF-8@euro` into a parseable
/// BCP-47 tag: drop the encoding and modifier suffixes, swap `_` for `-`.
/// `C` and `POSIX` mean "no locale" and map to root.
fn parse_locale_tag(raw: &str) -> Option<Locale> {
  let tag = raw.split(['.', '@']).next().unwrap_or(raw);
  if tag.is_empty() || tag.eq_ignore_ascii_case("c") || tag.eq_ignore_ascii_case("posix") {
    return None;
  }
  tag.replace('_', "-").parse().ok()
}
