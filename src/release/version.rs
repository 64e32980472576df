//! Version identifiers
//!
//! A version is a sequence of components, each an integer or a short
//! alphanumeric token (`a1`, `b`, `c12`). At least two leading integers are
//! required. Integers are joined with `.`; once a token appears, everything
//! after it is concatenated without a separator, so `(1, 2, 0, "a1")` renders
//! as `1.2.0a1`.
//!
//! Ordering is structural: component by component, integers before tokens at
//! the same position, and a version that is a prefix of another sorts first.

use crate::core::error::{ReleaseResult, VersionError};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// `major.minor[.patch[(a|b|c)[N]]]`
static VERSION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+)([abc]\d*)?)?$").expect("static regex"));

/// One component of a version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
  /// Numeric component (`1`, `0`, `6`)
  Number(u64),
  /// Alphanumeric token, always starting with a letter (`a1`, `b`)
  Token(String),
}

impl Component {
  /// Split a token into its head and trailing digit run (`a12` -> `a`, `12`)
  fn split_token(token: &str) -> (&str, &str) {
    let split = token.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    token.split_at(split)
  }

  /// Head and trailing number of a token
  fn token_parts(token: &str) -> (&str, Option<u64>) {
    let (head, digits) = Self::split_token(token);
    (head, digits.parse().ok())
  }

  /// Trailing digits of a token are either absent or fit in a `u64`
  fn token_in_range(token: &str) -> bool {
    let (_, digits) = Self::split_token(token);
    digits.is_empty() || digits.parse::<u64>().is_ok()
  }

  /// Increment by one: arithmetic for numbers, trailing digits for tokens.
  ///
  /// `None` when the number is already `u64::MAX`.
  fn incremented(&self) -> Option<Self> {
    match self {
      Component::Number(n) => n.checked_add(1).map(Component::Number),
      Component::Token(token) => {
        let (head, digits) = Self::split_token(token);
        let next = if digits.is_empty() {
          1
        } else {
          digits.parse::<u64>().ok()?.checked_add(1)?
        };
        Some(Component::Token(format!("{}{}", head, next)))
      }
    }
  }
}

impl Ord for Component {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self, other) {
      (Component::Number(a), Component::Number(b)) => a.cmp(b),
      (Component::Number(_), Component::Token(_)) => Ordering::Less,
      (Component::Token(_), Component::Number(_)) => Ordering::Greater,
      (Component::Token(a), Component::Token(b)) => {
        let (a_letters, a_num) = Self::token_parts(a);
        let (b_letters, b_num) = Self::token_parts(b);
        a_letters
          .cmp(b_letters)
          .then(a_num.cmp(&b_num))
          .then_with(|| a.cmp(b))
      }
    }
  }
}

impl PartialOrd for Component {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl fmt::Display for Component {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Component::Number(n) => write!(f, "{}", n),
      Component::Token(t) => write!(f, "{}", t),
    }
  }
}

/// A parsed, comparable, re-serializable version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
  components: Vec<Component>,
}

impl Version {
  /// Parse the canonical string form, e.g. `1.0.1` or `1.2.0a1`
  pub fn parse(text: &str) -> ReleaseResult<Self> {
    let format_error = |reason: &str| VersionError::Format {
      text: text.to_string(),
      reason: reason.to_string(),
    };

    let caps = VERSION_RE
      .captures(text)
      .ok_or_else(|| format_error("expected major.minor[.patch[(a|b|c)[N]]]"))?;

    let mut components = Vec::with_capacity(4);
    for (idx, group) in caps.iter().skip(1).enumerate() {
      let Some(group) = group else { break };
      let raw = group.as_str();
      if idx == 3 {
        if !Component::token_in_range(raw) {
          return Err(format_error("pre-release number out of range").into());
        }
        components.push(Component::Token(raw.to_string()));
        continue;
      }
      if raw.len() > 1 && raw.starts_with('0') {
        return Err(format_error("numeric components must not have leading zeros").into());
      }
      let n = raw
        .parse::<u64>()
        .map_err(|_| format_error("numeric component out of range"))?;
      components.push(Component::Number(n));
    }

    Ok(Self { components })
  }

  /// Build a version from tuple components read out of a source module.
  ///
  /// Requires at least two leading integers; tokens must be non-empty,
  /// alphanumeric, and start with a letter.
  pub fn from_components(components: Vec<Component>) -> ReleaseResult<Self> {
    let format_error = |reason: &str| VersionError::Format {
      text: render_tuple(&components),
      reason: reason.to_string(),
    };

    let leading_numbers = components
      .iter()
      .take_while(|c| matches!(c, Component::Number(_)))
      .count();
    if leading_numbers < 2 {
      return Err(format_error("need at least major and minor integer components").into());
    }

    for component in &components {
      if let Component::Token(token) = component {
        let valid = token.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
          && token.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
          return Err(format_error("tokens must be alphanumeric and start with a letter").into());
        }
        if !Component::token_in_range(token) {
          return Err(format_error("token number out of range").into());
        }
      }
    }

    Ok(Self { components })
  }

  /// The components in order
  pub fn components(&self) -> &[Component] {
    &self.components
  }

  /// Next development version: the last component incremented by one.
  ///
  /// Purely structural. `1.0.1 -> 1.0.2`, `1.2 -> 1.3`, `1.2.0a1 -> 1.2.0a2`.
  pub fn next(&self) -> ReleaseResult<Self> {
    let mut components = self.components.clone();
    if let Some(last) = components.last_mut() {
      *last = last
        .incremented()
        .ok_or_else(|| VersionError::Overflow { version: self.to_string() })?;
    }
    Ok(Self { components })
  }

  /// Python tuple literal form, e.g. `(1, 0, 1)` or `(1, 2, 0, 'a1')`
  pub fn tuple_literal(&self) -> String {
    render_tuple(&self.components)
  }
}

fn render_tuple(components: &[Component]) -> String {
  let parts: Vec<String> = components
    .iter()
    .map(|c| match c {
      Component::Number(n) => n.to_string(),
      Component::Token(t) => format!("'{}'", t),
    })
    .collect();
  format!("({})", parts.join(", "))
}

impl FromStr for Version {
  type Err = crate::core::error::ReleaseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Version::parse(s)
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut dot_join = true;
    for (idx, component) in self.components.iter().enumerate() {
      if matches!(component, Component::Token(_)) {
        dot_join = false;
      }
      if idx > 0 && dot_join {
        write!(f, ".")?;
      }
      write!(f, "{}", component)?;
    }
    Ok(())
  }
}
