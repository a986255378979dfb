//! Path tokenization.
//!
//! Paths are `/`-delimited. Leading, trailing and repeated separators produce
//! no segments, so `""`, `"/"` and `"//"` all address the root.

use std::fmt;

use itertools::Itertools;

/// Segment delimiter.
pub const SEPARATOR: char = '/';

/// Lazy iterator over the non-empty segments of a path.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    inner: std::str::Split<'a, char>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find(|s| !s.is_empty())
    }
}

pub fn segments(path: &str) -> Segments<'_> {
    Segments {
        inner: path.split(SEPARATOR),
    }
}

pub fn tokenize(path: &str) -> Vec<&str> {
    segments(path).collect()
}

pub fn is_root(path: &str) -> bool {
    segments(path).next().is_none()
}

/// Builds the canonical `/a/b/c` form. No segments renders as `/`.
pub fn join<I>(segments: I) -> String
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    format!(
        "{}{}",
        SEPARATOR,
        segments.into_iter().join(&SEPARATOR.to_string())
    )
}

pub fn normalize(path: &str) -> String {
    join(segments(path))
}

/// Canonical path of a child named `name` below the canonical `parent`.
pub fn child_of(parent: &str, name: &str) -> String {
    let mut out = String::with_capacity(parent.len() + name.len() + 1);
    out.push_str(parent.trim_end_matches(SEPARATOR));
    out.push(SEPARATOR);
    out.push_str(name);
    out
}
