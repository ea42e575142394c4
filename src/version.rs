// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Version string ordering.
//!
//! Plugin versions are free-form strings, so they are ordered the way a human
//! would read them rather than by strict semantic versioning. A version string
//! is split into runs of digits and runs of everything else. Digit runs
//! compare by magnitude, so "2.10" comes after "2.9". Other runs compare
//! character by character, ignoring case.

use std::{cmp::Ordering, iter::Peekable, str::Chars};

/// Compare two version strings with numeric awareness.
pub fn compare_versions(lhs: &str, rhs: &str) -> Ordering {
    let mut lhs = Segments::new(lhs);
    let mut rhs = Segments::new(rhs);

    loop {
        let ordering = match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Segment::Number(a)), Some(Segment::Number(b))) => compare_numbers(&a, &b),
            (Some(Segment::Text(a)), Some(Segment::Text(b))) => compare_text(&a, &b),

            // INVARIANT: Digits sort before any other character.
            (Some(Segment::Number(_)), Some(Segment::Text(_))) => Ordering::Less,
            (Some(Segment::Text(_)), Some(Segment::Number(_))) => Ordering::Greater,
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn compare_numbers(lhs: &str, rhs: &str) -> Ordering {
    let lhs = lhs.trim_start_matches('0');
    let rhs = rhs.trim_start_matches('0');

    // INVARIANT: No leading zeros, so longer means larger.
    lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
}

fn compare_text(lhs: &str, rhs: &str) -> Ordering {
    lhs.chars()
        .flat_map(char::to_lowercase)
        .cmp(rhs.chars().flat_map(char::to_lowercase))
}

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Number(String),
    Text(String),
}

struct Segments<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Segments<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            chars: data.chars().peekable(),
        }
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.chars.next()?;
        let numeric = first.is_ascii_digit();
        let mut run = String::from(first);

        while let Some(ch) = self.chars.next_if(|ch| ch.is_ascii_digit() == numeric) {
            run.push(ch);
        }

        if numeric {
            Some(Segment::Number(run))
        } else {
            Some(Segment::Text(run))
        }
    }
}
