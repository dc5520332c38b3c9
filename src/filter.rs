use core::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::Error;

const DELIMITER: char = '/';

/// The two accepted shapes of a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<'a> {
    /// An explicit `/pattern/flags` expression.
    Pattern { body: &'a str, flags: &'a str },
    /// A comma-separated list of extensions.
    Extensions(Vec<&'a str>),
}

impl<'a> Expr<'a> {
    /// Classify a filter expression.
    pub fn parse(filter: &'a str) -> Self {
        if let Some(rest) = filter.strip_prefix(DELIMITER)
            && let Some((body, flags)) = rest.rsplit_once(DELIMITER)
        {
            return Expr::Pattern { body, flags };
        }

        Expr::Extensions(filter.split(',').map(str::trim).collect())
    }
}

/// A compiled filename filter.
#[derive(Debug, Clone)]
pub struct Filter {
    regex: Regex,
}

impl Filter {
    /// Compile a filter expression.
    pub fn new(filter: &str) -> Result<Self, Error> {
        let invalid = |reason: String| Error::InvalidFilter {
            filter: filter.to_owned(),
            reason,
        };

        let regex = match Expr::parse(filter) {
            Expr::Pattern { body, flags } => {
                let mut builder = RegexBuilder::new(body);

                for flag in flags.chars() {
                    match flag {
                        'i' => builder.case_insensitive(true),
                        'm' => builder.multi_line(true),
                        's' => builder.dot_matches_new_line(true),
                        'x' => builder.ignore_whitespace(true),
                        // Matching is always global and unicode aware.
                        'g' | 'u' | 'y' => &mut builder,
                        flag => return Err(invalid(format!("unsupported flag `{flag}`"))),
                    };
                }

                builder.build().map_err(|e| invalid(e.to_string()))?
            }
            Expr::Extensions(extensions) => {
                let alternatives = extensions
                    .into_iter()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join("|");

                Regex::new(&format!(r".*\.({alternatives})")).map_err(|e| invalid(e.to_string()))?
            }
        };

        Ok(Self { regex })
    }

    /// Test if the first match of the filter covers the whole file name.
    pub fn is_match(&self, name: &str) -> bool {
        self.regex
            .find(name)
            .is_some_and(|m| m.start() == 0 && m.end() == name.len())
    }
}

impl fmt::Display for Filter {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.regex.as_str())
    }
}
