use crate::ConfigError;
use regex::Regex;
use url::Url;

/// A compiled set of link-follow glob patterns
///
/// Patterns are compiled once at crawl start and are immutable for the
/// crawl's lifetime. A candidate path qualifies if it matches **any** pattern
/// in the set; all patterns carry equal priority, so the first hit
/// short-circuits.
///
/// # Glob semantics
///
/// * `*` matches any run of characters within a single path segment
/// * `**` matches across segment boundaries, including zero segments
/// * `?` matches exactly one character within a segment
/// * `[...]` matches one character from the class
///
/// # Examples
///
/// ```
/// use listing_harvester::url::GlobSet;
///
/// let globs = GlobSet::compile(&["**/homedetails/**".to_string()]).unwrap();
/// assert!(globs.matches("/homedetails/123-main-st/456_zpid"));
/// assert!(!globs.matches("/about"));
/// ```
#[derive(Debug)]
pub struct GlobSet {
    patterns: Vec<Regex>,
}

impl GlobSet {
    /// Compiles an ordered sequence of glob patterns
    ///
    /// Invalid pattern syntax is a fatal configuration error here, never a
    /// per-link error later.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex_source = glob_to_regex(pattern)?;
            let regex = Regex::new(&regex_source).map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// Returns true if the path matches any pattern in the set
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|regex| regex.is_match(path))
    }

    /// Returns true if the URL's path matches any pattern in the set
    pub fn matches_url(&self, url: &Url) -> bool {
        self.matches(url.path())
    }

    /// Returns the number of patterns in the set
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Translates one glob pattern into an anchored regex
///
/// `**` is segment-aware: `**/` at a segment boundary consumes zero or more
/// whole segments, and a trailing `/**` consumes an optional subtree, so
/// `**/for_sale/**` matches both `/homes/for_sale` and
/// `/homes/for_sale/2_p`.
fn glob_to_regex(pattern: &str) -> Result<String, ConfigError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '/' if chars.get(i + 1) == Some(&'*') && chars.get(i + 2) == Some(&'*') => {
                if i + 3 == chars.len() {
                    // Trailing "/**": optional subtree
                    regex.push_str("(?:/.*)?");
                    i += 3;
                } else if chars.get(i + 3) == Some(&'/') {
                    // "/**/": slash plus zero or more whole segments
                    regex.push_str("/(?:.*/)?");
                    i += 4;
                } else {
                    // "/**x": degenerate, treat as any run
                    regex.push_str("/.*");
                    i += 3;
                }
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                if i == 0 && chars.get(i + 2) == Some(&'/') {
                    // Leading "**/": zero or more whole segments
                    regex.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    regex.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                regex.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                regex.push_str("[^/]");
                i += 1;
            }
            '[' => {
                let class_end = chars[i + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or_else(|| ConfigError::InvalidGlob {
                        pattern: pattern.to_string(),
                        message: "unclosed character class".to_string(),
                    })?;
                regex.push('[');
                for &c in &chars[i + 1..i + 1 + class_end] {
                    if c == '!' && regex.ends_with('[') {
                        regex.push('^');
                    } else {
                        regex.push(c);
                    }
                }
                regex.push(']');
                i += class_end + 2;
            }
            c => {
                regex.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    regex.push('$');
    Ok(regex)
}
