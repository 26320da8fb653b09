//! The endpoint name grammar and its matchers.
//!
//! An endpoint name is a routing pattern:
//!
//! ```ignore
//!  pattern := segment ('/' segment)*
//!  segment := literal ('#' count)? (':' argspec)?
//!  argspec := alt (':' alt)*
//!  alt     := typechar*
//! ```
//!
//! `literal` bytes match themselves. `#count` matches one or more decimal
//! digits whose value is below `count` (an array of sibling endpoints).
//! A pattern ending in `/` owns a sub-table and matches any address that
//! continues past the separator. A `:argspec` suffix restricts the
//! argument type tags the endpoint accepts.

/// Matches a message against an endpoint pattern.
///
/// The address must be consumed exactly, except that a pattern ending in
/// `/` accepts any continuation (the sub-table match). If the pattern
/// carries an argument restriction, the message's type tags must satisfy
/// it as well.
///
/// ```
/// use oscroute::match_message;
///
/// assert!(match_message("freq:f", "freq", "f"));
/// assert!(!match_message("freq:f", "freq", "s"));
/// assert!(match_message("gain#4:f", "gain2", "f"));
/// assert!(match_message("osc/", "osc/freq", "f"));
/// ```
pub fn match_message(pattern: &str, path: &str, types: &str) -> bool {
    match_inner(pattern, path, Some(types))
}

// Matches one path level against a pattern, ignoring argument tags.
// Used by partial-path lookup, where no message exists yet.
pub(crate) fn match_segment(pattern: &str, path: &str) -> bool {
    match_inner(pattern, path, None)
}

fn match_inner(pattern: &str, path: &str, types: Option<&str>) -> bool {
    let p = pattern.as_bytes();
    let m = path.as_bytes();
    let mut i = 0;
    let mut j = 0;
    loop {
        match p.get(i) {
            None => return j == m.len(),
            Some(b':') => {
                if j != m.len() {
                    return false;
                }
                return match types {
                    Some(t) => match_args(&pattern[i..], t),
                    None => true,
                };
            }
            Some(b'/') => {
                if m.get(j) != Some(&b'/') {
                    return false;
                }
                i += 1;
                j += 1;
                // a trailing separator matches the rest of the address
                if i == p.len() {
                    return true;
                }
            }
            Some(b'#') => {
                let (count, next) = decimal(p, i + 1);
                let start = j;
                while j < m.len() && m[j].is_ascii_digit() {
                    j += 1;
                }
                if start == j || number(&m[start..j]) >= count {
                    return false;
                }
                i = next;
            }
            Some(&c) => {
                if m.get(j) != Some(&c) {
                    return false;
                }
                i += 1;
                j += 1;
            }
        }
    }
}

/// Matches argument type tags against a `:`-prefixed restriction.
///
/// A pattern not starting with `:` places no restriction and matches
/// anything. Otherwise the `:`-delimited alternatives are tried in order
/// by right-recursion; an alternative matches only when it and the tag
/// string end together.
///
/// ```
/// use oscroute::match_args;
///
/// assert!(match_args(":if:s", "if"));
/// assert!(match_args(":if:s", "s"));
/// assert!(!match_args(":if:s", "x"));
/// assert!(match_args("", "anything"));
/// ```
pub fn match_args(spec: &str, types: &str) -> bool {
    match spec.strip_prefix(':') {
        Some(alternatives) => match_alternatives(alternatives, types),
        None => true,
    }
}

fn match_alternatives(spec: &str, types: &str) -> bool {
    match spec.split_once(':') {
        Some((alt, rest)) => alt == types || match_alternatives(rest, types),
        None => spec == types,
    }
}

// The literal routing prefix: everything before the argument restriction.
pub(crate) fn fixed_prefix(name: &str) -> &str {
    match name.find(':') {
        Some(i) => &name[..i],
        None => name,
    }
}

// The argument restriction, including its leading `:`.
pub(crate) fn arg_spec(name: &str) -> Option<&str> {
    name.find(':').map(|i| &name[i..])
}

pub(crate) fn is_array(name: &str) -> bool {
    name.contains('#')
}

pub(crate) fn nests(name: &str) -> bool {
    name.contains('/')
}

// Splits `gain#4` into (`gain`, 4). None for non-array names.
pub(crate) fn array_parts(name: &str) -> Option<(&str, usize)> {
    let hash = name.find('#')?;
    let rest = name[hash + 1..].as_bytes();
    let (count, _) = decimal(rest, 0);
    Some((&name[..hash], count))
}

// The first path segment, without its separator.
pub(crate) fn first_segment(path: &str) -> &str {
    match path.find('/') {
        Some(i) => &path[..i],
        None => path,
    }
}

fn decimal(bytes: &[u8], mut i: usize) -> (usize, usize) {
    let mut n = 0usize;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        n = n.saturating_mul(10).saturating_add((bytes[i] - b'0') as usize);
        i += 1;
    }
    (n, i)
}

fn number(digits: &[u8]) -> usize {
    decimal(digits, 0).0
}
