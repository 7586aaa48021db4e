//! Suffix extraction for the `Name_sfx1_sfx2.ext` convention.
//!
//! A texture file name is a stem split on `_` into tokens. The *suffixes* are
//! the longest trailing run of tokens that appear in the known catalog (every
//! token any grid row allows). Scanning stops at the first unknown token from
//! the right, so a stray token in the middle never lets earlier catalog tokens
//! count:
//!
//! - `T_Rock_cc_col.png` with `{cc, col}` → `[cc, col]`
//! - `T_Rock_BAD_col.png` with `{cc, col}` → `[col]`
//! - `T_Rock_01.png` with `{cc, col}` → `[]`
//!
//! Matching is exact and case-sensitive; case folding belongs to validation.

/// Result of splitting a file name into tokens and trailing suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuffixedName {
    /// Trailing catalog tokens, left to right.
    pub suffixes: Vec<String>,
    /// Every non-empty `_`-separated token of the stem.
    pub tokens: Vec<String>,
}

/// File name of a path; both `/` and `\` separate directories.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Strip the final extension. Dots at the start of the name don't start an
/// extension, so `.hidden` keeps its name and `a.tar.gz` becomes `a.tar`.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => &name[..dot],
        _ => name,
    }
}

/// Extract the trailing catalog suffixes of a path's file name.
///
/// An empty catalog or a run with no matches yields no suffixes; the token list
/// is still returned so callers can inspect the whole name. An empty stem
/// yields nothing at all.
pub fn extract_suffixes<S: AsRef<str>>(path: &str, catalog: &[S]) -> SuffixedName {
    let stem = file_stem(file_name(path));
    let tokens: Vec<String> = stem
        .split('_')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let is_known = |token: &str| catalog.iter().any(|c| c.as_ref() == token);
    let run = tokens
        .iter()
        .rev()
        .take_while(|t| is_known(t))
        .count();

    SuffixedName {
        suffixes: tokens[tokens.len() - run..].to_vec(),
        tokens,
    }
}
