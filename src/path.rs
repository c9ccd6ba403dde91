use std::borrow::Cow;

use smallvec::SmallVec;

pub(crate) const SLASH: char = '/';

/// Default upper bound for a URI or location handed to the tree.
pub const DEFAULT_MAX_PATH_LEN: usize = 4096;

pub(crate) type Segments<'a> = SmallVec<[&'a str; 16]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path must start with '/'")]
    NotAbsolute,
    #[error("path contains a \"..\" segment")]
    ParentSegment,
    #[error("path contains a NUL byte")]
    NulByte,
    #[error("path is {len} bytes long, the limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Iterates the non-empty segments of `path`, skipping `.` segments.
///
/// No validation is done here; callers on the request path go through
/// [`split`] first.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SLASH).filter(|s| !s.is_empty() && *s != ".")
}

/// Validates `path` and splits it into trie keys.
///
/// The whole path is checked before anything is returned, so a rejected path
/// never yields a partial descent.
pub(crate) fn split(path: &str, max_len: usize) -> Result<Segments<'_>, PathError> {
    if path.len() > max_len {
        return Err(PathError::TooLong {
            len: path.len(),
            max: max_len,
        });
    }
    if path.as_bytes().contains(&0) {
        return Err(PathError::NulByte);
    }

    let mut parts = Segments::new();
    for part in path.split(SLASH) {
        match part {
            "" | "." => {}
            ".." => return Err(PathError::ParentSegment),
            _ => parts.push(part),
        }
    }
    Ok(parts)
}

/// Same as [`split`] but requires a leading `/`.
pub(crate) fn split_absolute(path: &str, max_len: usize) -> Result<Segments<'_>, PathError> {
    let parts = split(path, max_len)?;
    if !path.starts_with(SLASH) {
        return Err(PathError::NotAbsolute);
    }
    Ok(parts)
}

/// `path` in the form the trie sees it: one `/` before every segment in
/// `parts`, plus the trailing `/` if `path` had one.
///
/// `parts` must come from [`split_absolute`] on the same `path`. Already
/// normalized input is borrowed.
pub(crate) fn normalize<'a>(path: &'a str, parts: &[&str]) -> Cow<'a, str> {
    let trailing = !parts.is_empty() && path.ends_with(SLASH);
    let len = parts.iter().map(|p| p.len() + 1).sum::<usize>().max(1) + usize::from(trailing);
    if len == path.len() {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(len);
    for part in parts {
        out.push(SLASH);
        out.push_str(part);
    }
    if parts.is_empty() || trailing {
        out.push(SLASH);
    }
    Cow::Owned(out)
}
