//! Address canonicalization: collapsing `..` parent references.
//!
//! Useful for relative addressing between endpoints, e.g. a handler at
//! `/osc/0/freq` broadcasting to `/osc/0/../1/freq`.

/// Collapses `..` segments in place, scanning right to left.
///
/// Surviving segments are moved toward the end of the buffer, so the
/// collapsed path occupies `buf[start..]` where `start` is the returned
/// offset. Each `..` segment consumes the nearest unconsumed segment to
/// its left instead of being written through.
///
/// There is no underflow guard: a path with more `..` segments than
/// parents (`/a/../../b`) produces an unspecified but valid range, never
/// a panic. Callers own that invariant.
///
/// ```
/// use oscroute::collapse_path_in_place;
///
/// let mut buf = *b"/a/b/../c";
/// let start = collapse_path_in_place(&mut buf);
/// assert_eq!(&buf[start..], b"/a/c");
/// ```
pub fn collapse_path_in_place(buf: &mut [u8]) -> usize {
    let mut read: isize = buf.len() as isize - 1;
    let mut write: isize = read;
    let mut consuming = 0;

    // Per segment, right to left, either:
    // (1) a parent reference: start consuming,
    // (2) a normal segment with consumers pending: swallow it,
    // (3) a normal segment: move it into place.
    while read >= 0 {
        if parent_ref(buf, read) {
            skip_segment(buf, &mut read);
            consuming += 1;
        } else if consuming > 0 {
            skip_segment(buf, &mut read);
            consuming -= 1;
        } else {
            move_segment(buf, &mut read, &mut write);
        }
    }

    (write + 1) as usize
}

/// Returns the collapsed form of a path.
///
/// The allocating convenience wrapper around
/// [`collapse_path_in_place`].
///
/// ```
/// use oscroute::collapse_path;
///
/// assert_eq!(collapse_path("/a/b/../c"), "/a/c");
/// ```
pub fn collapse_path(path: &str) -> String {
    let mut buf = path.as_bytes().to_vec();
    let start = collapse_path_in_place(&mut buf);
    // Segments move as whole byte runs, so the result stays valid UTF-8.
    String::from_utf8(buf[start..].to_vec()).unwrap()
}

// True when the segment ending at `pos` is a `..` parent reference.
fn parent_ref(buf: &[u8], pos: isize) -> bool {
    if pos < 2 {
        return false;
    }
    let p = pos as usize;
    buf[p] == b'.' && buf[p - 1] == b'.' && buf[p - 2] == b'/'
}

// Steps left past one segment, including its leading separator.
fn skip_segment(buf: &[u8], read: &mut isize) {
    while *read >= 0 {
        let done = buf[*read as usize] == b'/';
        *read -= 1;
        if done {
            break;
        }
    }
}

// Copies one segment, including its leading separator, to the write
// cursor.
fn move_segment(buf: &mut [u8], read: &mut isize, write: &mut isize) {
    while *read >= 0 {
        let done = buf[*read as usize] == b'/';
        buf[*write as usize] = buf[*read as usize];
        *write -= 1;
        *read -= 1;
        if done {
            break;
        }
    }
}
