//! Code-point encoding: `utf8_to_int` decodes the first element of a
//! Character vector into the Integer vector of its code points, and
//! `int_to_utf8` builds strings back from code points. A code point
//! outside the Unicode scalar range (negative, surrogate, or past
//! 0x10FFFF) is a domain failure: the affected output element becomes NA,
//! the completeness flag is cleared, and one warning per call records it.

use crate::dispatch::{CallArgs, OpDescriptor, SpecEntry};
use crate::session::Session;
use crate::value::na::{NaTracker, INT_NA};
use crate::value::{Kind, RVector, RuntimeError, WarningKind, MSG_INVALID_CODE_POINT};

use super::{flag_arg, require_kind};

/// Code points of the first element. NA input decodes to a length-1 NA
/// Integer vector.
pub fn utf8_to_int(_session: &mut Session, x: &RVector) -> Result<RVector, RuntimeError> {
    require_kind(x, Kind::Character, "x")?;
    if x.is_empty() {
        return Err(RuntimeError::argument("zero-length 'x'"));
    }
    match x.string_at(0) {
        None => Ok(RVector::int(vec![INT_NA], false)),
        Some(s) => {
            let data: Vec<i32> = s.chars().map(|c| c as i32).collect();
            Ok(RVector::int(data, true))
        }
    }
}

fn valid_code_point(x: i32) -> Option<char> {
    u32::try_from(x).ok().and_then(char::from_u32)
}

/// `multiple = false`: one string built from all code points, with code
/// point 0 dropped and any NA element making the whole string NA.
/// `multiple = true`: element-wise single-character strings, NA mapping
/// to NA and 0 to the empty string.
pub fn int_to_utf8(
    session: &mut Session,
    x: &RVector,
    multiple: bool,
) -> Result<RVector, RuntimeError> {
    require_kind(x, Kind::Integer, "x")?;
    let mut warned = false;
    let mut warn_once = |session: &mut Session| {
        if !warned {
            session.warn(WarningKind::NaIntroduced, MSG_INVALID_CODE_POINT);
            warned = true;
        }
    };

    if multiple {
        let mut data = Vec::with_capacity(x.len());
        let mut tracker = NaTracker::new();
        for i in 0..x.len() {
            if tracker.check(x.is_na_at(i)) {
                data.push(None);
                continue;
            }
            let cp = x.int_at(i);
            if cp == 0 {
                data.push(Some(String::new()));
                continue;
            }
            match valid_code_point(cp) {
                Some(c) => data.push(Some(c.to_string())),
                None => {
                    warn_once(session);
                    data.push(None);
                    tracker.note(true);
                }
            }
        }
        Ok(RVector::character(data, tracker.complete()))
    } else {
        let mut out = String::new();
        for i in 0..x.len() {
            if x.is_na_at(i) {
                return Ok(RVector::character(vec![None], false));
            }
            let cp = x.int_at(i);
            if cp == 0 {
                continue;
            }
            match valid_code_point(cp) {
                Some(c) => out.push(c),
                None => {
                    warn_once(session);
                    return Ok(RVector::character(vec![None], false));
                }
            }
        }
        Ok(RVector::character(vec![Some(out)], true))
    }
}

// ── Descriptors ──────────────────────────────────────────────────────

fn utf8_to_int_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    utf8_to_int(session, args.arg(0))
}

fn no_specialize(_args: &CallArgs) -> Option<SpecEntry> {
    None
}

pub static UTF8_TO_INT: OpDescriptor = OpDescriptor {
    name: "utf8ToInt",
    specialize: no_specialize,
    fallback: utf8_to_int_fallback,
};

fn int_to_utf8_fallback(session: &mut Session, args: &CallArgs) -> Result<RVector, RuntimeError> {
    let multiple = flag_arg(args.arg(1), "multiple")?;
    int_to_utf8(session, args.arg(0), multiple)
}

pub static INT_TO_UTF8: OpDescriptor = OpDescriptor {
    name: "intToUtf8",
    specialize: no_specialize,
    fallback: int_to_utf8_fallback,
};
