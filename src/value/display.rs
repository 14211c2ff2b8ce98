//! Diagnostic `Display` for vectors. Not a user-facing printer; only the
//! trace output and error texts go through this.

use std::fmt;

use super::access::format_double;
use super::data::VectorData;
use super::na::{is_na_int, is_na_logical, LOGICAL_TRUE};
use super::RVector;

impl fmt::Display for RVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            VectorData::Null => return write!(f, "NULL"),
            VectorData::List(items) => {
                write!(f, "list(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                return write!(f, ")");
            }
            _ => {}
        }
        for i in 0..self.len() {
            if i > 0 {
                write!(f, " ")?;
            }
            match self.data() {
                VectorData::Raw(v) => write!(f, "{:02x}", v[i])?,
                VectorData::Logical(v) => {
                    if is_na_logical(v[i]) {
                        write!(f, "NA")?;
                    } else if v[i] == LOGICAL_TRUE {
                        write!(f, "TRUE")?;
                    } else {
                        write!(f, "FALSE")?;
                    }
                }
                VectorData::Int(_) | VectorData::IntSeq { .. } => {
                    let x = self.int_at(i);
                    if is_na_int(x) {
                        write!(f, "NA")?;
                    } else {
                        write!(f, "{}", x)?;
                    }
                }
                VectorData::Double(_) | VectorData::DoubleSeq { .. } => {
                    write!(f, "{}", format_double(self.double_at(i)))?;
                }
                VectorData::Complex(_) => match self.as_string_at(i) {
                    Some(s) => write!(f, "{}", s)?,
                    None => write!(f, "NA")?,
                },
                VectorData::Character(v) => match &v[i] {
                    Some(s) => write!(f, "{:?}", s)?,
                    None => write!(f, "NA")?,
                },
                VectorData::Null | VectorData::List(_) => unreachable!(),
            }
        }
        Ok(())
    }
}
