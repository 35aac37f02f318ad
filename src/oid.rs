//! LFS object identifier: the SHA-256 of the object content, as 64 lowercase hex chars.
//!
//! Only the syntax is checked here. Whether the object exists is the object
//! service's business.

use std::fmt;
use std::str::FromStr;

pub const OID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid oid")]
pub struct InvalidOid;

impl Oid {
    pub fn parse(s: &str) -> Result<Self, InvalidOid> {
        if is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidOid)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn is_valid(s: &str) -> bool {
    s.len() == OID_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl FromStr for Oid {
    type Err = InvalidOid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
