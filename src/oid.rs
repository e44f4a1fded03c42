//! ASN.1 Object Identifiers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, str};
use smallvec::SmallVec;
use crate::error::{Error, ErrorKind};


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’.
///
/// Values of this type keep the sequence of integers, the _arcs._ There
/// are at least two of them, the first one is 0, 1, or 2 and if it is 0 or
/// 1, the second one is at most 39. These rules are checked whenever an
/// object identifier is created.
///
/// # BER Encoding
///
/// The first two arcs are combined into a single value, 40 times the first
/// plus the second. This value and all following arcs are then encoded in
/// base 128, most significant group first, with the top bit set in all
/// octets of a group but the last one. DER requires each group to be
/// minimal, i.e., it must not start with an octet 0x80.
///
/// # Limitations
///
/// Arcs are kept as `u128`, which covers all arcs in practical use
/// including UUID based ones. Larger arcs are rejected.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Oid(SmallVec<[u128; 8]>);

impl Oid {
    /// Creates an object identifier from its arcs.
    pub fn new(arcs: &[u128]) -> Result<Self, Error> {
        Self::from_arcs(arcs.iter().copied())
    }

    /// Creates an object identifier from an iterator over its arcs.
    pub fn from_arcs<I: IntoIterator<Item = u128>>(
        arcs: I
    ) -> Result<Self, Error> {
        let arcs: SmallVec<[u128; 8]> = arcs.into_iter().collect();
        Self::check(&arcs)?;
        Ok(Oid(arcs))
    }

    fn check(arcs: &[u128]) -> Result<(), Error> {
        if arcs.len() < 2 {
            return Err(Error::new(ErrorKind::InvalidOid, "less than 2 arcs"))
        }
        match arcs[0] {
            0 | 1 => {
                if arcs[1] > 39 {
                    return Err(Error::new(
                        ErrorKind::InvalidOid, "second arc is too wide"
                    ))
                }
            }
            2 => {
                if arcs[1] > u128::MAX - 80 {
                    return Err(Error::new(
                        ErrorKind::InvalidOid, "second arc is too wide"
                    ))
                }
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidOid, "unacceptable first arc value"
                ))
            }
        }
        Ok(())
    }

    /// Returns the arcs.
    pub fn arcs(&self) -> &[u128] {
        &self.0
    }

    /// Returns an iterator over the arcs.
    pub fn iter(&self) -> impl Iterator<Item = u128> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of arcs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always returns `false` as an object identifier has at least two arcs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new object identifier with `arc` appended.
    pub fn child(&self, arc: u128) -> Self {
        let mut res = self.clone();
        res.0.push(arc);
        res
    }

    /// Returns a new object identifier with all of `arcs` appended.
    pub fn join<I: IntoIterator<Item = u128>>(&self, arcs: I) -> Self {
        let mut res = self.clone();
        res.0.extend(arcs);
        res
    }

    /// Returns whether `other` is a prefix of `self`.
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Appends the content octets to `target`.
    pub(crate) fn append_content(&self, target: &mut Vec<u8>) {
        let first = if self.0[0] == 2 {
            80 + self.0[1]
        }
        else {
            self.0[0] * 40 + self.0[1]
        };
        append_arc(first, target);
        for arc in &self.0[2..] {
            append_arc(*arc, target)
        }
    }

    /// Decodes content octets.
    ///
    /// Returns the object identifier and whether any arc was encoded with
    /// leading 0x80 octets which is only accepted if `bered` is true.
    pub(crate) fn from_content(
        content: &[u8], bered: bool,
    ) -> Result<(Self, bool), Error> {
        if content.is_empty() {
            xerr!(return Err(Error::not_enough("zero length")))
        }
        let mut arcs = SmallVec::<[u128; 8]>::new();
        let mut ber_encoded = false;
        let mut content = content;
        while !content.is_empty() {
            if content[0] == 0x80 {
                if !bered {
                    xerr!(return Err(Error::new(
                        ErrorKind::InvalidOid, "non normalized arc encoding"
                    )))
                }
                ber_encoded = true;
            }
            let mut arc = 0u128;
            loop {
                let octet = match content.split_first() {
                    Some((octet, rest)) => {
                        content = rest;
                        *octet
                    }
                    None => xerr!(return Err(Error::new(
                        ErrorKind::InvalidOid, "unfinished OID"
                    )))
                };
                if arc > u128::MAX >> 7 {
                    xerr!(return Err(Error::new(
                        ErrorKind::InvalidOid, "too big arc"
                    )))
                }
                arc = arc << 7 | u128::from(octet & 0x7f);
                if octet & 0x80 == 0 {
                    break
                }
            }
            if arcs.is_empty() {
                let (first, second) = match arc {
                    0..=39 => (0, arc),
                    40..=79 => (1, arc - 40),
                    _ => (2, arc - 80),
                };
                arcs.push(first);
                arcs.push(second);
            }
            else {
                arcs.push(arc)
            }
        }
        Ok((Oid(arcs), ber_encoded))
    }
}

fn append_arc(arc: u128, target: &mut Vec<u8>) {
    let mut groups = 1;
    let mut rest = arc >> 7;
    while rest != 0 {
        groups += 1;
        rest >>= 7;
    }
    for i in (0..groups).rev() {
        let octet = ((arc >> (7 * i)) & 0x7f) as u8;
        target.push(if i == 0 { octet } else { octet | 0x80 });
    }
}


//--- FromStr

impl str::FromStr for Oid {
    type Err = Error;

    /// Parses the dotted integer notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s.split('.').map(|arc| {
            if arc.is_empty() || !arc.bytes().all(|ch| ch.is_ascii_digit()) {
                return Err(Error::new(
                    ErrorKind::InvalidOid, format!("invalid arc '{}'", arc)
                ))
            }
            arc.parse::<u128>().map_err(|_| Error::new(
                ErrorKind::InvalidOid, "too big arc"
            ))
        }).collect::<Result<SmallVec<[u128; 8]>, _>>()?;
        Self::check(&arcs)?;
        Ok(Oid(arcs))
    }
}


//--- Display and Debug

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if first {
                first = false
            }
            else {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn encoded(oid: &Oid) -> Vec<u8> {
        let mut res = Vec::new();
        oid.append_content(&mut res);
        res
    }

    #[test]
    fn construction() {
        assert_eq!(Oid::new(&[1, 2, 3]).unwrap().to_string(), "1.2.3");
        assert_eq!(
            Oid::new(&[3, 1]).unwrap_err().kind(), ErrorKind::InvalidOid
        );
        assert_eq!(
            Oid::new(&[1]).unwrap_err().message(), "less than 2 arcs"
        );
        assert_eq!(
            Oid::new(&[1, 40]).unwrap_err().message(),
            "second arc is too wide"
        );
        assert!(Oid::new(&[2, 999]).is_ok());
        assert!("1.2.840.113549".parse::<Oid>().is_ok());
        assert!("1..2".parse::<Oid>().is_err());
        assert!("1.+2".parse::<Oid>().is_err());
        assert!("3.2".parse::<Oid>().is_err());
    }

    #[test]
    fn join() {
        let base = Oid::new(&[1, 3, 6]).unwrap();
        assert_eq!(base.child(1).to_string(), "1.3.6.1");
        let joined = base.join(vec![1, 5]);
        assert_eq!(joined.to_string(), "1.3.6.1.5");
        assert!(joined.starts_with(&base));
        assert!(!base.starts_with(&joined));
    }

    #[test]
    fn content() {
        let oid = Oid::new(&[1, 2, 3]).unwrap();
        assert_eq!(encoded(&oid), b"\x2A\x03");
        let oid: Oid = "1.2.840.113549.1.1.11".parse().unwrap();
        assert_eq!(
            encoded(&oid), b"\x2A\x86\x48\x86\xF7\x0D\x01\x01\x0B"
        );
        assert_eq!(Oid::from_content(&encoded(&oid), false).unwrap().0, oid);

        let oid = Oid::new(&[2, 999, 3]).unwrap();
        assert_eq!(encoded(&oid), b"\x88\x37\x03");
        assert_eq!(Oid::from_content(b"\x88\x37\x03", false).unwrap().0, oid);

        assert_eq!(
            Oid::from_content(b"\x00", false).unwrap().0.to_string(), "0.0"
        );
        assert_eq!(
            Oid::from_content(b"\x50", false).unwrap().0.to_string(), "2.0"
        );
    }

    #[test]
    fn content_failures() {
        assert_eq!(
            Oid::from_content(b"", false).unwrap_err().kind(),
            ErrorKind::NotEnoughData
        );
        assert_eq!(
            Oid::from_content(b"\x2A\x86", false).unwrap_err().message(),
            "unfinished OID"
        );
        let err = Oid::from_content(b"\x2A\x80\x03", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOid);
        let (oid, ber) = Oid::from_content(b"\x2A\x80\x03", true).unwrap();
        assert!(ber);
        assert_eq!(oid.to_string(), "1.2.3");
    }
}
