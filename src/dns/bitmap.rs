//! NSEC/NSEC3 type bitmap encoding (RFC 4034 §4.1.2): a list of windows,
//! each covering 256 type codes, omitted when empty.

use crate::error::FormatError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeBitmap {
    types: BTreeSet<u16>,
}

impl TypeBitmap {
    pub fn new() -> Self {
        TypeBitmap::default()
    }

    pub fn from_types<I: IntoIterator<Item = u16>>(types: I) -> Self {
        TypeBitmap {
            types: types.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, rtype: u16) {
        self.types.insert(rtype);
    }

    pub fn contains(&self, rtype: u16) -> bool {
        self.types.contains(&rtype)
    }

    pub fn types(&self) -> impl Iterator<Item = u16> + '_ {
        self.types.iter().copied()
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        let mut window = 0u8;
        while (window as usize) <= 0xff {
            let lo = (window as u16) << 8;
            let hi = lo + 0xff;
            let in_window: Vec<u16> = self
                .types
                .range(lo..=hi)
                .copied()
                .collect();
            if !in_window.is_empty() {
                let max_byte = in_window
                    .iter()
                    .map(|t| ((t & 0xff) / 8) as usize)
                    .max()
                    .unwrap();
                let len = max_byte + 1;
                let mut bytes = vec![0u8; len];
                for t in &in_window {
                    let low = t & 0xff;
                    let byte_idx = (low / 8) as usize;
                    let bit = 7 - (low % 8);
                    bytes[byte_idx] |= 1 << bit;
                }
                out.push(window);
                out.push(len as u8);
                out.extend_from_slice(&bytes);
            }
            if window == 0xff {
                break;
            }
            window += 1;
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut types = BTreeSet::new();
        let mut i = 0;
        while i < bytes.len() {
            let window = *bytes.get(i).ok_or(FormatError::Truncated {
                offset: i,
                needed: 1,
                available: 0,
            })?;
            let len = *bytes.get(i + 1).ok_or(FormatError::Truncated {
                offset: i + 1,
                needed: 1,
                available: 0,
            })? as usize;
            if len == 0 || len > 32 {
                return Err(FormatError::BadRdata {
                    rtype: 0,
                    reason: format!("NSEC window length {} out of range 1..=32", len),
                });
            }
            let start = i + 2;
            let end = start + len;
            if end > bytes.len() {
                return Err(FormatError::Truncated {
                    offset: start,
                    needed: len,
                    available: bytes.len().saturating_sub(start),
                });
            }
            for (byte_idx, &b) in bytes[start..end].iter().enumerate() {
                for bit in 0..8u16 {
                    if b & (1 << (7 - bit)) != 0 {
                        let low = (byte_idx as u16) * 8 + bit;
                        types.insert(((window as u16) << 8) | low);
                    }
                }
            }
            i = end;
        }
        Ok(TypeBitmap { types })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_simple_types() {
        let bm = TypeBitmap::from_types([1u16, 2, 6, 15, 46, 47]);
        let mut out = Vec::new();
        bm.write(&mut out);
        let parsed = TypeBitmap::parse(&out).unwrap();
        assert_eq!(bm, parsed);
    }

    #[test]
    fn empty_window_omitted() {
        let bm = TypeBitmap::from_types([1u16, 512]);
        let mut out = Vec::new();
        bm.write(&mut out);
        // Two windows: 0 and 2, never window 1.
        assert_eq!(out[0], 0);
        let win0_len = out[1] as usize;
        let next_window_idx = 2 + win0_len;
        assert_eq!(out[next_window_idx], 2);
    }

    #[test]
    fn windows_ascending() {
        let bm = TypeBitmap::from_types([1u16, 257, 600]);
        let mut out = Vec::new();
        bm.write(&mut out);
        let mut idx = 0;
        let mut last_window: i32 = -1;
        while idx < out.len() {
            let window = out[idx] as i32;
            assert!(window > last_window);
            last_window = window;
            let len = out[idx + 1] as usize;
            idx += 2 + len;
        }
    }
}
