use super::algo::ALGO_RSAMD5;
use super::dnskey::Dnskey;

pub type KeyTag = u16;

/// RFC 4034 Appendix B: sum of the DNSKEY RDATA's wire bytes taken as 2-octet
/// big-endian groups, carries folded back in once. Algorithm 1 (RSA/MD5) is
/// a historical special case computed straight off the key modulus instead.
pub fn calc_key_tag(dnskey: &Dnskey) -> KeyTag {
    if dnskey.algorithm == ALGO_RSAMD5 {
        return calc_key_tag_for_algorithm1(dnskey);
    }

    let mut rdata = Vec::new();
    dnskey.write_canonical(&mut rdata);

    let mut ac: u32 = 0;
    for (i, &byte) in rdata.iter().enumerate() {
        if i & 1 == 1 {
            ac += byte as u32;
        } else {
            ac += (byte as u32) << 8;
        }
    }
    ac += (ac >> 16) & 0xFFFF;

    (ac & 0xFFFF) as KeyTag
}

/// RFC 4034 Appendix B.1: the 4th-to-last and 3rd-to-last octets of the
/// public key modulus. Algorithm 1 is not recommended and exists here only
/// for completeness against the registry.
fn calc_key_tag_for_algorithm1(dnskey: &Dnskey) -> KeyTag {
    let len = dnskey.pub_key.len();
    u16::from_be_bytes([dnskey.pub_key[len - 3], dnskey.pub_key[len - 2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tag_is_stable_for_same_input() {
        let key = Dnskey {
            flags: 257,
            protocol: 3,
            algorithm: 8,
            pub_key: vec![3, 1, 0, 1, 0xAB, 0xCD, 0xEF, 0x01],
        };
        let a = calc_key_tag(&key);
        let b = calc_key_tag(&key);
        assert_eq!(a, b);
    }

    #[test]
    fn key_tag_changes_with_key_material() {
        let key_a = Dnskey {
            flags: 257,
            protocol: 3,
            algorithm: 8,
            pub_key: vec![3, 1, 0, 1, 1, 2, 3, 4],
        };
        let key_b = Dnskey {
            pub_key: vec![3, 1, 0, 1, 5, 6, 7, 8],
            ..key_a.clone()
        };
        assert_ne!(calc_key_tag(&key_a), calc_key_tag(&key_b));
    }

    #[test]
    fn algorithm1_uses_modulus_special_case() {
        let key = Dnskey {
            flags: 256,
            protocol: 3,
            algorithm: ALGO_RSAMD5,
            pub_key: vec![3, 1, 0, 1, 0x12, 0x34, 0x56],
        };
        assert_eq!(calc_key_tag(&key), 0x3456);
    }
}
