//! YAML key configuration (spec.md §4.J, §6 "Key file format").

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    Ksk,
    Zsk,
}

/// One entry of the key configuration list. `key_file` points at a
/// PEM-encoded private key (PKCS#1 or PKCS#8 for RSA, PKCS#8 for ECDSA);
/// `not_before`/`not_after` are Unix timestamps bounding the key's validity.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyConfigEntry {
    #[serde(rename = "type")]
    pub role: KeyRole,
    pub domain: String,
    pub algorithm: String,
    pub not_before: u64,
    pub not_after: u64,
    pub key_file: String,
}

/// Parse a key configuration document: a bare YAML list of entries.
pub fn parse(yaml: &str) -> Result<Vec<KeyConfigEntry>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_entry() {
        let yaml = "\
- type: ksk
  domain: example.com.
  algorithm: RSASHA256
  not_before: 1700000000
  not_after: 1800000000
  key_file: /etc/rsdns/keys/example.com.ksk.pem
";
        let entries = parse(yaml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].role, KeyRole::Ksk);
        assert_eq!(entries[0].algorithm, "RSASHA256");
    }
}
