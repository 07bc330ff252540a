//! Minimal zone-file loader (spec.md §6): a line-oriented tokenizer over
//! whitespace/quote-delimited tokens with backslash escapes, `$ORIGIN`/`$TTL`
//! directives, and `OWNER [TTL] [CLASS] TYPE RDATA...` records, feeding
//! [`Zone::add`]. This sits outside the core per spec.md §1 — it exists here
//! only as the demo binary's way of getting a zone onto disk into memory —
//! so it supports a practical subset of record types rather than all twenty.

use crate::dns::name::Name;
use crate::dns::rdata::address::{Aaaa, A};
use crate::dns::rdata::mx::Mx;
use crate::dns::rdata::name_based::{Cname, Dname, Ns, Ptr};
use crate::dns::rdata::sec::dnskey::Dnskey;
use crate::dns::rdata::sec::ds::Ds;
use crate::dns::rdata::sec::nsec3param::Nsec3Param;
use crate::dns::rdata::soa::Soa;
use crate::dns::rdata::txt::Txt;
use crate::dns::rdata::RData;
use crate::dns::rr::RRset;
use crate::dns::{Class, CLASS_CH, CLASS_HS, CLASS_IN};
use crate::error::MasterFileError;
use crate::zone::tree::Zone;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Tokenize a single logical line (after paren-continuation joining) into
/// whitespace/quote-delimited tokens. `;` starts a comment to end of line
/// unless quoted; `\` escapes the following character so it cannot act as a
/// delimiter (the escape itself is retained so [`Name::from_presentation`]
/// can later decode `\DDD`/`\.`/`\\` on name-shaped tokens).
fn tokenize_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            in_token = true;
            continue;
        }
        if c == '\\' {
            current.push('\\');
            escaped = true;
            in_token = true;
            continue;
        }
        if quoted {
            if c == '"' {
                quoted = false;
            } else {
                current.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                quoted = true;
                in_token = true;
            }
            ';' => break,
            '(' | ')' => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Join physical lines whose parenthesis nesting is unbalanced into one
/// logical line, recording the 1-based physical line number each logical
/// line started on (for error messages) and whether it began with
/// whitespace (owner-field omission).
struct LogicalLine {
    line_no: usize,
    owner_omitted: bool,
    text: String,
}

fn logical_lines(input: &str) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut depth: i32 = 0;
    let mut buf = String::new();
    let mut start_line = 0usize;
    let mut owner_omitted = false;

    for (i, raw_line) in input.lines().enumerate() {
        if buf.is_empty() {
            start_line = i + 1;
            owner_omitted = raw_line.starts_with(' ') || raw_line.starts_with('\t');
        }
        for ch in raw_line.chars() {
            match ch {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
        }
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(raw_line);
        if depth <= 0 {
            out.push(LogicalLine {
                line_no: start_line,
                owner_omitted,
                text: std::mem::take(&mut buf),
            });
            depth = 0;
        }
    }
    if !buf.is_empty() {
        out.push(LogicalLine {
            line_no: start_line,
            owner_omitted,
            text: buf,
        });
    }
    out
}

fn parse_class(token: &str) -> Option<Class> {
    match token.to_ascii_uppercase().as_str() {
        "IN" => Some(CLASS_IN),
        "CH" => Some(CLASS_CH),
        "HS" => Some(CLASS_HS),
        _ => None,
    }
}

/// Load a zone master file's text into a [`Zone`]. Does not call
/// [`Zone::verify`] — callers do that once loading (and any key/signature
/// bootstrap) is complete.
pub fn load(text: &str, apex: Name, class: Class) -> Result<Zone, MasterFileError> {
    let mut zone = Zone::new(apex.clone(), class);
    let mut origin = apex;
    let mut default_ttl: Option<u32> = None;
    let mut last_owner: Option<Name> = None;

    for line in logical_lines(text) {
        let tokens = tokenize_line(&line.text);
        if tokens.is_empty() {
            continue;
        }

        if tokens[0].eq_ignore_ascii_case("$origin") {
            let name = tokens.get(1).ok_or_else(|| MasterFileError::Syntax {
                line: line.line_no,
                reason: "$ORIGIN requires a domain name argument".to_string(),
            })?;
            origin = parse_name(name, &origin, line.line_no)?;
            continue;
        }
        if tokens[0].eq_ignore_ascii_case("$ttl") {
            let ttl = tokens.get(1).ok_or_else(|| MasterFileError::Syntax {
                line: line.line_no,
                reason: "$TTL requires a value".to_string(),
            })?;
            default_ttl = Some(ttl.parse().map_err(|_| MasterFileError::Syntax {
                line: line.line_no,
                reason: format!("invalid $TTL value {ttl:?}"),
            })?);
            continue;
        }

        let mut rest = &tokens[..];
        let owner = if line.owner_omitted {
            last_owner.clone().ok_or(MasterFileError::NoPreviousOwner { line: line.line_no })?
        } else {
            let name = parse_name(&rest[0], &origin, line.line_no)?;
            rest = &rest[1..];
            name
        };

        let mut ttl = default_ttl;
        let mut rtype_class = class;
        while let Some(tok) = rest.first() {
            if let Ok(v) = tok.parse::<u32>() {
                ttl = Some(v);
                rest = &rest[1..];
                continue;
            }
            if let Some(c) = parse_class(tok) {
                rtype_class = c;
                rest = &rest[1..];
                continue;
            }
            break;
        }
        let rtype_token = rest.first().ok_or_else(|| MasterFileError::Syntax {
            line: line.line_no,
            reason: "record has no type field".to_string(),
        })?;
        let rdata_tokens = &rest[1..];
        let ttl = ttl.ok_or_else(|| MasterFileError::Syntax {
            line: line.line_no,
            reason: "no TTL in scope (record omits it and no $TTL directive seen)".to_string(),
        })?;

        let rdata = parse_rdata(rtype_token, rdata_tokens, &origin, line.line_no)?;
        zone
            .add(RRset::singleton(owner.clone(), rtype_class, ttl, rdata))
            .map_err(|source| MasterFileError::Zone { line: line.line_no, source })?;
        last_owner = Some(owner);
    }

    Ok(zone)
}

fn parse_name(token: &str, origin: &Name, line_no: usize) -> Result<Name, MasterFileError> {
    let absolute = if token.ends_with('.') {
        token.to_string()
    } else if token == "@" {
        return Ok(origin.clone());
    } else {
        format!("{token}.{origin}")
    };
    Name::from_presentation(&absolute).map_err(|source| MasterFileError::BadName {
        line: line_no,
        name: token.to_string(),
        source,
    })
}

fn parse_rdata(rtype: &str, tokens: &[String], origin: &Name, line_no: usize) -> Result<RData, MasterFileError> {
    let want = |n: usize| -> Result<(), MasterFileError> {
        if tokens.len() < n {
            Err(MasterFileError::Syntax {
                line: line_no,
                reason: format!("{rtype} record needs at least {n} field(s), has {}", tokens.len()),
            })
        } else {
            Ok(())
        }
    };
    let num = |t: &str, field: &str| -> Result<u32, MasterFileError> {
        t.parse().map_err(|_| MasterFileError::Syntax {
            line: line_no,
            reason: format!("invalid {field} value {t:?}"),
        })
    };

    match rtype.to_ascii_uppercase().as_str() {
        "A" => {
            want(1)?;
            let addr: Ipv4Addr = tokens[0].parse().map_err(|_| MasterFileError::Syntax {
                line: line_no,
                reason: format!("invalid IPv4 address {:?}", tokens[0]),
            })?;
            Ok(RData::A(A(addr)))
        }
        "AAAA" => {
            want(1)?;
            let addr: Ipv6Addr = tokens[0].parse().map_err(|_| MasterFileError::Syntax {
                line: line_no,
                reason: format!("invalid IPv6 address {:?}", tokens[0]),
            })?;
            Ok(RData::Aaaa(Aaaa(addr)))
        }
        "NS" => {
            want(1)?;
            Ok(RData::Ns(Ns(parse_name(&tokens[0], origin, line_no)?)))
        }
        "CNAME" => {
            want(1)?;
            Ok(RData::Cname(Cname(parse_name(&tokens[0], origin, line_no)?)))
        }
        "DNAME" => {
            want(1)?;
            Ok(RData::Dname(Dname(parse_name(&tokens[0], origin, line_no)?)))
        }
        "PTR" => {
            want(1)?;
            Ok(RData::Ptr(Ptr(parse_name(&tokens[0], origin, line_no)?)))
        }
        "MX" => {
            want(2)?;
            Ok(RData::Mx(Mx {
                preference: num(&tokens[0], "preference")? as u16,
                exchange: parse_name(&tokens[1], origin, line_no)?,
            }))
        }
        "TXT" => {
            if tokens.is_empty() {
                return Ok(RData::Txt(Txt { strings: Vec::new() }));
            }
            Ok(RData::Txt(Txt {
                strings: tokens.iter().map(|t| t.as_bytes().to_vec()).collect(),
            }))
        }
        "SOA" => {
            want(7)?;
            Ok(RData::Soa(Soa {
                mname: parse_name(&tokens[0], origin, line_no)?,
                rname: parse_name(&tokens[1], origin, line_no)?,
                serial: num(&tokens[2], "serial")?,
                refresh: num(&tokens[3], "refresh")?,
                retry: num(&tokens[4], "retry")?,
                expire: num(&tokens[5], "expire")?,
                minimum: num(&tokens[6], "minimum")?,
            }))
        }
        "DNSKEY" => {
            want(4)?;
            Ok(RData::Dnskey(Dnskey {
                flags: num(&tokens[0], "flags")? as u16,
                protocol: num(&tokens[1], "protocol")? as u8,
                algorithm: num(&tokens[2], "algorithm")? as u8,
                pub_key: data_encoding::BASE64
                    .decode(tokens[3..].join("").as_bytes())
                    .map_err(|_| MasterFileError::Syntax {
                        line: line_no,
                        reason: "invalid base64 DNSKEY public key".to_string(),
                    })?,
            }))
        }
        "DS" => {
            want(4)?;
            Ok(RData::Ds(Ds {
                key_tag: num(&tokens[0], "key_tag")? as u16,
                algorithm: num(&tokens[1], "algorithm")? as u8,
                digest_type: num(&tokens[2], "digest_type")? as u8,
                digest: hex_decode(&tokens[3..].join(""), line_no)?,
            }))
        }
        "NSEC3PARAM" => {
            want(4)?;
            Ok(RData::Nsec3Param(Nsec3Param {
                hash_algorithm: num(&tokens[0], "hash_algorithm")? as u8,
                flags: num(&tokens[1], "flags")? as u8,
                iterations: num(&tokens[2], "iterations")? as u16,
                salt: if tokens[3] == "-" {
                    Vec::new()
                } else {
                    hex_decode(&tokens[3], line_no)?
                },
            }))
        }
        other => Err(MasterFileError::UnsupportedType {
            line: line_no,
            rtype: other.to_string(),
        }),
    }
}

fn hex_decode(s: &str, line_no: usize) -> Result<Vec<u8>, MasterFileError> {
    data_encoding::HEXUPPER
        .decode(s.to_ascii_uppercase().as_bytes())
        .map_err(|_| MasterFileError::Syntax {
            line: line_no,
            reason: format!("invalid hex string {s:?}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{CLASS_IN, TYPE_A, TYPE_SOA};

    #[test]
    fn tokenizes_quoted_and_escaped_text() {
        let tokens = tokenize_line(r#"www IN TXT "hello world" foo\ bar ; trailing comment"#);
        assert_eq!(tokens, vec!["www", "IN", "TXT", "hello world", "foo\\ bar"]);
    }

    #[test]
    fn loads_a_minimal_zone() {
        let text = "\
$TTL 3600
example.com. IN SOA ns1.example.com. hostmaster.example.com. 1 3600 600 604800 60
            NS ns1.example.com.
www         IN A 192.0.2.1
";
        let origin = Name::from_presentation("example.com.").unwrap();
        let mut zone = load(text, origin.clone(), CLASS_IN).unwrap();
        zone.verify().unwrap();
        assert_eq!(zone.soa().unwrap().rtype, TYPE_SOA);
        let www = zone.node(&Name::from_presentation("www.example.com.").unwrap()).unwrap();
        assert_eq!(www.get(TYPE_A).unwrap().rdata.len(), 1);
    }

    #[test]
    fn continuation_parens_span_lines() {
        let text = "\
$TTL 60
example.com. IN SOA ns1.example.com. hostmaster.example.com. (
    1
    3600
    600
    604800
    60
)
example.com. IN NS ns1.example.com.
";
        let origin = Name::from_presentation("example.com.").unwrap();
        let mut zone = load(text, origin.clone(), CLASS_IN).unwrap();
        zone.verify().unwrap();
    }

    #[test]
    fn unsupported_type_is_reported() {
        let text = "example.com. IN HINFO foo bar\n";
        let origin = Name::from_presentation("example.com.").unwrap();
        let err = load(text, origin, CLASS_IN).unwrap_err();
        assert!(matches!(err, MasterFileError::UnsupportedType { .. }));
    }
}
