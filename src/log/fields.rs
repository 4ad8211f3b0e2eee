//! Labeled field tokenizer for log lines
//!
//! A line is `T:<tick> AType:<marker>` followed by `KEY:value` fields in any
//! order. Values may contain spaces (aircraft type names do), so a value runs
//! until the next word that starts a new key. Positions are written as
//! `POS(x,y,z)` or as a bare `(x,y,z)` group.

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{alpha0, alpha1, char, digit1, space0, space1},
    combinator::{map, map_res},
    number::complete::double,
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

use crate::core::types::{ObjectId, Position, Tick};

/// Key used for the position group, bare `(x,y,z)` included
pub const POSITION_KEY: &str = "POS";

/// Parse the `T:<tick> AType:<marker>` prefix
pub fn header(input: &str) -> IResult<&str, (Tick, u32)> {
    (
        preceded(tag("T:"), map_res(digit1, |s: &str| s.parse::<Tick>())),
        preceded(
            (space1, tag("AType:")),
            map_res(digit1, |s: &str| s.parse::<u32>()),
        ),
    )
        .parse(input)
}

/// `KEY:` at the start of a word
fn key_prefix(word: &str) -> IResult<&str, &str> {
    terminated(alpha1, char(':')).parse(word)
}

/// `KEY(...)` or `(...)`, returns the key and the inner text
fn paren_group(word: &str) -> IResult<&str, (&str, &str)> {
    (alpha0, delimited(char('('), take_until(")"), char(')'))).parse(word)
}

/// Three comma separated numbers
fn coords(input: &str) -> IResult<&str, Position> {
    map(
        (
            preceded(space0, double),
            preceded((space0, char(','), space0), double),
            preceded((space0, char(','), space0), double),
        ),
        |(x, y, z)| Position::new(x, y, z),
    )
    .parse(input)
}

/// Fields of one line, in the order they appeared
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    /// Tokenize everything after the header
    pub fn parse(rest: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        let words: Vec<&str> = rest.split_whitespace().collect();
        let mut i = 0;

        while i < words.len() {
            let word = words[i];
            i += 1;

            // Position groups may be split across words: "POS(1.0," "2.0," "3.0)"
            if word.contains('(') && !word.contains(')') && starts_group(word) {
                if let Some(len) = group_len(&words[i..]) {
                    let group = &words[i - 1..i + len];
                    i += len;
                    if !push_group(&mut entries, &group.concat()) {
                        append_to_value(&mut entries, &group.join(" "));
                    }
                    continue;
                }
            }

            // A bare group that is not a coordinate triple belongs to the value
            if push_group(&mut entries, word) {
                continue;
            }

            match key_prefix(word) {
                Ok((value, key)) => entries.push((key.to_string(), value.to_string())),
                Err(_) => append_to_value(&mut entries, word),
            }
        }

        Self { entries }
    }

    /// Raw value of the first field with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
    }

    /// Id field, `ObjectId::NONE` when missing or unparsable
    pub fn id(&self, key: &str) -> ObjectId {
        self.get(key)
            .and_then(|v| v.parse::<i64>().ok())
            .map(ObjectId)
            .unwrap_or(ObjectId::NONE)
    }

    /// Integer field, `None` when missing or unparsable
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse::<i64>().ok())
    }

    /// Float field, 0.0 when missing, unparsable or not finite
    pub fn float(&self, key: &str) -> f64 {
        self.get(key)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Text field, empty when missing
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Flag field written as `KEY:1`
    pub fn flag(&self, key: &str) -> bool {
        self.int(key).is_some_and(|v| v == 1)
    }

    pub fn position(&self) -> Option<Position> {
        self.get(POSITION_KEY)
            .and_then(|inner| coords(inner).ok())
            .map(|(_, pos)| pos)
    }

    /// True when any field value contains `needle`, ignoring case
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.entries
            .iter()
            .any(|(_, v)| v.to_lowercase().contains(&needle))
    }
}

fn starts_group(word: &str) -> bool {
    alpha0::<&str, nom::error::Error<&str>>(word)
        .map(|(rest, _)| rest.starts_with('('))
        .unwrap_or(false)
}

/// Words needed to close an open group, `None` if a key or the end comes first
fn group_len(rest: &[&str]) -> Option<usize> {
    for (n, word) in rest.iter().enumerate() {
        if word.contains(')') {
            return Some(n + 1);
        }
        if key_prefix(word).is_ok() {
            return None;
        }
    }
    None
}

/// Push a keyed group or a bare coordinate triple; false if neither
fn push_group(entries: &mut Vec<(String, String)>, joined: &str) -> bool {
    match paren_group(joined) {
        Ok((_, (key, inner))) if !key.is_empty() || coords(inner).is_ok() => {
            let key = if key.is_empty() { POSITION_KEY } else { key };
            entries.push((key.to_string(), inner.to_string()));
            true
        }
        _ => false,
    }
}

fn append_to_value(entries: &mut [(String, String)], text: &str) {
    // Stray text before the first key carries no label
    if let Some((_, value)) = entries.last_mut() {
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header() {
        let (rest, (tick, marker)) = header("T:1234 AType:12 ID:5").unwrap();
        assert_eq!(tick, 1234);
        assert_eq!(marker, 12);
        assert_eq!(rest, " ID:5");
    }

    #[test]
    fn test_header_rejects_garbage() {
        assert!(header("AType:12 T:5").is_err());
        assert!(header("T:abc AType:2").is_err());
    }

    #[test]
    fn test_values_with_spaces_run_to_next_key() {
        let fields = Fields::parse("ID:7 TYPE:Bf 109 F-4 COUNTRY:201 NAME:Plane");
        assert_eq!(fields.get("TYPE"), Some("Bf 109 F-4"));
        assert_eq!(fields.int("COUNTRY"), Some(201));
        assert_eq!(fields.text("NAME"), "Plane");
    }

    #[test]
    fn test_exact_keys() {
        // PID must not be confused with ID
        let fields = Fields::parse("PID:42 ID:7");
        assert_eq!(fields.id("ID"), ObjectId(7));
        assert_eq!(fields.id("PID"), ObjectId(42));
    }

    #[test]
    fn test_missing_fields_use_sentinels() {
        let fields = Fields::parse("AID:-1 DMG:abc");
        assert_eq!(fields.id("AID"), ObjectId::NONE);
        assert_eq!(fields.id("TID"), ObjectId::NONE);
        assert_eq!(fields.float("DMG"), 0.0);
        assert_eq!(fields.float("MISSING"), 0.0);
    }

    #[test]
    fn test_position_forms() {
        let fields = Fields::parse("AID:1 POS(100.5,230.9,-45.0)");
        assert_eq!(fields.position(), Some(Position::new(100.5, 230.9, -45.0)));

        let bare = Fields::parse("PLID:1 RCT:0 (1.0,2.0,3.0) NAME:x");
        assert_eq!(bare.position(), Some(Position::new(1.0, 2.0, 3.0)));
        assert_eq!(bare.get("RCT"), Some("0"));

        let split = Fields::parse("PID:3 POS(1.0, 2.0, 3.0)");
        assert_eq!(split.position(), Some(Position::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_bare_group_in_type_name_stays_in_value() {
        let fields = Fields::parse("ID:4 TYPE:LaGG-3 (ser.29) COUNTRY:101");
        assert_eq!(fields.get("TYPE"), Some("LaGG-3 (ser.29)"));
        assert_eq!(fields.position(), None);
    }

    #[test]
    fn test_unclosed_paren_stays_in_value() {
        let fields = Fields::parse("NAME:Ivan (Ace TYPE:Yak-1 ser.69 COUNTRY:101 ISPL:1");
        assert_eq!(fields.get("NAME"), Some("Ivan (Ace"));
        assert_eq!(fields.get("TYPE"), Some("Yak-1 ser.69"));
        assert_eq!(fields.int("COUNTRY"), Some(101));
        assert!(fields.flag("ISPL"));

        let trailing = Fields::parse("NAME:Ivan (Ace");
        assert_eq!(trailing.get("NAME"), Some("Ivan (Ace"));

        let words = Fields::parse("TYPE:LaGG-3 (ser 29) COUNTRY:101");
        assert_eq!(words.get("TYPE"), Some("LaGG-3 (ser 29)"));
        assert_eq!(words.position(), None);
    }

    #[test]
    fn test_value_with_colons() {
        let fields = Fields::parse("GDate:1942.9.19 GTime:14:30:0");
        assert_eq!(fields.get("GTime"), Some("14:30:0"));
    }

    #[test]
    fn test_empty_value() {
        let fields = Fields::parse("SKIN: WM:1");
        assert_eq!(fields.get("SKIN"), Some(""));
        assert!(fields.flag("WM"));
    }

    #[test]
    fn test_mentions_ignores_case() {
        let fields = Fields::parse("ID:9 TYPE:Paratrooper_GER");
        assert!(fields.mentions("paratrooper"));
        assert!(!fields.mentions("parachute"));
    }
}
