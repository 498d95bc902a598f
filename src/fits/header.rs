//! FITS header cards and the flat key-value header
//!
//! A header is an ordered list of 80-character cards. Valued keywords are
//! unique and looked up case-insensitively; commentary cards (COMMENT,
//! HISTORY and blank keywords) may repeat and carry free text.

use std::fmt;
use lazy_static::lazy_static;
use regex::Regex;

use crate::fits::constants::{keywords, layout};
use crate::fits::errors::{FitsError, FitsResult};

lazy_static! {
    static ref LOGICAL_VALUE: Regex = Regex::new(r"^[TF]$").expect("valid logical regex");
    static ref INTEGER_VALUE: Regex = Regex::new(r"^[+-]?\d+$").expect("valid integer regex");
    static ref REAL_VALUE: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([EeDd][+-]?\d+)?$").expect("valid real regex");
}

/// Value of a header keyword
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Logical value (T or F)
    Logical(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Real(f64),
    /// Character string value
    Text(String),
}

impl HeaderValue {
    /// Numeric value as f64, for integers and reals
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Real(v) => Some(*v),
            HeaderValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer value; reals are accepted only when they hold an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Integer(v) => Some(*v),
            HeaderValue::Real(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HeaderValue::Logical(b) => Some(*b),
            _ => None,
        }
    }

    /// Parse the value field of a card (everything before the comment)
    fn parse_field(field: &str) -> Option<HeaderValue> {
        let field = field.trim();
        if field.is_empty() {
            return None;
        }

        if LOGICAL_VALUE.is_match(field) {
            Some(HeaderValue::Logical(field == "T"))
        } else if INTEGER_VALUE.is_match(field) {
            // Integers too large for i64 fall back to a real
            field.parse::<i64>()
                .map(HeaderValue::Integer)
                .or_else(|_| field.parse::<f64>().map(HeaderValue::Real))
                .ok()
        } else if REAL_VALUE.is_match(field) {
            field.replace(['D', 'd'], "E").parse::<f64>().ok().map(HeaderValue::Real)
        } else {
            // Complex and other non-standard values are kept verbatim
            Some(HeaderValue::Text(field.to_string()))
        }
    }

    /// Format the value the way it appears in a fixed-format card
    fn format_field(&self) -> String {
        match self {
            HeaderValue::Logical(b) => {
                format!("{:>20}", if *b { "T" } else { "F" })
            },
            HeaderValue::Integer(v) => format!("{:>20}", v),
            HeaderValue::Real(v) => format!("{:>20}", format_real(*v)),
            HeaderValue::Text(s) => format!("'{:<8}'", escape_text(s)),
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Logical(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            HeaderValue::Integer(v) => write!(f, "{}", v),
            HeaderValue::Real(v) => write!(f, "{}", format_real(*v)),
            HeaderValue::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Logical(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Integer(value)
    }
}

impl From<usize> for HeaderValue {
    fn from(value: usize) -> Self {
        HeaderValue::Integer(value as i64)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Real(value)
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

/// Format a real so that it always carries a decimal point and round-trips
fn format_real(value: f64) -> String {
    let formatted = format!("{:E}", value);
    if formatted.contains('.') || !value.is_finite() {
        return formatted;
    }
    match formatted.find('E') {
        Some(pos) => format!("{}.0{}", &formatted[..pos], &formatted[pos..]),
        None => formatted,
    }
}

/// A single header card
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Keyword, upper case, at most 8 characters
    pub keyword: String,
    /// Value, `None` for commentary cards and undefined values
    pub value: Option<HeaderValue>,
    /// Comment; for cards without a value this is the verbatim card text
    pub comment: Option<String>,
}

impl Card {
    /// Create a valued card
    pub fn new(keyword: &str, value: impl Into<HeaderValue>) -> Self {
        Card {
            keyword: keyword.trim().to_uppercase(),
            value: Some(value.into()),
            comment: None,
        }
    }

    /// Create a commentary card (COMMENT, HISTORY or blank keyword)
    pub fn commentary(keyword: &str, text: &str) -> Self {
        Card {
            keyword: keyword.trim().to_uppercase(),
            value: None,
            comment: Some(text.to_string()),
        }
    }

    /// Attach a comment to the card
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Whether this card carries text rather than a value and may repeat
    pub fn is_commentary(&self) -> bool {
        self.value.is_none() || is_commentary_keyword(&self.keyword)
    }

    /// Parse an 80-byte header record
    ///
    /// # Arguments
    /// * `record` - Exactly one card worth of bytes
    ///
    /// # Returns
    /// The parsed card, or an error for non-ASCII or truncated records
    pub fn parse(record: &[u8]) -> FitsResult<Self> {
        if record.len() != layout::CARD_LENGTH {
            return Err(FitsError::InvalidHeader(format!(
                "card must be {} bytes, got {}", layout::CARD_LENGTH, record.len())));
        }
        if let Some(bad) = record.iter().find(|b| !(0x20..=0x7e).contains(*b)) {
            return Err(FitsError::InvalidHeader(format!(
                "card contains non-printable byte {:#04x}", bad)));
        }

        // Every byte is printable ASCII, so this cannot fail
        let text = std::str::from_utf8(record)
            .map_err(|e| FitsError::InvalidHeader(e.to_string()))?;
        let keyword = text[..layout::KEYWORD_LENGTH].trim_end().to_string();
        let rest = &text[layout::KEYWORD_LENGTH..];

        let verbatim = Card {
            keyword: keyword.clone(),
            value: None,
            comment: Some(rest.trim_end().to_string()),
        };

        if is_commentary_keyword(&keyword) || !rest.starts_with("= ") {
            return Ok(verbatim);
        }

        match parse_value_and_comment(&rest[2..]) {
            (Some(value), comment) => Ok(Card { keyword, value: Some(value), comment }),
            // Undefined values are kept as written
            (None, _) => Ok(verbatim),
        }
    }

    /// Format the card as an 80-character record
    pub fn to_record(&self) -> String {
        let mut record = format!("{:<8}", self.keyword);

        match &self.value {
            Some(value) if !is_commentary_keyword(&self.keyword) => {
                record.push_str("= ");
                record.push_str(&value.format_field());
                if let Some(comment) = &self.comment {
                    record.push_str(" / ");
                    record.push_str(comment);
                }
            },
            _ => record.push_str(self.comment.as_deref().unwrap_or("")),
        }

        let mut end = record.len().min(layout::CARD_LENGTH);
        while !record.is_char_boundary(end) {
            end -= 1;
        }
        record.truncate(end);
        format!("{:<width$}", record, width = layout::CARD_LENGTH)
    }
}

/// Double the quotes of a string value, cut to what fits between the quotes
fn escape_text(text: &str) -> String {
    let mut escaped = String::new();
    for c in text.chars() {
        let width = if c == '\'' { 2 } else { c.len_utf8() };
        if escaped.len() + width > layout::MAX_TEXT_LENGTH {
            break;
        }
        if c == '\'' {
            escaped.push('\'');
        }
        escaped.push(c);
    }
    escaped
}

fn is_commentary_keyword(keyword: &str) -> bool {
    keyword.is_empty() || keyword == keywords::COMMENT || keyword == keywords::HISTORY
}

/// Split a value field into its value and trailing comment
fn parse_value_and_comment(field: &str) -> (Option<HeaderValue>, Option<String>) {
    let trimmed = field.trim_start();

    if let Some(body) = trimmed.strip_prefix('\'') {
        // Quoted string: '' is an escaped quote, a lone ' closes the string
        let mut value = String::new();
        let mut chars = body.char_indices().peekable();
        let mut end = body.len();
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if matches!(chars.peek(), Some((_, '\''))) {
                    value.push('\'');
                    chars.next();
                } else {
                    end = i + 1;
                    break;
                }
            } else {
                value.push(c);
            }
        }
        let comment = body[end..]
            .split_once('/')
            .map(|(_, c)| c.trim().to_string())
            .filter(|c| !c.is_empty());
        return (Some(HeaderValue::Text(value.trim_end().to_string())), comment);
    }

    let (value_part, comment) = match trimmed.split_once('/') {
        Some((v, c)) => (v, Some(c.trim().to_string()).filter(|c| !c.is_empty())),
        None => (trimmed, None),
    };
    (HeaderValue::parse_field(value_part), comment)
}

/// Ordered collection of header cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a header from cards, keeping their order
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Header { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn position(&self, keyword: &str) -> Option<usize> {
        let keyword = keyword.trim().to_uppercase();
        self.cards.iter().position(|c| !c.is_commentary() && c.keyword == keyword)
    }

    /// Get the card holding a keyword
    pub fn card(&self, keyword: &str) -> Option<&Card> {
        self.position(keyword).map(|i| &self.cards[i])
    }

    /// Get the value of a keyword
    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.card(keyword).and_then(|c| c.value.as_ref())
    }

    pub fn get_f64(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(HeaderValue::as_f64)
    }

    pub fn get_i64(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(HeaderValue::as_i64)
    }

    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(HeaderValue::as_str)
    }

    pub fn get_bool(&self, keyword: &str) -> Option<bool> {
        self.get(keyword).and_then(HeaderValue::as_bool)
    }

    /// Whether a valued keyword is present
    pub fn contains(&self, keyword: &str) -> bool {
        self.position(keyword).is_some()
    }

    /// Set a keyword, replacing its value in place or appending it
    ///
    /// An existing comment is kept.
    pub fn set(&mut self, keyword: &str, value: impl Into<HeaderValue>) {
        let value = value.into();
        match self.position(keyword) {
            Some(i) => self.cards[i].value = Some(value),
            None => self.cards.push(Card::new(keyword, value)),
        }
    }

    /// Insert a valued card at a position, replacing any card with the same keyword
    pub fn insert(&mut self, index: usize, card: Card) {
        if let Some(i) = self.position(&card.keyword) {
            self.cards.remove(i);
        }
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }

    /// Remove a keyword, returning its value
    pub fn remove(&mut self, keyword: &str) -> Option<HeaderValue> {
        let i = self.position(keyword)?;
        self.cards.remove(i).value
    }

    /// Append a commentary card
    pub fn add_commentary(&mut self, keyword: &str, text: &str) {
        self.cards.push(Card::commentary(keyword, text));
    }

    /// Merge another header into this one
    ///
    /// Valued keywords of `other` overwrite existing ones in place (keeping
    /// the existing comment unless `other` supplies one) and new keywords are
    /// appended. Commentary cards are appended.
    pub fn merge(&mut self, other: &Header) {
        for card in &other.cards {
            if card.is_commentary() {
                self.cards.push(card.clone());
                continue;
            }
            match self.position(&card.keyword) {
                Some(i) => {
                    let existing = &mut self.cards[i];
                    existing.value = card.value.clone();
                    if card.comment.is_some() {
                        existing.comment = card.comment.clone();
                    }
                },
                None => self.cards.push(card.clone()),
            }
        }
    }
}

impl<'h> IntoIterator for &'h Header {
    type Item = &'h Card;
    type IntoIter = std::slice::Iter<'h, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
