//! Helpers for building FITS byte streams in tests

use crate::fits::constants::layout;
use crate::fits::header::Card;

/// Serialize one HDU: its cards, `END`, padding, the raw data and padding
pub(crate) fn hdu_bytes(cards: &[Card], data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for card in cards {
        bytes.extend_from_slice(card.to_record().as_bytes());
    }
    bytes.extend_from_slice(format!("{:<80}", "END").as_bytes());
    pad(&mut bytes, b' ');

    bytes.extend_from_slice(data);
    pad(&mut bytes, 0);
    bytes
}

fn pad(bytes: &mut Vec<u8>, fill: u8) {
    let remainder = bytes.len() % layout::BLOCK_SIZE;
    if remainder != 0 {
        bytes.resize(bytes.len() + layout::BLOCK_SIZE - remainder, fill);
    }
}

/// Cards of a primary HDU with no data
pub(crate) fn empty_primary() -> Vec<Card> {
    vec![
        Card::new("SIMPLE", true),
        Card::new("BITPIX", 8i64),
        Card::new("NAXIS", 0i64),
        Card::new("EXTEND", true),
    ]
}

/// Cards of a 2D image HDU, primary or extension
pub(crate) fn image_cards(extension: bool, bitpix: i64, width: usize, height: usize) -> Vec<Card> {
    let mut cards = if extension {
        vec![Card::new("XTENSION", "IMAGE")]
    } else {
        vec![Card::new("SIMPLE", true)]
    };
    cards.push(Card::new("BITPIX", bitpix));
    cards.push(Card::new("NAXIS", 2i64));
    cards.push(Card::new("NAXIS1", width));
    cards.push(Card::new("NAXIS2", height));
    if extension {
        cards.push(Card::new("PCOUNT", 0i64));
        cards.push(Card::new("GCOUNT", 1i64));
    }
    cards
}

/// Big-endian bytes of 16-bit samples
pub(crate) fn i16_bytes(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// A gnomonic WCS as header cards
pub(crate) fn tan_cards() -> Vec<Card> {
    vec![
        Card::new("CTYPE1", "RA---TAN"),
        Card::new("CTYPE2", "DEC--TAN"),
        Card::new("CRVAL1", 83.633),
        Card::new("CRVAL2", 22.0145),
        Card::new("CRPIX1", 5.0).with_comment("Pixel coordinate of reference point"),
        Card::new("CRPIX2", 6.0).with_comment("Pixel coordinate of reference point"),
        Card::new("CD1_1", -5.0e-4),
        Card::new("CD1_2", 0.0),
        Card::new("CD2_1", 0.0),
        Card::new("CD2_2", 5.0e-4),
    ]
}
