//! FITS format constants
//!
//! This module defines constants used throughout the FITS processing code,
//! replacing magic numbers and keyword strings with descriptive names.

/// Block and record layout
pub mod layout {
    /// Size of a FITS logical record (header or data block)
    pub const BLOCK_SIZE: usize = 2880;

    /// Length of a single header card
    pub const CARD_LENGTH: usize = 80;

    /// Number of header cards per block
    pub const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_LENGTH;

    /// Width of the keyword field
    pub const KEYWORD_LENGTH: usize = 8;

    /// Longest string value between the quotes of a card
    pub const MAX_TEXT_LENGTH: usize = 68;

    /// Column (1-based) where fixed-format numeric values end
    pub const FIXED_VALUE_END: usize = 30;

    /// First two bytes of a gzip stream
    pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
}

/// Structural keywords
pub mod keywords {
    pub const SIMPLE: &str = "SIMPLE";
    pub const XTENSION: &str = "XTENSION";
    pub const BITPIX: &str = "BITPIX";
    pub const NAXIS: &str = "NAXIS";
    pub const NAXIS1: &str = "NAXIS1";
    pub const NAXIS2: &str = "NAXIS2";
    pub const PCOUNT: &str = "PCOUNT";
    pub const GCOUNT: &str = "GCOUNT";
    pub const EXTEND: &str = "EXTEND";
    pub const END: &str = "END";

    // Commentary keywords, allowed to repeat
    pub const COMMENT: &str = "COMMENT";
    pub const HISTORY: &str = "HISTORY";
}

/// World coordinate system keywords
pub mod wcs_keys {
    pub const CTYPE: [&str; 2] = ["CTYPE1", "CTYPE2"];
    pub const CUNIT: [&str; 2] = ["CUNIT1", "CUNIT2"];
    pub const CRVAL: [&str; 2] = ["CRVAL1", "CRVAL2"];
    pub const CRPIX: [&str; 2] = ["CRPIX1", "CRPIX2"];
    pub const CDELT: [&str; 2] = ["CDELT1", "CDELT2"];
    pub const CROTA2: &str = "CROTA2";
    pub const CD: [[&str; 2]; 2] = [["CD1_1", "CD1_2"], ["CD2_1", "CD2_2"]];
    pub const PC: [[&str; 2]; 2] = [["PC1_1", "PC1_2"], ["PC2_1", "PC2_2"]];
    pub const LONPOLE: &str = "LONPOLE";

    /// Keywords carried through a cutout untouched when present
    pub const AUXILIARY: [&str; 8] = [
        "WCSAXES", "RADESYS", "EQUINOX", "LONPOLE", "LATPOLE", "MJD-OBS", "DATE-OBS", "WCSNAME",
    ];

    /// Suffix marking SIP distortion on CTYPE values
    pub const SIP_SUFFIX: &str = "-SIP";
}

/// Command line defaults
pub mod defaults {
    /// Output file written by the cutout command
    pub const OUTPUT_FILE: &str = "example_cutout.fits";

    /// Log file written by the command line tool
    pub const LOG_FILE: &str = "fitscut.log";
}
