//! Tests for the WCS coordinate map

use crate::coordinate::{
    CoordinateMap, LinearTransform, PixelPosition, Projection, SipDistortion, SipPolynomial, Wcs, WorldPoint,
};
use crate::fits::errors::FitsError;
use crate::fits::header::{Card, Header};

fn tan_header() -> Vec<Card> {
    vec![
        Card::new("CTYPE1", "RA---TAN"),
        Card::new("CTYPE2", "DEC--TAN"),
        Card::new("CRPIX1", 50.0),
        Card::new("CRPIX2", 40.0),
        Card::new("CRVAL1", 210.5),
        Card::new("CRVAL2", 54.3),
        Card::new("CD1_1", -2.8e-4),
        Card::new("CD1_2", 1.0e-5),
        Card::new("CD2_1", 1.2e-5),
        Card::new("CD2_2", 2.8e-4),
    ]
}

fn sip_distortion() -> SipDistortion {
    SipDistortion::new(
        SipPolynomial::new(2, vec![(2, 0, 1.0e-5), (0, 2, 2.0e-6), (1, 1, 4.0e-6)]),
        SipPolynomial::new(2, vec![(1, 1, -3.0e-6), (0, 2, 5.0e-6)]),
    )
}

fn assert_close(a: WorldPoint, b: WorldPoint, tolerance: f64) {
    assert!((a.lon - b.lon).abs() < tolerance, "lon {} vs {}", a.lon, b.lon);
    assert!((a.lat - b.lat).abs() < tolerance, "lat {} vs {}", a.lat, b.lat);
}

#[test]
fn test_linear_map_known_value() {
    let wcs = Wcs::new([1.0, 1.0], [0.0, 0.0], LinearTransform::Cd([[2.0, 0.0], [0.0, 3.0]]));

    let world = wcs.pixel_to_world(PixelPosition::new(1.0, 2.0)).unwrap();
    assert_eq!(world, WorldPoint::new(4.0, 3.0));

    let pixel = wcs.world_to_pixel(world).unwrap();
    assert!((pixel.row - 1.0).abs() < 1e-12 && (pixel.col - 2.0).abs() < 1e-12);
}

#[test]
fn test_reference_pixel_maps_to_crval() {
    let wcs = Wcs::from_header(&Header::from_cards(tan_header())).unwrap();

    assert_eq!(wcs.reference_pixel(), PixelPosition::new(39.0, 49.0));
    assert_close(wcs.pixel_to_world(wcs.reference_pixel()).unwrap(), WorldPoint::new(210.5, 54.3), 1e-10);
}

#[test]
fn test_tan_pixel_offset_known_value() {
    let wcs = Wcs::tan([1.0, 1.0], [150.0, 0.0], [[-0.001, 0.0], [0.0, 0.001]]);

    let world = wcs.pixel_to_world(PixelPosition::new(0.0, 1000.0)).unwrap();
    let expected = 150.0 - 1.0f64.to_radians().atan().to_degrees();
    assert_close(world, WorldPoint::new(expected, 0.0), 1e-10);
}

#[test]
fn test_sin_pixel_offset_known_value() {
    let wcs = Wcs::new([1.0, 1.0], [150.0, 0.0], LinearTransform::Cd([[-0.001, 0.0], [0.0, 0.001]]))
        .with_ctype(["RA---SIN", "DEC--SIN"]);

    let world = wcs.pixel_to_world(PixelPosition::new(0.0, 1000.0)).unwrap();
    let expected = 150.0 - 1.0f64.to_radians().asin().to_degrees();
    assert_close(world, WorldPoint::new(expected, 0.0), 1e-10);
}

#[test]
fn test_pixel_world_round_trip() {
    let wcs = Wcs::from_header(&Header::from_cards(tan_header())).unwrap();

    for &(row, col) in &[(0.0, 0.0), (12.5, 77.25), (99.0, 3.0)] {
        let pixel = PixelPosition::new(row, col);
        let back = wcs.world_to_pixel(wcs.pixel_to_world(pixel).unwrap()).unwrap();
        assert!((back.row - row).abs() < 1e-8 && (back.col - col).abs() < 1e-8, "{} -> {}", pixel, back);
    }
}

#[test]
fn test_shift_origin_moves_crpix() {
    let mut wcs = Wcs::tan([10.5, 20.25], [0.0, 0.0], [[1e-3, 0.0], [0.0, 1e-3]]);
    wcs.shift_origin(7.0, 3.0);

    assert_eq!(wcs.crpix(), [7.5, 13.25]);
    assert_eq!(wcs.crval(), [0.0, 0.0]);
}

#[test]
fn test_shift_origin_preserves_world_positions() {
    let source = Wcs::from_header(&Header::from_cards(tan_header())).unwrap().with_sip(sip_distortion());
    let mut shifted = source.clone();
    shifted.shift_origin(30.0, 10.0);

    for &(row, col) in &[(0.0, 0.0), (5.0, 17.0), (-3.0, 44.0)] {
        let local = PixelPosition::new(row, col);
        let original = local + PixelPosition::new(30.0, 10.0);
        assert_close(shifted.pixel_to_world(local).unwrap(), source.pixel_to_world(original).unwrap(), 1e-12);
    }
}

#[test]
fn test_matrix_forms() {
    let mut cards = vec![
        Card::new("CRPIX1", 1.0),
        Card::new("CRPIX2", 1.0),
        Card::new("CRVAL1", 0.0),
        Card::new("CRVAL2", 0.0),
        Card::new("CDELT1", -0.002),
        Card::new("CDELT2", 0.002),
        Card::new("CROTA2", 30.0),
    ];
    let wcs = Wcs::from_header(&Header::from_cards(cards.clone())).unwrap();
    let (sin, cos) = 30f64.to_radians().sin_cos();
    let m = wcs.linear().matrix();
    assert!((m[0][0] - -0.002 * cos).abs() < 1e-15);
    assert!((m[0][1] - -0.002 * sin).abs() < 1e-15);
    assert!((m[1][0] - -0.002 * sin).abs() < 1e-15);
    assert!((m[1][1] - 0.002 * cos).abs() < 1e-15);

    cards.push(Card::new("PC1_2", 0.5));
    let wcs = Wcs::from_header(&Header::from_cards(cards.clone())).unwrap();
    assert_eq!(
        wcs.linear(),
        &LinearTransform::Pc { pc: [[1.0, 0.5], [0.0, 1.0]], cdelt: [-0.002, 0.002] }
    );
    assert_eq!(wcs.linear().matrix(), [[-0.002, -0.001], [0.0, 0.002]]);

    // CD wins over PC and CDELT
    cards.push(Card::new("CD2_2", 0.01));
    cards.push(Card::new("CD1_1", 0.01));
    let wcs = Wcs::from_header(&Header::from_cards(cards)).unwrap();
    assert_eq!(wcs.linear(), &LinearTransform::Cd([[0.01, 0.0], [0.0, 0.01]]));
}

#[test]
fn test_degenerate_headers() {
    let without = |keyword: &str| {
        Header::from_cards(tan_header().into_iter().filter(|c| c.keyword != keyword).collect())
    };

    assert!(matches!(Wcs::from_header(&without("CRPIX1")), Err(FitsError::DegenerateMap(_))));
    assert!(matches!(Wcs::detect(&without("CRVAL2")), Err(FitsError::DegenerateMap(_))));

    let mut header = Header::from_cards(tan_header());
    header.set("CRVAL1", "not a number");
    assert!(matches!(Wcs::from_header(&header), Err(FitsError::DegenerateMap(_))));

    let mut header = Header::from_cards(tan_header());
    header.set("CD1_1", 0.0);
    header.set("CD1_2", 0.0);
    assert!(matches!(Wcs::from_header(&header), Err(FitsError::DegenerateMap(_))));

    let no_scale = Header::from_cards(tan_header().into_iter().filter(|c| !c.keyword.starts_with("CD")).collect());
    assert!(matches!(Wcs::from_header(&no_scale), Err(FitsError::DegenerateMap(_))));
}

#[test]
fn test_sip_ctype_without_order_is_degenerate() {
    let mut header = Header::from_cards(tan_header());
    header.set("CTYPE1", "RA---TAN-SIP");
    header.set("CTYPE2", "DEC--TAN-SIP");
    header.set("B_ORDER", 2i64);

    assert!(matches!(Wcs::from_header(&header), Err(FitsError::DegenerateMap(_))));
}

#[test]
fn test_sip_order_above_nine_is_degenerate() {
    let mut header = Header::from_cards(tan_header());
    header.set("CTYPE1", "RA---TAN-SIP");
    header.set("CTYPE2", "DEC--TAN-SIP");
    header.set("A_ORDER", 9i64);
    header.set("B_ORDER", 9i64);
    header.set("A_9_0", 1.0e-20);
    assert_eq!(Wcs::from_header(&header).unwrap().sip().unwrap().a.order(), 9);

    header.set("A_ORDER", 1_000_000i64);
    assert!(matches!(Wcs::from_header(&header), Err(FitsError::DegenerateMap(_))));

    header.set("A_ORDER", 2i64);
    header.set("AP_ORDER", 10i64);
    header.set("BP_ORDER", 2i64);
    assert!(matches!(Wcs::from_header(&header), Err(FitsError::DegenerateMap(_))));
}

#[test]
fn test_detect_without_wcs_keywords() {
    let header = Header::from_cards(vec![Card::new("OBJECT", "M51"), Card::new("EXPTIME", 30.0)]);
    assert_eq!(Wcs::detect(&header).unwrap(), None);
}

#[test]
fn test_header_round_trip() {
    let mut cards = tan_header();
    cards.push(Card::new("RADESYS", "ICRS"));
    cards.push(Card::new("EQUINOX", 2000.0));
    let wcs = Wcs::from_header(&Header::from_cards(cards)).unwrap().with_sip(sip_distortion());

    let header = wcs.to_header();
    assert_eq!(header.get_str("CTYPE1"), Some("RA---TAN-SIP"));
    assert_eq!(header.get_i64("A_ORDER"), Some(2));
    assert_eq!(header.get_f64("A_2_0"), Some(1.0e-5));
    assert_eq!(header.get_str("RADESYS"), Some("ICRS"));
    assert!(!header.contains("AP_ORDER"));

    let parsed = Wcs::from_header(&header).unwrap();
    assert_eq!(parsed, wcs);
}

#[test]
fn test_header_round_trip_through_records() {
    let wcs = Wcs::from_header(&Header::from_cards(tan_header())).unwrap();

    let cards = wcs.to_header()
        .iter()
        .map(|card| Card::parse(card.to_record().as_bytes()).unwrap())
        .collect();
    assert_eq!(Wcs::from_header(&Header::from_cards(cards)).unwrap(), wcs);
}

#[test]
fn test_sip_inverse_by_iteration() {
    let wcs = Wcs::from_header(&Header::from_cards(tan_header())).unwrap().with_sip(sip_distortion());
    assert!(wcs.sip().unwrap().ap.is_none());

    let pixel = PixelPosition::new(90.0, 10.0);
    let world = wcs.pixel_to_world(pixel).unwrap();
    let back = wcs.world_to_pixel(world).unwrap();

    assert!((back.row - pixel.row).abs() < 1e-6);
    assert!((back.col - pixel.col).abs() < 1e-6);
}

#[test]
fn test_sip_inverse_polynomials_are_used() {
    let sip = sip_distortion().with_inverse(
        SipPolynomial::new(1, vec![(1, 0, 0.5)]),
        SipPolynomial::new(1, vec![(0, 0, 2.0)]),
    );

    assert_eq!(sip.apply_inverse(4.0, 6.0), Some((6.0, 8.0)));

    let (u, v) = sip.apply_forward(10.0, 0.0);
    assert!((u - 10.001).abs() < 1e-12);
    assert_eq!(v, 0.0);
}

#[test]
fn test_sip_polynomial_keeps_only_valid_terms() {
    let poly = SipPolynomial::new(2, vec![(2, 0, 1.0), (3, 0, 5.0), (0, 1, 0.0), (1, 1, -2.0)]);

    assert_eq!(poly.terms(), &[(1, 1, -2.0), (2, 0, 1.0)]);
    assert_eq!(poly.eval(3.0, 2.0), 9.0 - 12.0);
}

#[test]
fn test_lonpole() {
    let wcs = Wcs::tan([1.0, 1.0], [10.0, 45.0], [[1e-3, 0.0], [0.0, 1e-3]]);
    assert_eq!(wcs.lonpole(), 180.0);

    let polar = Wcs::tan([1.0, 1.0], [10.0, 90.0], [[1e-3, 0.0], [0.0, 1e-3]]);
    assert_eq!(polar.lonpole(), 0.0);

    let mut cards = tan_header();
    cards.push(Card::new("LONPOLE", 170.0));
    let explicit = Wcs::from_header(&Header::from_cards(cards)).unwrap();
    assert_eq!(explicit.lonpole(), 170.0);
}

#[test]
fn test_unsupported_projection_is_carried() {
    let cards = vec![
        Card::new("CTYPE1", "GLON-CAR"),
        Card::new("CTYPE2", "GLAT-CAR"),
        Card::new("CRPIX1", 100.0),
        Card::new("CRPIX2", 100.0),
        Card::new("CRVAL1", 120.0),
        Card::new("CRVAL2", 0.0),
        Card::new("CDELT1", -0.01),
        Card::new("CDELT2", 0.01),
    ];
    let mut wcs = Wcs::from_header(&Header::from_cards(cards)).unwrap();

    assert_eq!(wcs.projection(), &Projection::Other("CAR".to_string()));
    assert!(wcs.pixel_to_world(PixelPosition::new(0.0, 0.0)).is_none());

    wcs.shift_origin(40.0, 60.0);
    let header = wcs.to_header();
    assert_eq!(header.get_f64("CRPIX1"), Some(40.0));
    assert_eq!(header.get_f64("CRPIX2"), Some(60.0));
    assert_eq!(header.get_str("CTYPE1"), Some("GLON-CAR"));
}
