use super::*;

#[test]
fn fingerprint_follows_content_not_allocation() {
    let a = FontBytes::new(b"font data".to_vec());
    let b = FontBytes::from(b"font data".to_vec());
    let c = FontBytes::new(b"font date".to_vec());

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint(), fnv1a64(b"font data"));
    assert_ne!(a.fingerprint(), c.fingerprint());
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn clones_share_bytes_and_fingerprint() {
    let a = FontBytes::new(vec![7; 64]);
    let b = a.clone();
    assert_eq!(a.as_bytes().as_ptr(), b.as_bytes().as_ptr());
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert!(format!("{a:?}").contains("len: 64"));
}

#[test]
fn writing_direction_defaults_to_ltr_and_reads_lowercase() {
    assert_eq!(WritingDirection::default(), WritingDirection::Ltr);
    let dir: WritingDirection = serde_json::from_str("\"rtl\"").unwrap();
    assert_eq!(dir, WritingDirection::Rtl);
}
