use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        EgoviewError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        EgoviewError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        EgoviewError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = EgoviewError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
