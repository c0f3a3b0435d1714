use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ForgeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ForgeError::decode("x").to_string().contains("decode error:"));
    assert!(
        ForgeError::compositing("x")
            .to_string()
            .contains("compositing error:")
    );
    assert!(ForgeError::font("x").to_string().contains("font error:"));
    assert!(ForgeError::plan("x").to_string().contains("plan error:"));
    assert!(ForgeError::job("x").to_string().contains("job error:"));
    assert!(ForgeError::config("x").to_string().contains("config error:"));
    assert!(
        ForgeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ForgeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn compositing_failures_are_classified() {
    assert!(ForgeError::decode("bad png").is_compositing_failure());
    assert!(ForgeError::font("none").is_compositing_failure());
    assert!(ForgeError::compositing("x").is_compositing_failure());
    assert!(!ForgeError::job("x").is_compositing_failure());
    assert!(!ForgeError::plan("x").is_compositing_failure());
}

#[test]
fn serde_json_errors_convert() {
    let err: ForgeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ForgeError::Serde(_)));
}
