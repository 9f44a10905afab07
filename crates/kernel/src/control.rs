use serde::{Deserialize, Serialize};

/// A discrete user event from the presentation layer.
///
/// Numeric payloads are the raw widget values; they are validated when the
/// control is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Control {
    /// "Apply" on the world bounds slider.
    SetWorldBounds(f64),
    /// "Apply" on the box count slider.
    SetEntityCount(f64),
    SetMotion(bool),
    SetRotation(bool),
    ToggleMotion,
    ToggleRotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_serialize_with_payload() {
        let json = serde_json::to_string(&Control::SetWorldBounds(42.0)).unwrap();
        assert_eq!(json, r#"{"SetWorldBounds":42.0}"#);
        let back: Control = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Control::SetWorldBounds(42.0));
    }

    #[test]
    fn unit_controls_serialize_as_names() {
        let json = serde_json::to_string(&Control::ToggleMotion).unwrap();
        assert_eq!(json, r#""ToggleMotion""#);
    }
}
