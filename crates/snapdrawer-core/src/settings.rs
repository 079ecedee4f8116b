#![forbid(unsafe_code)]

//! Per-instance drawer settings.
//!
//! Settings are plain data with `serde` derives so hosts can hand over the
//! same flat option object the JavaScript API accepts (`maxPosition`,
//! `tapToClose`, ..). Later patches deep-merge into the current values:
//! nested objects merge key by key, every other value overwrites.
//!
//! # Invariants
//!
//! 1. `min_position <= 0 <= max_position`.
//! 2. `resistance` is finite and in `[0, 1]`.
//! 3. `slide_intent` is in `[0, 90]` degrees.
//! 4. Distances and durations are finite and non-negative.
//!
//! A patch that would break any of these is rejected as a whole and the
//! previous settings stay in effect.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::geometry::Side;

/// One-sided lock on pane movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideLock {
    /// Both panels may be revealed.
    #[default]
    None,
    /// The left panel is locked: positive offsets are rejected.
    Left,
    /// The right panel is locked: negative offsets are rejected.
    Right,
}

impl SideLock {
    /// Whether an offset of this sign is forbidden by the lock.
    #[must_use]
    pub fn forbids(self, offset: f64) -> bool {
        match self {
            Self::None => false,
            Self::Left => offset > 0.0,
            Self::Right => offset < 0.0,
        }
    }
}

/// Drawer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Name of the drag handle region. When set, drags that start outside
    /// the handle are ignored unless the pane is fully open.
    pub dragger: Option<String>,
    /// Attribute marking subtrees whose pointer-downs never start a drag.
    pub ignore_attribute: String,
    pub disable: SideLock,
    /// Toggle `snapjs-*` state classes on the document body.
    pub add_body_classes: bool,
    /// Allow the pane past `min_position`/`max_position` while dragging.
    pub hyperextensible: bool,
    /// Factor applied to the distance dragged beyond a bound.
    pub resistance: f64,
    /// Pixels travelled since the last direction change that count as a flick.
    pub flick_threshold: f64,
    /// Animation duration in seconds.
    pub transition_speed: f64,
    /// CSS timing function for animations.
    pub easing: String,
    pub max_position: i32,
    pub min_position: i32,
    pub tap_to_close: bool,
    pub touch_to_drag: bool,
    pub click_to_drag: bool,
    /// Degrees of deviation from horizontal still accepted as a slide.
    pub slide_intent: f64,
    /// Horizontal pixels the pointer must travel before the pane follows.
    pub min_drag_distance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dragger: None,
            ignore_attribute: "data-snap-ignore".to_string(),
            disable: SideLock::None,
            add_body_classes: true,
            hyperextensible: true,
            resistance: 0.5,
            flick_threshold: 50.0,
            transition_speed: 0.3,
            easing: "ease".to_string(),
            max_position: 266,
            min_position: -266,
            tap_to_close: true,
            touch_to_drag: true,
            click_to_drag: true,
            slide_intent: 40.0,
            min_drag_distance: 5.0,
        }
    }
}

impl Settings {
    /// Defaults overlaid with a flat option object.
    pub fn from_json(options: &Value) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.merge(options)?;
        Ok(settings)
    }

    /// Deep-merge `patch` into these settings.
    ///
    /// On error nothing is changed.
    pub fn merge(&mut self, patch: &Value) -> Result<(), ConfigError> {
        if !patch.is_object() {
            return Err(ConfigError::Patch("settings patch must be an object".into()));
        }
        let mut merged =
            serde_json::to_value(&*self).map_err(|err| ConfigError::Patch(err.to_string()))?;
        deep_merge(&mut merged, patch);
        let next: Self =
            serde_json::from_value(merged).map_err(|err| ConfigError::Patch(err.to_string()))?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Check the invariants listed in the module docs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_position > 0 || self.max_position < 0 {
            return Err(ConfigError::InvalidBounds {
                min: self.min_position,
                max: self.max_position,
            });
        }
        if !(0.0..=1.0).contains(&self.resistance) {
            return Err(ConfigError::InvalidResistance(self.resistance));
        }
        if !(0.0..=90.0).contains(&self.slide_intent) {
            return Err(ConfigError::InvalidSlideIntent(self.slide_intent));
        }
        for (field, value) in [
            ("flickThreshold", self.flick_threshold),
            ("minDragDistance", self.min_drag_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeDistance { field, value });
            }
        }
        if !self.transition_speed.is_finite() || self.transition_speed < 0.0 {
            return Err(ConfigError::NegativeDuration(self.transition_speed));
        }
        Ok(())
    }

    /// Fully-open offset for `side`.
    #[must_use]
    pub const fn bound(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.max_position,
            Side::Right => self.min_position,
        }
    }

    /// CSS transition shorthand used while animating.
    #[must_use]
    pub fn transition_css(&self) -> String {
        format!("all {}s {}", self.transition_speed, self.easing)
    }
}

/// Recursive object merge: objects merge key by key, anything else overwrites.
fn deep_merge(dest: &mut Value, src: &Value) {
    match (dest, src) {
        (Value::Object(dest_map), Value::Object(src_map)) => {
            for (key, value) in src_map {
                if value.is_object() {
                    let slot = dest_map
                        .entry(key.clone())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if !slot.is_object() {
                        *slot = Value::Object(Map::new());
                    }
                    deep_merge(slot, value);
                } else {
                    dest_map.insert(key.clone(), value.clone());
                }
            }
        }
        (dest, src) => *dest = src.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.max_position, 266);
        assert_eq!(settings.min_position, -266);
        assert_eq!(settings.transition_css(), "all 0.3s ease");
    }

    #[test]
    fn from_json_overlays_defaults_and_ignores_unknown_keys() {
        let settings = Settings::from_json(&json!({
            "maxPosition": 100,
            "minPosition": -100,
            "disable": "right",
            "element": "#content"
        }))
        .unwrap();
        assert_eq!(settings.max_position, 100);
        assert_eq!(settings.min_position, -100);
        assert_eq!(settings.disable, SideLock::Right);
        assert_eq!(settings.resistance, 0.5);
    }

    #[test]
    fn merge_overwrites_scalars() {
        let mut settings = Settings::default();
        settings
            .merge(&json!({ "tapToClose": false, "dragger": "handle", "easing": "linear" }))
            .unwrap();
        assert!(!settings.tap_to_close);
        assert_eq!(settings.dragger.as_deref(), Some("handle"));
        assert_eq!(settings.easing, "linear");

        settings.merge(&json!({ "dragger": null })).unwrap();
        assert_eq!(settings.dragger, None);
    }

    #[test]
    fn rejected_patch_leaves_settings_untouched() {
        let mut settings = Settings::default();
        let before = settings.clone();

        let err = settings.merge(&json!({ "minPosition": 10 })).unwrap_err();
        assert_eq!(err, ConfigError::InvalidBounds { min: 10, max: 266 });
        assert_eq!(settings, before);

        let err = settings.merge(&json!({ "resistance": 1.5 })).unwrap_err();
        assert_eq!(err, ConfigError::InvalidResistance(1.5));

        assert!(matches!(
            settings.merge(&json!({ "maxPosition": "wide" })),
            Err(ConfigError::Patch(_))
        ));
        assert!(matches!(settings.merge(&json!(3)), Err(ConfigError::Patch(_))));
        assert_eq!(settings, before);
    }

    #[test]
    fn negative_distances_are_rejected() {
        let mut settings = Settings::default();
        let err = settings.merge(&json!({ "minDragDistance": -1.0 })).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NegativeDistance {
                field: "minDragDistance",
                value: -1.0
            }
        );
        let err = settings.merge(&json!({ "transitionSpeed": -0.1 })).unwrap_err();
        assert_eq!(err, ConfigError::NegativeDuration(-0.1));
    }

    #[test]
    fn deep_merge_merges_nested_objects_key_by_key() {
        let mut dest = json!({ "a": { "x": 1, "y": 2 }, "b": 1 });
        deep_merge(&mut dest, &json!({ "a": { "y": 3, "z": 4 }, "b": { "c": true } }));
        assert_eq!(dest, json!({ "a": { "x": 1, "y": 3, "z": 4 }, "b": { "c": true } }));
    }

    #[test]
    fn side_lock_forbids_matching_sign() {
        assert!(SideLock::Left.forbids(1.0));
        assert!(!SideLock::Left.forbids(-1.0));
        assert!(SideLock::Right.forbids(-1.0));
        assert!(!SideLock::None.forbids(1.0));
    }
}
