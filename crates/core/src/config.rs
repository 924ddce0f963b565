//! Tunable constants for the particle field.
//!
//! [`FieldConfig::default`] reproduces the reference look. A config can be
//! loaded whole from JSON (serde, missing keys take defaults) or built by
//! overlaying a flat params object with [`FieldConfig::from_json`], which is
//! what the CLI's `--params` flag uses.

use crate::error::FieldError;
use crate::params::{param_f32, param_pair, param_usize, reject_unknown};
use crate::particle::MAX_PARTICLE_COUNT;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Default particle count.
const DEFAULT_PARTICLE_COUNT: usize = 14_000;
/// Side of the square the particles are scattered over, in world units.
const DEFAULT_SPREAD: f32 = 18.0;
const DEFAULT_SIZE_RANGE: [f32; 2] = [0.5, 2.0];
/// World-space point size before per-particle scaling.
const DEFAULT_BASE_SIZE: f32 = 0.08;
const DEFAULT_OPACITY: f32 = 0.9;
/// Per-frame exponential smoothing factor for particle heights.
const DEFAULT_SMOOTHING: f32 = 0.1;
/// Per-frame easing factor for the fog color.
const DEFAULT_FOG_LERP: f32 = 0.05;
/// Exponential-squared fog density.
const DEFAULT_FOG_DENSITY: f32 = 0.025;
/// Ambient rotation about the vertical axis, radians per second.
const DEFAULT_ROTATION_SPEED: f32 = 0.02;

/// One sine term `amplitude * sin(arg * frequency ± t * speed)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveTerm {
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
}

/// Two directional traveling waves plus one radial ripple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Travels along x.
    pub roll: WaveTerm,
    /// Travels along z.
    pub cross: WaveTerm,
    /// Radial, moving outward from the origin.
    pub ripple: WaveTerm,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            roll: WaveTerm {
                amplitude: 0.8,
                frequency: 0.3,
                speed: 0.8,
            },
            cross: WaveTerm {
                amplitude: 0.6,
                frequency: 0.4,
                speed: 0.6,
            },
            ripple: WaveTerm {
                amplitude: 0.2,
                frequency: 1.0,
                speed: 1.5,
            },
        }
    }
}

/// Pointer repulsion around the cursor's ground-plane projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionConfig {
    /// Influence radius in world units.
    pub radius: f32,
    /// Downward push at the projection point.
    pub depth: f32,
    /// Cursor x to world x scale.
    pub tilt_x: f32,
    /// Cursor y to world z scale; compensates the tilted camera.
    pub tilt_z: f32,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            depth: 1.5,
            tilt_x: 8.0,
            tilt_z: 5.0,
        }
    }
}

/// Height range mapped onto the deep-to-peak color ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRampConfig {
    pub low: f32,
    pub high: f32,
}

impl Default for ColorRampConfig {
    fn default() -> Self {
        Self {
            low: -1.5,
            high: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            eye: [0.0, 3.0, 8.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Every constant that shapes the field's motion and look.
///
/// Heights ease at `smoothing` per frame, the fog color at `fog_lerp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub spread: f32,
    pub size_range: [f32; 2],
    pub base_size: f32,
    pub opacity: f32,
    pub smoothing: f32,
    pub fog_lerp: f32,
    pub fog_density: f32,
    pub rotation_speed: f32,
    pub wave: WaveConfig,
    pub repulsion: RepulsionConfig,
    pub ramp: ColorRampConfig,
    pub camera: CameraConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            spread: DEFAULT_SPREAD,
            size_range: DEFAULT_SIZE_RANGE,
            base_size: DEFAULT_BASE_SIZE,
            opacity: DEFAULT_OPACITY,
            smoothing: DEFAULT_SMOOTHING,
            fog_lerp: DEFAULT_FOG_LERP,
            fog_density: DEFAULT_FOG_DENSITY,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            wave: WaveConfig::default(),
            repulsion: RepulsionConfig::default(),
            ramp: ColorRampConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

/// Flat parameter names accepted by [`FieldConfig::from_json`].
const PARAM_NAMES: &[&str] = &[
    "particle_count",
    "spread",
    "size_range",
    "base_size",
    "opacity",
    "smoothing",
    "fog_lerp",
    "fog_density",
    "rotation_speed",
    "roll_amplitude",
    "roll_frequency",
    "roll_speed",
    "cross_amplitude",
    "cross_frequency",
    "cross_speed",
    "ripple_amplitude",
    "ripple_frequency",
    "ripple_speed",
    "repulsion_radius",
    "repulsion_depth",
    "tilt_x",
    "tilt_z",
    "ramp_low",
    "ramp_high",
];

fn overlay_term(params: &Value, prefix: &str, term: &mut WaveTerm) -> Result<(), FieldError> {
    term.amplitude = param_f32(params, &format!("{prefix}_amplitude"), term.amplitude)?;
    term.frequency = param_f32(params, &format!("{prefix}_frequency"), term.frequency)?;
    term.speed = param_f32(params, &format!("{prefix}_speed"), term.speed)?;
    Ok(())
}

fn invalid(msg: impl Into<String>) -> FieldError {
    FieldError::InvalidConfig(msg.into())
}

fn number_schema(default: f32, min: f32, max: f32, description: &str) -> Value {
    json!({
        "type": "number",
        "default": default,
        "min": min,
        "max": max,
        "description": description,
    })
}

impl FieldConfig {
    /// Overlays a flat params object on the defaults and validates the result.
    ///
    /// Unknown keys fail with `ParamNotFound`; wrongly typed values fail with
    /// `ParamTypeMismatch`.
    pub fn from_json(params: &Value) -> Result<Self, FieldError> {
        Self::default().with_overrides(params)
    }

    /// Overlays a flat params object on `self` and validates the result.
    pub fn with_overrides(mut self, params: &Value) -> Result<Self, FieldError> {
        reject_unknown(params, PARAM_NAMES)?;
        self.particle_count = param_usize(params, "particle_count", self.particle_count)?;
        self.spread = param_f32(params, "spread", self.spread)?;
        self.size_range = param_pair(params, "size_range", self.size_range)?;
        self.base_size = param_f32(params, "base_size", self.base_size)?;
        self.opacity = param_f32(params, "opacity", self.opacity)?;
        self.smoothing = param_f32(params, "smoothing", self.smoothing)?;
        self.fog_lerp = param_f32(params, "fog_lerp", self.fog_lerp)?;
        self.fog_density = param_f32(params, "fog_density", self.fog_density)?;
        self.rotation_speed = param_f32(params, "rotation_speed", self.rotation_speed)?;
        overlay_term(params, "roll", &mut self.wave.roll)?;
        overlay_term(params, "cross", &mut self.wave.cross)?;
        overlay_term(params, "ripple", &mut self.wave.ripple)?;
        self.repulsion.radius = param_f32(params, "repulsion_radius", self.repulsion.radius)?;
        self.repulsion.depth = param_f32(params, "repulsion_depth", self.repulsion.depth)?;
        self.repulsion.tilt_x = param_f32(params, "tilt_x", self.repulsion.tilt_x)?;
        self.repulsion.tilt_z = param_f32(params, "tilt_z", self.repulsion.tilt_z)?;
        self.ramp.low = param_f32(params, "ramp_low", self.ramp.low)?;
        self.ramp.high = param_f32(params, "ramp_high", self.ramp.high)?;
        self.validate()?;
        Ok(self)
    }

    /// Parses a full config document (nested form, as produced by serde).
    pub fn from_json_str(s: &str) -> Result<Self, FieldError> {
        let config: FieldConfig =
            serde_json::from_str(s).map_err(|e| invalid(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if self.particle_count == 0 || self.particle_count > MAX_PARTICLE_COUNT {
            return Err(FieldError::InvalidParticleCount);
        }
        let finite = [
            ("spread", self.spread),
            ("base_size", self.base_size),
            ("opacity", self.opacity),
            ("smoothing", self.smoothing),
            ("fog_lerp", self.fog_lerp),
            ("fog_density", self.fog_density),
            ("rotation_speed", self.rotation_speed),
            ("repulsion_radius", self.repulsion.radius),
            ("repulsion_depth", self.repulsion.depth),
            ("tilt_x", self.repulsion.tilt_x),
            ("tilt_z", self.repulsion.tilt_z),
            ("ramp_low", self.ramp.low),
            ("ramp_high", self.ramp.high),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite")));
        }
        let terms = [self.wave.roll, self.wave.cross, self.wave.ripple];
        if terms
            .iter()
            .any(|t| !(t.amplitude.is_finite() && t.frequency.is_finite() && t.speed.is_finite()))
        {
            return Err(invalid("wave terms must be finite"));
        }
        if self.spread <= 0.0 {
            return Err(invalid("spread must be positive"));
        }
        let [min_size, max_size] = self.size_range;
        if !(min_size > 0.0 && min_size < max_size && max_size.is_finite()) {
            return Err(invalid("size_range must satisfy 0 < min < max"));
        }
        if self.base_size <= 0.0 {
            return Err(invalid("base_size must be positive"));
        }
        for (name, rate) in [
            ("opacity", self.opacity),
            ("smoothing", self.smoothing),
            ("fog_lerp", self.fog_lerp),
        ] {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(invalid(format!("{name} must be in (0, 1]")));
            }
        }
        if self.fog_density < 0.0 {
            return Err(invalid("fog_density must not be negative"));
        }
        if self.repulsion.radius <= 0.0 {
            return Err(invalid("repulsion_radius must be positive"));
        }
        if self.repulsion.depth < 0.0 {
            return Err(invalid("repulsion_depth must not be negative"));
        }
        if self.ramp.low >= self.ramp.high {
            return Err(invalid("ramp_low must be below ramp_high"));
        }
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid("camera fov must be in (0, 180) degrees"));
        }
        if !(cam.near > 0.0 && cam.near < cam.far && cam.far.is_finite()) {
            return Err(invalid("camera planes must satisfy 0 < near < far"));
        }
        if cam.eye == cam.target {
            return Err(invalid("camera eye and target must differ"));
        }
        Ok(())
    }

    /// Current values under their flat parameter names.
    pub fn params(&self) -> Value {
        let mut map = Map::new();
        map.insert("particle_count".into(), json!(self.particle_count));
        map.insert("spread".into(), json!(self.spread));
        map.insert("size_range".into(), json!(self.size_range));
        map.insert("base_size".into(), json!(self.base_size));
        map.insert("opacity".into(), json!(self.opacity));
        map.insert("smoothing".into(), json!(self.smoothing));
        map.insert("fog_lerp".into(), json!(self.fog_lerp));
        map.insert("fog_density".into(), json!(self.fog_density));
        map.insert("rotation_speed".into(), json!(self.rotation_speed));
        for (prefix, term) in [
            ("roll", self.wave.roll),
            ("cross", self.wave.cross),
            ("ripple", self.wave.ripple),
        ] {
            map.insert(format!("{prefix}_amplitude"), json!(term.amplitude));
            map.insert(format!("{prefix}_frequency"), json!(term.frequency));
            map.insert(format!("{prefix}_speed"), json!(term.speed));
        }
        map.insert("repulsion_radius".into(), json!(self.repulsion.radius));
        map.insert("repulsion_depth".into(), json!(self.repulsion.depth));
        map.insert("tilt_x".into(), json!(self.repulsion.tilt_x));
        map.insert("tilt_z".into(), json!(self.repulsion.tilt_z));
        map.insert("ramp_low".into(), json!(self.ramp.low));
        map.insert("ramp_high".into(), json!(self.ramp.high));
        Value::Object(map)
    }

    /// Schema of every flat parameter: type, default, range, description.
    pub fn param_schema() -> Value {
        let d = FieldConfig::default();
        let mut map = Map::new();
        map.insert(
            "particle_count".into(),
            json!({
                "type": "integer",
                "default": d.particle_count,
                "min": 1,
                "max": MAX_PARTICLE_COUNT,
                "description": "Number of particles scattered over the ground plane"
            }),
        );
        map.insert(
            "size_range".into(),
            json!({
                "type": "array",
                "default": d.size_range,
                "description": "Per-particle size multiplier range [min, max)"
            }),
        );
        let scalars = [
            ("spread", d.spread, 0.0, 100.0, "Side of the square particles are scattered over"),
            ("base_size", d.base_size, 0.0, 1.0, "World-space point size before per-particle scaling"),
            ("opacity", d.opacity, 0.0, 1.0, "Point opacity"),
            ("smoothing", d.smoothing, 0.0, 1.0, "Per-frame easing of particle heights toward their target"),
            ("fog_lerp", d.fog_lerp, 0.0, 1.0, "Per-frame easing of the fog color toward the theme fog"),
            ("fog_density", d.fog_density, 0.0, 1.0, "Exponential-squared fog density"),
            ("rotation_speed", d.rotation_speed, -1.0, 1.0, "Rotation about the vertical axis in rad/s"),
            ("repulsion_radius", d.repulsion.radius, 0.0, 20.0, "Radius of the cursor repulsion"),
            ("repulsion_depth", d.repulsion.depth, 0.0, 10.0, "Downward push at the cursor projection"),
            ("tilt_x", d.repulsion.tilt_x, 0.0, 50.0, "Cursor x to world x scale"),
            ("tilt_z", d.repulsion.tilt_z, 0.0, 50.0, "Cursor y to world z scale"),
            ("ramp_low", d.ramp.low, -10.0, 10.0, "Height mapped to the deep color"),
            ("ramp_high", d.ramp.high, -10.0, 10.0, "Height mapped to the peak color"),
        ];
        for (name, default, min, max, description) in scalars {
            map.insert(name.into(), number_schema(default, min, max, description));
        }
        for (prefix, term, label) in [
            ("roll", d.wave.roll, "rolling wave along x"),
            ("cross", d.wave.cross, "cross wave along z"),
            ("ripple", d.wave.ripple, "radial ripple"),
        ] {
            map.insert(
                format!("{prefix}_amplitude"),
                number_schema(term.amplitude, 0.0, 5.0, &format!("Amplitude of the {label}")),
            );
            map.insert(
                format!("{prefix}_frequency"),
                number_schema(term.frequency, 0.0, 5.0, &format!("Spatial frequency of the {label}")),
            );
            map.insert(
                format!("{prefix}_speed"),
                number_schema(term.speed, 0.0, 5.0, &format!("Temporal speed of the {label}")),
            );
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FieldConfig::default().validate().is_ok());
    }

    #[test]
    fn default_matches_reference_constants() {
        let c = FieldConfig::default();
        assert_eq!(c.particle_count, 14_000);
        assert_eq!(c.spread, 18.0);
        assert_eq!(c.smoothing, 0.1);
        assert_eq!(c.fog_lerp, 0.05);
        assert_eq!(c.repulsion.radius, 3.0);
        assert_eq!(c.repulsion.depth, 1.5);
        assert_eq!(c.wave.ripple.speed, 1.5);
    }

    #[test]
    fn from_json_empty_gives_defaults() {
        let c = FieldConfig::from_json(&json!({})).unwrap();
        assert_eq!(c, FieldConfig::default());
    }

    #[test]
    fn from_json_overrides_flat_keys() {
        let c = FieldConfig::from_json(&json!({
            "particle_count": 500,
            "spread": 10,
            "ripple_speed": 3.0,
            "tilt_x": 6.0,
            "size_range": [1.0, 1.5],
        }))
        .unwrap();
        assert_eq!(c.particle_count, 500);
        assert_eq!(c.spread, 10.0);
        assert_eq!(c.wave.ripple.speed, 3.0);
        assert_eq!(c.repulsion.tilt_x, 6.0);
        assert_eq!(c.size_range, [1.0, 1.5]);
        assert_eq!(c.smoothing, DEFAULT_SMOOTHING);
    }

    #[test]
    fn from_json_rejects_unknown_key() {
        let err = FieldConfig::from_json(&json!({"smothing": 0.2})).unwrap_err();
        assert!(matches!(err, FieldError::ParamNotFound(ref k) if k == "smothing"));
    }

    #[test]
    fn from_json_rejects_invalid_values() {
        assert!(matches!(
            FieldConfig::from_json(&json!({"particle_count": 0})),
            Err(FieldError::InvalidParticleCount)
        ));
        assert!(FieldConfig::from_json(&json!({"smoothing": 0.0})).is_err());
        assert!(FieldConfig::from_json(&json!({"fog_lerp": 1.5})).is_err());
        assert!(FieldConfig::from_json(&json!({"spread": -1})).is_err());
        assert!(FieldConfig::from_json(&json!({"size_range": [2.0, 1.0]})).is_err());
        assert!(FieldConfig::from_json(&json!({"ramp_low": 2.0})).is_err());
        assert!(FieldConfig::from_json(&json!({"repulsion_radius": 0})).is_err());
    }

    #[test]
    fn from_json_rejects_particle_count_above_maximum() {
        assert!(matches!(
            FieldConfig::from_json(&json!({"particle_count": u64::MAX})),
            Err(FieldError::InvalidParticleCount)
        ));
        let over = MAX_PARTICLE_COUNT + 1;
        assert!(FieldConfig::from_json(&json!({ "particle_count": over })).is_err());
        assert!(FieldConfig::from_json(&json!({"particle_count": MAX_PARTICLE_COUNT})).is_ok());
        let schema = FieldConfig::param_schema();
        assert_eq!(schema["particle_count"]["max"], json!(MAX_PARTICLE_COUNT));
    }

    #[test]
    fn params_round_trip_through_from_json() {
        let mut c = FieldConfig::default();
        c.spread = 12.0;
        c.wave.cross.amplitude = 0.9;
        let back = FieldConfig::from_json(&c.params()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn schema_covers_every_param_name() {
        let schema = FieldConfig::param_schema();
        for name in PARAM_NAMES {
            let entry = schema.get(*name).unwrap_or_else(|| panic!("schema missing {name}"));
            assert!(entry.get("type").is_some(), "{name} missing 'type'");
            assert!(entry.get("default").is_some(), "{name} missing 'default'");
            assert!(entry.get("description").is_some(), "{name} missing 'description'");
        }
        assert_eq!(schema.as_object().unwrap().len(), PARAM_NAMES.len());
    }

    #[test]
    fn nested_document_fills_missing_sections_with_defaults() {
        let c = FieldConfig::from_json_str(r#"{"spread": 9.0, "repulsion": {"radius": 2.0}}"#)
            .unwrap();
        assert_eq!(c.spread, 9.0);
        assert_eq!(c.repulsion.radius, 2.0);
        assert_eq!(c.repulsion.depth, 1.5);
        assert_eq!(c.wave, WaveConfig::default());
    }

    #[test]
    fn nested_document_is_validated() {
        assert!(FieldConfig::from_json_str(r#"{"camera": {"near": 0.0}}"#).is_err());
        assert!(FieldConfig::from_json_str("not json").is_err());
    }
}
