//! Tuned constants shared by the CPU pipeline and the generated GLSL prelude.

/// Dot-product weights of the 2D hash.
pub const HASH_WEIGHTS: [f32; 2] = [12.9898, 78.233];
/// Multiplier applied to `sin` before taking the fractional part.
pub const HASH_SCALE: f32 = 43758.5453123;

/// Time multiplier feeding the per-frame glitch gate.
pub const GLITCH_GATE_RATE: f32 = 5.0;
/// Gate values at or above this threshold turn the distortion on.
pub const GLITCH_THRESHOLD: f32 = 0.8;
/// Spatial frequency of the offset wave along `uv.y`.
pub const GLITCH_WAVE_FREQUENCY: f32 = 50.0;
/// Temporal frequency of the offset wave.
pub const GLITCH_WAVE_SPEED: f32 = 10.0;
/// Peak horizontal displacement in surface units.
pub const GLITCH_AMPLITUDE: f32 = 0.005;

/// Cells per surface unit before pulsation.
pub const GRID_SCALE: f32 = 40.0;
/// Phase drift of the grid per unit time.
pub const GRID_DRIFT: f32 = 5.0;
/// Cut-off applied to each grid axis.
pub const GRID_THRESHOLD: f32 = 0.5;
/// Angular rate of the grid density pulsation.
pub const PULSE_RATE: f32 = 2.0;
/// Pulsation swing around `1.0`; the factor stays in `[1 - a, 1 + a]`.
pub const PULSE_AMPLITUDE: f32 = 0.5;

/// Lattice cells per surface unit for the grain noise.
pub const NOISE_SCALE: f32 = 50.0;
/// Drift of the grain noise per unit time.
pub const NOISE_DRIFT: f32 = 2.0;
/// Weight of the grain noise when blended over the grid.
pub const NOISE_BLEND: f32 = 0.25;

/// Weight of `uv.y` in the diagonal gradient.
pub const GRADIENT_Y_WEIGHT: f32 = 0.5;
/// Angular rate of the red/blue colour shift.
pub const COLOR_SHIFT_RATE: f32 = 1.0;

/// Default time advance per rendered frame.
pub const DEFAULT_TIME_STEP: f32 = 0.01;

/// Every constant that the GPU shader needs, paired with its GLSL name.
pub fn glsl_defines() -> Vec<(&'static str, f32)> {
    vec![
        ("GLITCH_HASH_WEIGHT_X", HASH_WEIGHTS[0]),
        ("GLITCH_HASH_WEIGHT_Y", HASH_WEIGHTS[1]),
        ("GLITCH_HASH_SCALE", HASH_SCALE),
        ("GLITCH_GATE_RATE", GLITCH_GATE_RATE),
        ("GLITCH_THRESHOLD", GLITCH_THRESHOLD),
        ("GLITCH_WAVE_FREQUENCY", GLITCH_WAVE_FREQUENCY),
        ("GLITCH_WAVE_SPEED", GLITCH_WAVE_SPEED),
        ("GLITCH_AMPLITUDE", GLITCH_AMPLITUDE),
        ("GLITCH_GRID_SCALE", GRID_SCALE),
        ("GLITCH_GRID_DRIFT", GRID_DRIFT),
        ("GLITCH_GRID_THRESHOLD", GRID_THRESHOLD),
        ("GLITCH_PULSE_RATE", PULSE_RATE),
        ("GLITCH_PULSE_AMPLITUDE", PULSE_AMPLITUDE),
        ("GLITCH_NOISE_SCALE", NOISE_SCALE),
        ("GLITCH_NOISE_DRIFT", NOISE_DRIFT),
        ("GLITCH_NOISE_BLEND", NOISE_BLEND),
        ("GLITCH_GRADIENT_Y_WEIGHT", GRADIENT_Y_WEIGHT),
        ("GLITCH_COLOR_SHIFT_RATE", COLOR_SHIFT_RATE),
    ]
}
