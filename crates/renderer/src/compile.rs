use std::borrow::Cow;
use std::fmt::Write as _;

use wgpu::naga::ShaderStage;

/// Compiles the sphere vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("sphere vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(vertex_source()),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Compiles the glitch fragment shader with its generated constant prelude.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glitch fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(fragment_source()),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

pub(crate) fn vertex_source() -> String {
    format!("{VERSION}\n{FRAME_BLOCK}\n{VERTEX_BODY}")
}

/// Produces a self-contained GLSL fragment shader.
///
/// The body only refers to `GLITCH_*` macros; [`constant_prelude`] defines
/// them from `glitchfx::params` so the GPU and CPU renderers share one set of
/// tuned values.
pub(crate) fn fragment_source() -> String {
    format!(
        "{VERSION}\n{prelude}\n{FRAME_BLOCK}\n{FRAGMENT_BODY}",
        prelude = constant_prelude()
    )
}

fn constant_prelude() -> String {
    let mut prelude = String::new();
    for (name, value) in glitchfx::params::glsl_defines() {
        // `{:?}` keeps the decimal point, so GLSL parses every constant as float.
        let _ = writeln!(prelude, "#define {name} {value:?}");
    }
    prelude
}

const VERSION: &str = "#version 450";

/// Uniform block shared by both stages; must match `FrameUniforms` in `gpu/uniforms.rs`.
const FRAME_BLOCK: &str = r"layout(std140, set = 0, binding = 0) uniform FrameParams {
    mat4 view_proj;
    vec2 resolution;
    float time;
    float frame_index;
} frame;
";

const VERTEX_BODY: &str = r"layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;
layout(location = 0) out vec2 v_uv;

void main() {
    v_uv = a_uv;
    gl_Position = frame.view_proj * vec4(a_position, 1.0);
}
";

const FRAGMENT_BODY: &str = r"layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

float glitch_random(vec2 st) {
    return fract(sin(dot(st, vec2(GLITCH_HASH_WEIGHT_X, GLITCH_HASH_WEIGHT_Y))) * GLITCH_HASH_SCALE);
}

float glitch_random_scalar(float x) {
    return fract(sin(x) * GLITCH_HASH_SCALE);
}

float glitch_noise(vec2 st) {
    vec2 i = floor(st);
    vec2 f = fract(st);
    float a = glitch_random(i);
    float b = glitch_random(i + vec2(1.0, 0.0));
    float c = glitch_random(i + vec2(0.0, 1.0));
    float d = glitch_random(i + vec2(1.0, 1.0));
    vec2 u = f * f * (3.0 - 2.0 * f);
    return mix(mix(a, b, u.x), mix(c, d, u.x), u.y);
}

void main() {
    float t = frame.time;
    vec2 uv = v_uv;

    float gate = glitch_random_scalar(t * GLITCH_GATE_RATE);
    float tear = sin(uv.y * GLITCH_WAVE_FREQUENCY + t * GLITCH_WAVE_SPEED) * GLITCH_AMPLITUDE;
    uv.x += step(GLITCH_THRESHOLD, gate) * tear;

    float pulse = 1.0 + sin(t * GLITCH_PULSE_RATE) * GLITCH_PULSE_AMPLITUDE;
    float density = GLITCH_GRID_SCALE * pulse;
    float grid = step(GLITCH_GRID_THRESHOLD, mod(uv.x * density + t * GLITCH_GRID_DRIFT, 1.0))
        * step(GLITCH_GRID_THRESHOLD, mod(uv.y * density + t * GLITCH_GRID_DRIFT, 1.0));
    float grain = glitch_noise(uv * GLITCH_NOISE_SCALE + vec2(t * GLITCH_NOISE_DRIFT));
    float halftone = mix(grid, grain, GLITCH_NOISE_BLEND);

    float gradient = uv.x + uv.y * GLITCH_GRADIENT_Y_WEIGHT;
    float shift = sin(t * GLITCH_COLOR_SHIFT_RATE) * 0.5 + 0.5;
    vec3 base_color = mix(vec3(1.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), shift);
    vec3 color = mix(base_color, vec3(0.0), gradient * halftone);

    outColor = vec4(color, 1.0);
}
";

#[cfg(test)]
mod tests {
    use wgpu::naga;

    use super::*;

    fn parse_and_validate(source: &str, stage: naga::ShaderStage) {
        let mut frontend = naga::front::glsl::Frontend::default();
        let module = frontend
            .parse(&naga::front::glsl::Options::from(stage), source)
            .unwrap_or_else(|err| panic!("failed to parse {stage:?} shader: {err:?}\n{source}"));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|err| panic!("invalid {stage:?} shader: {err:?}"));
    }

    #[test]
    fn prelude_defines_every_constant() {
        let source = fragment_source();
        for (name, _) in glitchfx::params::glsl_defines() {
            assert!(source.contains(&format!("#define {name} ")), "{name} missing");
        }
        assert!(source.contains("#define GLITCH_GRID_SCALE 40.0"));
        assert!(source.contains("#define GLITCH_THRESHOLD 0.8"));
        assert!(source.starts_with("#version 450"));
    }

    #[test]
    fn fragment_body_only_uses_defined_macros() {
        let defined: Vec<_> = glitchfx::params::glsl_defines()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        for token in FRAGMENT_BODY.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_')) {
            if token.starts_with("GLITCH_") {
                assert!(defined.contains(&token), "{token} is not defined");
            }
        }
    }

    #[test]
    fn shaders_pass_naga_validation() {
        parse_and_validate(&vertex_source(), naga::ShaderStage::Vertex);
        parse_and_validate(&fragment_source(), naga::ShaderStage::Fragment);
    }
}
