//! WGSL for the GPU canvas.
//!
//! One module, three pipelines:
//! - `vs_sprite`/`fs_sprite`: instanced quads for glows (kind 0) and discs (kind 1)
//! - `vs_line`/`fs_line`: instanced quads stretched along each segment
//! - `vs_vignette`/`fs_vignette`: fullscreen triangle
//!
//! All positions arrive in pixels and are mapped to clip space with the
//! viewport size from the frame uniforms.

pub(crate) const SHADER_SOURCE: &str = r#"
struct Frame {
    size: vec2<f32>,
    vignette_inner: f32,
    vignette_outer: f32,
    vignette_color: vec4<f32>,
};

@group(0) @binding(0) var<uniform> frame: Frame;

fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = vec2<f32>(p.x / frame.size.x * 2.0 - 1.0, 1.0 - p.y / frame.size.y * 2.0);
    return vec4<f32>(ndc, 0.0, 1.0);
}

// ---------------------------------------------------------------------------
// Sprites
// ---------------------------------------------------------------------------

struct SpriteIn {
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) kind: u32,
    @location(3) color: vec4<f32>,
};

struct SpriteOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) @interpolate(flat) kind: u32,
    @location(2) color: vec4<f32>,
    @location(3) radius: f32,
};

@vertex
fn vs_sprite(@builtin(vertex_index) vertex_index: u32, sprite: SpriteIn) -> SpriteOut {
    var quad = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    // One extra pixel so disc edges can fade out.
    let extent = sprite.radius + 1.0;
    let local = quad[vertex_index] * extent;

    var out: SpriteOut;
    out.clip_position = to_clip(sprite.center + local);
    out.local = local;
    out.kind = sprite.kind;
    out.color = sprite.color;
    out.radius = sprite.radius;
    return out;
}

@fragment
fn fs_sprite(in: SpriteOut) -> @location(0) vec4<f32> {
    let d = length(in.local);
    var alpha: f32;
    if in.kind == 0u {
        alpha = in.color.a * clamp(1.0 - d / in.radius, 0.0, 1.0);
    } else {
        alpha = in.color.a * clamp(in.radius - d + 0.5, 0.0, 1.0);
    }
    if alpha <= 0.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, alpha);
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

struct LineIn {
    @location(0) from_pos: vec2<f32>,
    @location(1) to_pos: vec2<f32>,
    @location(2) start_color: vec4<f32>,
    @location(3) end_color: vec4<f32>,
    @location(4) width: f32,
};

struct LineOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) t: f32,
    @location(1) across: f32,
    @location(2) start_color: vec4<f32>,
    @location(3) end_color: vec4<f32>,
    @location(4) width: f32,
};

@vertex
fn vs_line(@builtin(vertex_index) vertex_index: u32, line: LineIn) -> LineOut {
    // (along, side) per corner
    var quad = array<vec2<f32>, 6>(
        vec2<f32>(0.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(0.0,  1.0),
        vec2<f32>(0.0,  1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0,  1.0),
    );
    let corner = quad[vertex_index];

    let span = line.to_pos - line.from_pos;
    let len = length(span);
    var dir = vec2<f32>(1.0, 0.0);
    if len > 0.0001 {
        dir = span / len;
    }
    let normal = vec2<f32>(-dir.y, dir.x);
    let half_width = line.width * 0.5 + 1.0;

    let p = line.from_pos + span * corner.x + normal * half_width * corner.y;

    var out: LineOut;
    out.clip_position = to_clip(p);
    out.t = corner.x;
    out.across = half_width * corner.y;
    out.start_color = line.start_color;
    out.end_color = line.end_color;
    out.width = line.width;
    return out;
}

@fragment
fn fs_line(in: LineOut) -> @location(0) vec4<f32> {
    let coverage = clamp(in.width * 0.5 - abs(in.across) + 0.5, 0.0, 1.0);
    let color = mix(in.start_color, in.end_color, in.t);
    let alpha = color.a * coverage;
    if alpha <= 0.0 {
        discard;
    }
    return vec4<f32>(color.rgb, alpha);
}

// ---------------------------------------------------------------------------
// Vignette
// ---------------------------------------------------------------------------

@vertex
fn vs_vignette(@builtin(vertex_index) vertex_index: u32) -> @builtin(position) vec4<f32> {
    let uv = vec2<f32>(f32((vertex_index << 1u) & 2u), f32(vertex_index & 2u));
    return vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
}

@fragment
fn fs_vignette(@builtin(position) frag_coord: vec4<f32>) -> @location(0) vec4<f32> {
    let center = frame.size * 0.5;
    let reach = max(length(center), 0.0001);
    let d = length(frag_coord.xy - center) / reach;
    let strength = smoothstep(frame.vignette_inner, frame.vignette_outer, d);
    return vec4<f32>(frame.vignette_color.rgb, frame.vignette_color.a * strength);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use naga::front::wgsl;
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    #[test]
    fn test_shader_module_validates() {
        let module = match wgsl::parse_str(SHADER_SOURCE) {
            Ok(module) => module,
            Err(err) => panic!("{}", err.emit_to_string(SHADER_SOURCE)),
        };
        let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
        if let Err(err) = validator.validate(&module) {
            panic!("shader validation failed: {:?}", err);
        }
    }

    #[test]
    fn test_shader_has_all_entry_points() {
        let module = wgsl::parse_str(SHADER_SOURCE).unwrap();
        let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        for expected in [
            "vs_sprite",
            "fs_sprite",
            "vs_line",
            "fs_line",
            "vs_vignette",
            "fs_vignette",
        ] {
            assert!(names.contains(&expected), "missing entry point {expected}");
        }
    }
}
