//! Default canvas shaders.
//!
//! Contract with shader authors:
//! - vertex inputs: `position`, `color`, `texCoords`, `intensity` (see
//!   [`default_vertex_format`](glcanvas_uniform::default_vertex_format))
//! - uniforms every canvas declares: `u_transform`, `u_colormask`, `u_bounds`, `u_texbounds`
//! - `u_texture` is sampled from texture unit 0 unless the host declares it
//!
//! A custom fragment shader receives `Color`, `texcoords`, `Intensity` and `glpos` from the
//! default vertex shader.

pub const DEFAULT_VERTEX_SHADER: &str = r#"#version 330 core

in vec2 position;
in vec4 color;
in vec2 texCoords;
in float intensity;

out vec4 Color;
out vec2 texcoords;
out vec2 glpos;
out float Intensity;

uniform mat3 u_transform;
uniform vec4 u_bounds;

void main() {
    vec2 transPos = (u_transform * vec3(position, 1.0)).xy;
    vec2 normPos = (transPos - u_bounds.xy) / u_bounds.zw * 2.0 - vec2(1.0, 1.0);
    gl_Position = vec4(normPos, 0.0, 1.0);
    Color = color;
    texcoords = texCoords;
    Intensity = intensity;
    glpos = transPos;
}
"#;

pub const DEFAULT_FRAGMENT_SHADER: &str = r#"#version 330 core

in vec4 Color;
in vec2 texcoords;
in float Intensity;

out vec4 fragColor;

uniform vec4 u_colormask;
uniform vec4 u_texbounds;
uniform sampler2D u_texture;

void main() {
    if (Intensity == 0.0) {
        fragColor = u_colormask * Color;
    } else {
        vec2 t = (texcoords - u_texbounds.xy) / u_texbounds.zw;
        fragColor = (1.0 - Intensity) * Color;
        fragColor += Intensity * Color * texture(u_texture, t);
        fragColor *= u_colormask;
    }
}
"#;
