//! GLSL sources for the star and sky-dome programs.
//!
//! None of these compile on their own: [`crate::variant::ShaderSet`]
//! prepends a `#version` line and the feature defines, and the star stages
//! additionally get [`STARS_SNIPPETS`].
//!
//! Vertex inputs match [`celestial_stars::vertex::ATTRIBUTES`]. The
//! magnitude input is an absolute magnitude.

pub const GLSL_VERSION: &str = "#version 330";

/// Helpers shared by every star stage.
pub const STARS_SNIPPETS: &str = r#"
float log10(float x) {
    return log(x) / log(10.0);
}

float getApparentMagnitude(float absMagnitude, float distInParsec) {
    return absMagnitude + 5.0 * log10(distInParsec / 10.0);
}

// Surface brightness of a star spread over solidAngle, as luminance.
float magnitudeToLuminance(float apparentMagnitude, float solidAngle) {
    const float steradiansToSquareArcSecs = 4.25e10;
    float surfaceBrightness =
        apparentMagnitude + 2.5 * log10(solidAngle * steradiansToSquareArcSecs);
    return 10.8e4 * pow(10, -0.4 * surfaceBrightness);
}

vec3 starPosition(vec2 dir, float dist) {
    return vec3(
        cos(dir.x) * cos(dir.y) * dist,
        sin(dir.x) * dist,
        cos(dir.x) * sin(dir.y) * dist);
}

const float parsecToMeter = 3.08567758e16;
"#;

pub const STARS_VERT: &str = r#"
layout(location = 0) in vec2  inDir;
layout(location = 1) in float inDist;
layout(location = 2) in vec3  inColor;
layout(location = 3) in float inAbsMagnitude;

uniform mat4 uMatMV;
uniform mat4 uInvMV;

out vec3  vColor;
out float vMagnitude;

void main()
{
    vec3 starPos = starPosition(inDir, inDist);
    vec3 observerPos = (uInvMV * vec4(0, 0, 0, 1) / parsecToMeter).xyz;

    vMagnitude = getApparentMagnitude(inAbsMagnitude, length(starPos - observerPos));
    vColor = inColor;

    gl_Position = uMatMV * vec4(starPos * parsecToMeter, 1);
}
"#;

/// Expands each star into a camera-facing quad sized from the solid angle.
pub const STARS_GEOM: &str = r#"
layout(points) in;
layout(triangle_strip, max_vertices = 4) out;

in vec3  vColor[];
in float vMagnitude[];

uniform mat4  uMatP;
uniform float uSolidAngle;
uniform float uMinMagnitude;
uniform float uMaxMagnitude;

out vec3  iColor;
out float iMagnitude;
out vec2  iTexcoords;

void main()
{
    iColor = vColor[0];
    iMagnitude = vMagnitude[0];

    if (iMagnitude > uMaxMagnitude || iMagnitude < uMinMagnitude) {
        return;
    }

    float dist = length(gl_in[0].gl_Position.xyz);
    vec3 y = vec3(0, 1, 0);
    vec3 z = gl_in[0].gl_Position.xyz / dist;
    vec3 x = normalize(cross(z, y));
    y = normalize(cross(z, x));

    const float yo[2] = float[2](0.5, -0.5);
    const float xo[2] = float[2](0.5, -0.5);
    const float PI = 3.14159265359;

    for (int j = 0; j != 2; ++j) {
        for (int i = 0; i != 2; ++i) {
            iTexcoords = vec2(xo[i], yo[j]) * 2;

            float diameter = 2 * sqrt(1 - pow(1 - uSolidAngle / (2 * PI), 2.0));
            float scale = dist * diameter;

            #ifdef DRAWMODE_SPRITE
                float luminance = magnitudeToLuminance(iMagnitude, uSolidAngle);
                scale *= sqrt(luminance) * 100;
            #endif

            vec3 pos = gl_in[0].gl_Position.xyz + (xo[i] * x + yo[j] * y) * scale;
            gl_Position = uMatP * vec4(pos, 1);

            if (gl_Position.w > 0) {
                gl_Position /= gl_Position.w;
                if (gl_Position.z >= 1) {
                    gl_Position.z = 0.999999;
                }
                EmitVertex();
            }
        }
    }
    EndPrimitive();
}
"#;

pub const STARS_FRAG: &str = r#"
in vec3  iColor;
in float iMagnitude;
in vec2  iTexcoords;

uniform sampler2D uStarTexture;
uniform float uSolidAngle;
uniform float uLuminanceMultiplicator;

out vec4 oLuminance;

void main()
{
    float dist = min(1, length(iTexcoords));
    float luminance = magnitudeToLuminance(iMagnitude, uSolidAngle);

    #ifdef DRAWMODE_DISC
        float fac = dist < 1 ? luminance : 0;
    #endif

    #ifdef DRAWMODE_SMOOTH_DISC
        // cone-shaped falloff; times three keeps the total brightness of a flat disc
        float fac = luminance * clamp(1 - dist, 0, 1) * 3;
    #endif

    #ifdef DRAWMODE_SPRITE
        float fac = texture(uStarTexture, iTexcoords * 0.5 + 0.5).r;
    #endif

    oLuminance = vec4(iColor * fac * uLuminanceMultiplicator, 1.0);
}
"#;

pub const STARS_VERT_ONE_PIXEL: &str = r#"
layout(location = 0) in vec2  inDir;
layout(location = 1) in float inDist;
layout(location = 2) in vec3  inColor;
layout(location = 3) in float inAbsMagnitude;

uniform mat4 uMatMV;
uniform mat4 uMatP;
uniform mat4 uInvMV;

out vec3  vColor;
out vec4  vScreenSpacePos;
out float vMagnitude;

void main()
{
    vec3 starPos = starPosition(inDir, inDist);
    vec3 observerPos = (uInvMV * vec4(0, 0, 0, 1) / parsecToMeter).xyz;

    vMagnitude = getApparentMagnitude(inAbsMagnitude, length(starPos - observerPos));
    vColor = inColor;

    vScreenSpacePos = uMatP * uMatMV * vec4(starPos * parsecToMeter, 1);

    if (vScreenSpacePos.w > 0) {
        vScreenSpacePos /= vScreenSpacePos.w;
        if (vScreenSpacePos.z >= 1) {
            vScreenSpacePos.z = 0.999999;
        }
    }

    gl_Position = vScreenSpacePos;
}
"#;

/// Spreads each star's luminance over the solid angle of its pixel.
pub const STARS_FRAG_ONE_PIXEL: &str = r#"
in vec3  vColor;
in vec4  vScreenSpacePos;
in float vMagnitude;

uniform float uLuminanceMultiplicator;
uniform mat4  uInvP;
uniform vec2  uResolution;
uniform float uMinMagnitude;
uniform float uMaxMagnitude;

out vec4 oLuminance;

float getSolidAngle(vec3 a, vec3 b, vec3 c) {
    return 2 * atan(abs(dot(a, cross(b, c))) / (1 + dot(a, b) + dot(a, c) + dot(b, c)));
}

float getSolidAngleOfPixel(vec4 screenSpacePosition, vec2 resolution, mat4 invProjection) {
    vec2 pixel = vec2(1.0) / resolution;
    vec4 corners[4] = vec4[4](
        screenSpacePosition + vec4(-pixel.x, -pixel.y, 0, 0),
        screenSpacePosition + vec4(+pixel.x, -pixel.y, 0, 0),
        screenSpacePosition + vec4(+pixel.x, +pixel.y, 0, 0),
        screenSpacePosition + vec4(-pixel.x, +pixel.y, 0, 0)
    );

    for (int i = 0; i < 4; ++i) {
        corners[i] = invProjection * corners[i];
        corners[i].xyz = normalize(corners[i].xyz);
    }

    return getSolidAngle(corners[0].xyz, corners[1].xyz, corners[2].xyz)
         + getSolidAngle(corners[0].xyz, corners[2].xyz, corners[3].xyz);
}

void main()
{
    if (vMagnitude > uMaxMagnitude || vMagnitude < uMinMagnitude) {
        discard;
    }

    float solidAngle = getSolidAngleOfPixel(vScreenSpacePos, uResolution, uInvP);
    float luminance = magnitudeToLuminance(vMagnitude, solidAngle);

    oLuminance = vec4(vColor * luminance * uLuminanceMultiplicator, 1.0);
}
"#;

/// Full-screen quad that reconstructs the view ray per fragment.
pub const BACKGROUND_VERT: &str = r#"
layout(location = 0) in vec2 vPosition;

uniform mat4 uInvMVP;
uniform mat4 uInvMV;

out vec3 vView;

void main()
{
    vec3 vRayOrigin = (uInvMV * vec4(0, 0, 0, 1)).xyz;
    vec4 vRayEnd    = uInvMVP * vec4(vPosition, 0, 1);
    vView = vRayEnd.xyz / vRayEnd.w - vRayOrigin;
    gl_Position = vec4(vPosition, 1, 1);
}
"#;

/// Equirectangular sky-dome lookup, tinted and blended additively.
pub const BACKGROUND_FRAG: &str = r#"
in vec3 vView;

uniform sampler2D uTexture;
uniform vec4      uColor;

layout(location = 0) out vec3 vOutColor;

float stableAtan2(float a, float b) {
    return 2.0 * atan(a / (sqrt(b * b + a * a) + b));
}

void main()
{
    const float PI = 3.14159265359;
    vec3 view = normalize(vView);
    vec2 texcoord = vec2(0.5 * stableAtan2(view.x, -view.z) / PI, acos(view.y) / PI);
    vOutColor = texture(uTexture, texcoord).rgb * uColor.rgb * uColor.a;
}
"#;

/// Corners of the background quad, drawn as a triangle strip.
pub const BACKGROUND_QUAD: [f32; 8] = [-1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0];
