//! GLSL dialect selection and `#version` handling.

use std::borrow::Cow;

/// GLSL dialects the raymarching shaders are written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    Glsl330,
    Glsl300Es,
    Glsl140,
    Glsl120,
}

impl GlslVersion {
    /// Preference order when several are supported.
    const PREFERENCE: [GlslVersion; 4] = [
        GlslVersion::Glsl330,
        GlslVersion::Glsl300Es,
        GlslVersion::Glsl140,
        GlslVersion::Glsl120,
    ];

    pub fn directive(self) -> &'static str {
        match self {
            GlslVersion::Glsl330 => "#version 330 core",
            GlslVersion::Glsl300Es => "#version 300 es",
            GlslVersion::Glsl140 => "#version 140",
            GlslVersion::Glsl120 => "#version 120",
        }
    }

    fn as_glium(self) -> glium::Version {
        match self {
            GlslVersion::Glsl330 => glium::Version(glium::Api::Gl, 3, 3),
            GlslVersion::Glsl300Es => glium::Version(glium::Api::GlEs, 3, 0),
            GlslVersion::Glsl140 => glium::Version(glium::Api::Gl, 1, 4),
            GlslVersion::Glsl120 => glium::Version(glium::Api::Gl, 1, 2),
        }
    }
}

/// Best supported dialect, or `None` if the context supports none of them.
pub fn pick_version(supported: &[glium::Version]) -> Option<GlslVersion> {
    GlslVersion::PREFERENCE
        .into_iter()
        .find(|v| supported.contains(&v.as_glium()))
}

/// Prefix `source` with `version`'s directive unless it already declares one.
pub fn with_version_directive(source: &str, version: GlslVersion) -> Cow<'_, str> {
    let declared = source
        .lines()
        .map(str::trim_start)
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with("#version"));

    if declared {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(format!("{}\n{source}", version.directive()))
    }
}
