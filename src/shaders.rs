//! Shader sources in the single-file `#shader` format.
//!
//! A shader file holds both stages. A line containing `#shader` and `vertex`
//! starts the vertex stage, one containing `#shader` and `fragment` starts the
//! fragment stage, and every other line belongs to the stage most recently
//! started:
//!
//! ```text
//! #shader vertex
//! ...vertex source...
//! #shader fragment
//! ...fragment source...
//! ```

use std::fmt;
use std::path::Path;

use crate::error::ShaderError;

/// Built-in program for batched quads, targeting GLSL 3.30.
///
/// Reads the [`Vertex`](crate::Vertex) layout at attribute slots 0–3 and
/// transforms positions by `u_MVP`. The texture slot is forwarded as a flat
/// varying; resolving it to a sampler is left to custom programs.
///
/// # Uniforms
///
/// | Name    | Type   | Description                    |
/// |---------|--------|--------------------------------|
/// | `u_MVP` | `mat4` | Projection * view * model      |
pub const BATCH_SHADER: &str = r"#shader vertex
#version 330 core

layout(location = 0) in vec3 a_Position;
layout(location = 1) in vec4 a_Color;
layout(location = 2) in vec2 a_TexCoord;
layout(location = 3) in float a_TexIndex;

uniform mat4 u_MVP;

out vec4 v_Color;
out vec2 v_TexCoord;
flat out float v_TexIndex;

void main() {
    v_Color = a_Color;
    v_TexCoord = a_TexCoord;
    v_TexIndex = a_TexIndex;
    gl_Position = u_MVP * vec4(a_Position, 1.0);
}

#shader fragment
#version 330 core

in vec4 v_Color;
in vec2 v_TexCoord;
flat in float v_TexIndex;

layout(location = 0) out vec4 o_Color;

void main() {
    o_Color = v_Color;
}
";

/// Name of the projection-view-model uniform every batch program must expose.
pub const MVP_UNIFORM: &str = "u_MVP";

/// A programmable pipeline stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// Vertex and fragment source split out of a `#shader` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    /// Vertex stage source.
    pub vertex: String,
    /// Fragment stage source.
    pub fragment: String,
}

impl ShaderSource {
    /// Split `text` at its `#shader` markers.
    ///
    /// Lines before the first marker are discarded. A marker line naming
    /// neither stage leaves the current stage unchanged and is itself
    /// dropped.
    pub fn parse(text: &str) -> Self {
        let mut out = Self::default();
        let mut current: Option<ShaderStage> = None;
        let mut orphaned = 0usize;

        for line in text.lines() {
            if line.contains("#shader") {
                if line.contains("vertex") {
                    current = Some(ShaderStage::Vertex);
                } else if line.contains("fragment") {
                    current = Some(ShaderStage::Fragment);
                }
                continue;
            }

            let target = match current {
                Some(ShaderStage::Vertex) => &mut out.vertex,
                Some(ShaderStage::Fragment) => &mut out.fragment,
                None => {
                    orphaned += 1;
                    continue;
                }
            };
            target.push_str(line);
            target.push('\n');
        }

        if orphaned > 0 {
            log::debug!("ignored {orphaned} line(s) before the first #shader marker");
        }
        out
    }

    /// Read and split a `#shader` file.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Io`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ShaderError> {
        let text = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded shader source from {}", path.display());
        Ok(Self::parse(&text))
    }

    /// The built-in [`BATCH_SHADER`], split.
    pub fn builtin() -> Self {
        Self::parse(BATCH_SHADER)
    }

    /// Source text for `stage`.
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn splits_two_stages() {
        let src = ShaderSource::parse("#shader vertex\nA\nB\n#shader fragment\nC\n");
        assert_eq!(src.vertex, "A\nB\n");
        assert_eq!(src.fragment, "C\n");
    }

    #[test]
    fn every_line_gets_trailing_newline() {
        let src = ShaderSource::parse("#shader fragment\nlast line without newline");
        assert_eq!(src.fragment, "last line without newline\n");
    }

    #[test]
    fn lines_before_first_marker_are_dropped() {
        let src = ShaderSource::parse("// header\n#shader vertex\nv\n");
        assert_eq!(src.vertex, "v\n");
        assert!(src.fragment.is_empty());
    }

    #[test]
    fn unknown_marker_keeps_current_stage() {
        let src = ShaderSource::parse("#shader vertex\na\n#shader geometry\nb\n");
        assert_eq!(src.vertex, "a\nb\n");
    }

    #[test]
    fn repeated_marker_appends() {
        let src = ShaderSource::parse(
            "#shader vertex\na\n#shader fragment\nf\n#shader vertex\nb\n",
        );
        assert_eq!(src.vertex, "a\nb\n");
        assert_eq!(src.fragment, "f\n");
    }

    #[test]
    fn blank_lines_are_preserved() {
        let src = ShaderSource::parse("#shader vertex\n\nx\n");
        assert_eq!(src.vertex, "\nx\n");
    }

    #[test]
    fn builtin_has_both_stages() {
        let src = ShaderSource::builtin();
        assert!(src.vertex.starts_with("#version 330 core\n"));
        assert!(src.fragment.starts_with("#version 330 core\n"));
        assert!(src.vertex.contains(MVP_UNIFORM));
        assert!(!src.vertex.contains("#shader"));
        assert!(!src.fragment.contains("a_Position"));
    }

    #[test]
    fn from_path_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "quad-batch-shader-{}.glsl",
            std::process::id()
        ));
        std::fs::write(&path, BATCH_SHADER).unwrap();
        let src = ShaderSource::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(src, ShaderSource::builtin());
    }

    #[test]
    fn from_path_missing_file() {
        let err = ShaderSource::from_path(Path::new("/nonexistent/batch.glsl")).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }

    #[test]
    fn stage_selects_matching_source() {
        let src = ShaderSource::parse("#shader vertex\nv\n#shader fragment\nf\n");
        assert_eq!(src.stage(ShaderStage::Vertex), "v\n");
        assert_eq!(src.stage(ShaderStage::Fragment), "f\n");
    }

    #[test]
    fn stage_display() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
