//! Shader variant selection.
//!
//! A variant is identified by the draw mode and the HDR flag. Changing
//! either marks the selector dirty; the next [`ShaderVariantSelector::ensure_compiled`]
//! rebuilds both programs and the selector is clean again until the next
//! actual change. Setting a value equal to the current one does nothing.

use std::fmt;

use celestial_stars::DrawMode;
use tracing::{debug, info};

use crate::error::{RenderError, Result};
use crate::shaders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub draw_mode: DrawMode,
    pub hdr: bool,
}

impl VariantKey {
    pub fn new(draw_mode: DrawMode, hdr: bool) -> Self {
        Self { draw_mode, hdr }
    }

    /// `#version` line followed by the preprocessor defines for this variant.
    pub fn header(&self) -> String {
        let mut header = format!("{}\n", shaders::GLSL_VERSION);
        if self.hdr {
            header.push_str("#define ENABLE_HDR\n");
        }
        header.push_str("#define ");
        header.push_str(self.draw_mode.define());
        header.push('\n');
        header
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.draw_mode,
            if self.hdr { "hdr" } else { "ldr" }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Complete source of one program, stage by stage, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: &'static str,
    pub stages: Vec<(ShaderStage, String)>,
}

impl ShaderSource {
    pub fn stage(&self, stage: ShaderStage) -> Option<&str> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, code)| code.as_str())
    }

    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        self.stage(stage).is_some()
    }
}

/// The two programs a variant needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSet {
    pub stars: ShaderSource,
    pub background: ShaderSource,
}

impl ShaderSet {
    pub fn for_key(key: VariantKey) -> Self {
        let header = key.header();
        let star = |body: &str| format!("{}{}{}", header, shaders::STARS_SNIPPETS, body);

        let stages = if key.draw_mode.is_point() {
            vec![
                (ShaderStage::Vertex, star(shaders::STARS_VERT_ONE_PIXEL)),
                (ShaderStage::Fragment, star(shaders::STARS_FRAG_ONE_PIXEL)),
            ]
        } else {
            vec![
                (ShaderStage::Vertex, star(shaders::STARS_VERT)),
                (ShaderStage::Geometry, star(shaders::STARS_GEOM)),
                (ShaderStage::Fragment, star(shaders::STARS_FRAG)),
            ]
        };

        let background = |body: &str| format!("{}{}", header, body);

        Self {
            stars: ShaderSource {
                label: "stars",
                stages,
            },
            background: ShaderSource {
                label: "background",
                stages: vec![
                    (ShaderStage::Vertex, background(shaders::BACKGROUND_VERT)),
                    (ShaderStage::Fragment, background(shaders::BACKGROUND_FRAG)),
                ],
            },
        }
    }
}

/// Turns shader sources into linked programs. Implemented by render
/// backends; `Program` is whatever handle the backend draws with.
pub trait ShaderCompiler {
    type Program;
    type Error: std::error::Error + Send + Sync + 'static;

    fn compile(&mut self, source: &ShaderSource) -> std::result::Result<Self::Program, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Clean,
    Dirty,
}

#[derive(Debug)]
pub struct CompiledShaders<P> {
    pub key: VariantKey,
    pub stars: P,
    pub background: P,
}

#[derive(Debug)]
pub struct ShaderVariantSelector<P> {
    key: VariantKey,
    state: SelectorState,
    compiled: Option<CompiledShaders<P>>,
}

impl<P> ShaderVariantSelector<P> {
    /// Starts dirty; nothing is compiled until first use.
    pub fn new(key: VariantKey) -> Self {
        Self {
            key,
            state: SelectorState::Dirty,
            compiled: None,
        }
    }

    pub fn key(&self) -> VariantKey {
        self.key
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SelectorState::Dirty
    }

    pub fn set_draw_mode(&mut self, draw_mode: DrawMode) {
        if self.key.draw_mode != draw_mode {
            self.key.draw_mode = draw_mode;
            self.state = SelectorState::Dirty;
        }
    }

    pub fn set_hdr(&mut self, hdr: bool) {
        if self.key.hdr != hdr {
            self.key.hdr = hdr;
            self.state = SelectorState::Dirty;
        }
    }

    /// Currently compiled programs, possibly for an older key if dirty.
    pub fn compiled(&self) -> Option<&CompiledShaders<P>> {
        self.compiled.as_ref()
    }

    /// Returns the programs for the current key, compiling them first if
    /// the selector is dirty. The flag is `true` when a compile happened.
    ///
    /// On failure the selector stays dirty and keeps its previous programs,
    /// so the next call retries.
    pub fn ensure_compiled<C>(
        &mut self,
        compiler: &mut C,
    ) -> Result<(bool, &CompiledShaders<P>), C::Error>
    where
        C: ShaderCompiler<Program = P>,
    {
        let recompile = self.is_dirty() || self.compiled.is_none();

        let compiled = match self.compiled.take() {
            Some(current) if !recompile => current,
            previous => match compile_set(compiler, self.key) {
                Ok(fresh) => fresh,
                Err(e) => {
                    self.compiled = previous;
                    return Err(e);
                }
            },
        };

        self.state = SelectorState::Clean;
        Ok((recompile, &*self.compiled.insert(compiled)))
    }
}

fn compile_set<C: ShaderCompiler>(
    compiler: &mut C,
    key: VariantKey,
) -> Result<CompiledShaders<C::Program>, C::Error> {
    let set = ShaderSet::for_key(key);
    debug!("Compiling star shaders for {}", key);

    let compile = |compiler: &mut C, source: &ShaderSource| {
        compiler.compile(source).map_err(|source_err| RenderError::Compile {
            program: source.label,
            source: source_err,
        })
    };

    let stars = compile(compiler, &set.stars)?;
    let background = compile(compiler, &set.background)?;

    info!("Star shaders ready: {}", key);
    Ok(CompiledShaders {
        key,
        stars,
        background,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("rejected")]
    struct Rejected;

    #[derive(Default)]
    struct Recorder {
        compiled: Vec<ShaderSource>,
        fail: bool,
    }

    impl ShaderCompiler for Recorder {
        type Program = usize;
        type Error = Rejected;

        fn compile(&mut self, source: &ShaderSource) -> std::result::Result<usize, Rejected> {
            if self.fail {
                return Err(Rejected);
            }
            self.compiled.push(source.clone());
            Ok(self.compiled.len())
        }
    }

    #[test]
    fn test_header_defines() {
        let ldr = VariantKey::new(DrawMode::Disc, false).header();
        assert_eq!(ldr, "#version 330\n#define DRAWMODE_DISC\n");

        let hdr = VariantKey::new(DrawMode::Sprite, true).header();
        assert!(hdr.starts_with("#version 330\n"));
        assert!(hdr.contains("#define ENABLE_HDR\n"));
        assert!(hdr.contains("#define DRAWMODE_SPRITE\n"));
    }

    #[test]
    fn test_point_modes_skip_geometry() {
        for mode in DrawMode::ALL {
            let set = ShaderSet::for_key(VariantKey::new(mode, false));
            assert_eq!(set.stars.has_stage(ShaderStage::Geometry), !mode.is_point());
            assert!(set.stars.has_stage(ShaderStage::Vertex));
            assert!(set.stars.has_stage(ShaderStage::Fragment));
            assert!(!set.background.has_stage(ShaderStage::Geometry));
        }
    }

    #[test]
    fn test_star_stages_include_snippets() {
        let set = ShaderSet::for_key(VariantKey::new(DrawMode::SmoothPoint, true));
        for (_, code) in &set.stars.stages {
            assert!(code.contains("float magnitudeToLuminance"));
            assert!(code.contains("#define DRAWMODE_SMOOTH_POINT"));
        }
        let frag = set.stars.stage(ShaderStage::Fragment).unwrap();
        assert!(frag.contains("getSolidAngleOfPixel"));
    }

    #[test]
    fn test_fresh_selector_compiles_once() {
        let mut selector = ShaderVariantSelector::new(VariantKey::new(DrawMode::SmoothDisc, false));
        let mut compiler = Recorder::default();
        assert!(selector.is_dirty());

        let (recompiled, shaders) = selector.ensure_compiled(&mut compiler).unwrap();
        assert!(recompiled);
        assert_eq!((shaders.stars, shaders.background), (1, 2));
        assert_eq!(selector.state(), SelectorState::Clean);

        let (recompiled, _) = selector.ensure_compiled(&mut compiler).unwrap();
        assert!(!recompiled);
        assert_eq!(compiler.compiled.len(), 2);
    }

    #[test]
    fn test_same_value_stays_clean() {
        let mut selector = ShaderVariantSelector::new(VariantKey::new(DrawMode::Sprite, true));
        selector.ensure_compiled(&mut Recorder::default()).unwrap();

        selector.set_draw_mode(DrawMode::Sprite);
        selector.set_hdr(true);
        assert_eq!(selector.state(), SelectorState::Clean);

        selector.set_hdr(false);
        assert!(selector.is_dirty());
        assert_eq!(selector.key(), VariantKey::new(DrawMode::Sprite, false));
    }

    #[test]
    fn test_failed_compile_stays_dirty_and_keeps_programs() {
        let mut selector = ShaderVariantSelector::new(VariantKey::new(DrawMode::Disc, false));
        let mut compiler = Recorder::default();
        selector.ensure_compiled(&mut compiler).unwrap();

        selector.set_draw_mode(DrawMode::Point);
        compiler.fail = true;
        let err = selector.ensure_compiled(&mut compiler).unwrap_err();
        assert!(matches!(err, RenderError::Compile { program: "stars", .. }));
        assert!(selector.is_dirty());
        assert_eq!(selector.compiled().map(|c| c.key.draw_mode), Some(DrawMode::Disc));

        compiler.fail = false;
        let (recompiled, shaders) = selector.ensure_compiled(&mut compiler).unwrap();
        assert!(recompiled);
        assert_eq!(shaders.key.draw_mode, DrawMode::Point);
    }
}
