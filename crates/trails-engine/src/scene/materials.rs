use crate::asset::AssetRoot;
use crate::error::Result;
use crate::gl::Gpu;
use crate::model::attrib;
use crate::resource::{Program, ProgramSource, Stage};

// ── uniform names ─────────────────────────────────────────────────────────

pub(super) const U_TRANSFORM: &str = "u_MAT_TRANSFORM";
pub(super) const U_TEXTURE: &str = "u_S2D_TEXTURE";
pub(super) const U_ALPHA: &str = "u_FLT_ALPHA";
pub(super) const U_DT: &str = "u_FLT_DT";
pub(super) const U_PROJ: &str = "u_MAT_PROJ";
pub(super) const U_VIEW: &str = "u_MAT_VIEW";
pub(super) const U_WORLD: &str = "u_MAT_WORLD";
pub(super) const U_COLOR: &str = "u_VEC_COLOR";

/// GLSL ES sources for every program the scene uses.
#[derive(Debug, Clone)]
pub struct MaterialSources {
    pub blit_vert: String,
    pub blit_frag: String,
    pub blit_feedback_frag: String,
    pub particle_vert: String,
    pub particle_frag: String,
}

impl MaterialSources {
    /// Reads the shaders from `shd/` under `root`.
    pub fn load(root: &AssetRoot) -> Result<Self> {
        Ok(Self {
            blit_vert: root.read_to_string("shd/blit.vert")?,
            blit_frag: root.read_to_string("shd/blit.frag")?,
            blit_feedback_frag: root.read_to_string("shd/blit_fback.frag")?,
            particle_vert: root.read_to_string("shd/particle.vert")?,
            particle_frag: root.read_to_string("shd/particle.frag")?,
        })
    }
}

/// The linked programs.
#[derive(Debug)]
pub struct Materials {
    /// Textured quad with global alpha.
    pub blit: Program,
    /// Textured quad that decays the previous frame.
    pub blit_feedback: Program,
    /// Flat-colored particle disc.
    pub particle: Program,
}

impl Materials {
    pub fn link(gpu: &Gpu, src: &MaterialSources) -> Result<Self> {
        let textured = |frag: &str, frag_origin: &str| {
            ProgramSource::new()
                .stage(Stage::Vertex, src.blit_vert.as_str(), "shd/blit.vert")
                .stage(Stage::Fragment, frag, frag_origin)
                .attribute(attrib::POSITION, "in_POSITION")
                .attribute(attrib::COLOR, "in_COLOR")
                .attribute(attrib::UV0, "in_UV0")
        };

        let blit = Program::link(gpu, &textured(&src.blit_frag, "shd/blit.frag"))?;
        let blit_feedback =
            Program::link(gpu, &textured(&src.blit_feedback_frag, "shd/blit_fback.frag"))?;

        let particle = Program::link(
            gpu,
            &ProgramSource::new()
                .stage(Stage::Vertex, src.particle_vert.as_str(), "shd/particle.vert")
                .stage(Stage::Fragment, src.particle_frag.as_str(), "shd/particle.frag")
                .attribute(attrib::POSITION, "in_POSITION"),
        )?;

        log::info!("linked scene materials");

        Ok(Self {
            blit,
            blit_feedback,
            particle,
        })
    }
}
