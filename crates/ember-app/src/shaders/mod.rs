//! The WGSL shader set, compiled into the binary.
//!
//! Every stage is the uniform prelude followed by the stage body; stages
//! that need procedural noise also get the noise library.

use ember_renderer::{ShaderError, ShaderProgram};

const PRELUDE: &str = include_str!("uniforms.wgsl");
const NOISE: &str = include_str!("noise.wgsl");

const FIREBALL_VERT: &str = include_str!("fireball.vert.wgsl");
const EYEBROW_VERT: &str = include_str!("eyebrow.vert.wgsl");
const EYE_VERT: &str = include_str!("eye.vert.wgsl");
const EYELASH_VERT: &str = include_str!("eyelash.vert.wgsl");
const LAMBERT_VERT: &str = include_str!("lambert.vert.wgsl");

const IRIDESCENT_FLAME_FRAG: &str = include_str!("iridescent_flame.frag.wgsl");
const FIREBALL_FRAG: &str = include_str!("fireball.frag.wgsl");
const FLAT_FRAG: &str = include_str!("flat.frag.wgsl");
const LAMBERT_FRAG: &str = include_str!("lambert.frag.wgsl");
const EYEBALL_FRAG: &str = include_str!("eyeball.frag.wgsl");

/// One stage body and whether it calls into the noise library.
#[derive(Debug, Clone, Copy)]
struct StageSource {
    body: &'static str,
    noise: bool,
}

impl StageSource {
    const fn plain(body: &'static str) -> Self {
        Self { body, noise: false }
    }

    const fn noisy(body: &'static str) -> Self {
        Self { body, noise: true }
    }

    fn assemble(&self) -> String {
        let mut source = String::with_capacity(PRELUDE.len() + NOISE.len() + self.body.len() + 2);
        source.push_str(PRELUDE);
        source.push('\n');
        if self.noise {
            source.push_str(NOISE);
            source.push('\n');
        }
        source.push_str(self.body);
        source
    }
}

/// Which program a face part is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    Body,
    Flame,
    Brows,
    Eye,
    Lash,
    Eyeball,
    Nose,
    Mouth,
}

impl ProgramKind {
    pub const ALL: [ProgramKind; 8] = [
        ProgramKind::Body,
        ProgramKind::Flame,
        ProgramKind::Brows,
        ProgramKind::Eye,
        ProgramKind::Lash,
        ProgramKind::Eyeball,
        ProgramKind::Nose,
        ProgramKind::Mouth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProgramKind::Body => "ember-body",
            ProgramKind::Flame => "outer-flame",
            ProgramKind::Brows => "brows",
            ProgramKind::Eye => "eye",
            ProgramKind::Lash => "lash",
            ProgramKind::Eyeball => "eyeball",
            ProgramKind::Nose => "nose",
            ProgramKind::Mouth => "mouth",
        }
    }

    fn stages(self) -> (StageSource, StageSource) {
        match self {
            ProgramKind::Body => (
                StageSource::noisy(FIREBALL_VERT),
                StageSource::plain(IRIDESCENT_FLAME_FRAG),
            ),
            ProgramKind::Flame => (
                StageSource::noisy(FIREBALL_VERT),
                StageSource::noisy(FIREBALL_FRAG),
            ),
            ProgramKind::Brows => (
                StageSource::noisy(EYEBROW_VERT),
                StageSource::plain(IRIDESCENT_FLAME_FRAG),
            ),
            ProgramKind::Eye => (StageSource::plain(EYE_VERT), StageSource::plain(FLAT_FRAG)),
            ProgramKind::Lash => (
                StageSource::plain(EYELASH_VERT),
                StageSource::plain(FLAT_FRAG),
            ),
            ProgramKind::Eyeball => (
                StageSource::plain(LAMBERT_VERT),
                StageSource::plain(EYEBALL_FRAG),
            ),
            ProgramKind::Nose => (
                StageSource::plain(LAMBERT_VERT),
                StageSource::plain(LAMBERT_FRAG),
            ),
            ProgramKind::Mouth => (
                StageSource::plain(LAMBERT_VERT),
                StageSource::plain(FLAT_FRAG),
            ),
        }
    }

    /// Full vertex and fragment source text.
    pub fn sources(self) -> (String, String) {
        let (vertex, fragment) = self.stages();
        (vertex.assemble(), fragment.assemble())
    }

    /// Compile and link this program.
    pub fn build(self) -> Result<ShaderProgram, ShaderError> {
        let (vertex, fragment) = self.sources();
        ShaderProgram::new(self.label(), &vertex, &fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_renderer::shader::{AttributeRole, UniformRole};

    #[test]
    fn every_program_links() {
        for kind in ProgramKind::ALL {
            if let Err(e) = kind.build() {
                panic!("{} failed to build: {e}", kind.label());
            }
        }
    }

    #[test]
    fn every_program_reads_position_and_normal() {
        for kind in ProgramKind::ALL {
            let program = kind.build().unwrap();
            assert_eq!(program.attribute_location(AttributeRole::Position), Some(0));
            assert_eq!(program.attribute_location(AttributeRole::Normal), Some(1));
            assert_eq!(program.attribute_location(AttributeRole::Color), None);
        }
    }

    #[test]
    fn every_program_places_geometry() {
        for kind in ProgramKind::ALL {
            let program = kind.build().unwrap();
            assert!(program.has_uniform(UniformRole::Model), "{}", kind.label());
            assert!(program.has_uniform(UniformRole::ViewProj), "{}", kind.label());
        }
    }

    #[test]
    fn flame_programs_read_noise_parameters() {
        let body = ProgramKind::Body.build().unwrap();
        for role in [
            UniformRole::Time,
            UniformRole::Scale,
            UniformRole::CameraPosition,
            UniformRole::IridA,
            UniformRole::IridD,
            UniformRole::PerlinFrequency,
            UniformRole::FbmAmplitude,
            UniformRole::FbmFrequency,
        ] {
            assert!(body.has_uniform(role), "body missing {role:?}");
        }

        let flame = ProgramKind::Flame.build().unwrap();
        assert!(flame.has_uniform(UniformRole::SecondaryColor));
    }

    #[test]
    fn flat_programs_skip_unread_uniforms() {
        let eye = ProgramKind::Eye.build().unwrap();
        assert!(eye.has_uniform(UniformRole::Color));
        assert!(eye.has_uniform(UniformRole::Radius));
        assert!(!eye.has_uniform(UniformRole::Time));
        assert!(!eye.has_uniform(UniformRole::IridA));

        let mouth = ProgramKind::Mouth.build().unwrap();
        assert!(!mouth.has_uniform(UniformRole::Radius));
        assert!(!mouth.has_uniform(UniformRole::CameraPosition));
    }

    #[test]
    fn stages_share_the_prelude_block() {
        let (vertex, fragment) = ProgramKind::Nose.sources();
        assert!(vertex.starts_with(PRELUDE));
        assert!(fragment.starts_with(PRELUDE));
        assert!(!vertex.contains("fn fbm"));

        let (vertex, _) = ProgramKind::Body.sources();
        assert!(vertex.contains("fn fbm"));
    }

    #[test]
    fn labels_are_unique() {
        let mut labels: Vec<_> = ProgramKind::ALL.iter().map(|k| k.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), ProgramKind::ALL.len());
    }
}
