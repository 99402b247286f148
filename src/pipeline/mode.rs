use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// Selects the fragment shader used for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Directional light with diffuse/specular/gloss/normal maps.
    Lit,
    /// Needs no textures, so it is the default.
    #[default]
    VertexColor,
    /// Diffuse map only, no lighting.
    Texture,
    /// Grayscale projected depth.
    Depth,
}

impl RenderMode {
    /// The next mode in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            RenderMode::Lit => RenderMode::VertexColor,
            RenderMode::VertexColor => RenderMode::Texture,
            RenderMode::Texture => RenderMode::Depth,
            RenderMode::Depth => RenderMode::Lit,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Lit => write!(f, "lit"),
            RenderMode::VertexColor => write!(f, "vertex color"),
            RenderMode::Texture => write!(f, "texture"),
            RenderMode::Depth => write!(f, "depth"),
        }
    }
}

/// Which terms of the lit model end up in the output color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Light radiance times diffuse plus ambient plus specular, weighted by
    /// the observed area.
    #[default]
    Combined,
    ObservedArea,
    Diffuse,
    Specular,
}

impl ShadingMode {
    pub fn next(self) -> Self {
        match self {
            ShadingMode::Combined => ShadingMode::ObservedArea,
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
        }
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadingMode::Combined => write!(f, "combined"),
            ShadingMode::ObservedArea => write!(f, "observed area"),
            ShadingMode::Diffuse => write!(f, "diffuse"),
            ShadingMode::Specular => write!(f, "specular"),
        }
    }
}
