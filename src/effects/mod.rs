pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod presets;
pub(crate) mod shadow;
pub(crate) mod vignette;
